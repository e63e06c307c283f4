//! World configuration: playfield bounds and sector cell size, loaded from
//! JSON the same way the rest of the data directory is.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::sector::DEFAULT_CELL;

#[derive(Debug, Clone, Deserialize)]
pub struct WorldCfg {
    /// Playfield width in world units.
    pub width: i32,
    /// Playfield height in world units.
    pub height: i32,
    /// Sector cell edge; proximity shapes must stay within one cell.
    #[serde(default = "default_cell")]
    pub sector_cell: i32,
}

fn default_cell() -> i32 {
    DEFAULT_CELL
}

impl WorldCfg {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            sector_cell: DEFAULT_CELL,
        }
    }
}

/// Load a [`WorldCfg`] from a JSON file.
pub fn load_world_cfg(path: impl AsRef<Path>) -> Result<WorldCfg> {
    let path = path.as_ref();
    let txt = std::fs::read_to_string(path)
        .with_context(|| format!("read world config: {}", path.display()))?;
    let cfg: WorldCfg = serde_json::from_str(&txt).context("parse world config json")?;
    Ok(cfg)
}
