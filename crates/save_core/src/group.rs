//! Archive container abstraction: named entries of bytes, enumerated in a
//! stable order. The in-memory group backs tests and network transfer; the
//! directory group writes one file per entry.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GroupError {
    #[error("no such entry: {0}")]
    Missing(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub trait Group {
    /// Create or replace an entry. Replacing keeps the entry's position in
    /// the enumeration order.
    fn write_entry(&mut self, name: &str, data: &[u8]) -> Result<(), GroupError>;

    fn read_entry(&self, name: &str) -> Result<Vec<u8>, GroupError>;

    /// Entry names in stable sequential order.
    fn entry_names(&self) -> Vec<String>;

    fn has_entry(&self, name: &str) -> bool {
        self.entry_names().iter().any(|n| n == name)
    }
}

/// In-memory group preserving insertion order.
#[derive(Debug, Default)]
pub struct MemGroup {
    entries: Vec<(String, Vec<u8>)>,
}

impl MemGroup {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Group for MemGroup {
    fn write_entry(&mut self, name: &str, data: &[u8]) -> Result<(), GroupError> {
        if let Some(e) = self.entries.iter_mut().find(|(n, _)| n == name) {
            e.1 = data.to_vec();
        } else {
            self.entries.push((name.to_string(), data.to_vec()));
        }
        Ok(())
    }

    fn read_entry(&self, name: &str) -> Result<Vec<u8>, GroupError> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, d)| d.clone())
            .ok_or_else(|| GroupError::Missing(name.to_string()))
    }

    fn entry_names(&self) -> Vec<String> {
        self.entries.iter().map(|(n, _)| n.clone()).collect()
    }
}

/// Directory-backed group: one file per entry under `root`. Enumeration is
/// name-sorted so the order never depends on filesystem internals.
#[derive(Debug)]
pub struct DirGroup {
    root: PathBuf,
}

impl DirGroup {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, GroupError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        log::debug!("opened group directory {}", root.display());
        Ok(Self { root })
    }
}

impl Group for DirGroup {
    fn write_entry(&mut self, name: &str, data: &[u8]) -> Result<(), GroupError> {
        fs::write(self.root.join(name), data)?;
        Ok(())
    }

    fn read_entry(&self, name: &str) -> Result<Vec<u8>, GroupError> {
        match fs::read(self.root.join(name)) {
            Ok(d) => Ok(d),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(GroupError::Missing(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn entry_names(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                log::error!("cannot list group directory {}: {e}", self.root.display());
                return Vec::new();
            }
        };
        let mut names: Vec<String> = entries
            .flatten()
            .filter(|e| e.path().is_file())
            .filter_map(|e| e.file_name().into_string().ok())
            .collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_entry_is_not_found_not_a_panic() {
        let g = MemGroup::new();
        assert!(matches!(g.read_entry("nope"), Err(GroupError::Missing(_))));
    }

    #[test]
    fn rewrite_keeps_enumeration_position() {
        let mut g = MemGroup::new();
        g.write_entry("a", b"1").unwrap();
        g.write_entry("b", b"2").unwrap();
        g.write_entry("a", b"3").unwrap();
        assert_eq!(g.entry_names(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(g.read_entry("a").unwrap(), b"3");
    }
}
