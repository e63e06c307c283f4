//! `world_core`: the authoritative object list for a deterministic 2D world.
//!
//! One [`registry::Registry`] owns every live entity: the single ordered
//! master list (draw/execution/collision priority), the sector grid for
//! proximity queries, the inactive side list, the deferred resort queue, and
//! the per-entity property stores. All mutation happens on one logical
//! simulation thread per tick; replicas that execute the same operation
//! sequence reach identical list state, so nothing in here may order by
//! hash-map iteration, addresses, or clocks.

pub mod config;
pub mod error;
pub mod list;
pub mod obj;
pub mod registry;
pub mod resort;
pub mod saveload;
pub mod sector;

pub use config::WorldCfg;
pub use error::RegistryError;
pub use list::ObjList;
pub use obj::{Obj, ObjId, ObjInit, Shape, Status};
pub use registry::Registry;
pub use resort::{OrderFn, Place};
