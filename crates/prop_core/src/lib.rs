//! `prop_core`: prototype-chained property stores for game entities.
//!
//! Every simulated object owns a [`Store`]: a key/value map with an optional
//! prototype store consulted on lookup miss (a long-lived definition object,
//! typically). Stores live in a generational arena; handles are
//! `(index, generation)` pairs validated on every dereference, so a handle
//! into a destroyed store observes the cleared state instead of dangling.

mod arena;
mod value;

pub use arena::{NAME_KEY, PROTOTYPE_KEY, PropArena, Store, StoreHandle};
pub use value::Value;
