//! `save_core`: archive abstraction + record codec for world persistence.
//!
//! The registry never touches a concrete archive format; it talks to the
//! [`Group`] trait (named byte-buffer entries in a stable sequential order)
//! and encodes records through [`SaveEncode`]/[`SaveDecode`]. Later formats
//! can swap in better encoders without breaking callers of these traits.

pub mod codec;
pub mod group;

pub use codec::{SaveDecode, SaveEncode, take};
pub use group::{DirGroup, Group, GroupError, MemGroup};
