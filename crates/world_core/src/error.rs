//! Registry error taxonomy. Lookups that find nothing return `Option` and
//! never appear here; these variants mark invalid API usage or failed I/O,
//! surfaced as values so a running simulation never unwinds across the
//! public API.

use thiserror::Error;

use crate::obj::ObjId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("object {0:?} is already registered")]
    AlreadyRegistered(ObjId),
    #[error("object number {0:?} is not valid")]
    InvalidNumber(ObjId),
    #[error("object {0:?} is not a live member of the target list")]
    NotAMember(ObjId),
    #[error("objects are not members of the same list")]
    CrossList,
    #[error("object {0:?} cannot be moved relative to {1:?}")]
    InvalidMove(ObjId, ObjId),
}
