//! # Domain Models
//!
//! Plain data shared by every Roster crate: configuration, the registrant record and its
//! normalized identifier. Only `serde` is allowed here; no I/O, no async, no storage.

pub mod config;
pub mod constants;
pub mod registrant;

pub use registrant::{Identifier, Registrant};
