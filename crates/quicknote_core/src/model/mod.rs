//! Note data model.
//!
//! # Responsibility
//! - Define the note record and the draft it is assembled from.
//! - Provide the pure field builders and timestamp formatting.
//!
//! # Invariants
//! - Nothing in this module touches the filesystem.

pub mod fields;
pub mod note;
pub mod timestamp;
