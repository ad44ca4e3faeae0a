//! Notes file persistence.
//!
//! # Responsibility
//! - Resolve the notes file path for a call.
//! - Append or prepend rendered text without exposing half-written files.
//!
//! # Invariants
//! - Prepend replaces the destination only through a single `rename`.
//! - The writer never inserts separators of its own.
//! - No file locking: concurrent runs against one file may lose updates.

mod notes_file;

pub use notes_file::{
    resolve_notes_file, NotesFileWriter, WriteMode, TEMP_FILE_PREFIX, TEMP_FILE_SUFFIX,
};
