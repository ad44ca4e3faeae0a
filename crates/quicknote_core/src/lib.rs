//! Core note-taking logic for quicknote.
//!
//! A call assembles a note from user input, renders it through a text
//! template and writes the result to the top (or bottom) of a notes file.

pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod model;
pub mod render;
pub mod service;
pub mod store;

pub use config::{ConfigOverrides, NotesConfig, DEFAULT_CONFIG_FILENAME};
pub use error::{NotesError, NotesResult};
pub use input::{read_input, read_stdin};
pub use logging::{error_summary, init_logging, logging_status, Diagnostics};
pub use model::note::{Note, NoteDraft};
pub use model::timestamp::{current_timestamp, format_timestamp, TIMESTAMP_FORMAT};
pub use render::{MiniJinjaEngine, TemplateData, TemplateEngine};
pub use service::assembler::assemble_note;
pub use service::note_service::{NoteService, TakeNoteOptions, TakeNoteOutcome};
pub use store::{NotesFileWriter, WriteMode};
