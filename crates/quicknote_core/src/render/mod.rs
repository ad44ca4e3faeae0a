//! Note rendering through a text template.
//!
//! # Responsibility
//! - Resolve which template file applies to a call.
//! - Load template text and hand it to a `TemplateEngine`.
//!
//! # Invariants
//! - Engine failures surface as `NotesError`, never as engine error types.
//! - Template data is always `{note, content_type}`.

mod template;

pub use template::{
    resolve_template_file, MiniJinjaEngine, TemplateData, TemplateEngine, TemplateRenderer,
};
