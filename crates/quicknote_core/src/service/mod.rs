//! Note-taking use-case services.
//!
//! # Responsibility
//! - Assemble note records from drafts.
//! - Orchestrate rendering and persistence per call.

pub mod assembler;
pub mod note_service;
