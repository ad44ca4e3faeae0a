//! Error type shared by every quicknote operation.
//!
//! # Responsibility
//! - Wrap low-level I/O, YAML and templating failures at their origin.
//! - Carry the failed operation and target path in every message.
//!
//! # Invariants
//! - Public APIs never surface raw `io::Error` or engine errors directly.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

pub type NotesResult<T> = Result<T, NotesError>;

/// Failure categories for note assembly, rendering and persistence.
#[derive(Debug)]
pub enum NotesError {
    /// Config file exists but could not be parsed into a mapping.
    ConfigLoad { path: PathBuf, message: String },
    /// Config parsed but holds an unusable value.
    InvalidConfig(String),
    /// Neither the explicit nor the configured template path exists.
    TemplateNotFound(PathBuf),
    /// Template text failed to compile.
    TemplateInvalid {
        path: PathBuf,
        source: minijinja::Error,
    },
    /// Template compiled but rendering failed.
    Render {
        path: PathBuf,
        source: minijinja::Error,
    },
    /// Temp file for the prepend sequence could not be created.
    TempFile { dir: PathBuf, source: io::Error },
    Read { path: PathBuf, source: io::Error },
    Write { path: PathBuf, source: io::Error },
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
    /// No notes file given and none configured.
    NotesFileUndefined,
    /// The notes file's parent directory does not exist.
    NotesDirMissing(PathBuf),
    /// Reading note content from stdin failed.
    Input(io::Error),
}

impl Display for NotesError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConfigLoad { path, message } => write!(
                f,
                "unable to get config data from {}: {message}",
                path.display()
            ),
            Self::InvalidConfig(message) => write!(f, "invalid config: {message}"),
            Self::TemplateNotFound(path) => {
                write!(f, "template file `{}` not found", path.display())
            }
            Self::TemplateInvalid { path, source } => {
                write!(f, "failed to read template {}: {source}", path.display())
            }
            Self::Render { path, source } => {
                write!(f, "failed to render template {}: {source}", path.display())
            }
            Self::TempFile { dir, source } => write!(
                f,
                "unable to create temp file in {}: {source}",
                dir.display()
            ),
            Self::Read { path, source } => {
                write!(f, "failed to read file {}: {source}", path.display())
            }
            Self::Write { path, source } => {
                write!(f, "failed to write to {}: {source}", path.display())
            }
            Self::Rename { from, to, source } => write!(
                f,
                "failed to rename {} to {}: {source}",
                from.display(),
                to.display()
            ),
            Self::NotesFileUndefined => write!(f, "path to notes file not defined"),
            Self::NotesDirMissing(dir) => write!(
                f,
                "notes file's directory does not exist: {}",
                dir.display()
            ),
            Self::Input(err) => write!(f, "failed to read note input: {err}"),
        }
    }
}

impl Error for NotesError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::TemplateInvalid { source, .. } | Self::Render { source, .. } => Some(source),
            Self::TempFile { source, .. }
            | Self::Read { source, .. }
            | Self::Write { source, .. }
            | Self::Rename { source, .. } => Some(source),
            Self::Input(err) => Some(err),
            Self::ConfigLoad { .. }
            | Self::InvalidConfig(_)
            | Self::TemplateNotFound(_)
            | Self::NotesFileUndefined
            | Self::NotesDirMissing(_) => None,
        }
    }
}
