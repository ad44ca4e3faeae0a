use crate::config::NotesConfig;
use crate::error::{NotesError, NotesResult};
use crate::logging::{error_summary, Diagnostics};
use std::fmt::{Display, Formatter};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::Builder;

pub const TEMP_FILE_PREFIX: &str = "notes.";
pub const TEMP_FILE_SUFFIX: &str = ".md";

const MODULE: &str = "quicknote::store";

/// Where new text lands relative to existing notes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Newest note first.
    #[default]
    Prepend,
    Append,
}

impl Display for WriteMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Prepend => write!(f, "prepend"),
            Self::Append => write!(f, "append"),
        }
    }
}

/// Picks the explicit notes file, else the configured one.
///
/// # Errors
/// - `NotesFileUndefined` when neither is set.
/// - `NotesDirMissing` when the file's parent directory does not exist. An
///   empty parent stands for the current directory.
pub fn resolve_notes_file(explicit: Option<&Path>, config: &NotesConfig) -> NotesResult<PathBuf> {
    let notes_file = explicit
        .map(Path::to_path_buf)
        .or_else(|| config.notes_file.clone())
        .ok_or(NotesError::NotesFileUndefined)?;

    let notes_dir = parent_dir(&notes_file);
    if !notes_dir.is_dir() {
        return Err(NotesError::NotesDirMissing(notes_dir.to_path_buf()));
    }
    Ok(notes_file)
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Writes rendered notes to disk.
#[derive(Debug, Clone, Default)]
pub struct NotesFileWriter {
    diagnostics: Diagnostics,
}

impl NotesFileWriter {
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self { diagnostics }
    }

    pub fn write(&self, path: &Path, text: &str, mode: WriteMode) -> NotesResult<()> {
        let started_at = Instant::now();
        let result = match mode {
            WriteMode::Append => self.append(path, text),
            WriteMode::Prepend => self.prepend(path, text),
        };

        match &result {
            Ok(()) => self.diagnostics.info(
                MODULE,
                format_args!(
                    "event=note_write module=store status=ok mode={} path={} bytes={} duration_ms={}",
                    mode,
                    path.display(),
                    text.len(),
                    started_at.elapsed().as_millis()
                ),
            ),
            Err(err) => self.diagnostics.error(
                MODULE,
                format_args!(
                    "event=note_write module=store status=error mode={} path={} duration_ms={} error={}",
                    mode,
                    path.display(),
                    started_at.elapsed().as_millis(),
                    error_summary(err)
                ),
            ),
        }
        result
    }

    /// Appends `text` to `path`, creating it when absent.
    pub fn append(&self, path: &Path, text: &str) -> NotesResult<()> {
        self.diagnostics.debug(
            MODULE,
            format_args!(
                "event=file_append module=store status=start path={}",
                path.display()
            ),
        );
        let write_error = |source: std::io::Error| NotesError::Write {
            path: path.to_path_buf(),
            source,
        };

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .map_err(write_error)?;
        file.write_all(text.as_bytes()).map_err(write_error)?;
        file.flush().map_err(write_error)
    }

    /// Puts `text` in front of the current contents of `path`.
    ///
    /// Sequence: create a kept temp file next to `path`, write `text`, copy
    /// the old contents after it, then rename the temp file over `path`. A
    /// failed step leaves the temp file behind and `path` untouched.
    pub fn prepend(&self, path: &Path, text: &str) -> NotesResult<()> {
        let dir = parent_dir(path);
        let (mut file, tmp_path) = Builder::new()
            .prefix(TEMP_FILE_PREFIX)
            .suffix(TEMP_FILE_SUFFIX)
            .tempfile_in(dir)
            .and_then(|tmp| tmp.keep().map_err(|err| err.error))
            .map_err(|source| NotesError::TempFile {
                dir: dir.to_path_buf(),
                source,
            })?;
        self.diagnostics.debug(
            MODULE,
            format_args!(
                "event=temp_file_create module=store status=ok path={}",
                tmp_path.display()
            ),
        );

        write_to(&mut file, &tmp_path, text.as_bytes())?;

        if path.exists() {
            let existing = std::fs::read(path).map_err(|source| NotesError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            write_to(&mut file, &tmp_path, &existing)?;

            let permissions = std::fs::metadata(path)
                .map_err(|source| NotesError::Read {
                    path: path.to_path_buf(),
                    source,
                })?
                .permissions();
            file.set_permissions(permissions)
                .map_err(|source| NotesError::Write {
                    path: tmp_path.clone(),
                    source,
                })?;
        }

        file.sync_all().map_err(|source| NotesError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        drop(file);

        self.diagnostics.debug(
            MODULE,
            format_args!(
                "event=file_rename module=store status=start from={} to={}",
                tmp_path.display(),
                path.display()
            ),
        );
        std::fs::rename(&tmp_path, path).map_err(|source| NotesError::Rename {
            from: tmp_path,
            to: path.to_path_buf(),
            source,
        })
    }
}

fn write_to(file: &mut File, path: &Path, bytes: &[u8]) -> NotesResult<()> {
    file.write_all(bytes).map_err(|source| NotesError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::{
        parent_dir, resolve_notes_file, NotesFileWriter, WriteMode, TEMP_FILE_PREFIX,
        TEMP_FILE_SUFFIX,
    };
    use crate::config::NotesConfig;
    use crate::error::NotesError;
    use std::path::{Path, PathBuf};

    #[test]
    fn parent_of_bare_filename_is_current_dir() {
        assert_eq!(parent_dir(Path::new("notes.md")), Path::new("."));
        assert_eq!(parent_dir(Path::new("/a/b/notes.md")), Path::new("/a/b"));
    }

    #[test]
    fn resolve_requires_a_path() {
        let err = resolve_notes_file(None, &NotesConfig::default()).unwrap_err();
        assert!(matches!(err, NotesError::NotesFileUndefined));
    }

    #[test]
    fn resolve_checks_parent_dir_for_explicit_and_configured_paths() {
        let missing = PathBuf::from("/definitely/not/here/notes.md");
        let err =
            resolve_notes_file(Some(missing.as_path()), &NotesConfig::default()).unwrap_err();
        assert!(matches!(err, NotesError::NotesDirMissing(_)));

        let config = NotesConfig {
            notes_file: Some(missing),
            ..NotesConfig::default()
        };
        let err = resolve_notes_file(None, &config).unwrap_err();
        assert!(matches!(err, NotesError::NotesDirMissing(_)));
    }

    #[test]
    fn resolve_prefers_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("mine.md");
        let config = NotesConfig {
            notes_file: Some(dir.path().join("configured.md")),
            ..NotesConfig::default()
        };
        assert_eq!(
            resolve_notes_file(Some(explicit.as_path()), &config).unwrap(),
            explicit
        );
        assert_eq!(
            resolve_notes_file(None, &config).unwrap(),
            dir.path().join("configured.md")
        );
    }

    #[test]
    fn prepend_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        let writer = NotesFileWriter::default();

        writer.write(&path, "first\n", WriteMode::Prepend).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\n");
    }

    #[test]
    fn prepend_leaves_no_temp_file_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        let writer = NotesFileWriter::default();

        writer.prepend(&path, "a").unwrap();
        writer.prepend(&path, "b").unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("notes.md")]);
    }

    #[cfg(unix)]
    #[test]
    fn prepend_keeps_destination_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "old").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        NotesFileWriter::default().prepend(&path, "new ").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new old");
    }

    #[test]
    fn append_to_missing_dir_is_write_error() {
        let err = NotesFileWriter::default()
            .append(Path::new("/definitely/not/here/notes.md"), "x")
            .unwrap_err();
        assert!(matches!(err, NotesError::Write { .. }));
    }

    #[test]
    fn prepend_into_missing_dir_is_temp_file_error() {
        let err = NotesFileWriter::default()
            .prepend(Path::new("/definitely/not/here/notes.md"), "x")
            .unwrap_err();
        assert!(matches!(err, NotesError::TempFile { .. }));
    }

    #[test]
    fn failed_prepend_keeps_temp_file_and_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("inside.txt"), "kept").unwrap();

        let err = NotesFileWriter::default()
            .prepend(&path, "new\n")
            .unwrap_err();
        assert!(matches!(err, NotesError::Read { .. }));

        assert!(path.is_dir());
        assert_eq!(
            std::fs::read_to_string(path.join("inside.txt")).unwrap(),
            "kept"
        );

        let leftovers: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name != "notes.md")
            .collect();
        assert_eq!(leftovers.len(), 1);
        assert!(leftovers[0].starts_with(TEMP_FILE_PREFIX));
        assert!(leftovers[0].ends_with(TEMP_FILE_SUFFIX));
        assert_eq!(
            std::fs::read_to_string(dir.path().join(&leftovers[0])).unwrap(),
            "new\n"
        );
    }
}
