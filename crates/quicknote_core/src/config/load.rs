//! YAML config file loading.
//!
//! # Invariants
//! - A missing, unreadable or syntactically broken file degrades to
//!   defaults with an error event.
//! - Well-formed YAML that is not a mapping, or whose recognized keys have
//!   the wrong type, is a hard error.

use super::{ConfigOverrides, NotesConfig};
use crate::error::{NotesError, NotesResult};
use crate::logging::{error_summary, Diagnostics};
use serde_yaml::Value;
use std::path::Path;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILENAME: &str = ".notes_config.yaml";

const MODULE: &str = "quicknote::config";

impl NotesConfig {
    /// Loads the config file at `path` (or the default filename) and applies
    /// `overrides`.
    pub fn load(
        path: Option<&Path>,
        overrides: &ConfigOverrides,
        diagnostics: &Diagnostics,
    ) -> NotesResult<Self> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILENAME));
        diagnostics.debug(
            MODULE,
            format_args!(
                "event=config_load module=config status=start path={}",
                path.display()
            ),
        );

        let loaded = if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(source) => parse_config(&source, path, diagnostics)?,
                Err(err) => {
                    diagnostics.error(
                        MODULE,
                        format_args!(
                            "event=config_load module=config status=error error_code=config_unreadable path={} error={}",
                            path.display(),
                            err
                        ),
                    );
                    NotesConfig::default()
                }
            }
        } else {
            diagnostics.error(
                MODULE,
                format_args!(
                    "event=config_load module=config status=error error_code=config_not_found path={}",
                    path.display()
                ),
            );
            NotesConfig::default()
        };

        let config = loaded.with_overrides(overrides)?;
        diagnostics.debug(
            MODULE,
            format_args!(
                "event=config_load module=config status=ok content_type={} append_date={} hashtag={} timezone={} notes_file_set={} template_set={}",
                config.default_content_type,
                config.append_date_to_header,
                config.auto_prepend_hashtag,
                config.timezone,
                config.notes_file.is_some(),
                config.default_template_file.is_some()
            ),
        );
        Ok(config)
    }
}

/// Parses YAML config text. `path` is only used for error context.
///
/// An empty or `null` document yields defaults, and so does text that is
/// not valid YAML (after an error event).
pub fn parse_config(
    source: &str,
    path: &Path,
    diagnostics: &Diagnostics,
) -> NotesResult<NotesConfig> {
    let config_error = |message: String| NotesError::ConfigLoad {
        path: path.to_path_buf(),
        message,
    };

    let value: Value = match serde_yaml::from_str(source) {
        Ok(value) => value,
        Err(err) => {
            diagnostics.error(
                MODULE,
                format_args!(
                    "event=config_load module=config status=error error_code=config_unparsable path={} error={}",
                    path.display(),
                    error_summary(&err)
                ),
            );
            return Ok(NotesConfig::default());
        }
    };
    match value {
        Value::Null => Ok(NotesConfig::default()),
        Value::Mapping(_) => {
            serde_yaml::from_value(value).map_err(|err| config_error(err.to_string()))
        }
        _ => Err(config_error(
            "top-level document must be a mapping".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_config;
    use crate::config::{ConfigOverrides, NotesConfig};
    use crate::error::NotesError;
    use crate::logging::Diagnostics;
    use log::{Level, Log, Metadata, Record};
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct CaptureSink {
        lines: Mutex<Vec<(Level, String)>>,
    }

    impl Log for CaptureSink {
        fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &Record<'_>) {
            self.lines
                .lock()
                .unwrap()
                .push((record.level(), record.args().to_string()));
        }

        fn flush(&self) {}
    }

    #[test]
    fn parses_all_recognized_keys() {
        let source = "\
default_content_type: python
default_template_file: /etc/notes/note.md.j2
append_date_to_header: false
auto_prepend_hashtag: false
notes_file: /home/me/notes.md
timezone: UTC
";
        let config =
            parse_config(source, Path::new("cfg.yaml"), &Diagnostics::global()).unwrap();
        assert_eq!(config.default_content_type, "python");
        assert_eq!(
            config.default_template_file,
            Some(PathBuf::from("/etc/notes/note.md.j2"))
        );
        assert!(!config.append_date_to_header);
        assert!(!config.auto_prepend_hashtag);
        assert_eq!(config.notes_file, Some(PathBuf::from("/home/me/notes.md")));
        assert_eq!(config.timezone, chrono_tz::Tz::UTC);
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config = parse_config("", Path::new("cfg.yaml"), &Diagnostics::global()).unwrap();
        assert_eq!(config, NotesConfig::default());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config =
            parse_config("editor: vim\n", Path::new("cfg.yaml"), &Diagnostics::global()).unwrap();
        assert_eq!(config, NotesConfig::default());
    }

    #[test]
    fn malformed_yaml_degrades_to_defaults_with_error_event() {
        let sink = Arc::new(CaptureSink::default());
        let diagnostics = Diagnostics::with_sink(sink.clone());

        let config = parse_config(
            "notes_file: [unclosed\n",
            Path::new("cfg.yaml"),
            &diagnostics,
        )
        .unwrap();
        assert_eq!(config, NotesConfig::default());

        let lines = sink.lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, Level::Error);
        assert!(lines[0].1.contains("error_code=config_unparsable"));
        assert!(lines[0].1.contains("cfg.yaml"));
    }

    #[test]
    fn load_of_malformed_file_applies_overrides_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".notes_config.yaml");
        std::fs::write(&path, "notes_file: [unclosed\n").unwrap();

        let overrides = ConfigOverrides {
            auto_prepend_hashtag: Some(false),
            ..ConfigOverrides::default()
        };
        let config =
            NotesConfig::load(Some(path.as_path()), &overrides, &Diagnostics::global()).unwrap();
        assert_eq!(config.notes_file, None);
        assert!(!config.auto_prepend_hashtag);
        assert_eq!(config.default_content_type, "text");
    }

    #[test]
    fn non_mapping_document_is_a_config_error() {
        let err = parse_config("- a\n- b\n", Path::new("cfg.yaml"), &Diagnostics::global())
            .unwrap_err();
        assert!(matches!(err, NotesError::ConfigLoad { .. }));
        assert!(err.to_string().contains("cfg.yaml"));
    }

    #[test]
    fn mistyped_known_key_is_a_config_error() {
        let err = parse_config(
            "append_date_to_header: [1, 2]\n",
            Path::new("cfg.yaml"),
            &Diagnostics::global(),
        )
        .unwrap_err();
        assert!(matches!(err, NotesError::ConfigLoad { .. }));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.yaml");
        let config = NotesConfig::load(
            Some(missing.as_path()),
            &ConfigOverrides::default(),
            &Diagnostics::global(),
        )
        .unwrap();
        assert_eq!(config, NotesConfig::default());
    }

    #[test]
    fn load_applies_overrides_after_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.yaml");
        std::fs::write(&path, "default_content_type: bash\nauto_prepend_hashtag: true\n")
            .unwrap();

        let overrides = ConfigOverrides {
            auto_prepend_hashtag: Some(false),
            ..ConfigOverrides::default()
        };
        let config =
            NotesConfig::load(Some(path.as_path()), &overrides, &Diagnostics::global()).unwrap();
        assert_eq!(config.default_content_type, "bash");
        assert!(!config.auto_prepend_hashtag);
    }
}
