//! Run configuration for note taking.
//!
//! # Responsibility
//! - Define the recognized configuration keys with documented defaults.
//! - Apply explicit overrides on top of the loaded file.
//!
//! # Invariants
//! - A `NotesConfig` is validated once and never mutated afterwards.
//! - `default_content_type` is never blank.

use crate::error::{NotesError, NotesResult};
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::PathBuf;

mod load;

pub use load::{parse_config, DEFAULT_CONFIG_FILENAME};

pub const DEFAULT_CONTENT_TYPE: &str = "text";
pub const DEFAULT_TIMEZONE: Tz = Tz::US__Pacific;

/// Configuration loaded once per run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NotesConfig {
    /// Markdown code block language used when the caller gives none.
    pub default_content_type: String,
    /// Template used when the caller gives none.
    pub default_template_file: Option<PathBuf>,
    /// Append the timestamp to an explicit header (`<header> / <date>`).
    pub append_date_to_header: bool,
    /// Prefix tags with `#` when missing.
    pub auto_prepend_hashtag: bool,
    /// Notes file used when the caller gives none.
    pub notes_file: Option<PathBuf>,
    /// IANA zone for note timestamps.
    pub timezone: Tz,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            default_content_type: DEFAULT_CONTENT_TYPE.to_string(),
            default_template_file: None,
            append_date_to_header: true,
            auto_prepend_hashtag: true,
            notes_file: None,
            timezone: DEFAULT_TIMEZONE,
        }
    }
}

/// Explicit per-run values that take precedence over the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub default_content_type: Option<String>,
    pub default_template_file: Option<PathBuf>,
    pub append_date_to_header: Option<bool>,
    pub auto_prepend_hashtag: Option<bool>,
    pub notes_file: Option<PathBuf>,
    pub timezone: Option<String>,
}

impl NotesConfig {
    /// Returns a copy with `overrides` applied, then validated.
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> NotesResult<Self> {
        if let Some(value) = &overrides.default_content_type {
            self.default_content_type = value.clone();
        }
        if let Some(value) = &overrides.default_template_file {
            self.default_template_file = Some(value.clone());
        }
        if let Some(value) = overrides.append_date_to_header {
            self.append_date_to_header = value;
        }
        if let Some(value) = overrides.auto_prepend_hashtag {
            self.auto_prepend_hashtag = value;
        }
        if let Some(value) = &overrides.notes_file {
            self.notes_file = Some(value.clone());
        }
        if let Some(value) = &overrides.timezone {
            self.timezone = value.trim().parse::<Tz>().map_err(|err| {
                NotesError::InvalidConfig(format!("unknown timezone `{value}`: {err}"))
            })?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Checks invariants that serde defaults cannot express.
    pub fn validate(&self) -> NotesResult<()> {
        if self.default_content_type.trim().is_empty() {
            return Err(NotesError::InvalidConfig(
                "default_content_type cannot be blank".to_string(),
            ));
        }
        Ok(())
    }
}
