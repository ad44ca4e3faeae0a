use crate::config::NotesConfig;
use crate::error::{NotesError, NotesResult};
use crate::logging::{error_summary, Diagnostics};
use crate::model::note::Note;
use minijinja::Environment;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

const MODULE: &str = "quicknote::render";

/// Data mapping every note template is rendered with.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TemplateData<'a> {
    pub note: &'a Note,
    pub content_type: &'a str,
}

/// Compiles and renders template text.
pub trait TemplateEngine {
    /// Renders `source` with `data`. `path` names the template in errors.
    fn render(&self, path: &Path, source: &str, data: &TemplateData<'_>) -> NotesResult<String>;
}

/// Jinja2-compatible engine backed by `minijinja`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MiniJinjaEngine;

impl TemplateEngine for MiniJinjaEngine {
    fn render(&self, path: &Path, source: &str, data: &TemplateData<'_>) -> NotesResult<String> {
        let name = path.display().to_string();
        let env = Environment::new();
        let template = env
            .template_from_named_str(&name, source)
            .map_err(|source| NotesError::TemplateInvalid {
                path: path.to_path_buf(),
                source,
            })?;
        template.render(data).map_err(|source| NotesError::Render {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Picks the explicit template, else the configured default.
///
/// # Errors
/// - `TemplateNotFound` when neither is set or the chosen path is missing.
pub fn resolve_template_file(
    explicit: Option<&Path>,
    config: &NotesConfig,
) -> NotesResult<PathBuf> {
    let chosen = explicit
        .map(Path::to_path_buf)
        .or_else(|| config.default_template_file.clone())
        .unwrap_or_default();
    if chosen.as_os_str().is_empty() || !chosen.exists() {
        return Err(NotesError::TemplateNotFound(chosen));
    }
    Ok(chosen)
}

/// Loads template files and renders notes with a `TemplateEngine`.
pub struct TemplateRenderer {
    engine: Box<dyn TemplateEngine>,
    diagnostics: Diagnostics,
}

impl TemplateRenderer {
    pub fn new(engine: Box<dyn TemplateEngine>, diagnostics: Diagnostics) -> Self {
        Self {
            engine,
            diagnostics,
        }
    }

    /// Reads `template_file` and renders it with `data`.
    ///
    /// # Errors
    /// - `Read` when the template cannot be read.
    /// - `TemplateInvalid` / `Render` from the engine.
    pub fn render(&self, template_file: &Path, data: &TemplateData<'_>) -> NotesResult<String> {
        let started_at = Instant::now();
        self.diagnostics.debug(
            MODULE,
            format_args!(
                "event=note_render module=render status=start template={} content_type={} keys={}",
                template_file.display(),
                data.content_type,
                data.note.keys().join(",")
            ),
        );

        let source =
            std::fs::read_to_string(template_file).map_err(|source| NotesError::Read {
                path: template_file.to_path_buf(),
                source,
            });
        let rendered = source.and_then(|source| self.engine.render(template_file, &source, data));

        match &rendered {
            Ok(text) => self.diagnostics.debug(
                MODULE,
                format_args!(
                    "event=note_render module=render status=ok duration_ms={} bytes={}",
                    started_at.elapsed().as_millis(),
                    text.len()
                ),
            ),
            Err(err) => self.diagnostics.error(
                MODULE,
                format_args!(
                    "event=note_render module=render status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    error_summary(err)
                ),
            ),
        }
        rendered
    }
}
