//! Note-taking use-case service.
//!
//! # Responsibility
//! - Assemble notes from drafts under the run configuration.
//! - Render notes through the template renderer.
//! - Persist rendered notes by appending or prepending.
//!
//! # Invariants
//! - Dry runs never create or modify the notes file.
//! - The notes file path is resolved (and its directory checked) before
//!   anything is rendered.
//! - Configuration is read-only for the lifetime of the service.

use crate::config::NotesConfig;
use crate::error::NotesResult;
use crate::logging::Diagnostics;
use crate::model::fields;
use crate::model::note::{Note, NoteDraft};
use crate::render::{
    resolve_template_file, MiniJinjaEngine, TemplateData, TemplateEngine, TemplateRenderer,
};
use crate::service::assembler::assemble_note;
use crate::store::{resolve_notes_file, NotesFileWriter, WriteMode};
use std::path::{Path, PathBuf};

const MODULE: &str = "quicknote::service";

/// Per-call options for [`NoteService::take_note`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TakeNoteOptions {
    /// Overrides the configured notes file.
    pub notes_file: Option<PathBuf>,
    /// Add at the bottom instead of the top.
    pub append: bool,
    /// Overrides the configured content type.
    pub content_type: Option<String>,
    /// Overrides the configured template.
    pub template_file: Option<PathBuf>,
    /// Render only; leave the notes file untouched.
    pub dry_run: bool,
}

impl TakeNoteOptions {
    pub fn write_mode(&self) -> WriteMode {
        if self.append {
            WriteMode::Append
        } else {
            WriteMode::Prepend
        }
    }
}

/// What [`NoteService::take_note`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TakeNoteOutcome {
    Written { path: PathBuf, mode: WriteMode },
    /// The rendered text, not written anywhere.
    DryRun(String),
}

/// Note service facade over rendering and file persistence.
pub struct NoteService {
    config: NotesConfig,
    renderer: TemplateRenderer,
    writer: NotesFileWriter,
    diagnostics: Diagnostics,
}

impl NoteService {
    /// Creates a service with an explicit template engine and logging handle.
    pub fn new(
        config: NotesConfig,
        engine: Box<dyn TemplateEngine>,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            config,
            renderer: TemplateRenderer::new(engine, diagnostics.clone()),
            writer: NotesFileWriter::new(diagnostics.clone()),
            diagnostics,
        }
    }

    /// Creates a service with the minijinja engine and global logging.
    pub fn with_defaults(config: NotesConfig) -> Self {
        Self::new(config, Box::new(MiniJinjaEngine), Diagnostics::global())
    }

    pub fn config(&self) -> &NotesConfig {
        &self.config
    }

    /// Assembles one note from `draft`.
    pub fn note(&self, draft: NoteDraft) -> Note {
        let tag_count = draft.tags.len();
        let note = assemble_note(draft, &self.config);
        self.diagnostics.debug(
            MODULE,
            format_args!(
                "event=note_build module=service status=ok keys={} tags_in={} tags_out={} content_len={}",
                note.keys().join(","),
                tag_count,
                note.tags().len(),
                note.content().map_or(0, str::len)
            ),
        );
        note
    }

    /// Content type for a call: `explicit`, else the configured default.
    pub fn content_type(&self, explicit: Option<&str>) -> String {
        fields::content_type(explicit, &self.config.default_content_type)
    }

    /// Renders `note` with the given or configured template.
    ///
    /// # Errors
    /// - `TemplateNotFound` when no existing template applies.
    /// - `Read`, `TemplateInvalid` or `Render` from the renderer.
    pub fn render_note(
        &self,
        template_file: Option<&Path>,
        note: &Note,
        content_type: Option<&str>,
    ) -> NotesResult<String> {
        let content_type = self.content_type(content_type);
        let template_file = resolve_template_file(template_file, &self.config)?;
        let data = TemplateData {
            note,
            content_type: &content_type,
        };
        self.renderer.render(&template_file, &data)
    }

    /// Renders `note` and writes it to the notes file, or returns the
    /// rendered text on a dry run.
    ///
    /// # Errors
    /// - `NotesFileUndefined` / `NotesDirMissing` from path resolution.
    /// - Any rendering error from [`NoteService::render_note`].
    /// - `TempFile`, `Read`, `Write` or `Rename` from the file writer.
    pub fn take_note(
        &self,
        note: &Note,
        options: &TakeNoteOptions,
    ) -> NotesResult<TakeNoteOutcome> {
        let notes_file = resolve_notes_file(options.notes_file.as_deref(), &self.config)?;
        let rendered = self.render_note(
            options.template_file.as_deref(),
            note,
            options.content_type.as_deref(),
        )?;

        if options.dry_run {
            self.diagnostics.info(
                MODULE,
                format_args!(
                    "event=take_note module=service status=ok dry_run=true path={} bytes={}",
                    notes_file.display(),
                    rendered.len()
                ),
            );
            return Ok(TakeNoteOutcome::DryRun(rendered));
        }

        let mode = options.write_mode();
        self.writer.write(&notes_file, &rendered, mode)?;
        Ok(TakeNoteOutcome::Written {
            path: notes_file,
            mode,
        })
    }

    /// Assembles `draft`, then behaves like [`NoteService::take_note`].
    pub fn take_draft(
        &self,
        draft: NoteDraft,
        options: &TakeNoteOptions,
    ) -> NotesResult<TakeNoteOutcome> {
        let note = self.note(draft);
        self.take_note(&note, options)
    }
}
