//! `quicknote` command-line entry point.
//!
//! # Responsibility
//! - Map command-line flags onto config overrides, a note draft and
//!   per-call options.
//! - Report failures on stderr and exit non-zero.

use clap::Parser;
use log::info;
use quicknote_core::{
    error_summary, init_logging, read_stdin, ConfigOverrides, Diagnostics, MiniJinjaEngine,
    NoteDraft, NoteService, NotesConfig, NotesResult, TakeNoteOptions, TakeNoteOutcome,
};
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "quicknote",
    version,
    about = "Render a note through a template and add it to your notes file"
)]
struct Args {
    /// Short comment shown above the content
    #[arg(short, long)]
    comment: Option<String>,

    /// Note content; stdin is not read when given
    #[arg(long, conflicts_with = "no_input")]
    content: Option<String>,

    /// Take no content at all
    #[arg(long)]
    no_input: bool,

    /// Tag to attach (repeatable)
    #[arg(short = 't', long = "tag", value_name = "TAG")]
    tags: Vec<String>,

    /// Url to attach (repeatable)
    #[arg(short = 'u', long = "url", value_name = "URL")]
    urls: Vec<String>,

    /// Header text; defaults to the current date
    #[arg(short = 'H', long)]
    header: Option<String>,

    /// Extra template field (repeatable); the value is parsed as YAML
    #[arg(short = 'F', long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
    fields: Vec<(String, Value)>,

    /// Notes file; defaults to `notes_file` from the config
    #[arg(short = 'f', long)]
    notes_file: Option<PathBuf>,

    /// Add the note at the bottom instead of the top
    #[arg(short, long)]
    append: bool,

    /// Code block language for the content
    #[arg(long)]
    content_type: Option<String>,

    /// Template file; defaults to `default_template_file` from the config
    #[arg(long)]
    template: Option<PathBuf>,

    /// Print the rendered note instead of writing it
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Config file [default: .notes_config.yaml]
    #[arg(long)]
    config: Option<PathBuf>,

    /// IANA timezone for the note date
    #[arg(long)]
    timezone: Option<String>,

    /// Keep tags exactly as given
    #[arg(long)]
    no_hashtag: bool,

    /// Do not append the date to an explicit header
    #[arg(long)]
    no_header_date: bool,

    /// trace|debug|info|warn|error|off
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Absolute directory for rotating log files; stderr when unset
    #[arg(long)]
    log_dir: Option<String>,
}

fn parse_field(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("field key cannot be empty in `{raw}`"));
    }
    let value = if value.trim().is_empty() {
        Value::String(value.to_string())
    } else {
        serde_yaml::from_str::<Value>(value).unwrap_or_else(|_| Value::String(value.to_string()))
    };
    Ok((key.to_string(), value))
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            timezone: self.timezone.clone(),
            append_date_to_header: self.no_header_date.then_some(false),
            auto_prepend_hashtag: self.no_hashtag.then_some(false),
            ..ConfigOverrides::default()
        }
    }

    fn options(&self) -> TakeNoteOptions {
        TakeNoteOptions {
            notes_file: self.notes_file.clone(),
            append: self.append,
            content_type: self.content_type.clone(),
            template_file: self.template.clone(),
            dry_run: self.dry_run,
        }
    }

    fn into_draft(self, content: Option<String>) -> NoteDraft {
        NoteDraft {
            comment: self.comment,
            content,
            header: self.header,
            tags: self.tags.into_iter().map(Value::String).collect(),
            urls: self.urls,
            extra: self.fields.into_iter().collect(),
            date: None,
            stamp_header: true,
        }
    }
}

fn run(args: Args) -> NotesResult<()> {
    let diagnostics = Diagnostics::global();
    let config = NotesConfig::load(args.config.as_deref(), &args.overrides(), &diagnostics)?;
    let service = NoteService::new(config, Box::new(MiniJinjaEngine), diagnostics);

    let content = match (&args.content, args.no_input) {
        (Some(content), _) => Some(content.clone()),
        (None, true) => None,
        (None, false) => Some(read_stdin()?),
    };
    let options = args.options();
    let draft = args.into_draft(content);

    match service.take_draft(draft, &options)? {
        TakeNoteOutcome::DryRun(rendered) => print!("{rendered}"),
        TakeNoteOutcome::Written { path, mode } => info!(
            "event=cli_run module=cli status=ok mode={} path={}",
            mode,
            path.display()
        ),
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(err) = init_logging(&args.log_level, args.log_dir.as_deref()) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!(
                "event=cli_run module=cli status=error error={}",
                error_summary(&err)
            );
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
