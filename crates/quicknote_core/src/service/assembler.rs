//! Note assembly from a draft.
//!
//! # Invariants
//! - The timestamp is resolved once per call and shared by every field.
//! - `comment`, `content` and `header` are kept only when non-empty.
//! - `tags` and `urls` are kept only when non-empty after normalization.
//! - Extra fields are always kept.

use crate::config::NotesConfig;
use crate::model::fields;
use crate::model::note::{Note, NoteDraft};
use crate::model::timestamp::current_timestamp;

/// Builds one note from `draft` under `config`'s field rules.
pub fn assemble_note(draft: NoteDraft, config: &NotesConfig) -> Note {
    let date = draft
        .date
        .unwrap_or_else(|| current_timestamp(config.timezone));

    let header_text = draft.header.as_deref().filter(|text| !text.is_empty());
    let header = match (header_text, draft.stamp_header) {
        (None, false) => None,
        (text, _) => Some(fields::header(
            text,
            &date,
            config.append_date_to_header,
        )),
    };

    Note {
        comment: non_empty(fields::comment(draft.comment.as_deref())),
        content: non_empty(fields::content(draft.content.as_deref())),
        header: non_empty(header),
        tags: fields::tags(&draft.tags, config.auto_prepend_hashtag),
        urls: fields::urls(&draft.urls),
        extra: draft.extra,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}
