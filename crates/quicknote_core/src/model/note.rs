//! Note record and the arguments it is built from.
//!
//! # Responsibility
//! - Hold one assembled note with explicit inclusion rules per field.
//! - Serialize the note as the mapping templates see under `note`.
//!
//! # Invariants
//! - `comment`, `content` and `header` are `Some` only when non-empty.
//! - `tags` and `urls` may be empty; empty sequences are not serialized.
//! - Extra fields are always serialized, in insertion order, and shadow
//!   same-named fixed keys.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

pub const FIELD_COMMENT: &str = "comment";
pub const FIELD_CONTENT: &str = "content";
pub const FIELD_HEADER: &str = "header";
pub const FIELD_TAGS: &str = "tags";
pub const FIELD_URLS: &str = "urls";

/// One assembled note.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Note {
    pub(crate) comment: Option<String>,
    pub(crate) content: Option<String>,
    pub(crate) header: Option<String>,
    pub(crate) tags: Vec<String>,
    pub(crate) urls: Vec<String>,
    pub(crate) extra: Map<String, Value>,
}

impl Note {
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Keys present in the serialized mapping, in serialization order.
    pub fn keys(&self) -> Vec<&str> {
        let fixed: [(&str, bool); 5] = [
            (FIELD_COMMENT, self.comment.is_some()),
            (FIELD_CONTENT, self.content.is_some()),
            (FIELD_HEADER, self.header.is_some()),
            (FIELD_TAGS, !self.tags.is_empty()),
            (FIELD_URLS, !self.urls.is_empty()),
        ];
        let mut keys: Vec<&str> = Vec::new();
        for (key, present) in fixed {
            if present && !self.shadowed(key) {
                keys.push(key);
            }
        }
        keys.extend(self.extra.keys().map(String::as_str));
        keys
    }

    /// True when the note serializes to an empty mapping.
    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }

    fn shadowed(&self, key: &str) -> bool {
        self.extra.contains_key(key)
    }
}

impl Serialize for Note {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in [
            (FIELD_COMMENT, &self.comment),
            (FIELD_CONTENT, &self.content),
            (FIELD_HEADER, &self.header),
        ] {
            if let Some(value) = value {
                if !self.shadowed(key) {
                    map.serialize_entry(key, value)?;
                }
            }
        }
        for (key, values) in [(FIELD_TAGS, &self.tags), (FIELD_URLS, &self.urls)] {
            if !values.is_empty() && !self.shadowed(key) {
                map.serialize_entry(key, values)?;
            }
        }
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Arguments a note is assembled from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteDraft {
    pub comment: Option<String>,
    pub content: Option<String>,
    pub header: Option<String>,
    /// Any JSON value; non-strings are coerced to their JSON text.
    pub tags: Vec<Value>,
    pub urls: Vec<String>,
    /// Passed through verbatim, regardless of emptiness.
    pub extra: Map<String, Value>,
    /// Timestamp to use instead of the current time.
    pub date: Option<String>,
    /// Use the timestamp as header when `header` is `None`.
    pub stamp_header: bool,
}

impl NoteDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<Value>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.urls.push(url.into());
        self
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn stamp_header(mut self, stamp: bool) -> Self {
        self.stamp_header = stamp;
        self
    }
}
