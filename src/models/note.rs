use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A titled block of text.
///
/// `id` and `last_modified` are assigned by the store and never accepted from
/// callers. On the wire the timestamp is `lastModified` in RFC 3339.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    /// 1 to 100 characters.
    pub title: String,
    /// At least 1 character.
    pub content: String,
    pub last_modified: DateTime<Utc>,
}

/// A validated `{title, content}` payload, ready for the store.
///
/// Build one through [`crate::validation::validate`] rather than by hand when
/// the values come from a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteInput {
    pub title: String,
    pub content: String,
}

impl NoteInput {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// A request body as received, before validation.
///
/// Both fields may be missing. Unknown keys (including `id` and
/// `lastModified`) are dropped during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: Some(content.into()),
        }
    }
}

impl From<NoteInput> for NoteDraft {
    fn from(input: NoteInput) -> Self {
        Self {
            title: Some(input.title),
            content: Some(input.content),
        }
    }
}
