//! Payload validation for note writes.
//!
//! Rules:
//! - `title` must be present, 1 to 100 characters (no trimming)
//! - `content` must be present, at least 1 character
//!
//! Lengths are counted in Unicode scalar values. Every field is checked, so a
//! payload that breaks several rules reports all of them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{NoteDraft, NoteInput};

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 100;

pub const TITLE_REQUIRED: &str = "Title is required";
pub const TITLE_TOO_LONG: &str = "Title must be at most 100 characters";
pub const CONTENT_REQUIRED: &str = "Content is required";

/// A single rule violation on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// All violations found in one payload. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", self.message())]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    /// Human-readable summary, e.g. `Title is required; Content is required`.
    pub fn message(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// The first message reported for `field`, if any.
    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

/// Check a draft against the note rules.
///
/// Returns the sanitized input on success. Does not touch the store.
///
/// # Examples
/// ```
/// use notes::models::NoteDraft;
/// use notes::validation::validate;
///
/// assert!(validate(NoteDraft::new("Groceries", "Milk, eggs")).is_ok());
/// assert!(validate(NoteDraft::new("", "x")).is_err());
/// assert!(validate(NoteDraft::default()).is_err());
/// ```
pub fn validate(draft: NoteDraft) -> Result<NoteInput, ValidationErrors> {
    let mut errors = Vec::new();

    if let Some(message) = check_title(draft.title.as_deref()) {
        errors.push(FieldError::new("title", message));
    }
    if let Some(message) = check_content(draft.content.as_deref()) {
        errors.push(FieldError::new("content", message));
    }

    match (draft.title, draft.content) {
        (Some(title), Some(content)) if errors.is_empty() => Ok(NoteInput { title, content }),
        _ => Err(ValidationErrors { errors }),
    }
}

fn check_title(title: Option<&str>) -> Option<&'static str> {
    match title {
        None | Some("") => Some(TITLE_REQUIRED),
        Some(t) if t.chars().count() > TITLE_MAX_CHARS => Some(TITLE_TOO_LONG),
        Some(_) => None,
    }
}

fn check_content(content: Option<&str>) -> Option<&'static str> {
    match content {
        None | Some("") => Some(CONTENT_REQUIRED),
        Some(_) => None,
    }
}
