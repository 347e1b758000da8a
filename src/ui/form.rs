use std::io::{self, BufRead, Write};

use crate::models::{Note, NoteDraft, NoteInput};
use crate::validation::{self, ValidationErrors};

/// Editor form bound to `{title, content}`.
///
/// Submitting runs the same rules the server applies, so invalid input is
/// caught before any request goes out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteForm {
    pub title: String,
    pub content: String,
}

impl NoteForm {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Pre-filled from an existing note.
    pub fn from_note(note: &Note) -> Self {
        Self::new(note.title.clone(), note.content.clone())
    }

    /// Replace the fields that were provided, keep the rest.
    pub fn apply(mut self, title: Option<String>, content: Option<String>) -> Self {
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(content) = content {
            self.content = content;
        }
        self
    }

    pub fn submit(self) -> Result<NoteInput, ValidationErrors> {
        validation::validate(NoteDraft::new(self.title, self.content))
    }
}

/// Which mutation just happened, for busy and acknowledgment messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Created,
    Updated,
    Deleted,
}

impl Mutation {
    pub fn busy_label(&self) -> &'static str {
        match self {
            Self::Created | Self::Updated => "Saving…",
            Self::Deleted => "Deleting…",
        }
    }

    pub fn acknowledgment(&self) -> &'static str {
        match self {
            Self::Created => "Note created successfully",
            Self::Updated => "Note updated successfully",
            Self::Deleted => "Note deleted successfully",
        }
    }
}

/// Ask before deleting. Only `y` or `yes` (any case) confirms; end of input
/// declines.
pub fn confirm_delete<R: BufRead, W: Write>(
    title: &str,
    input: &mut R,
    output: &mut W,
) -> io::Result<bool> {
    write!(
        output,
        "Delete \"{}\"? This action cannot be undone. [y/N] ",
        title
    )?;
    output.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        writeln!(output)?;
        return Ok(false);
    }

    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}
