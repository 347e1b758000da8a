//! Plain-text rendering of notes for the terminal.

use chrono::{DateTime, Utc};

use crate::models::Note;
use crate::validation::ValidationErrors;

/// Titles longer than this are cut in the list view.
const LIST_TITLE_WIDTH: usize = 40;
const ELLIPSIS: char = '…';

pub const EMPTY_LIST: &str = "No notes yet";

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn truncate(title: &str, width: usize) -> String {
    if title.chars().count() <= width {
        return title.to_string();
    }
    let mut cut: String = title.chars().take(width - 1).collect();
    cut.push(ELLIPSIS);
    cut
}

/// Render the list view, one note per line, in the order given.
///
/// Example output:
/// ```text
/// #1    Groceries                                 2024-05-01 09:30 UTC
/// #2    Trip ideas                                2024-05-02 18:04 UTC
/// ```
pub fn render_list(notes: &[Note]) -> String {
    if notes.is_empty() {
        return format!("{EMPTY_LIST}\n");
    }

    let mut output = String::new();
    for note in notes {
        let id = format!("#{}", note.id);
        output.push_str(&format!(
            "{:<5} {:<width$}  {}\n",
            id,
            truncate(&note.title, LIST_TITLE_WIDTH),
            format_timestamp(&note.last_modified),
            width = LIST_TITLE_WIDTH,
        ));
    }
    output
}

/// Render a single note: heading, timestamp, then the full content.
pub fn render_note(note: &Note) -> String {
    format!(
        "#{} {}\nLast modified {}\n\n{}\n",
        note.id,
        note.title,
        format_timestamp(&note.last_modified),
        note.content
    )
}

/// One line per field error, e.g. `  title: Title is required`.
pub fn render_field_errors(errors: &ValidationErrors) -> String {
    errors
        .errors()
        .iter()
        .map(|e| format!("  {}: {}\n", e.field, e.message))
        .collect()
}
