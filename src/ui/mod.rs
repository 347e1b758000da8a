//! Terminal front end: list view, note view, editor form and delete flow.
//!
//! All network access goes through [`NotesStore`], so the list view is served
//! from the cached collection until a mutation invalidates it.

mod form;
mod render;

pub use form::{confirm_delete, Mutation, NoteForm};
pub use render::{render_field_errors, render_list, render_note, EMPTY_LIST};

use std::io::{BufRead, Write};

use anyhow::Result;

use crate::client::NotesStore;
use crate::models::Note;

/// Error returned when the form fails validation; field errors are already
/// on the status stream.
pub const NOT_SAVED: &str = "Note not saved";

/// Drives one terminal session against a notes server.
///
/// `out` receives views and acknowledgments, `status` receives busy lines and
/// field errors, `input` answers the delete confirmation.
pub struct Ui<R, W, E> {
    store: NotesStore,
    input: R,
    out: W,
    status: E,
}

impl<R: BufRead, W: Write, E: Write> Ui<R, W, E> {
    pub fn new(store: NotesStore, input: R, out: W, status: E) -> Self {
        Self {
            store,
            input,
            out,
            status,
        }
    }

    pub fn store(&self) -> &NotesStore {
        &self.store
    }

    pub fn into_parts(self) -> (NotesStore, R, W, E) {
        (self.store, self.input, self.out, self.status)
    }

    pub async fn list(&mut self) -> Result<()> {
        let notes = self.store.list_notes().await?;
        write!(self.out, "{}", render_list(&notes))?;
        Ok(())
    }

    pub async fn show(&mut self, id: i64) -> Result<()> {
        let note = self.store.get_note(id).await?;
        write!(self.out, "{}", render_note(&note))?;
        Ok(())
    }

    pub async fn create(&mut self, form: NoteForm) -> Result<Note> {
        let input = self.submit(form)?;

        self.busy(Mutation::Created)?;
        let note = self.store.create_note(&input).await?;
        self.acknowledge(Mutation::Created)?;
        write!(self.out, "{}", render_note(&note))?;
        Ok(note)
    }

    /// Edit an existing note; fields left as `None` keep their current value.
    pub async fn edit(
        &mut self,
        id: i64,
        title: Option<String>,
        content: Option<String>,
    ) -> Result<Note> {
        let existing = self.store.get_note(id).await?;
        let input = self.submit(NoteForm::from_note(&existing).apply(title, content))?;

        self.busy(Mutation::Updated)?;
        let note = self.store.update_note(id, &input).await?;
        self.acknowledge(Mutation::Updated)?;
        write!(self.out, "{}", render_note(&note))?;
        Ok(note)
    }

    /// Delete after confirmation. Returns `false` when the user declined.
    ///
    /// On success the refreshed list is shown.
    pub async fn delete(&mut self, id: i64, assume_yes: bool) -> Result<bool> {
        let note = self.store.get_note(id).await?;

        if !assume_yes && !confirm_delete(&note.title, &mut self.input, &mut self.out)? {
            writeln!(self.out, "Cancelled")?;
            return Ok(false);
        }

        self.busy(Mutation::Deleted)?;
        self.store.delete_note(id).await?;
        self.acknowledge(Mutation::Deleted)?;
        self.list().await?;
        Ok(true)
    }

    fn submit(&mut self, form: NoteForm) -> Result<crate::models::NoteInput> {
        match form.submit() {
            Ok(input) => Ok(input),
            Err(errors) => {
                write!(self.status, "{}", render_field_errors(&errors))?;
                Err(anyhow::anyhow!(NOT_SAVED))
            }
        }
    }

    fn busy(&mut self, mutation: Mutation) -> Result<()> {
        writeln!(self.status, "{}", mutation.busy_label())?;
        self.status.flush()?;
        Ok(())
    }

    fn acknowledge(&mut self, mutation: Mutation) -> Result<()> {
        writeln!(self.out, "{}", mutation.acknowledgment())?;
        Ok(())
    }
}
