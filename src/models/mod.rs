//! Domain models for the notes service.
//!
//! - [`Note`]: the only persisted entity, as stored and as sent on the wire.
//! - [`NoteInput`]: a validated `{title, content}` pair handed to the store.
//! - [`NoteDraft`]: a raw request body whose fields may be missing.

mod note;

pub use note::*;
