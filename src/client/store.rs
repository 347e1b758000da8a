use std::sync::Arc;

use super::{ClientError, NotesClient, QueryCache};
use crate::models::{Note, NoteInput};

/// Resource tag for the cached notes collection.
pub const NOTES_COLLECTION: &str = "notes";

/// Client data layer: remote note operations plus a cached collection.
///
/// Every successful mutation invalidates [`NOTES_COLLECTION`]. Failed
/// mutations leave the cache alone and are never retried.
pub struct NotesStore {
    client: NotesClient,
    cache: QueryCache<Vec<Note>>,
}

impl NotesStore {
    pub fn new(client: NotesClient) -> Self {
        Self {
            client,
            cache: QueryCache::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(NotesClient::from_env())
    }

    pub fn client(&self) -> &NotesClient {
        &self.client
    }

    /// The notes collection, fetched on first use or after invalidation.
    pub async fn list_notes(&self) -> Result<Arc<Vec<Note>>, ClientError> {
        self.cache
            .get_or_fetch(NOTES_COLLECTION, || self.client.list_notes())
            .await
    }

    /// The cached collection if it is fresh, without going to the network.
    pub fn cached_notes(&self) -> Option<Arc<Vec<Note>>> {
        self.cache.peek(NOTES_COLLECTION)
    }

    pub async fn get_note(&self, id: i64) -> Result<Note, ClientError> {
        self.client.get_note(id).await
    }

    pub async fn create_note(&self, input: &NoteInput) -> Result<Note, ClientError> {
        let note = self.client.create_note(input).await?;
        self.cache.invalidate(NOTES_COLLECTION);
        Ok(note)
    }

    pub async fn update_note(&self, id: i64, input: &NoteInput) -> Result<Note, ClientError> {
        let note = self.client.update_note(id, input).await?;
        self.cache.invalidate(NOTES_COLLECTION);
        Ok(note)
    }

    pub async fn delete_note(&self, id: i64) -> Result<(), ClientError> {
        self.client.delete_note(id).await?;
        self.cache.invalidate(NOTES_COLLECTION);
        Ok(())
    }
}
