mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, Row};

use crate::models::*;

const NOTE_COLUMNS: &str = "id, title, content, last_modified";

/// The note store: sole owner of the canonical note collection.
///
/// Cloning shares the underlying connection.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        tracing::debug!("Opened note database at {}", path.display());
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> Result<Self> {
        Self::open(default_path()?)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    // ============================================================
    // Note operations
    // ============================================================

    /// All notes in insertion order.
    pub fn get_all_notes(&self) -> Result<Vec<Note>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!("SELECT {NOTE_COLUMNS} FROM notes ORDER BY id"))?;

        let notes = stmt
            .query_map([], row_to_note)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(notes)
    }

    pub fn get_note(&self, id: i64) -> Result<Option<Note>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?"))?;

        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(row_to_note(row)?)),
            None => Ok(None),
        }
    }

    pub fn create_note(&self, input: NoteInput) -> Result<Note> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let now = Utc::now();

        conn.execute(
            "INSERT INTO notes (title, content, last_modified) VALUES (?, ?, ?)",
            (&input.title, &input.content, now.to_rfc3339()),
        )?;
        let id = conn.last_insert_rowid();

        Ok(Note {
            id,
            title: input.title,
            content: input.content,
            last_modified: now,
        })
    }

    /// Overwrite title and content. Returns `None` when no note has `id`.
    pub fn update_note(&self, id: i64, input: NoteInput) -> Result<Option<Note>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let now = Utc::now();

        let rows = conn.execute(
            "UPDATE notes SET title = ?, content = ?, last_modified = ? WHERE id = ?",
            (&input.title, &input.content, now.to_rfc3339(), id),
        )?;

        if rows == 0 {
            return Ok(None);
        }

        Ok(Some(Note {
            id,
            title: input.title,
            content: input.content,
            last_modified: now,
        }))
    }

    /// Hard delete. Returns `false` when no note has `id`.
    pub fn delete_note(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM notes WHERE id = ?", [id])?;
        Ok(rows > 0)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

/// `<platform data dir>/notes.db`
pub fn default_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "notes")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(dirs.data_dir().join("notes.db"))
}

fn row_to_note(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        last_modified: parse_datetime(3, row.get::<_, String>(3)?)?,
    })
}

fn parse_datetime(idx: usize, s: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
