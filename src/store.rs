use crate::types::note::{now_timestamp, NewNote, Note, NoteUpdate};
use handle_errors::Error;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

const NOTE_COLUMNS: &str = "id, title, content, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct Store {
    pub connection: SqlitePool,
}

fn note_from_row(row: SqliteRow) -> Note {
    Note {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl Store {
    /// Opens the database file, creating it when missing, and applies pending migrations.
    ///
    /// WAL mode plus a busy timeout lets concurrent writers queue on the file lock
    /// instead of failing with `SQLITE_BUSY`.
    pub async fn new(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let db_pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        info!("opened database at {}", path.display());

        Self::migrate(db_pool).await
    }

    /// A private in-memory database. One connection that never expires, since
    /// every SQLite memory connection is its own database.
    pub async fn in_memory() -> Result<Self, Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let db_pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::migrate(db_pool).await
    }

    async fn migrate(db_pool: SqlitePool) -> Result<Self, Error> {
        sqlx::migrate!("./migrations").run(&db_pool).await?;
        Ok(Store {
            connection: db_pool,
        })
    }

    pub async fn add_note(&self, new_note: NewNote) -> Result<Note, Error> {
        let now = now_timestamp();
        match sqlx::query(&format!(
            "INSERT INTO notes (title, content, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            RETURNING {}",
            NOTE_COLUMNS
        ))
        .bind(new_note.title)
        .bind(new_note.content)
        .bind(now.clone())
        .bind(now)
        .map(note_from_row)
        .fetch_one(&self.connection)
        .await
        {
            Ok(note) => Ok(note),
            Err(e) => Err(Error::DatabaseQueryError(e)),
        }
    }

    pub async fn get_every_note(&self) -> Result<Vec<Note>, Error> {
        match sqlx::query(&format!("SELECT {} FROM notes ORDER BY id ASC", NOTE_COLUMNS))
            .map(note_from_row)
            .fetch_all(&self.connection)
            .await
        {
            Ok(notes) => Ok(notes),
            Err(e) => Err(Error::DatabaseQueryError(e)),
        }
    }

    pub async fn get_note(&self, id: i64) -> Result<Note, Error> {
        match sqlx::query(&format!("SELECT {} FROM notes WHERE id = ?", NOTE_COLUMNS))
            .bind(id)
            .map(note_from_row)
            .fetch_optional(&self.connection)
            .await
        {
            Ok(Some(note)) => Ok(note),
            Ok(None) => Err(Error::NoteNotFound(id)),
            Err(e) => Err(Error::DatabaseQueryError(e)),
        }
    }

    /// Merges the supplied fields into the stored note in one statement, so
    /// writers touching different notes never overwrite each other.
    pub async fn update_note(&self, id: i64, update: NoteUpdate) -> Result<Note, Error> {
        if update.is_empty() {
            return self.get_note(id).await;
        }

        match sqlx::query(&format!(
            "UPDATE notes
            SET title = COALESCE(?, title),
                content = COALESCE(?, content),
                updated_at = ?
            WHERE id = ?
            RETURNING {}",
            NOTE_COLUMNS
        ))
        .bind(update.title)
        .bind(update.content)
        .bind(now_timestamp())
        .bind(id)
        .map(note_from_row)
        .fetch_optional(&self.connection)
        .await
        {
            Ok(Some(note)) => Ok(note),
            Ok(None) => Err(Error::NoteNotFound(id)),
            Err(e) => Err(Error::DatabaseQueryError(e)),
        }
    }

    pub async fn delete_note(&self, id: i64) -> Result<(), Error> {
        match sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(id)
            .execute(&self.connection)
            .await
        {
            Ok(done) if done.rows_affected() == 0 => Err(Error::NoteNotFound(id)),
            Ok(_) => Ok(()),
            Err(e) => Err(Error::DatabaseQueryError(e)),
        }
    }

    pub async fn count_notes(&self) -> Result<i64, Error> {
        match sqlx::query("SELECT COUNT(*) AS count FROM notes")
            .map(|row: SqliteRow| row.get::<i64, _>("count"))
            .fetch_one(&self.connection)
            .await
        {
            Ok(count) => Ok(count),
            Err(e) => Err(Error::DatabaseQueryError(e)),
        }
    }
}
