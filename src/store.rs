//! Snippet repository over SQLite.
//!
//! Expiry is enforced as a query predicate (`expires > now`), not a
//! background reaper: expired rows stay in the table but are invisible to
//! every read. All user-supplied values are passed as bound parameters,
//! never interpolated into query text.
//!
//! The public `get`/`latest` methods bind the current UTC clock; the `_at`
//! variants take the clock as a parameter so expiry-boundary behavior is
//! directly testable.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use rusqlite::Connection;
use serde::Serialize;

use crate::error::AppError;

/// Maximum number of rows returned by [`SnippetStore::latest`].
const LATEST_LIMIT: i64 = 10;

/// A persisted snippet.
#[derive(Debug, Clone, Serialize)]
pub struct Snippet {
    /// Row id, assigned by the store on insert.
    pub id: i64,
    /// Snippet title.
    pub title: String,
    /// Snippet body.
    pub content: String,
    /// Creation time (UTC).
    pub created: DateTime<Utc>,
    /// Expiry time (UTC). Reads only ever return rows with `expires > now`.
    pub expires: DateTime<Utc>,
}

/// Snippet repository. Cheap to clone; all clones share one connection.
///
/// Each call issues one request-scoped statement under the mutex and holds
/// no state across calls.
#[derive(Clone)]
pub struct SnippetStore {
    conn: Arc<Mutex<Connection>>,
}

impl SnippetStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    pub fn open(path: &str) -> Result<Self, AppError> {
        let conn = Connection::open(path)?;
        init_schema(&conn)?;
        tracing::info!(path = %path, "snippet database opened");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database. Used by tests.
    pub fn open_in_memory() -> Result<Self, AppError> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Insert a new snippet expiring `expires_days` days from now.
    /// Returns the assigned id.
    pub fn insert(&self, title: &str, content: &str, expires_days: i64) -> Result<i64, AppError> {
        let created = Utc::now();
        let expires = created + Duration::days(expires_days);

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO snippets (title, content, created, expires) \
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![title, content, created, expires],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Fetch the snippet with the given id, if it exists and has not
    /// expired. A missing or expired row is [`AppError::NotFound`].
    pub fn get(&self, id: i64) -> Result<Snippet, AppError> {
        self.get_at(id, Utc::now())
    }

    /// [`Self::get`] with an explicit clock.
    pub fn get_at(&self, id: i64, now: DateTime<Utc>) -> Result<Snippet, AppError> {
        let conn = self.conn.lock();
        let result = conn.query_row(
            "SELECT id, title, content, created, expires \
             FROM snippets \
             WHERE expires > ?1 AND id = ?2",
            rusqlite::params![now, id],
            row_to_snippet,
        );

        match result {
            Ok(snippet) => Ok(snippet),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(AppError::NotFound),
            Err(err) => Err(err.into()),
        }
    }

    /// The ten most recently created non-expired snippets, newest first.
    /// Returns an empty list, not an error, when no rows qualify.
    pub fn latest(&self) -> Result<Vec<Snippet>, AppError> {
        self.latest_at(Utc::now())
    }

    /// [`Self::latest`] with an explicit clock.
    pub fn latest_at(&self, now: DateTime<Utc>) -> Result<Vec<Snippet>, AppError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, title, content, created, expires \
             FROM snippets \
             WHERE expires > ?1 \
             ORDER BY created DESC \
             LIMIT ?2",
        )?;

        let rows = stmt.query_map(rusqlite::params![now, LATEST_LIMIT], row_to_snippet)?;
        let snippets = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(snippets)
    }

    /// Insert a row with explicit timestamps. Test-only: production inserts
    /// always derive both timestamps from the store's clock.
    #[cfg(test)]
    fn insert_raw(
        &self,
        title: &str,
        content: &str,
        created: DateTime<Utc>,
        expires: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO snippets (title, content, created, expires) \
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![title, content, created, expires],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

/// Create the snippets table and supporting index if absent.
fn init_schema(conn: &Connection) -> Result<(), AppError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS snippets (
            id      INTEGER PRIMARY KEY AUTOINCREMENT,
            title   TEXT NOT NULL,
            content TEXT NOT NULL,
            created TEXT NOT NULL,
            expires TEXT NOT NULL
         );
         CREATE INDEX IF NOT EXISTS idx_snippets_expires_created
            ON snippets (expires, created);",
    )?;
    Ok(())
}

/// Map a result row to a [`Snippet`].
fn row_to_snippet(row: &rusqlite::Row<'_>) -> rusqlite::Result<Snippet> {
    Ok(Snippet {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        created: row.get(3)?,
        expires: row.get(4)?,
    })
}
