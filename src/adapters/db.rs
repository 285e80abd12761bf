//! SQLite-backed user store.
//!
//! Uses a single `Mutex<Connection>` for thread safety. The table
//! bootstrap DDL runs when the store is opened, before the chain starts.

use crate::domain::model::CanonicalUser;
use crate::utils::error::Result;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Idempotent DDL for the users table.
const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    firstname TEXT,
    lastname TEXT,
    email TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);
";

/// Narrow storage contract for the one shared mutable resource the
/// pipeline writes to.
///
/// Implementations must be `Send + Sync` for use behind `Arc<dyn UserStore>`.
pub trait UserStore: Send + Sync {
    /// Conflict-tolerant insert: first write wins on `id`.
    ///
    /// Returns `true` when a row was actually inserted, `false` when the
    /// id already existed and the insert was a no-op.
    fn insert_user(&self, user: &CanonicalUser) -> rusqlite::Result<bool>;

    /// Total row count.
    fn count_users(&self) -> rusqlite::Result<i64>;

    /// Most recently created row as `(id, email)`, `None` on an empty table.
    fn latest_user(&self) -> rusqlite::Result<Option<(i64, String)>>;
}

/// File- or memory-backed SQLite store.
///
/// Create with [`SqliteUserStore::open`] for file-backed persistence or
/// [`SqliteUserStore::in_memory`] for tests.
pub struct SqliteUserStore {
    conn: Mutex<Connection>,
}

impl SqliteUserStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(CREATE_TABLES)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(CREATE_TABLES)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Fetch a full row by id. Not part of the pipeline's contract;
    /// used for verification.
    pub fn fetch_user(&self, id: i64) -> rusqlite::Result<Option<CanonicalUser>> {
        let conn = self.lock_conn();
        conn.query_row(
            "SELECT id, firstname, lastname, email FROM users WHERE id = ?1",
            [id],
            |row| {
                Ok(CanonicalUser {
                    id: row.get(0)?,
                    firstname: row.get(1)?,
                    lastname: row.get(2)?,
                    email: row.get(3)?,
                })
            },
        )
        .optional()
    }

    // A poisoned lock still hands back a usable connection.
    fn lock_conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl UserStore for SqliteUserStore {
    fn insert_user(&self, user: &CanonicalUser) -> rusqlite::Result<bool> {
        let conn = self.lock_conn();
        let inserted = conn.execute(
            "INSERT INTO users (id, firstname, lastname, email) VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT(id) DO NOTHING",
            rusqlite::params![user.id, user.firstname, user.lastname, user.email],
        )?;
        Ok(inserted > 0)
    }

    fn count_users(&self) -> rusqlite::Result<i64> {
        let conn = self.lock_conn();
        conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
    }

    fn latest_user(&self) -> rusqlite::Result<Option<(i64, String)>> {
        let conn = self.lock_conn();
        conn.query_row(
            "SELECT id, email FROM users ORDER BY created_at DESC LIMIT 1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()
    }
}
