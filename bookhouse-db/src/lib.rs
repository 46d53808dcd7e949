//! SQLite storage substrate for BookHouse.
//!
//! Owns the database connection and the schema. Three entity tables carry a
//! store-assigned identity column and a unique natural-key column; the two
//! relation tables are keyed by composite primary keys with cascade-on-delete
//! foreign keys to their parents.
//!
//! Higher layers never open connections themselves: they hold a [`Database`]
//! handle and run their statements through [`Database::with_conn`].

mod error;

pub use error::{DbError, DbResult};

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Catalog tables. `AUTOINCREMENT` keeps surrogate ids monotonic and never
/// reused, even after a row is deleted.
const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS books (
        id      INTEGER PRIMARY KEY AUTOINCREMENT,
        title   TEXT NOT NULL UNIQUE,
        author  TEXT NOT NULL,
        year    INTEGER
    );

    CREATE TABLE IF NOT EXISTS branches (
        id      INTEGER PRIMARY KEY AUTOINCREMENT,
        name    TEXT NOT NULL UNIQUE,
        address TEXT
    );

    CREATE TABLE IF NOT EXISTS faculties (
        id      INTEGER PRIMARY KEY AUTOINCREMENT,
        name    TEXT NOT NULL UNIQUE
    );

    CREATE TABLE IF NOT EXISTS branch_stock (
        branch_id INTEGER NOT NULL REFERENCES branches(id) ON DELETE CASCADE,
        book_id   INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
        copies    INTEGER NOT NULL CHECK (copies >= 0),
        PRIMARY KEY (branch_id, book_id)
    );

    CREATE TABLE IF NOT EXISTS book_faculties (
        branch_id  INTEGER NOT NULL REFERENCES branches(id) ON DELETE CASCADE,
        book_id    INTEGER NOT NULL REFERENCES books(id) ON DELETE CASCADE,
        faculty_id INTEGER NOT NULL REFERENCES faculties(id) ON DELETE CASCADE,
        PRIMARY KEY (branch_id, book_id, faculty_id)
    );
";

/// Handle to the catalog database.
///
/// Cheap to clone; all clones share one connection behind a mutex, which
/// serializes writers the same way a single-connection pool would.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Opens (or creates) the database file at the given path and bootstraps
    /// the schema.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening catalog database");
        Self::from_connection(Connection::open(path)?)
    }

    /// Opens an in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> DbResult<Self> {
        // SQLite leaves foreign keys off unless asked; cascade rules depend on it.
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `f` with exclusive access to the connection.
    ///
    /// Generic over the caller's error type so store-layer errors do not have
    /// to round-trip through [`DbError`].
    pub fn with_conn<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
    {
        let conn = self.conn.lock().unwrap();
        f(&conn)
    }
}
