//! `SQLite` storage for Amity.
//!
//! A single database holds users, interest catalogs, friend requests,
//! friendship edges and notifications. The connection lives behind a
//! mutex, so every read and every transaction is serialized; the managers
//! rely on this to make each operation atomic and to serialize writes on
//! a pair of users.
//!
//! The per-table modules expose plain functions over a [`Connection`] so
//! a manager can compose several of them inside one transaction.

// SQLite operations need to hold the lock for the duration of the operation.
#![allow(clippy::significant_drop_tightening)]

mod error;
pub(crate) mod friends;
pub(crate) mod interests;
pub(crate) mod notifications;
pub(crate) mod users;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::debug;

pub use error::{Result, StorageError};
pub(crate) use error::map_write_error;

/// File name of the database inside the data directory.
pub const DATABASE_FILE: &str = "amity.db";

/// `SQLite`-based storage shared by all managers.
pub struct SocialStorage {
    conn: Mutex<Connection>,
}

impl SocialStorage {
    /// Opens (or creates) the database at the given path.
    ///
    /// Creates the tables if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.initialize_schema()?;
        debug!(path = %path.display(), "Opened social storage");
        Ok(storage)
    }

    /// Creates an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.initialize_schema()?;
        Ok(storage)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))
    }

    /// Initializes the database schema.
    fn initialize_schema(&self) -> Result<()> {
        let conn = self.lock()?;

        conn.pragma_update(None, "foreign_keys", true)?;
        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                username TEXT NOT NULL UNIQUE COLLATE NOCASE,
                email TEXT,
                password_hash TEXT NOT NULL,
                avatar TEXT,
                bio TEXT,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );

            -- Interest categories, ordered per user
            CREATE TABLE IF NOT EXISTS interests (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id),
                category TEXT NOT NULL,
                position INTEGER NOT NULL,
                UNIQUE (user_id, category)
            );

            CREATE TABLE IF NOT EXISTS interest_items (
                interest_id INTEGER NOT NULL REFERENCES interests(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 10),
                position INTEGER NOT NULL
            );

            -- Request history. user_low/user_high hold the unordered pair.
            CREATE TABLE IF NOT EXISTS friend_requests (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                sender_id INTEGER NOT NULL REFERENCES users(id),
                recipient_id INTEGER NOT NULL REFERENCES users(id),
                user_low INTEGER NOT NULL,
                user_high INTEGER NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                created_at INTEGER NOT NULL,
                responded_at INTEGER,
                CHECK (sender_id <> recipient_id),
                CHECK (user_low < user_high)
            );

            -- At most one pending request per unordered pair
            CREATE UNIQUE INDEX IF NOT EXISTS friend_requests_pending_pair
                ON friend_requests (user_low, user_high) WHERE status = 'pending';

            CREATE INDEX IF NOT EXISTS friend_requests_recipient
                ON friend_requests (recipient_id, status);

            CREATE INDEX IF NOT EXISTS friend_requests_sender
                ON friend_requests (sender_id, status);

            -- Active friendships, one row per unordered pair
            CREATE TABLE IF NOT EXISTS friendships (
                user_low INTEGER NOT NULL REFERENCES users(id),
                user_high INTEGER NOT NULL REFERENCES users(id),
                request_id INTEGER NOT NULL REFERENCES friend_requests(id),
                since INTEGER NOT NULL,
                PRIMARY KEY (user_low, user_high),
                CHECK (user_low < user_high)
            );

            CREATE INDEX IF NOT EXISTS friendships_high ON friendships (user_high);

            CREATE TABLE IF NOT EXISTS notifications (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                recipient_id INTEGER NOT NULL REFERENCES users(id),
                sender_id INTEGER NOT NULL REFERENCES users(id),
                kind TEXT NOT NULL,
                request_id INTEGER NOT NULL,
                created_at INTEGER NOT NULL,
                read_at INTEGER
            );

            CREATE INDEX IF NOT EXISTS notifications_recipient
                ON notifications (recipient_id, read_at);
            ",
        )?;

        Ok(())
    }

    /// Runs `f` against the connection without opening a transaction.
    pub(crate) fn read<T, E, F>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Connection) -> std::result::Result<T, E>,
        E: From<StorageError>,
    {
        let conn = self.lock()?;
        f(&conn)
    }

    /// Runs `f` inside an immediate transaction.
    ///
    /// The transaction commits only when `f` returns `Ok`; any error rolls
    /// back every write `f` made.
    pub(crate) fn transaction<T, E, F>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> std::result::Result<T, E>,
        E: From<StorageError>,
    {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StorageError::from)?;

        let value = f(&tx)?;
        tx.commit().map_err(StorageError::from)?;
        Ok(value)
    }
}

impl std::fmt::Debug for SocialStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocialStorage").finish_non_exhaustive()
    }
}
