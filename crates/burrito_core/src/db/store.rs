//! Explicit store handle with a connect / session / close lifecycle.
//!
//! # Responsibility
//! - Own the database location for the lifetime of the service.
//! - Hand out one session per unit of work.
//!
//! # Invariants
//! - Migrations are applied exactly once, in `connect`.
//! - File databases get a fresh connection per session.
//! - In-memory databases share one connection; sessions are serialized.

use super::open::{open_db, open_db_in_memory, open_session};
use super::{DbError, DbLocation, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::Mutex;

enum Backend {
    File(PathBuf),
    Memory(Mutex<Connection>),
}

/// Handle to the fractal database.
pub struct FractalStore {
    location: DbLocation,
    backend: Backend,
}

impl FractalStore {
    /// Parses `url`, opens the database and brings its schema up to date.
    ///
    /// # Errors
    /// - `DbError::UnsupportedUrl` when `url` is not a SQLite location.
    /// - `DbError::Sqlite` when the database cannot be opened or migrated.
    /// - `DbError::UnsupportedSchemaVersion` when the file was written by a
    ///   newer binary.
    pub fn connect(url: &str) -> DbResult<Self> {
        let location = DbLocation::parse(url)?;
        let backend = match &location {
            DbLocation::Memory => Backend::Memory(Mutex::new(open_db_in_memory()?)),
            DbLocation::File(path) => {
                let conn = open_db(path)?;
                conn.close().map_err(|(_, err)| DbError::Sqlite(err))?;
                Backend::File(path.clone())
            }
        };

        info!(
            "event=store_connect module=db status=ok location={}",
            location
        );
        Ok(Self { location, backend })
    }

    pub fn location(&self) -> &DbLocation {
        &self.location
    }

    /// Runs `f` against a session connection.
    ///
    /// Each call on a file database opens its own connection, which is
    /// dropped when `f` returns. Statements run in autocommit mode, so every
    /// write is committed before this returns.
    pub fn with_session<T, E>(&self, f: impl FnOnce(&Connection) -> Result<T, E>) -> Result<T, E>
    where
        E: From<DbError>,
    {
        match &self.backend {
            Backend::File(path) => {
                let conn = open_session(path)?;
                f(&conn)
            }
            Backend::Memory(shared) => {
                let conn = shared.lock().map_err(|_| DbError::Poisoned)?;
                f(&*conn)
            }
        }
    }

    /// Ends the store lifecycle.
    ///
    /// # Errors
    /// - Returns the underlying close error for in-memory databases.
    pub fn close(self) -> DbResult<()> {
        let result = match self.backend {
            Backend::File(_) => Ok(()),
            Backend::Memory(shared) => shared
                .into_inner()
                .map_err(|_| DbError::Poisoned)?
                .close()
                .map_err(|(_, err)| DbError::Sqlite(err)),
        };

        match &result {
            Ok(()) => info!(
                "event=store_close module=db status=ok location={}",
                self.location
            ),
            Err(err) => error!(
                "event=store_close module=db status=error location={} error={}",
                self.location, err
            ),
        }
        result
    }
}
