//! SQLite storage bootstrap, schema migrations and the store handle.
//!
//! # Responsibility
//! - Parse connection strings into concrete database locations.
//! - Open and configure SQLite connections for the fractal store.
//! - Apply schema migrations in deterministic order.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - No fractal row is read or written before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod location;
pub mod migrations;
mod open;
mod store;

pub use location::DbLocation;
pub use open::{open_db, open_db_in_memory};
pub use store::FractalStore;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    UnsupportedUrl(String),
    /// A session panicked while holding the shared in-memory connection.
    Poisoned,
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::UnsupportedUrl(url) => write!(f, "unsupported database url `{url}`"),
            Self::Poisoned => write!(f, "in-memory database connection is poisoned"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::UnsupportedUrl(_) | Self::Poisoned => {
                None
            }
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
