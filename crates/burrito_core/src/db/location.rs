//! Connection string parsing.
//!
//! Accepts the SQLAlchemy-style SQLite URLs existing deployments are
//! configured with, plus bare file paths.

use super::{DbError, DbResult};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const MEMORY_MARKER: &str = ":memory:";
const SQLITE_SCHEME: &str = "sqlite:";

/// Where the fractal database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    /// Private in-memory database; contents vanish when the store closes.
    Memory,
    /// SQLite database file, created on first open.
    File(PathBuf),
}

impl DbLocation {
    /// Parses a connection string.
    ///
    /// - `sqlite://`, `sqlite::memory:`, `sqlite:///:memory:`, `:memory:` -> memory
    /// - `sqlite:///relative.db` -> `relative.db`
    /// - `sqlite:////abs/path.db` -> `/abs/path.db`
    /// - a bare path -> that path
    ///
    /// # Errors
    /// - Returns `DbError::UnsupportedUrl` for empty input, non-SQLite schemes
    ///   and SQLite URLs that name a host.
    pub fn parse(url: &str) -> DbResult<Self> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err(DbError::UnsupportedUrl(url.to_string()));
        }
        if trimmed == MEMORY_MARKER {
            return Ok(Self::Memory);
        }

        if let Some(rest) = trimmed.strip_prefix(SQLITE_SCHEME) {
            if rest == MEMORY_MARKER {
                return Ok(Self::Memory);
            }
            let Some(authority_and_path) = rest.strip_prefix("//") else {
                return Err(DbError::UnsupportedUrl(url.to_string()));
            };
            if authority_and_path.is_empty() {
                return Ok(Self::Memory);
            }
            // Host part must be empty: `sqlite:///path`.
            let Some(path) = authority_and_path.strip_prefix('/') else {
                return Err(DbError::UnsupportedUrl(url.to_string()));
            };
            if path.is_empty() || path == MEMORY_MARKER {
                return Ok(Self::Memory);
            }
            return Ok(Self::File(PathBuf::from(path)));
        }

        if trimmed.contains("://") {
            return Err(DbError::UnsupportedUrl(url.to_string()));
        }

        Ok(Self::File(PathBuf::from(trimmed)))
    }

    pub fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Display for DbLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => write!(f, "{MEMORY_MARKER}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}
