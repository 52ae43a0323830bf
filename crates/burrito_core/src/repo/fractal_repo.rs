//! Fractal repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert and scan APIs over the `fractals` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `NewFractal::validate()` before SQL mutations.
//! - Read paths reject NULL `name`/`state` instead of masking them.

use crate::db::DbError;
use crate::model::fractal::{Fractal, FractalId, FractalValidationError, NewFractal};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const FRACTAL_SELECT_SQL: &str = "SELECT id, name, state FROM fractals";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for fractal persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(FractalValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted fractal data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<FractalValidationError> for RepoError {
    fn from(value: FractalValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for fractal records.
pub trait FractalRepository {
    fn add_fractal(&self, fractal: &NewFractal) -> RepoResult<FractalId>;
    fn get_fractal(&self, id: FractalId) -> RepoResult<Option<Fractal>>;
    fn list_fractals(&self) -> RepoResult<Vec<Fractal>>;
    fn count_fractals(&self) -> RepoResult<u64>;
}

/// SQLite-backed fractal repository.
pub struct SqliteFractalRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFractalRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl FractalRepository for SqliteFractalRepository<'_> {
    fn add_fractal(&self, fractal: &NewFractal) -> RepoResult<FractalId> {
        fractal.validate()?;

        self.conn.execute(
            "INSERT INTO fractals (name, state) VALUES (?1, ?2);",
            params![fractal.name.as_str(), fractal.state.as_str()],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_fractal(&self, id: FractalId) -> RepoResult<Option<Fractal>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{FRACTAL_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_fractal_row(row)?));
        }

        Ok(None)
    }

    fn list_fractals(&self) -> RepoResult<Vec<Fractal>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{FRACTAL_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut fractals = Vec::new();

        while let Some(row) = rows.next()? {
            fractals.push(parse_fractal_row(row)?);
        }

        Ok(fractals)
    }

    fn count_fractals(&self) -> RepoResult<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM fractals;", [], |row| row.get::<_, i64>(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }
}

fn parse_fractal_row(row: &Row<'_>) -> RepoResult<Fractal> {
    let id: FractalId = row.get("id")?;
    let name = row
        .get::<_, Option<String>>("name")?
        .ok_or_else(|| RepoError::InvalidData(format!("NULL fractals.name for id {id}")))?;
    let state = row
        .get::<_, Option<String>>("state")?
        .ok_or_else(|| RepoError::InvalidData(format!("NULL fractals.state for id {id}")))?;

    Ok(Fractal { id, name, state })
}
