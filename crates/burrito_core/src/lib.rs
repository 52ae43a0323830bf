//! Core storage and use-case logic for the Burrito fractal service.
//! The HTTP surface lives in `burrito_server`; everything it persists goes
//! through this crate.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{DbError, DbLocation, DbResult, FractalStore};
pub use logging::{init_logging, logging_status};
pub use model::fractal::{
    Fractal, FractalId, FractalValidationError, NewFractal, MAX_NAME_CHARS, MAX_STATE_CHARS,
};
pub use repo::fractal_repo::{FractalRepository, RepoError, RepoResult, SqliteFractalRepository};
pub use service::fractal_service::FractalService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
