//! Fractal use-case service.
//!
//! # Responsibility
//! - Provide add / list / random-pick entry points for the HTTP layer.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Random selection is uniform over the full `list_fractals()` result.
//! - Service layer remains storage-agnostic.

use crate::model::fractal::{Fractal, FractalId, NewFractal};
use crate::repo::fractal_repo::{FractalRepository, RepoResult};
use log::{debug, info};
use rand::Rng;

/// Use-case service wrapper for fractal records.
pub struct FractalService<R: FractalRepository> {
    repo: R,
}

impl<R: FractalRepository> FractalService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists a new fractal and returns its assigned id.
    pub fn add_fractal(
        &self,
        name: impl Into<String>,
        state: impl Into<String>,
    ) -> RepoResult<FractalId> {
        let fractal = NewFractal::new(name, state);
        let id = self.repo.add_fractal(&fractal)?;
        info!(
            "event=fractal_add module=service status=ok id={} name_chars={} state_chars={}",
            id,
            fractal.name.chars().count(),
            fractal.state.chars().count()
        );
        Ok(id)
    }

    pub fn get_fractal(&self, id: FractalId) -> RepoResult<Option<Fractal>> {
        self.repo.get_fractal(id)
    }

    /// Lists every stored fractal.
    pub fn list_fractals(&self) -> RepoResult<Vec<Fractal>> {
        let fractals = self.repo.list_fractals()?;
        debug!(
            "event=fractal_list module=service status=ok count={}",
            fractals.len()
        );
        Ok(fractals)
    }

    pub fn count_fractals(&self) -> RepoResult<u64> {
        self.repo.count_fractals()
    }

    /// Picks one stored fractal uniformly at random.
    ///
    /// Returns `Ok(None)` when nothing is stored.
    pub fn random_fractal(&self) -> RepoResult<Option<Fractal>> {
        self.random_fractal_with(&mut rand::rng())
    }

    /// Same as [`Self::random_fractal`] with a caller-supplied generator.
    pub fn random_fractal_with<G: Rng>(&self, rng: &mut G) -> RepoResult<Option<Fractal>> {
        let mut fractals = self.repo.list_fractals()?;
        if fractals.is_empty() {
            debug!("event=fractal_random module=service status=empty");
            return Ok(None);
        }

        let index = rng.random_range(0..fractals.len());
        let picked = fractals.swap_remove(index);
        debug!(
            "event=fractal_random module=service status=ok id={} pool={}",
            picked.id,
            fractals.len() + 1
        );
        Ok(Some(picked))
    }
}
