//! Fractal domain model.
//!
//! # Responsibility
//! - Define the stored record shape and its insert payload.
//!
//! # Invariants
//! - Every stored fractal is identified by a store-assigned `FractalId`.
//! - Records are never updated or deleted once persisted.

pub mod fractal;
