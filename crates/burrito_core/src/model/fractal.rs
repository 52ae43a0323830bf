//! Fractal record model.
//!
//! # Responsibility
//! - Define the persisted record and the payload accepted for inserts.
//! - Enforce column length limits before anything reaches SQL.
//!
//! # Invariants
//! - `name` holds at most `MAX_NAME_CHARS` chars.
//! - `state` holds at most `MAX_STATE_CHARS` chars and is opaque to the store.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned row identifier.
pub type FractalId = i64;

/// Mirrors `fractals.name VARCHAR(256)`.
pub const MAX_NAME_CHARS: usize = 256;
/// Mirrors `fractals.state VARCHAR(4096)`.
pub const MAX_STATE_CHARS: usize = 4096;

/// A saved fractal configuration.
///
/// Serializes as `{"id": .., "name": .., "state": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fractal {
    pub id: FractalId,
    pub name: String,
    /// Serialized renderer state; stored verbatim.
    pub state: String,
}

/// Insert payload; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFractal {
    pub name: String,
    pub state: String,
}

impl NewFractal {
    pub fn new(name: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: state.into(),
        }
    }

    /// Checks column length limits.
    ///
    /// Presence is the caller's concern; empty strings pass.
    pub fn validate(&self) -> Result<(), FractalValidationError> {
        let name_chars = self.name.chars().count();
        if name_chars > MAX_NAME_CHARS {
            return Err(FractalValidationError::NameTooLong { chars: name_chars });
        }
        let state_chars = self.state.chars().count();
        if state_chars > MAX_STATE_CHARS {
            return Err(FractalValidationError::StateTooLong { chars: state_chars });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FractalValidationError {
    NameTooLong { chars: usize },
    StateTooLong { chars: usize },
}

impl Display for FractalValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameTooLong { chars } => write!(
                f,
                "fractal name has {chars} chars; at most {MAX_NAME_CHARS} allowed"
            ),
            Self::StateTooLong { chars } => write!(
                f,
                "fractal state has {chars} chars; at most {MAX_STATE_CHARS} allowed"
            ),
        }
    }
}

impl Error for FractalValidationError {}

#[cfg(test)]
mod tests {
    use super::{Fractal, FractalValidationError, NewFractal, MAX_NAME_CHARS, MAX_STATE_CHARS};

    #[test]
    fn limits_are_inclusive_and_counted_in_chars() {
        let name = "é".repeat(MAX_NAME_CHARS);
        let state = "x".repeat(MAX_STATE_CHARS);
        assert!(NewFractal::new(name, state).validate().is_ok());
    }

    #[test]
    fn oversized_fields_are_rejected() {
        let long_name = NewFractal::new("n".repeat(MAX_NAME_CHARS + 1), "{}");
        assert_eq!(
            long_name.validate(),
            Err(FractalValidationError::NameTooLong {
                chars: MAX_NAME_CHARS + 1
            })
        );

        let long_state = NewFractal::new("julia", "s".repeat(MAX_STATE_CHARS + 1));
        assert_eq!(
            long_state.validate(),
            Err(FractalValidationError::StateTooLong {
                chars: MAX_STATE_CHARS + 1
            })
        );
    }

    #[test]
    fn serializes_with_id_name_state_keys() {
        let fractal = Fractal {
            id: 1,
            name: "Mandelbrot".to_string(),
            state: r#"{"c":-0.75}"#.to_string(),
        };
        let json = serde_json::to_string(&fractal).unwrap();
        assert_eq!(
            json,
            r#"{"id":1,"name":"Mandelbrot","state":"{\"c\":-0.75}"}"#
        );
    }
}
