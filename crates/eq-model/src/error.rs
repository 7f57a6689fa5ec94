//! Energy model errors.

use eq_core::CoreError;
use thiserror::Error;

/// Result type for energy model evaluation.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while evaluating a phase's energy model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// The site-fraction state does not have the shape the model was built for.
    #[error("Sublattice shape mismatch: model expects {expected} sublattices, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// No parameter for a species present in the state.
    #[error("Missing parameter for '{species}' on sublattice {sublattice}")]
    MissingParameter { species: String, sublattice: usize },

    /// Non-physical input (zero total sites, negative site fraction, ...).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: String },

    /// Model produced or received a non-finite number.
    #[error("Non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    /// Failure reported by an external model backend.
    #[error("Backend error: {message}")]
    Backend { message: String },
}

impl From<CoreError> for ModelError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NonFinite { what, value } => ModelError::NonFinite { what, value },
            CoreError::InvalidArg { what } | CoreError::Invariant { what } => {
                ModelError::NonPhysical { what }
            }
        }
    }
}
