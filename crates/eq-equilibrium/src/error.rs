//! Error types for equilibrium queries.

use std::fmt;

use eq_core::CoreError;
use eq_model::ModelError;
use thiserror::Error;

/// Level at which a species lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryScope {
    Phase,
    System,
}

impl fmt::Display for QueryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryScope::Phase => write!(f, "phase"),
            QueryScope::System => write!(f, "system"),
        }
    }
}

/// Errors reported by equilibrium queries.
///
/// Every error is local to the query that raised it; the rest of the result
/// stays queryable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EquilibriumError {
    #[error("Unknown species '{species}' in {scope}")]
    UnknownSpecies { species: String, scope: QueryScope },

    #[error(
        "Inconsistent chemical potential for '{species}' across {context}: {first} vs {second}"
    )]
    InconsistentPotential {
        species: String,
        first: f64,
        second: f64,
        context: String,
    },

    #[error("Equilibrium has no stable phases")]
    EmptyEquilibrium,

    #[error("Invariant violated: {what}")]
    InvariantViolation { what: String },

    #[error("Phase has no energy model bound")]
    UnboundModel,

    #[error("Unknown phase '{phase}'")]
    UnknownPhase { phase: String },

    #[error("Duplicate phase '{phase}'")]
    DuplicatePhase { phase: String },

    #[error("Energy model error: {0}")]
    Model(#[from] ModelError),
}

pub type EqResult<T> = Result<T, EquilibriumError>;

impl EquilibriumError {
    pub(crate) fn unknown_species(species: &str, scope: QueryScope) -> Self {
        EquilibriumError::UnknownSpecies {
            species: species.to_string(),
            scope,
        }
    }

    /// Prefix an invariant violation with the phase it was found in.
    pub(crate) fn in_phase(self, phase: &str) -> Self {
        match self {
            EquilibriumError::InvariantViolation { what } => EquilibriumError::InvariantViolation {
                what: format!("phase {phase}: {what}"),
            },
            other => other,
        }
    }

    /// Prefix an invariant violation with the sublattice it was found in.
    pub(crate) fn in_sublattice(self, index: usize) -> Self {
        match self {
            EquilibriumError::InvariantViolation { what } => EquilibriumError::InvariantViolation {
                what: format!("sublattice {index}: {what}"),
            },
            other => other,
        }
    }

    /// True for a lookup miss, as opposed to a defect in the stored data.
    pub fn is_unknown_species(&self) -> bool {
        matches!(self, EquilibriumError::UnknownSpecies { .. })
    }
}

/// Message of a core error without its variant prefix.
fn core_detail(err: CoreError) -> String {
    match err {
        CoreError::NonFinite { what, value } => format!("non-finite {what}: {value}"),
        CoreError::InvalidArg { what } | CoreError::Invariant { what } => what,
    }
}

impl From<CoreError> for EquilibriumError {
    fn from(err: CoreError) -> Self {
        EquilibriumError::InvariantViolation {
            what: core_detail(err),
        }
    }
}
