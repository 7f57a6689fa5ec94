//! Energy model trait and the per-phase model binding.

use std::fmt;

use eq_core::{Real, Sublattice, ensure_finite};

use crate::error::ModelResult;

/// Trait for phase energy models.
///
/// Implementations must be thread-safe (Send + Sync) so that a filled
/// equilibrium result can be read from several threads. Evaluation must not
/// mutate shared model state: the same site-fraction state always yields the
/// same energy.
pub trait EnergyModel<T: Real>: Send + Sync {
    /// Get the model name (for debugging/logging).
    fn name(&self) -> &str;

    /// Molar Gibbs energy [J/mol] of the phase at the given site-fraction
    /// state. Sublattices arrive in the model's own site ordering.
    fn molar_gibbs_energy(&self, sublattices: &[Sublattice<T>]) -> ModelResult<T>;
}

/// Exclusive binding of an energy model to one phase.
///
/// Owns its model outright and has no duplication operation, so a binding can
/// only ever be moved between phases, never shared.
pub struct CompositionSet<T: Real> {
    phase_name: String,
    model: Box<dyn EnergyModel<T>>,
}

impl<T: Real> CompositionSet<T> {
    pub fn new(phase_name: impl Into<String>, model: Box<dyn EnergyModel<T>>) -> Self {
        Self {
            phase_name: phase_name.into(),
            model,
        }
    }

    pub fn phase_name(&self) -> &str {
        &self.phase_name
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Evaluate the bound model, rejecting non-finite energies.
    pub fn evaluate(&self, sublattices: &[Sublattice<T>]) -> ModelResult<T> {
        let g = self.model.molar_gibbs_energy(sublattices)?;
        Ok(ensure_finite(g, "molar Gibbs energy")?)
    }
}

impl<T: Real> fmt::Debug for CompositionSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositionSet")
            .field("phase_name", &self.phase_name)
            .finish_non_exhaustive()
    }
}
