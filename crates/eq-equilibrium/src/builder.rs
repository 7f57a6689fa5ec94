//! Producer-side builders for phases and results.
//!
//! The solver fills a result phase by phase: status, fraction, sublattices,
//! energy model, then moves the finished phase into the result. The builders
//! run that sequence with the leaf checks applied eagerly; the first error is
//! kept and returned by `build()`.

use eq_core::{Real, Sublattice};
use eq_model::{CompositionSet, EnergyModel};

use crate::config::QueryTolerances;
use crate::error::{EqResult, EquilibriumError};
use crate::phase::Phase;
use crate::result::EquilibriumResult;
use crate::status::PhaseStatus;

/// Builder for a single [`Phase`].
#[derive(Debug)]
pub struct PhaseBuilder<T: Real> {
    phase: Phase<T>,
    error: Option<EquilibriumError>,
}

impl<T: Real> Default for PhaseBuilder<T> {
    fn default() -> Self {
        Self {
            phase: Phase::default(),
            error: None,
        }
    }
}

impl<T: Real> PhaseBuilder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: PhaseStatus) -> Self {
        self.phase.status = status;
        self
    }

    pub fn fraction(mut self, f: T) -> Self {
        self.phase.f = f;
        self
    }

    /// Append a sublattice from `(species, site_fraction, chemical_potential)`
    /// triples. The set must be a normalized site-fraction set.
    pub fn sublattice<S, I>(mut self, sitecount: T, components: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, T, T)>,
    {
        match Sublattice::from_components(sitecount, components) {
            Ok(sub) => self.phase.sublattices.push(sub),
            Err(e) => {
                let index = self.phase.sublattices.len();
                self.fail(EquilibriumError::from(e).in_sublattice(index));
            }
        }
        self
    }

    /// Bind an energy model under the given phase name.
    pub fn model(mut self, phase_name: impl Into<String>, model: Box<dyn EnergyModel<T>>) -> Self {
        self.phase.compositionset = Some(CompositionSet::new(phase_name, model));
        self
    }

    /// Bind an already constructed composition set.
    pub fn compositionset(mut self, compositionset: CompositionSet<T>) -> Self {
        self.phase.compositionset = Some(compositionset);
        self
    }

    pub fn build(self) -> EqResult<Phase<T>> {
        if let Some(e) = self.error {
            return Err(e);
        }
        self.phase.check(&QueryTolerances::default())?;
        Ok(self.phase)
    }

    fn fail(&mut self, error: EquilibriumError) {
        self.error.get_or_insert(error);
    }
}

/// Builder for an [`EquilibriumResult`].
#[derive(Debug)]
pub struct EquilibriumBuilder<T: Real> {
    result: EquilibriumResult<T>,
    error: Option<EquilibriumError>,
}

impl<T: Real> Default for EquilibriumBuilder<T> {
    fn default() -> Self {
        Self {
            result: EquilibriumResult::default(),
            error: None,
        }
    }
}

impl<T: Real> EquilibriumBuilder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn walltime(mut self, seconds: f64) -> Self {
        self.result.walltime = seconds;
        self
    }

    pub fn itercount(mut self, iterations: usize) -> Self {
        self.result.itercount = iterations;
        self
    }

    pub fn total_moles(mut self, n: f64) -> Self {
        self.result.n = n;
        self
    }

    pub fn tolerances(mut self, tolerances: QueryTolerances) -> Self {
        self.result.tolerances = tolerances;
        self
    }

    /// Move a filled phase into the result. Phase names must be unique.
    pub fn phase(mut self, name: impl Into<String>, phase: Phase<T>) -> Self {
        let name = name.into();
        if self.result.phases.contains_key(&name) {
            self.error
                .get_or_insert(EquilibriumError::DuplicatePhase { phase: name });
        } else {
            self.result.insert_phase(name, phase);
        }
        self
    }

    pub fn build(self) -> EqResult<EquilibriumResult<T>> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.result),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_builder_sets_every_field() {
        let phase = PhaseBuilder::<f64>::new()
            .status(PhaseStatus::Fixed)
            .fraction(0.25)
            .sublattice(2.0, [("A", 1.0, -10.0)])
            .build()
            .unwrap();
        assert_eq!(phase.status, PhaseStatus::Fixed);
        assert_eq!(phase.f, 0.25);
        assert_eq!(phase.sublattices.len(), 1);
        assert_eq!(phase.sublattices[0].sitecount, 2.0);
    }

    #[test]
    fn phase_builder_keeps_first_error() {
        let err = PhaseBuilder::<f64>::new()
            .sublattice(1.0, [("A", 1.0, 0.0)])
            .sublattice(1.0, [("A", 0.3, 0.0), ("B", 0.6, 0.0)])
            .sublattice(-1.0, [("A", 1.0, 0.0)])
            .build()
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("sublattice 1"), "{msg}");
    }

    #[test]
    fn phase_builder_rejects_fraction_out_of_range() {
        let result = PhaseBuilder::<f64>::new()
            .fraction(1.2)
            .sublattice(1.0, [("A", 1.0, 0.0)])
            .build();
        assert!(matches!(
            result,
            Err(EquilibriumError::InvariantViolation { .. })
        ));
    }

    #[test]
    fn phase_builder_rejects_phase_without_sites() {
        assert!(PhaseBuilder::<f64>::new().build().is_err());
    }

    #[test]
    fn equilibrium_builder_rejects_duplicate_phase() {
        let liquid = || {
            PhaseBuilder::<f64>::new()
                .sublattice(1.0, [("A", 1.0, 0.0)])
                .build()
                .unwrap()
        };
        let err = EquilibriumBuilder::new()
            .phase("LIQUID", liquid())
            .phase("LIQUID", liquid())
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            EquilibriumError::DuplicatePhase {
                phase: "LIQUID".into()
            }
        );
    }

    #[test]
    fn equilibrium_builder_records_diagnostics() {
        let result = EquilibriumBuilder::<f64>::new()
            .walltime(0.125)
            .itercount(42)
            .total_moles(2.0)
            .build()
            .unwrap();
        assert_eq!(result.walltime, 0.125);
        assert_eq!(result.itercount, 42);
        assert_eq!(result.n, 2.0);
        assert!(result.phases.is_empty());
    }
}
