//! A single phase of the equilibrium and its phase-level aggregations.

use std::collections::BTreeSet;

use eq_core::{Real, Sublattice, abs_diff, ensure_finite, nearly_equal, sum};
use eq_model::CompositionSet;
use tracing::warn;

use crate::config::QueryTolerances;
use crate::error::{EqResult, EquilibriumError, QueryScope};
use crate::status::PhaseStatus;

/// One phase of a filled equilibrium.
///
/// A phase exclusively owns its sublattices and its energy-model binding and
/// is deliberately not `Clone`: it can be moved into a result, never copied.
#[derive(Debug)]
pub struct Phase<T: Real> {
    /// Phase fraction, amount of this phase relative to the whole system.
    pub f: T,
    pub status: PhaseStatus,
    /// Sublattices in the energy model's site ordering.
    pub sublattices: Vec<Sublattice<T>>,
    pub compositionset: Option<CompositionSet<T>>,
}

impl<T: Real> Default for Phase<T> {
    fn default() -> Self {
        Self {
            f: T::cast(0.0),
            status: PhaseStatus::Suspended,
            sublattices: Vec::new(),
            compositionset: None,
        }
    }
}

impl<T: Real> Phase<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_stable(&self) -> bool {
        self.status.is_stable()
    }

    /// Bind an energy model, returning the one previously bound.
    pub fn bind(&mut self, compositionset: CompositionSet<T>) -> Option<CompositionSet<T>> {
        self.compositionset.replace(compositionset)
    }

    pub fn contains(&self, species: &str) -> bool {
        self.sublattices.iter().any(|s| s.contains(species))
    }

    /// Species present on at least one sublattice, sorted and deduplicated.
    pub fn species(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.sublattices.iter().flat_map(|s| s.species()).collect();
        set.into_iter().collect()
    }

    pub fn total_sites(&self) -> T {
        sum(self.sublattices.iter().map(|s| s.sitecount))
    }

    /// Eagerly check every invariant of this phase.
    pub fn check(&self, tol: &QueryTolerances) -> EqResult<()> {
        self.checked_total_sites(tol)?;
        let f = ensure_finite(self.f, "phase fraction")?;
        let (zero, one) = (T::cast(0.0), T::cast(1.0));
        let out_below = f < zero && abs_diff(f, zero).as_f64() > tol.phase_fraction_sum;
        let out_above = f > one && abs_diff(f, one).as_f64() > tol.phase_fraction_sum;
        if out_below || out_above {
            return Err(EquilibriumError::InvariantViolation {
                what: format!("phase fraction {} outside [0, 1]", f.as_f64()),
            });
        }
        Ok(())
    }

    /// Phase-local mole fraction of `species`, with default tolerances.
    pub fn mole_fraction(&self, species: &str) -> EqResult<T> {
        self.mole_fraction_with(species, &QueryTolerances::default())
    }

    /// `Σ sitecount_i · y_i(species) / Σ sitecount_i`.
    ///
    /// Sublattices without the species contribute nothing to the numerator.
    /// Fails with `UnknownSpecies` when no sublattice holds the species, which
    /// separates "present at zero fraction" from "not part of this phase".
    pub fn mole_fraction_with(&self, species: &str, tol: &QueryTolerances) -> EqResult<T> {
        if !self.contains(species) {
            return Err(EquilibriumError::unknown_species(species, QueryScope::Phase));
        }
        let total = self.checked_total_sites(tol)?;
        let zero = T::cast(0.0);
        let weighted = sum(
            self.sublattices
                .iter()
                .map(|s| s.sitecount * s.site_fraction(species).unwrap_or(zero)),
        );
        Ok(weighted / total)
    }

    /// Chemical potential of `species` in this phase, with default tolerances.
    pub fn chemical_potential(&self, species: &str) -> EqResult<T> {
        self.chemical_potential_with(species, &QueryTolerances::default())
    }

    /// Stored chemical potential of `species`.
    ///
    /// A species found on several sublattices must carry the same potential
    /// on each of them; a spread beyond `tol.potential` is reported as
    /// `InconsistentPotential`, never averaged.
    pub fn chemical_potential_with(&self, species: &str, tol: &QueryTolerances) -> EqResult<T> {
        let mut first: Option<T> = None;
        let mut low: Option<(usize, T)> = None;
        let mut high: Option<(usize, T)> = None;

        for (i, sub) in self.sublattices.iter().enumerate() {
            let Some(component) = sub.component(species) else {
                continue;
            };
            let mu = ensure_finite(component.chemical_potential, "chemical potential")?;
            first.get_or_insert(mu);
            if low.is_none_or(|(_, v)| mu < v) {
                low = Some((i, mu));
            }
            if high.is_none_or(|(_, v)| mu > v) {
                high = Some((i, mu));
            }
        }

        if let (Some((i, lo)), Some((j, hi))) = (low, high) {
            if !nearly_equal(lo, hi, tol.potential) {
                warn!(
                    species,
                    low = lo.as_f64(),
                    high = hi.as_f64(),
                    "inconsistent chemical potential between sublattices"
                );
                return Err(EquilibriumError::InconsistentPotential {
                    species: species.to_string(),
                    first: lo.as_f64(),
                    second: hi.as_f64(),
                    context: format!("sublattices {i} and {j}"),
                });
            }
        }

        first.ok_or_else(|| EquilibriumError::unknown_species(species, QueryScope::Phase))
    }

    /// Molar Gibbs energy of the phase from its bound energy model.
    pub fn energy(&self) -> EqResult<T> {
        let set = self
            .compositionset
            .as_ref()
            .ok_or(EquilibriumError::UnboundModel)?;
        Ok(set.evaluate(&self.sublattices)?)
    }

    /// Total site count after checking every sublattice's invariants.
    fn checked_total_sites(&self, tol: &QueryTolerances) -> EqResult<T> {
        for (i, sub) in self.sublattices.iter().enumerate() {
            sub.check(tol.site_sum())
                .map_err(|e| EquilibriumError::from(e).in_sublattice(i))?;
        }
        let total = self.total_sites();
        if total <= T::cast(0.0) {
            return Err(EquilibriumError::InvariantViolation {
                what: format!("total site count {} is not positive", total.as_f64()),
            });
        }
        Ok(total)
    }
}
