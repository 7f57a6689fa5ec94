//! System-level equilibrium snapshot and its aggregations.

use std::collections::{BTreeMap, BTreeSet};

use eq_core::{Real, abs_diff, nearly_equal, sum, sum_tolerance};
use tracing::{debug, trace, warn};

use crate::config::QueryTolerances;
use crate::error::{EqResult, EquilibriumError, QueryScope};
use crate::phase::Phase;

/// Filled result of an equilibrium calculation.
///
/// Built once by the solver, then moved to its consumer and only read from.
/// Like [`Phase`] it is not `Clone`: the energy-model bindings it owns cannot
/// be duplicated.
#[derive(Debug)]
pub struct EquilibriumResult<T: Real> {
    /// Wall clock time of the calculation [s].
    pub walltime: f64,
    /// Solver iterations.
    pub itercount: usize,
    /// Total system size N [mol].
    pub n: f64,
    pub phases: BTreeMap<String, Phase<T>>,
    /// Tolerances used by the queries below.
    pub tolerances: QueryTolerances,
}

impl<T: Real> Default for EquilibriumResult<T> {
    fn default() -> Self {
        Self {
            walltime: 0.0,
            itercount: 0,
            n: 0.0,
            phases: BTreeMap::new(),
            tolerances: QueryTolerances::default(),
        }
    }
}

impl<T: Real> EquilibriumResult<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move a filled phase into the result, returning any phase it displaces.
    pub fn insert_phase(&mut self, name: impl Into<String>, phase: Phase<T>) -> Option<Phase<T>> {
        self.phases.insert(name.into(), phase)
    }

    pub fn phase(&self, name: &str) -> EqResult<&Phase<T>> {
        self.phases
            .get(name)
            .ok_or_else(|| EquilibriumError::UnknownPhase {
                phase: name.to_string(),
            })
    }

    /// Phases whose status is `Entered` or `Fixed`, in name order.
    pub fn stable_phases(&self) -> impl Iterator<Item = (&str, &Phase<T>)> + '_ {
        self.phases
            .iter()
            .filter(|(_, p)| p.is_stable())
            .map(|(name, p)| (name.as_str(), p))
    }

    /// Every species appearing in any phase, sorted.
    pub fn species(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.phases.values().flat_map(|p| p.species()).collect();
        set.into_iter().collect()
    }

    /// System mole fraction: `Σ f_p · x_p(species)` over stable phases.
    ///
    /// Stable phases without the species contribute 0; the species is only
    /// unknown if no stable phase holds it.
    pub fn mole_fraction(&self, species: &str) -> EqResult<T> {
        debug!(species, "system mole fraction");
        let stable = self.checked_stable_phases()?;

        let mut found = false;
        let mut total = T::cast(0.0);
        for (name, phase) in stable {
            match phase.mole_fraction_with(species, &self.tolerances) {
                Ok(x) => {
                    trace!(
                        phase = name,
                        f = phase.f.as_f64(),
                        x = x.as_f64(),
                        "phase contribution"
                    );
                    found = true;
                    total = total + phase.f * x;
                }
                Err(e) if e.is_unknown_species() => continue,
                Err(e) => return Err(e),
            }
        }

        if found {
            Ok(total)
        } else {
            Err(EquilibriumError::unknown_species(species, QueryScope::System))
        }
    }

    /// Common chemical potential of `species` over the stable phases that
    /// contain it.
    ///
    /// At equilibrium every stable phase carries the same value. A spread
    /// beyond `tolerances.potential` means the solver did not converge and
    /// is reported as `InconsistentPotential`.
    pub fn chemical_potential(&self, species: &str) -> EqResult<T> {
        debug!(species, "system chemical potential");
        let stable = self.stable()?;

        let mut first: Option<T> = None;
        let mut low: Option<(&str, T)> = None;
        let mut high: Option<(&str, T)> = None;
        for (name, phase) in stable {
            let mu = match phase.chemical_potential_with(species, &self.tolerances) {
                Ok(mu) => mu,
                Err(e) if e.is_unknown_species() => continue,
                Err(e) => return Err(e),
            };
            trace!(phase = name, mu = mu.as_f64(), "phase potential");
            first.get_or_insert(mu);
            if low.is_none_or(|(_, v)| mu < v) {
                low = Some((name, mu));
            }
            if high.is_none_or(|(_, v)| mu > v) {
                high = Some((name, mu));
            }
        }

        if let (Some((low_phase, lo)), Some((high_phase, hi))) = (low, high) {
            if !nearly_equal(lo, hi, self.tolerances.potential) {
                warn!(
                    species,
                    low_phase,
                    high_phase,
                    spread = abs_diff(lo, hi).as_f64(),
                    "chemical potential differs between stable phases"
                );
                return Err(EquilibriumError::InconsistentPotential {
                    species: species.to_string(),
                    first: lo.as_f64(),
                    second: hi.as_f64(),
                    context: format!("phases {low_phase} and {high_phase}"),
                });
            }
        }

        first.ok_or_else(|| EquilibriumError::unknown_species(species, QueryScope::System))
    }

    /// System molar Gibbs energy: `Σ f_p · G_p` over stable phases.
    pub fn energy(&self) -> EqResult<T> {
        debug!("system energy");
        let stable = self.checked_stable_phases()?;

        let mut total = T::cast(0.0);
        for (name, phase) in stable {
            let g = phase.energy().inspect_err(|e| {
                warn!(phase = name, error = %e, "phase energy evaluation failed");
            })?;
            trace!(phase = name, f = phase.f.as_f64(), g = g.as_f64(), "phase energy");
            total = total + phase.f * g;
        }
        Ok(total)
    }

    /// Amount of `species` in the system [mol]: `N · x(species)`.
    pub fn amount(&self, species: &str) -> EqResult<T> {
        self.stable()?;
        self.check_system_size()?;
        Ok(T::cast(self.n) * self.mole_fraction(species)?)
    }

    /// Eagerly check every invariant of the result.
    ///
    /// Queries check what they depend on lazily; this is the opt-in fail-fast
    /// path for producers that want to verify a result before handing it on.
    pub fn validate(&self) -> EqResult<()> {
        if !(self.walltime.is_finite() && self.walltime >= 0.0) {
            return Err(EquilibriumError::InvariantViolation {
                what: format!("walltime {} is negative or non-finite", self.walltime),
            });
        }
        for (name, phase) in &self.phases {
            phase
                .check(&self.tolerances)
                .map_err(|e| e.in_phase(name))?;
        }
        self.checked_stable_phases()?;
        self.check_system_size()
    }

    fn stable(&self) -> EqResult<Vec<(&str, &Phase<T>)>> {
        let stable: Vec<_> = self.stable_phases().collect();
        if stable.is_empty() {
            return Err(EquilibriumError::EmptyEquilibrium);
        }
        Ok(stable)
    }

    /// Stable phases, after checking that their fractions are in range and
    /// sum to 1.
    fn checked_stable_phases(&self) -> EqResult<Vec<(&str, &Phase<T>)>> {
        let stable = self.stable()?;
        let tol = sum_tolerance::<T>(self.tolerances.phase_sum(), stable.len());
        let (zero, one) = (T::cast(0.0), T::cast(1.0));

        for (name, phase) in &stable {
            let f = phase.f;
            let finite = f.as_f64().is_finite();
            let below = f < zero && !nearly_equal(f, zero, tol);
            let above = f > one && !nearly_equal(f, one, tol);
            if !finite || below || above {
                warn!(phase = *name, f = f.as_f64(), "phase fraction out of range");
                return Err(EquilibriumError::InvariantViolation {
                    what: format!("phase {name}: fraction {} outside [0, 1]", f.as_f64()),
                });
            }
        }

        let total = sum(stable.iter().map(|(_, p)| p.f));
        if !nearly_equal(total, one, tol) {
            warn!(total = total.as_f64(), "stable phase fractions do not sum to 1");
            return Err(EquilibriumError::InvariantViolation {
                what: format!("stable phase fractions sum to {}", total.as_f64()),
            });
        }
        Ok(stable)
    }

    fn check_system_size(&self) -> EqResult<()> {
        if self.n.is_finite() && self.n > 0.0 {
            Ok(())
        } else {
            Err(EquilibriumError::InvariantViolation {
                what: format!("system size N = {} is not positive", self.n),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::PhaseBuilder;
    use crate::status::PhaseStatus;

    fn phase(status: PhaseStatus, f: f64, ya: f64, mu_a: f64) -> Phase<f64> {
        PhaseBuilder::new()
            .status(status)
            .fraction(f)
            .sublattice(1.0, [("A", ya, mu_a), ("B", 1.0 - ya, -500.0)])
            .build()
            .unwrap()
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-12, "{a} != {b}");
    }

    #[test]
    fn default_result_is_empty() {
        let result = EquilibriumResult::<f64>::default();
        assert!(result.phases.is_empty());
        assert_eq!(result.itercount, 0);
        assert_eq!(result.energy(), Err(EquilibriumError::EmptyEquilibrium));
    }

    #[test]
    fn only_unstable_phases_is_empty_equilibrium() {
        let mut result = EquilibriumResult::new();
        result.insert_phase("LIQUID", phase(PhaseStatus::Dormant, 0.0, 0.5, 0.0));
        result.insert_phase("FCC", phase(PhaseStatus::Suspended, 0.0, 0.5, 0.0));
        assert_eq!(result.mole_fraction("A"), Err(EquilibriumError::EmptyEquilibrium));
        assert_eq!(
            result.chemical_potential("A"),
            Err(EquilibriumError::EmptyEquilibrium)
        );
        assert_eq!(result.energy(), Err(EquilibriumError::EmptyEquilibrium));
    }

    #[test]
    fn dormant_phases_are_ignored() {
        let mut result = EquilibriumResult::new();
        result.insert_phase("LIQUID", phase(PhaseStatus::Entered, 1.0, 0.3, -10.0));
        // Disagreeing potential and stray fraction, but not stable
        result.insert_phase("FCC", phase(PhaseStatus::Dormant, 0.0, 0.9, 99.0));
        assert_close(result.mole_fraction("A").unwrap(), 0.3);
        assert_eq!(result.chemical_potential("A").unwrap(), -10.0);
    }

    #[test]
    fn species_only_in_unstable_phases_is_unknown() {
        let mut result = EquilibriumResult::new();
        result.insert_phase("LIQUID", phase(PhaseStatus::Entered, 1.0, 0.3, -10.0));
        let gas = PhaseBuilder::new()
            .status(PhaseStatus::Dormant)
            .sublattice(1.0, [("O", 1.0, -900.0)])
            .build()
            .unwrap();
        result.insert_phase("GAS", gas);

        for err in [
            result.mole_fraction("O").unwrap_err(),
            result.chemical_potential("O").unwrap_err(),
        ] {
            assert_eq!(
                err,
                EquilibriumError::UnknownSpecies {
                    species: "O".into(),
                    scope: QueryScope::System
                }
            );
        }
        // Still known at phase level
        assert_eq!(result.phase("GAS").unwrap().chemical_potential("O").unwrap(), -900.0);
    }

    #[test]
    fn fixed_phases_count_as_stable() {
        let mut result = EquilibriumResult::new();
        result.insert_phase("LIQUID", phase(PhaseStatus::Entered, 0.75, 0.2, -10.0));
        result.insert_phase("BCC", phase(PhaseStatus::Fixed, 0.25, 0.6, -10.0));
        assert_close(result.mole_fraction("A").unwrap(), 0.75 * 0.2 + 0.25 * 0.6);
    }

    #[test]
    fn species_absent_from_one_phase_contributes_zero() {
        let mut result = EquilibriumResult::new();
        result.insert_phase("LIQUID", phase(PhaseStatus::Entered, 0.5, 0.4, -10.0));
        let oxide = PhaseBuilder::new()
            .status(PhaseStatus::Entered)
            .fraction(0.5)
            .sublattice(1.0, [("B", 1.0, -500.0)])
            .sublattice(1.0, [("O", 1.0, -900.0)])
            .build()
            .unwrap();
        result.insert_phase("OXIDE", oxide);

        assert_close(result.mole_fraction("A").unwrap(), 0.5 * 0.4);
        assert_close(result.mole_fraction("O").unwrap(), 0.5 * 0.5);
        assert_eq!(result.chemical_potential("O").unwrap(), -900.0);
        assert_eq!(result.species(), vec!["A", "B", "O"]);
    }

    #[test]
    fn phase_fractions_not_summing_to_one_are_reported() {
        let mut result = EquilibriumResult::new();
        result.insert_phase("LIQUID", phase(PhaseStatus::Entered, 0.5, 0.3, -10.0));
        result.insert_phase("FCC", phase(PhaseStatus::Entered, 0.3, 0.3, -10.0));
        assert!(matches!(
            result.mole_fraction("A"),
            Err(EquilibriumError::InvariantViolation { .. })
        ));
        // Potentials do not depend on phase fractions
        assert_eq!(result.chemical_potential("A").unwrap(), -10.0);
    }

    #[test]
    fn unknown_phase_lookup() {
        let result = EquilibriumResult::<f64>::new();
        assert!(matches!(
            result.phase("GAS"),
            Err(EquilibriumError::UnknownPhase { .. })
        ));
    }

    #[test]
    fn amount_on_empty_result_is_empty_equilibrium() {
        let result = EquilibriumResult::<f64>::new();
        assert_eq!(result.n, 0.0);
        assert_eq!(result.amount("A"), Err(EquilibriumError::EmptyEquilibrium));
    }

    #[test]
    fn large_potentials_use_absolute_tolerance() {
        let mut result = EquilibriumResult::new();
        result.insert_phase("LIQUID", phase(PhaseStatus::Entered, 0.5, 0.3, -100_000.0));
        result.insert_phase("SOLID", phase(PhaseStatus::Entered, 0.5, 0.3, -100_000.000_05));
        assert!(matches!(
            result.chemical_potential("A"),
            Err(EquilibriumError::InconsistentPotential { .. })
        ));

        result.insert_phase("SOLID", phase(PhaseStatus::Entered, 0.5, 0.3, -100_000.000_000_5));
        assert_eq!(result.chemical_potential("A").unwrap(), -100_000.0);
    }

    #[test]
    fn amount_scales_by_system_size() {
        let mut result = EquilibriumResult::new();
        result.insert_phase("LIQUID", phase(PhaseStatus::Entered, 1.0, 0.25, -10.0));
        assert!(matches!(
            result.amount("A"),
            Err(EquilibriumError::InvariantViolation { .. })
        ));
        result.n = 4.0;
        assert_close(result.amount("A").unwrap(), 1.0);
    }

    #[test]
    fn validate_catches_each_defect() {
        let mut result = EquilibriumResult::new();
        result.n = 1.0;
        assert_eq!(result.validate(), Err(EquilibriumError::EmptyEquilibrium));

        result.insert_phase("LIQUID", phase(PhaseStatus::Entered, 1.0, 0.3, -10.0));
        assert!(result.validate().is_ok());

        result.walltime = -1.0;
        assert!(result.validate().is_err());
        result.walltime = 0.5;

        result.n = 0.0;
        assert!(result.validate().is_err());
        result.n = 1.0;

        if let Some(liquid) = result.phases.get_mut("LIQUID") {
            liquid.sublattices[0].sitecount = -2.0;
        }
        let err = result.validate().unwrap_err();
        assert!(err.to_string().contains("LIQUID"));
    }
}
