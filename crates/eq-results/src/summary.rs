//! Build a summary from a filled result.

use std::collections::{BTreeMap, BTreeSet};

use eq_core::Real;
use eq_equilibrium::{EqResult, EquilibriumError, EquilibriumResult, Phase};
use tracing::debug;

use crate::types::{EquilibriumSummary, PhaseSummary, SummaryIssue, SystemSummary};

const SYSTEM_SCOPE: &str = "system";

/// Query every species at every level and collect the values.
///
/// Failed queries do not abort the summary: each is recorded as an issue and
/// its value left out. System-level queries cover the species of the stable
/// phases only, and are skipped silently on a result without stable phases
/// since that condition is already visible from the phase statuses. Energies are left out without an issue when a stable phase
/// has no model bound.
pub fn summarize<T: Real>(result: &EquilibriumResult<T>) -> EquilibriumSummary {
    let mut issues = Vec::new();
    let species: BTreeSet<&str> = result
        .stable_phases()
        .flat_map(|(_, phase)| phase.species())
        .collect();

    let phases = result
        .phases
        .iter()
        .map(|(name, phase)| summarize_phase(name, phase, result, &mut issues))
        .collect();

    let mut system = SystemSummary::default();
    if !species.is_empty() {
        for s in species {
            if let Some(x) = record(
                &mut issues,
                SYSTEM_SCOPE,
                "mole_fraction",
                s,
                result.mole_fraction(s),
            ) {
                system.mole_fractions.insert(s.to_string(), x);
            }
            if let Some(mu) = record(
                &mut issues,
                SYSTEM_SCOPE,
                "chemical_potential",
                s,
                result.chemical_potential(s),
            ) {
                system.chemical_potentials.insert(s.to_string(), mu);
            }
        }
        system.energy_j_per_mol = match result.energy() {
            Err(EquilibriumError::UnboundModel) => None,
            other => record(&mut issues, SYSTEM_SCOPE, "energy", "", other),
        };
    }

    debug!(
        phases = result.phases.len(),
        issues = issues.len(),
        "summarized equilibrium result"
    );

    EquilibriumSummary {
        walltime_s: result.walltime,
        itercount: result.itercount,
        total_moles: result.n,
        system,
        phases,
        issues,
    }
}

fn summarize_phase<T: Real>(
    name: &str,
    phase: &Phase<T>,
    result: &EquilibriumResult<T>,
    issues: &mut Vec<SummaryIssue>,
) -> PhaseSummary {
    let tol = &result.tolerances;
    let mut mole_fractions = BTreeMap::new();
    let mut chemical_potentials = BTreeMap::new();

    for s in phase.species() {
        if let Some(x) = record(
            issues,
            name,
            "mole_fraction",
            s,
            phase.mole_fraction_with(s, tol),
        ) {
            mole_fractions.insert(s.to_string(), x);
        }
        if let Some(mu) = record(
            issues,
            name,
            "chemical_potential",
            s,
            phase.chemical_potential_with(s, tol),
        ) {
            chemical_potentials.insert(s.to_string(), mu);
        }
    }

    // Phases without a model are common for producers that only report
    // compositions; that is not worth an issue.
    let energy_j_per_mol = match phase.energy() {
        Err(EquilibriumError::UnboundModel) => None,
        other => record(issues, name, "energy", "", other),
    };

    let fraction = phase.f.as_f64();
    let fraction = if fraction.is_finite() {
        Some(fraction)
    } else {
        issues.push(SummaryIssue {
            scope: name.to_string(),
            query: "fraction".to_string(),
            message: format!("non-finite phase fraction {fraction}"),
        });
        None
    };

    PhaseSummary {
        name: name.to_string(),
        status: phase.status,
        fraction,
        sublattice_sites: phase.sublattices.iter().map(|s| s.sitecount.as_f64()).collect(),
        mole_fractions,
        chemical_potentials,
        energy_j_per_mol,
    }
}

fn record<T: Real>(
    issues: &mut Vec<SummaryIssue>,
    scope: &str,
    query: &str,
    species: &str,
    value: EqResult<T>,
) -> Option<f64> {
    match value {
        Ok(v) => Some(v.as_f64()),
        Err(e) => {
            let query = if species.is_empty() {
                query.to_string()
            } else {
                format!("{query}({species})")
            };
            issues.push(SummaryIssue {
                scope: scope.to_string(),
                query,
                message: e.to_string(),
            });
            None
        }
    }
}
