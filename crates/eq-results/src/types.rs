//! Summary data types.

use std::collections::BTreeMap;

use eq_equilibrium::PhaseStatus;
use serde::{Deserialize, Serialize};

pub type SummaryId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumSummary {
    pub walltime_s: f64,
    pub itercount: usize,
    pub total_moles: f64,
    pub system: SystemSummary,
    pub phases: Vec<PhaseSummary>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<SummaryIssue>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SystemSummary {
    pub mole_fractions: BTreeMap<String, f64>,
    pub chemical_potentials: BTreeMap<String, f64>,
    pub energy_j_per_mol: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseSummary {
    pub name: String,
    pub status: PhaseStatus,
    /// Left out when the stored fraction is not finite.
    pub fraction: Option<f64>,
    pub sublattice_sites: Vec<f64>,
    pub mole_fractions: BTreeMap<String, f64>,
    pub chemical_potentials: BTreeMap<String, f64>,
    pub energy_j_per_mol: Option<f64>,
}

/// A query that failed while summarizing; the value is left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryIssue {
    /// `system` or the phase name.
    pub scope: String,
    pub query: String,
    pub message: String,
}
