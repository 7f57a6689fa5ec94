use eq_core::k;
use eq_equilibrium::{EquilibriumBuilder, PhaseBuilder, PhaseStatus};
use eq_model::SiteMixingModel;
use eq_results::*;

fn two_phase_result() -> eq_equilibrium::EquilibriumResult<f64> {
    let liquid_model = SiteMixingModel::<f64>::new("LIQUID", k(1200.0), 1)
        .with_reference(0, "CU", -20_000.0)
        .with_reference(0, "NI", -25_000.0)
        .with_interaction(0, "CU", "NI", 10_000.0);
    let fcc_model = SiteMixingModel::<f64>::new("FCC_A1", k(1200.0), 2)
        .with_reference(0, "CU", -21_000.0)
        .with_reference(0, "NI", -26_000.0)
        .with_reference(1, "VA", 0.0);

    let liquid = PhaseBuilder::new()
        .status(PhaseStatus::Entered)
        .fraction(0.3)
        .sublattice(1.0, [("CU", 0.7, -30_000.0), ("NI", 0.3, -40_000.0)])
        .model("LIQUID", Box::new(liquid_model))
        .build()
        .unwrap();
    let fcc = PhaseBuilder::new()
        .status(PhaseStatus::Entered)
        .fraction(0.7)
        .sublattice(1.0, [("CU", 0.4, -30_000.0), ("NI", 0.6, -40_000.0)])
        .sublattice(1.0, [("VA", 1.0, 0.0)])
        .model("FCC_A1", Box::new(fcc_model))
        .build()
        .unwrap();

    EquilibriumBuilder::new()
        .walltime(0.042)
        .itercount(31)
        .total_moles(2.0)
        .phase("LIQUID", liquid)
        .phase("FCC_A1", fcc)
        .build()
        .unwrap()
}

#[test]
fn summarize_two_phase_result() {
    let result = two_phase_result();
    let summary = summarize(&result);

    assert!(summary.issues.is_empty(), "{:?}", summary.issues);
    assert_eq!(summary.phases.len(), 2);
    assert_eq!(summary.phases[0].name, "FCC_A1");
    assert_eq!(summary.phases[0].sublattice_sites, vec![1.0, 1.0]);

    let x_cu = 0.3 * 0.7 + 0.7 * (0.4 / 2.0);
    assert!((summary.system.mole_fractions["CU"] - x_cu).abs() < 1e-12);
    assert_eq!(summary.system.chemical_potentials["NI"], -40_000.0);

    let g = summary.system.energy_j_per_mol.unwrap();
    let g_phases = 0.3 * summary.phases[1].energy_j_per_mol.unwrap()
        + 0.7 * summary.phases[0].energy_j_per_mol.unwrap();
    assert!((g - g_phases).abs() < 1e-6);
}

#[test]
fn summary_json_round_trip_keeps_id() {
    let summary = summarize(&two_phase_result());
    let json = to_json_pretty(&summary).unwrap();
    assert!(json.contains("\"ENTERED\""));

    let back = from_json(&json).unwrap();
    assert_eq!(back, summary);
    assert_eq!(compute_summary_id(&back), compute_summary_id(&summary));
}

#[test]
fn malformed_json_is_reported() {
    assert!(matches!(from_json("{"), Err(ResultsError::Json(_))));
}
