//! eq-equilibrium: read-only snapshot of a multi-phase equilibrium.
//!
//! An [`EquilibriumResult`] is filled once by the producing solver (phase by
//! phase, usually through [`PhaseBuilder`] / [`EquilibriumBuilder`]) and then
//! handed to callers by move. From then on every query is a pure aggregation
//! over stored data:
//!
//! - site level: [`eq_core::Sublattice`] site fractions and potentials
//! - phase level: [`Phase::mole_fraction`], [`Phase::chemical_potential`],
//!   [`Phase::energy`]
//! - system level: the same three queries on [`EquilibriumResult`],
//!   aggregated over stable (`Entered` / `Fixed`) phases
//!
//! Invariants (fraction normalization, non-negative site counts, potential
//! consistency) are checked lazily by the queries that depend on them.
//!
//! # Example
//!
//! ```
//! use eq_equilibrium::{EquilibriumBuilder, PhaseBuilder, PhaseStatus};
//!
//! let liquid = PhaseBuilder::<f64>::new()
//!     .status(PhaseStatus::Entered)
//!     .fraction(1.0)
//!     .sublattice(1.0, [("A", 0.3, -1000.0), ("B", 0.7, -2000.0)])
//!     .build()
//!     .unwrap();
//!
//! let result = EquilibriumBuilder::new()
//!     .total_moles(1.0)
//!     .phase("LIQUID", liquid)
//!     .build()
//!     .unwrap();
//!
//! assert!((result.mole_fraction("A").unwrap() - 0.3).abs() < 1e-12);
//! assert!(result.mole_fraction("C").is_err());
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod phase;
pub mod result;
pub mod status;

pub use builder::{EquilibriumBuilder, PhaseBuilder};
pub use config::{ConfigError, QueryTolerances};
pub use error::{EqResult, EquilibriumError, QueryScope};
pub use phase::Phase;
pub use result::EquilibriumResult;
pub use status::PhaseStatus;
