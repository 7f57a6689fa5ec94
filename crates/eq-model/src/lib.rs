//! eq-model: the energy-model boundary of equilibria.
//!
//! Provides:
//! - `EnergyModel` trait: evaluates the molar Gibbs energy of a phase from its
//!   sublattice site-fraction state
//! - `CompositionSet`: the exclusive, move-only binding of one model to a phase
//! - `SiteMixingModel`: a reference model (reference energies, ideal
//!   configurational mixing, regular interactions) for producers and tests
//!
//! # Architecture
//!
//! The symbolic model engine that normally stands behind a phase lives outside
//! this workspace. Equilibrium queries only ever need the energy itself, so the
//! trait exposes exactly that capability and nothing else.
//!
//! # Example
//!
//! ```
//! use eq_core::{Sublattice, k};
//! use eq_model::{CompositionSet, SiteMixingModel};
//!
//! let model = SiteMixingModel::<f64>::new("LIQUID", k(1000.0), 1)
//!     .with_reference(0, "A", 0.0)
//!     .with_reference(0, "B", 0.0);
//! let set = CompositionSet::new("LIQUID", Box::new(model));
//!
//! let sublattices =
//!     vec![Sublattice::from_components(1.0, [("A", 0.5, 0.0), ("B", 0.5, 0.0)]).unwrap()];
//! let g = set.evaluate(&sublattices).unwrap();
//! assert!(g < 0.0);
//! ```

pub mod error;
pub mod mixing;
pub mod model;

// Re-exports for ergonomics
pub use error::{ModelError, ModelResult};
pub use mixing::{Interaction, SiteMixingModel};
pub use model::{CompositionSet, EnergyModel};
