//! eq-core: stable foundation for equilibria.
//!
//! Contains:
//! - numeric (generic `Real` scalar + tolerances + float helpers)
//! - units (uom SI types + constructors)
//! - sublattice (site-level equilibrium data: components and sublattices)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod sublattice;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use sublattice::{Component, Sublattice};
pub use units::*;
