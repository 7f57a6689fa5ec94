//! Reference energy model: site-weighted reference energies, ideal
//! configurational mixing and regular binary interactions.
//!
//! For sublattices `i` with site counts `a_i` and site fractions `y_is`:
//!
//! ```text
//! G = [ Σ_i a_i Σ_s y_is G0_is
//!     + R T Σ_i a_i Σ_s y_is ln y_is
//!     + Σ_(i,a,b) a_i y_ia y_ib L_iab ] / Σ_i a_i
//! ```
//!
//! i.e. the molar Gibbs energy per mole of sites. `0 ln 0` is taken as 0.

use std::collections::BTreeMap;

use eq_core::constants::GAS_CONSTANT_J_PER_MOL_K;
use eq_core::{Real, Sublattice, Temperature, kelvin_value, sum};

use crate::error::{ModelError, ModelResult};
use crate::model::EnergyModel;

/// Regular interaction between two species sharing a sublattice.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction<T> {
    pub sublattice: usize,
    pub a: String,
    pub b: String,
    /// Interaction parameter L [J/mol].
    pub l: T,
}

#[derive(Debug, Clone)]
pub struct SiteMixingModel<T> {
    name: String,
    temperature: Temperature,
    references: Vec<BTreeMap<String, T>>,
    interactions: Vec<Interaction<T>>,
}

impl<T: Real> SiteMixingModel<T> {
    /// Model for a phase with `sublattice_count` sublattices and no
    /// parameters yet.
    pub fn new(name: impl Into<String>, temperature: Temperature, sublattice_count: usize) -> Self {
        Self {
            name: name.into(),
            temperature,
            references: vec![BTreeMap::new(); sublattice_count],
            interactions: Vec::new(),
        }
    }

    /// Reference energy G0 [J/mol] of `species` on `sublattice`.
    pub fn with_reference(mut self, sublattice: usize, species: impl Into<String>, g0: T) -> Self {
        if sublattice >= self.references.len() {
            self.references.resize(sublattice + 1, BTreeMap::new());
        }
        self.references[sublattice].insert(species.into(), g0);
        self
    }

    pub fn with_interaction(
        mut self,
        sublattice: usize,
        a: impl Into<String>,
        b: impl Into<String>,
        l: T,
    ) -> Self {
        self.interactions.push(Interaction {
            sublattice,
            a: a.into(),
            b: b.into(),
            l,
        });
        self
    }

    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    pub fn sublattice_count(&self) -> usize {
        self.references.len()
    }

    fn rt(&self) -> T {
        T::cast(GAS_CONSTANT_J_PER_MOL_K * kelvin_value(self.temperature))
    }
}

impl<T: Real> EnergyModel<T> for SiteMixingModel<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn molar_gibbs_energy(&self, sublattices: &[Sublattice<T>]) -> ModelResult<T> {
        if sublattices.len() != self.references.len() {
            return Err(ModelError::ShapeMismatch {
                expected: self.references.len(),
                actual: sublattices.len(),
            });
        }

        let zero = T::cast(0.0);
        let total_sites = sum(sublattices.iter().map(|s| s.sitecount));
        if total_sites.as_f64().is_nan() || total_sites <= zero {
            return Err(ModelError::NonPhysical {
                what: format!("total site count {}", total_sites.as_f64()),
            });
        }

        let mut reference = zero;
        let mut configurational = zero;
        for (i, sub) in sublattices.iter().enumerate() {
            for (species, c) in &sub.components {
                let y = c.site_fraction;
                if y < zero {
                    return Err(ModelError::NonPhysical {
                        what: format!("site fraction of '{species}' on sublattice {i}"),
                    });
                }
                let g0 = self.references[i].get(species).copied().ok_or_else(|| {
                    ModelError::MissingParameter {
                        species: species.clone(),
                        sublattice: i,
                    }
                })?;
                reference = reference + sub.sitecount * y * g0;
                if y > zero {
                    configurational = configurational + sub.sitecount * y * y.ln();
                }
            }
        }

        let mut excess = zero;
        for inter in &self.interactions {
            let Some(sub) = sublattices.get(inter.sublattice) else {
                return Err(ModelError::ShapeMismatch {
                    expected: inter.sublattice + 1,
                    actual: sublattices.len(),
                });
            };
            let ya = sub.site_fraction(&inter.a).unwrap_or(zero);
            let yb = sub.site_fraction(&inter.b).unwrap_or(zero);
            excess = excess + sub.sitecount * ya * yb * inter.l;
        }

        Ok((reference + self.rt() * configurational + excess) / total_sites)
    }
}
