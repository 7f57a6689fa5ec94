//! Site-level equilibrium data: species components and the sublattices that
//! hold them.

use std::collections::BTreeMap;

use crate::error::{CoreError, CoreResult};
use crate::numeric::{
    Real, Tolerances, abs_diff, ensure_finite, nearly_equal, sum, sum_tolerance,
};

/// Tolerance used by the checked constructor for the site-fraction sum.
pub const SITE_FRACTION_SUM_TOL: f64 = 1e-9;

/// One species occupying sites of a sublattice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Component<T> {
    /// Fraction of the sublattice's sites occupied by this species, in [0, 1].
    pub site_fraction: T,
    /// Chemical potential relative to the reference state [J/mol].
    pub chemical_potential: T,
}

impl<T: Real> Component<T> {
    pub fn new(site_fraction: T, chemical_potential: T) -> Self {
        Self {
            site_fraction,
            chemical_potential,
        }
    }
}

/// Species sharing one set of sites.
///
/// Species are keyed by name; iteration is in name order.
#[derive(Debug, Clone, PartialEq)]
pub struct Sublattice<T> {
    /// Sites per formula unit contributed by this sublattice.
    pub sitecount: T,
    pub components: BTreeMap<String, Component<T>>,
}

impl<T: Real> Sublattice<T> {
    /// Empty sublattice, to be filled with [`Sublattice::insert`].
    pub fn new(sitecount: T) -> Self {
        Self {
            sitecount,
            components: BTreeMap::new(),
        }
    }

    /// Build a sublattice from `(species, site_fraction, chemical_potential)`
    /// triples, rejecting anything that is not a well-formed site-fraction set.
    pub fn from_components<S, I>(sitecount: T, components: I) -> CoreResult<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, T, T)>,
    {
        let mut sublattice = Self::new(ensure_finite(sitecount, "sitecount")?);
        for (name, site_fraction, chemical_potential) in components {
            let name = name.into();
            ensure_finite(chemical_potential, "chemical potential")?;
            let component = Component::new(site_fraction, chemical_potential);
            if sublattice.insert(name.clone(), component).is_some() {
                return Err(CoreError::InvalidArg {
                    what: format!("duplicate species '{name}' in sublattice"),
                });
            }
        }
        sublattice.check(Tolerances::absolute(SITE_FRACTION_SUM_TOL))?;
        Ok(sublattice)
    }

    /// Insert or replace a species, returning the previous entry.
    pub fn insert(
        &mut self,
        species: impl Into<String>,
        component: Component<T>,
    ) -> Option<Component<T>> {
        self.components.insert(species.into(), component)
    }

    /// Component for `species`, or `None` when the species does not occupy
    /// this sublattice.
    pub fn component(&self, species: &str) -> Option<&Component<T>> {
        self.components.get(species)
    }

    pub fn site_fraction(&self, species: &str) -> Option<T> {
        self.component(species).map(|c| c.site_fraction)
    }

    pub fn contains(&self, species: &str) -> bool {
        self.components.contains_key(species)
    }

    pub fn species(&self) -> impl Iterator<Item = &str> + '_ {
        self.components.keys().map(String::as_str)
    }

    pub fn is_populated(&self) -> bool {
        !self.components.is_empty()
    }

    pub fn site_fraction_sum(&self) -> T {
        sum(self.components.values().map(|c| c.site_fraction))
    }

    /// Check the sublattice invariants: finite, non-negative site count;
    /// every site fraction finite and inside [0, 1]; fractions summing to 1
    /// when the sublattice is populated.
    ///
    /// `sum_tol` is widened to the rounding error of `T` over the number of
    /// components, so the same tolerance serves every precision.
    pub fn check(&self, sum_tol: Tolerances) -> CoreResult<()> {
        let sum_tol = sum_tolerance::<T>(sum_tol, self.components.len());
        let zero = T::cast(0.0);
        let one = T::cast(1.0);

        ensure_finite(self.sitecount, "sitecount")?;
        if self.sitecount < zero {
            return Err(CoreError::Invariant {
                what: format!("negative site count {}", self.sitecount.as_f64()),
            });
        }

        for (name, c) in &self.components {
            ensure_finite(c.site_fraction, "site fraction")?;
            let y = c.site_fraction;
            let below = y < zero && abs_diff(y, zero).as_f64() > sum_tol.abs;
            let above = y > one && abs_diff(y, one).as_f64() > sum_tol.abs;
            if below || above {
                return Err(CoreError::Invariant {
                    what: format!(
                        "site fraction of '{name}' outside [0, 1]: {}",
                        c.site_fraction.as_f64()
                    ),
                });
            }
        }

        if self.is_populated() {
            let total = self.site_fraction_sum();
            if !nearly_equal(total, one, sum_tol) {
                return Err(CoreError::Invariant {
                    what: format!("site fractions sum to {} (expected 1)", total.as_f64()),
                });
            }
        }

        Ok(())
    }
}
