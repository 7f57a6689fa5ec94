//! Query tolerances, loadable from YAML.

use std::path::Path;

use eq_core::Tolerances;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid tolerance: {what}")]
    Invalid { what: String },
}

/// Tolerances applied when queries check invariants or compare potentials.
///
/// ```yaml
/// site_fraction_sum: 1.0e-9
/// phase_fraction_sum: 1.0e-6
/// potential:
///   abs: 1.0e-6
///   rel: 0.0
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryTolerances {
    /// Allowed deviation of a sublattice's site-fraction sum from 1.
    pub site_fraction_sum: f64,
    /// Allowed deviation of the stable phase-fraction sum from 1.
    pub phase_fraction_sum: f64,
    /// Agreement required between stored chemical potentials of one species.
    pub potential: Tolerances,
}

impl Default for QueryTolerances {
    fn default() -> Self {
        Self {
            site_fraction_sum: 1e-9,
            phase_fraction_sum: 1e-6,
            potential: Tolerances::absolute(1e-6),
        }
    }
}

impl QueryTolerances {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let tol: Self = serde_yaml::from_str(yaml)?;
        tol.validate()?;
        Ok(tol)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("site_fraction_sum", self.site_fraction_sum),
            ("phase_fraction_sum", self.phase_fraction_sum),
            ("potential.abs", self.potential.abs),
            ("potential.rel", self.potential.rel),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    what: format!("{name} = {value}"),
                });
            }
        }
        Ok(())
    }

    pub(crate) fn site_sum(&self) -> Tolerances {
        Tolerances::absolute(self.site_fraction_sum)
    }

    pub(crate) fn phase_sum(&self) -> Tolerances {
        Tolerances::absolute(self.phase_fraction_sum)
    }
}
