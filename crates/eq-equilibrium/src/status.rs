//! Phase lifecycle status.

use serde::{Deserialize, Serialize};

/// Status the producing solver last assigned to a phase.
///
/// Transitions are driven entirely by the solver; this crate only stores the
/// value and uses it to decide which phases take part in system-level sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseStatus {
    /// Active, contributes to the equilibrium; `f` may be > 0.
    Entered,
    /// Considered but not currently stable; `f = 0`.
    Dormant,
    /// Phase fraction pinned by a user constraint.
    Fixed,
    /// Excluded from consideration. Initial state of an unfilled phase.
    #[default]
    Suspended,
}

impl PhaseStatus {
    /// Whether phases in this state count towards system-level quantities.
    pub fn is_stable(self) -> bool {
        matches!(self, PhaseStatus::Entered | PhaseStatus::Fixed)
    }
}
