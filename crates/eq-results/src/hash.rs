//! Content-based hashing for summary IDs.

use sha2::{Digest, Sha256};

use crate::types::{EquilibriumSummary, SummaryId};

/// SHA-256 over the JSON form of the summary, excluding wall clock time so
/// that re-running the same calculation gives the same ID.
pub fn compute_summary_id(summary: &EquilibriumSummary) -> SummaryId {
    let mut hasher = Sha256::new();

    let content = EquilibriumSummary {
        walltime_s: 0.0,
        ..summary.clone()
    };
    let json = serde_json::to_string(&content).unwrap_or_default();
    hasher.update(json.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}
