//! eq-results: serializable summaries of equilibrium results.

pub mod hash;
pub mod summary;
pub mod types;

pub use hash::compute_summary_id;
pub use summary::summarize;
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Pretty JSON form of a summary.
pub fn to_json_pretty(summary: &EquilibriumSummary) -> ResultsResult<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

/// Parse a summary back from JSON.
pub fn from_json(json: &str) -> ResultsResult<EquilibriumSummary> {
    Ok(serde_json::from_str(json)?)
}
