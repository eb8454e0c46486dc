use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong between issuing a sort request and holding a
/// decoded timeline.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("sorting service returned {0}")]
    Status(StatusCode),
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("step {step} has {got} values, expected {expected}")]
    Malformed {
        step: usize,
        got: usize,
        expected: usize,
    },
}
