use thiserror::Error;

/// Fatal failures of the search pipeline. Non-fatal conditions
/// (unparseable timestamps, the empty-page safety stop) are logged
/// where they occur and never surface here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("missing configuration: {0}")]
    Config(String),

    #[error("upstream search error status={status}, body={body}")]
    Upstream { status: u16, body: String },

    #[error("failed to reach upstream at {url}: {message}")]
    Transport { url: String, message: String },

    #[error("failed to decode upstream response: {0}")]
    Deserialization(#[from] serde_json::Error),
}

impl PipelineError {
    /// Distinguishes deployment problems from upstream faults; config
    /// errors are the operator's to fix, not the vendor's.
    pub fn is_config(&self) -> bool {
        matches!(self, PipelineError::Config(_))
    }
}
