use thiserror::Error;

/// What went wrong while pulling telemetry or refreshing the listing cache.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The external command or HTTP call failed, returned a non-success
    /// status, or timed out.
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    /// The response body was not the expected JSON shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// The batch decoded cleanly but held zero matching records.
    #[error("no matching records in batch")]
    EmptyBatch,
}

impl FetchError {
    pub fn unavailable(err: impl std::fmt::Display) -> Self {
        Self::SourceUnavailable(err.to_string())
    }

    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }
}
