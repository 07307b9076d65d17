//! Central error type for the ingestion service.
//!
//! [`IngestError`] covers the full taxonomy: tag validation failures
//! (rejected before any network call), upstream API failures (always
//! converted to a value at the gateway boundary), stage-local missing
//! keys, and storage faults. No variant is ever allowed to escape the
//! ingestion pipeline as a panic.

/// Service-wide error enum.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The supplied player tag failed the shape check. Raised before
    /// any network call is made.
    #[error("invalid player tag: {0}")]
    InvalidTag(String),

    /// The upstream API call failed: network error, non-success HTTP
    /// status, or a body that did not parse as JSON.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// An expected key was absent from an otherwise well-formed
    /// response (e.g. a player payload without a `tag` field).
    #[error("not found: {0}")]
    NotFound(String),

    /// Persistence layer failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Anything else; caught at the pipeline's outermost boundary.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for IngestError {
    fn from(err: reqwest::Error) -> Self {
        Self::Upstream(err.to_string())
    }
}

impl From<sqlx::Error> for IngestError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
