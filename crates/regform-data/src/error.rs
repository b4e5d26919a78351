//! Error types for reference-data loading.

use thiserror::Error;

/// Errors raised by the reference-data loading pipeline.
///
/// Variants carry rendered messages rather than source errors so that a
/// single failure can be cloned out to every caller waiting on the same
/// deduplicated request.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum DataError {
    /// Transport-level failure for one candidate URL.
    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    /// A candidate URL answered with a non-success status.
    #[error("unexpected HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    /// A candidate URL answered, but not with parseable JSON.
    #[error("failed to parse JSON from {url}: {message}")]
    Parse { url: String, message: String },

    /// No URL candidates are registered for the requested dataset.
    #[error("no source registered for dataset '{0}'")]
    UnknownDataset(String),

    /// Every candidate URL failed; the dataset is unavailable.
    #[error("all {attempts} candidate URLs failed for dataset '{name}'")]
    Unavailable { name: String, attempts: usize },

    /// The shared load task died before delivering a result.
    #[error("load task for dataset '{name}' failed: {message}")]
    TaskFailed { name: String, message: String },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

pub type Result<T> = std::result::Result<T, DataError>;
