//! Cloud networking error types

use thiserror::Error;

/// Cloud networking errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CloudError {
    /// Failure reported by the provider API. The message is published as-is.
    #[error("{0}")]
    ApiError(String),

    #[error("Provider response is missing {0}")]
    MissingResource(String),

    #[error("{0}")]
    Timeout(String),
}

pub type Result<T> = std::result::Result<T, CloudError>;
