//! Event processing error types

use netconn_cloud::CloudError;
use thiserror::Error;

/// A request that failed validation. The Display text is what gets published
/// in `error_message`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Datacenter VPC ID invalid")]
    VpcIdInvalid,

    #[error("Datacenter Region invalid")]
    RegionInvalid,

    #[error("Datacenter credentials invalid")]
    CredentialsInvalid,

    #[error("Network subnet invalid")]
    SubnetInvalid,

    #[error("Network aws id invalid")]
    NetworkAwsIdInvalid,
}

/// Errors raised while handling one network event
#[derive(Error, Debug)]
pub enum EventError {
    #[error("Malformed payload: {0}")]
    Decode(#[source] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0} not supported")]
    Unsupported(String),

    #[error("unrecognized action in subject {0}")]
    UnrecognizedAction(String),

    #[error(transparent)]
    Cloud(#[from] CloudError),

    #[error("Failed to encode event: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to publish to {topic}: {message}")]
    Publish { topic: String, message: String },
}

pub type Result<T> = std::result::Result<T, EventError>;
