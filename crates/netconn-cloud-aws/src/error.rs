//! EC2 SDK error conversion

use aws_sdk_ec2::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use netconn_cloud::CloudError;

/// Convert an SDK failure into [`CloudError::ApiError`], keeping the
/// provider's code and message intact.
pub(crate) fn api_error<E, R>(err: SdkError<E, R>) -> CloudError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = match (err.code(), err.message()) {
        (Some(code), Some(message)) => format!("{}: {}", code, message),
        (None, Some(message)) => message.to_string(),
        _ => DisplayErrorContext(&err).to_string(),
    };
    CloudError::ApiError(message)
}

pub(crate) fn missing(what: &str) -> CloudError {
    CloudError::MissingResource(what.to_string())
}
