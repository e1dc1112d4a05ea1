//! Manifest document errors

use super::SdkError;

/// Creates a manifest parse failed error
pub fn parse_failed(origin: impl Into<String>, reason: impl ToString) -> SdkError {
    SdkError::ManifestParseFailed {
        origin: origin.into(),
        reason: reason.to_string(),
    }
}

/// Creates an invalid manifest error
pub fn invalid(message: impl Into<String>) -> SdkError {
    SdkError::InvalidManifest {
        message: message.into(),
    }
}
