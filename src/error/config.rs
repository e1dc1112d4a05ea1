//! Configuration errors

use super::SdkError;

/// Creates a config parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> SdkError {
    SdkError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a duplicate source error
pub fn source_exists(url: impl Into<String>) -> SdkError {
    SdkError::SourceAlreadyExists { url: url.into() }
}

/// Creates a source not found error
pub fn source_not_found(url: impl Into<String>) -> SdkError {
    SdkError::SourceNotFound { url: url.into() }
}

/// Creates an invalid source URL error
pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> SdkError {
    SdkError::InvalidSourceUrl {
        url: url.into(),
        reason: reason.into(),
    }
}
