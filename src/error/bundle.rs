//! Per-bundle errors

use super::SdkError;

/// Creates an unknown bundle error
pub fn unknown(name: impl Into<String>) -> SdkError {
    SdkError::UnknownBundle { name: name.into() }
}

/// Creates an invalid bundle name error
pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> SdkError {
    SdkError::InvalidBundleName {
        name: name.into(),
        reason: reason.into(),
    }
}

/// Creates a not installed error
pub fn not_installed(name: impl Into<String>) -> SdkError {
    SdkError::NotInstalled { name: name.into() }
}

/// Creates a missing host archive error
pub fn no_archive_for_host(name: impl Into<String>, host: impl Into<String>) -> SdkError {
    SdkError::NoArchiveForHost {
        name: name.into(),
        host: host.into(),
    }
}

/// Creates an unpack failed error
pub fn unpack_failed(name: impl Into<String>, reason: impl ToString) -> SdkError {
    SdkError::UnpackFailed {
        name: name.into(),
        reason: reason.to_string(),
    }
}

/// Creates a remove failed error
pub fn remove_failed(name: impl Into<String>, reason: impl ToString) -> SdkError {
    SdkError::RemoveFailed {
        name: name.into(),
        reason: reason.to_string(),
    }
}
