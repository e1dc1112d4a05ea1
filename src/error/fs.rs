//! File system errors

use std::path::Path;

use super::SdkError;

/// Creates a file read failed error
pub fn read_failed(path: &Path, reason: impl ToString) -> SdkError {
    SdkError::FileReadFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates a file write failed error
pub fn write_failed(path: &Path, reason: impl ToString) -> SdkError {
    SdkError::FileWriteFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates a directory creation failed error
pub fn dir_create_failed(path: &Path, reason: impl ToString) -> SdkError {
    SdkError::DirCreateFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates a serialization failed error
pub fn serialize_failed(what: impl Into<String>, reason: impl ToString) -> SdkError {
    SdkError::SerializeFailed {
        what: what.into(),
        reason: reason.to_string(),
    }
}

/// Creates an IO error
pub fn io_error(message: impl Into<String>) -> SdkError {
    SdkError::IoError {
        message: message.into(),
    }
}
