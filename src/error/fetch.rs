//! Network and verification errors

use super::SdkError;

/// Creates a fetch failed error
pub fn failed(url: impl Into<String>, reason: impl ToString) -> SdkError {
    SdkError::FetchFailed {
        url: url.into(),
        reason: reason.to_string(),
    }
}

/// Creates a checksum mismatch error
pub fn checksum_mismatch(
    path: impl Into<String>,
    expected: impl Into<String>,
    actual: impl Into<String>,
) -> SdkError {
    SdkError::ChecksumMismatch {
        path: path.into(),
        expected: expected.into(),
        actual: actual.into(),
    }
}

/// Creates a size mismatch error
pub fn size_mismatch(path: impl Into<String>, expected: u64, actual: u64) -> SdkError {
    SdkError::SizeMismatch {
        path: path.into(),
        expected,
        actual,
    }
}
