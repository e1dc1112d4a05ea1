//! Error types and handling for sdkup
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`manifest`]: Manifest document errors
//! - [`config`]: Configuration and source list errors
//! - [`fetch`]: Network and verification errors
//! - [`bundle`]: Per-bundle errors
//! - [`fs`]: File system errors

pub mod bundle;
pub mod config;
pub mod fetch;
pub mod fs;
pub mod manifest;


use miette::Diagnostic;
use thiserror::Error;

/// Main error type for sdkup operations
#[derive(Error, Diagnostic, Debug)]
pub enum SdkError {
    // Manifest errors
    #[error("Failed to parse manifest from {origin}: {reason}")]
    #[diagnostic(code(sdkup::manifest::parse_failed))]
    ManifestParseFailed { origin: String, reason: String },

    #[error("Unsupported manifest version {found} (expected {expected})")]
    #[diagnostic(
        code(sdkup::manifest::unsupported_version),
        help("This manifest was produced for a different version of the updater")
    )]
    UnsupportedManifestVersion { found: u32, expected: u32 },

    #[error("Invalid manifest: {message}")]
    #[diagnostic(code(sdkup::manifest::invalid))]
    InvalidManifest { message: String },

    // Configuration errors
    #[error("Failed to parse configuration file {path}: {reason}")]
    #[diagnostic(code(sdkup::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Source already exists: {url}")]
    #[diagnostic(code(sdkup::config::source_exists))]
    SourceAlreadyExists { url: String },

    #[error("Source not found: {url}")]
    #[diagnostic(
        code(sdkup::config::source_not_found),
        help("Run 'sdkup sources --list' to see the registered sources")
    )]
    SourceNotFound { url: String },

    #[error("Invalid source URL '{url}': {reason}")]
    #[diagnostic(code(sdkup::config::invalid_url))]
    InvalidSourceUrl { url: String, reason: String },

    // Fetch errors
    #[error("Unable to fetch {url}: {reason}")]
    #[diagnostic(
        code(sdkup::fetch::failed),
        help("Check your network connection and the manifest URL")
    )]
    FetchFailed { url: String, reason: String },

    #[error("Checksum mismatch for {path}: expected {expected}, got {actual}")]
    #[diagnostic(code(sdkup::fetch::checksum_mismatch))]
    ChecksumMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("Size mismatch for {path}: expected {expected} bytes, got {actual}")]
    #[diagnostic(code(sdkup::fetch::size_mismatch))]
    SizeMismatch {
        path: String,
        expected: u64,
        actual: u64,
    },

    // Bundle errors
    #[error("Unknown bundle '{name}'")]
    #[diagnostic(
        code(sdkup::bundle::unknown),
        help("Run 'sdkup list' to see the available bundles")
    )]
    UnknownBundle { name: String },

    #[error("Invalid bundle name '{name}': {reason}")]
    #[diagnostic(code(sdkup::bundle::invalid_name))]
    InvalidBundleName { name: String, reason: String },

    #[error("Bundle '{name}' is not installed")]
    #[diagnostic(code(sdkup::bundle::not_installed))]
    NotInstalled { name: String },

    #[error("Bundle '{name}' has no archive for host '{host}'")]
    #[diagnostic(code(sdkup::bundle::no_archive))]
    NoArchiveForHost { name: String, host: String },

    #[error("Failed to unpack bundle '{name}': {reason}")]
    #[diagnostic(code(sdkup::bundle::unpack_failed))]
    UnpackFailed { name: String, reason: String },

    #[error("Failed to remove bundle '{name}': {reason}")]
    #[diagnostic(code(sdkup::bundle::remove_failed))]
    RemoveFailed { name: String, reason: String },

    #[error("{} bundle(s) failed: {}", names.len(), names.join(", "))]
    #[diagnostic(
        code(sdkup::bundle::batch_failed),
        help("Re-run with -v for details on each failure")
    )]
    BundlesFailed { names: Vec<String> },

    // File system errors
    #[error("Failed to read file {path}: {reason}")]
    #[diagnostic(code(sdkup::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file {path}: {reason}")]
    #[diagnostic(code(sdkup::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("Unable to create directory {path}: {reason}")]
    #[diagnostic(code(sdkup::fs::dir_create_failed))]
    DirCreateFailed { path: String, reason: String },

    #[error("Failed to serialize {what}: {reason}")]
    #[diagnostic(code(sdkup::fs::serialize_failed))]
    SerializeFailed { what: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(sdkup::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for SdkError {
    fn from(err: std::io::Error) -> Self {
        SdkError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, SdkError>;
