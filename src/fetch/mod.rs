//! Fetching manifests and archives
//!
//! [`Fetcher`] is the seam between the updater and the network. The
//! orchestrator only ever talks to this trait, so tests can substitute an
//! in-memory implementation.

pub mod checksum;
pub mod http;
pub mod remote;

use std::path::Path;

use indicatif::ProgressBar;

use crate::error::Result;

pub use http::HttpFetcher;
pub use remote::load_combined_remote_manifest;

/// A document retrieved in full, with the digest computed while reading it
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub bytes: Vec<u8>,
    pub sha256: String,
}

impl FetchedDocument {
    pub fn new(bytes: Vec<u8>) -> Self {
        let sha256 = checksum::sha256_hex(&bytes);
        Self { bytes, sha256 }
    }
}

/// Retrieves manifest documents and bundle archives
pub trait Fetcher {
    /// Fetch a small document (a manifest) into memory
    fn fetch_document(&self, url: &str) -> Result<FetchedDocument>;

    /// Stream a URL to `dest`, returning the number of bytes written
    fn download(&self, url: &str, dest: &Path, progress: Option<&ProgressBar>) -> Result<u64>;
}
