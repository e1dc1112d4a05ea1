//! Test fixtures shared by unit tests.
//!
//! Builders for bundles and manifests, a `.tar.gz` writer, and an in-memory
//! [`Fetcher`] so that the orchestrator can be exercised without a network.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use indicatif::ProgressBar;

use crate::error::{self, Result};
use crate::fetch::checksum::sha256_hex;
use crate::fetch::{FetchedDocument, Fetcher};
use crate::manifest::{Archive, Bundle, Checksum, HostOs, Manifest, Stability};

/// Bundle without archives
pub fn bundle(name: &str, revision: u32, stability: Stability) -> Bundle {
    Bundle::new(name, revision, stability)
}

/// Bundle with a single `all` archive whose size and digest match `bytes`
pub fn bundle_with_archive(name: &str, revision: u32, url: &str, bytes: &[u8]) -> Bundle {
    let mut bundle = Bundle::new(name, revision, Stability::Stable);
    bundle.archives.push(Archive {
        host_os: HostOs::All,
        url: url.to_string(),
        size: bytes.len() as u64,
        checksum: Checksum::Sha256(sha256_hex(bytes)),
    });
    bundle
}

/// Manifest holding the given bundles
pub fn manifest(bundles: &[Bundle]) -> Manifest {
    let mut manifest = Manifest::new();
    manifest.bundles = bundles.to_vec();
    manifest
}

/// Serialized manifest holding the given bundles
pub fn manifest_json(bundles: &[Bundle]) -> Vec<u8> {
    manifest(bundles).to_json().unwrap().into_bytes()
}

/// Build a gzip-compressed tarball from `(path, contents)` pairs
pub fn tar_gz(entries: &[(&str, &str)]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for (path, contents) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, path, contents.as_bytes())
            .unwrap();
    }

    builder.into_inner().unwrap().finish().unwrap()
}

/// In-memory fetcher keyed by URL; unknown URLs fail like a network error
#[derive(Default)]
pub struct MemoryFetcher {
    documents: HashMap<String, Vec<u8>>,
    requests: RefCell<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `bytes` at `url`
    pub fn with(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.documents.insert(url.to_string(), bytes);
        self
    }

    /// URLs requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    fn lookup(&self, url: &str) -> Result<&Vec<u8>> {
        self.requests.borrow_mut().push(url.to_string());
        self.documents
            .get(url)
            .ok_or_else(|| error::fetch::failed(url, "HTTP 404 Not Found"))
    }
}

impl Fetcher for MemoryFetcher {
    fn fetch_document(&self, url: &str) -> Result<FetchedDocument> {
        Ok(FetchedDocument::new(self.lookup(url)?.clone()))
    }

    fn download(&self, url: &str, dest: &Path, _progress: Option<&ProgressBar>) -> Result<u64> {
        let bytes = self.lookup(url)?;
        std::fs::write(dest, bytes).map_err(|e| error::fs::write_failed(dest, e))?;
        Ok(bytes.len() as u64)
    }
}
