//! Common test utilities for sdkup integration tests
//!
//! Every test gets its own SDK root and a "server" directory whose files are
//! published through `file://` URLs, so no network access is needed.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use tempfile::TempDir;

/// Default manifest file name on the test server
pub const DEFAULT_MANIFEST: &str = "manifest.json";

/// An isolated SDK root plus a directory serving manifests and archives
pub struct TestWorkspace {
    /// Temporary directory
    pub temp: TempDir,
    /// SDK root passed to sdkup
    pub sdk_root: PathBuf,
    /// Directory standing in for the download server
    pub server: PathBuf,
}

impl TestWorkspace {
    /// Create a new test workspace
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let sdk_root = temp.path().join("sdk");
        let server = temp.path().join("server");
        std::fs::create_dir_all(&server).expect("Failed to create server directory");
        Self {
            temp,
            sdk_root,
            server,
        }
    }

    /// `file://` URL of a file on the test server
    pub fn url(&self, file_name: &str) -> String {
        file_url(&self.server.join(file_name))
    }

    /// URL of the default manifest
    pub fn manifest_url(&self) -> String {
        self.url(DEFAULT_MANIFEST)
    }

    /// Write a `.tar.gz` to the server and return its manifest archive entry
    pub fn publish_archive(&self, file_name: &str, entries: &[(&str, &str)]) -> Value {
        let bytes = tar_gz(entries);
        std::fs::write(self.server.join(file_name), &bytes).expect("Failed to write archive");
        json!({
            "host_os": "all",
            "url": self.url(file_name),
            "size": bytes.len(),
            "checksum": { "sha256": hex::encode(Sha256::digest(&bytes)) }
        })
    }

    /// Publish a bundle whose archive holds a single VERSION file
    pub fn publish_bundle(&self, name: &str, revision: u32, recommended: bool) -> Value {
        let archive = self.publish_archive(
            &format!("{}_r{}.tar.gz", name, revision),
            &[("VERSION", &revision.to_string())],
        );
        bundle_json(name, revision, recommended, vec![archive])
    }

    /// Write a manifest document to the server and return its URL
    pub fn write_manifest(&self, file_name: &str, bundles: Vec<Value>) -> String {
        let manifest = json!({ "manifest_version": 2, "bundles": bundles });
        std::fs::write(
            self.server.join(file_name),
            serde_json::to_string_pretty(&manifest).expect("Failed to encode manifest"),
        )
        .expect("Failed to write manifest");
        self.url(file_name)
    }

    /// Write the default manifest
    pub fn write_default_manifest(&self, bundles: Vec<Value>) -> String {
        self.write_manifest(DEFAULT_MANIFEST, bundles)
    }

    /// Path of the local manifest
    pub fn local_manifest_path(&self) -> PathBuf {
        self.sdk_root.join("sdk_cache").join("sdk_manifest.json")
    }

    /// Path of the config file
    pub fn config_path(&self) -> PathBuf {
        self.sdk_root.join("sdk_cache").join("sdk_config.json")
    }

    /// Parsed local manifest
    pub fn local_manifest(&self) -> Value {
        let content =
            std::fs::read_to_string(self.local_manifest_path()).expect("Failed to read manifest");
        serde_json::from_str(&content).expect("Local manifest is not valid JSON")
    }

    /// Revision of a bundle in the local manifest, if present
    pub fn local_revision(&self, name: &str) -> Option<u64> {
        self.local_manifest()["bundles"]
            .as_array()?
            .iter()
            .find(|b| b["name"] == name)
            .and_then(|b| b["revision"].as_u64())
    }

    /// Write a file relative to the SDK root
    pub fn write_sdk_file(&self, path: &str, content: &str) {
        let file_path = self.sdk_root.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file relative to the SDK root
    pub fn read_sdk_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.sdk_root.join(path)).expect("Failed to read file")
    }

    /// Check if a path exists relative to the SDK root
    pub fn sdk_path_exists(&self, path: &str) -> bool {
        self.sdk_root.join(path).exists()
    }

    /// sdkup command isolated to this workspace
    #[allow(deprecated)]
    pub fn sdkup_cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("sdkup").expect("sdkup binary not built");
        cmd.env("SDKUP_SDK_ROOT", &self.sdk_root);
        cmd.env("SDKUP_MANIFEST_URL", self.manifest_url());
        cmd.env_remove("RUST_LOG");
        cmd.env("NO_COLOR", "1");
        cmd
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Manifest entry for a bundle
pub fn bundle_json(name: &str, revision: u32, recommended: bool, archives: Vec<Value>) -> Value {
    json!({
        "name": name,
        "version": revision.to_string(),
        "revision": revision,
        "stability": "stable",
        "recommended": if recommended { "yes" } else { "no" },
        "archives": archives
    })
}

/// `file://` URL for a local path
pub fn file_url(path: &Path) -> String {
    url::Url::from_file_path(path)
        .expect("Path is not absolute")
        .to_string()
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
            .expect("Failed to append tar entry");
    }

    builder
        .into_inner()
        .and_then(|encoder| encoder.finish())
        .expect("Failed to finish archive")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_published_archive_matches_entry() {
        let workspace = TestWorkspace::new();
        let archive = workspace.publish_archive("a.tar.gz", &[("VERSION", "1")]);
        let size = std::fs::metadata(workspace.server.join("a.tar.gz"))
            .unwrap()
            .len();
        assert_eq!(archive["size"].as_u64(), Some(size));
        assert!(archive["url"].as_str().unwrap().starts_with("file://"));
    }
}
