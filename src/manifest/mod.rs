//! Bundle manifests
//!
//! A manifest is an ordered list of bundles plus a format version. The same
//! type describes both the merged remote view and the local installed state.

pub mod bundle;
pub mod serialization;


use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{self, Result, SdkError};
use crate::paths::check_bundle_name;

pub use bundle::{Archive, Bundle, Checksum, HostOs};
#[cfg(test)]
pub use bundle::Stability;

/// The only manifest format version this updater reads and writes
pub const MANIFEST_VERSION: u32 = 2;

/// Special bundle name expanding to every recommended bundle
pub const RECOMMENDED: &str = "recommended";

/// Bundle holding the updater itself
pub const SDK_TOOLS: &str = "sdk_tools";

/// Bundle manifest document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub manifest_version: u32,
    #[serde(default)]
    pub bundles: Vec<Bundle>,
}

#[derive(Deserialize)]
struct VersionProbe {
    manifest_version: u32,
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new()
    }
}

impl Manifest {
    /// Create an empty manifest
    pub fn new() -> Self {
        Self {
            manifest_version: MANIFEST_VERSION,
            bundles: Vec::new(),
        }
    }

    /// Parse a manifest document
    ///
    /// `origin` names the file or URL in error messages. The version is checked
    /// before the body so that newer layouts report a version error, not a
    /// field error.
    pub fn from_bytes(bytes: &[u8], origin: &str) -> Result<Self> {
        let probe: VersionProbe = serde_json::from_slice(bytes)
            .map_err(|e| error::manifest::parse_failed(origin, e))?;
        if probe.manifest_version != MANIFEST_VERSION {
            return Err(SdkError::UnsupportedManifestVersion {
                found: probe.manifest_version,
                expected: MANIFEST_VERSION,
            });
        }

        let manifest: Self = serde_json::from_slice(bytes)
            .map_err(|e| error::manifest::parse_failed(origin, e))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Serialize to canonical pretty-printed JSON with a trailing newline
    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)
            .map_err(|e| error::fs::serialize_failed("manifest", e))?;
        json.push('\n');
        Ok(json)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for bundle in &self.bundles {
            if bundle.name.trim().is_empty() {
                return Err(error::manifest::invalid("bundle with empty name"));
            }
            check_bundle_name(&bundle.name)?;
            if !seen.insert(bundle.name.as_str()) {
                return Err(error::manifest::invalid(format!(
                    "duplicate bundle '{}'",
                    bundle.name
                )));
            }
        }
        Ok(())
    }

    /// Merge bundles from `other` whose names are not already present
    ///
    /// Existing entries always win, so callers merge sources in priority order
    /// (default source first). Merging the same manifest twice is a no-op.
    /// Returns the names that were added.
    pub fn merge(&mut self, other: &Manifest) -> Vec<String> {
        let mut added = Vec::new();
        for bundle in &other.bundles {
            if self.find_bundle(&bundle.name).is_none() {
                self.bundles.push(bundle.clone());
                added.push(bundle.name.clone());
            }
        }
        added
    }

    /// Look up a bundle by name
    pub fn find_bundle(&self, name: &str) -> Option<&Bundle> {
        self.bundles.iter().find(|b| b.name == name)
    }

    /// Look up a bundle by name, failing with `UnknownBundle`
    pub fn get_bundle(&self, name: &str) -> Result<&Bundle> {
        self.find_bundle(name)
            .ok_or_else(|| error::bundle::unknown(name))
    }

    /// Names of bundles flagged recommended, in manifest order
    pub fn recommended_names(&self) -> Vec<String> {
        self.bundles
            .iter()
            .filter(|b| b.recommended)
            .map(|b| b.name.clone())
            .collect()
    }

    /// Insert a bundle, replacing an entry of the same name in place
    pub fn set_bundle(&mut self, bundle: Bundle) {
        match self.bundles.iter_mut().find(|b| b.name == bundle.name) {
            Some(existing) => *existing = bundle,
            None => self.bundles.push(bundle),
        }
    }

    /// Remove a bundle by name
    pub fn remove_bundle(&mut self, name: &str) -> Option<Bundle> {
        let pos = self.bundles.iter().position(|b| b.name == name)?;
        Some(self.bundles.remove(pos))
    }
}
