//! `Bundle` and `Archive` structs for manifests
//!
//! A bundle is a named, independently versioned SDK component.

use serde::{Deserialize, Serialize};

use crate::manifest::serialization::{version_string, yes_no};

/// Release channel of a bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stability {
    Obsolete,
    PostStable,
    Stable,
    Beta,
    Dev,
    Canary,
}

impl Stability {
    pub fn as_str(self) -> &'static str {
        match self {
            Stability::Obsolete => "obsolete",
            Stability::PostStable => "post_stable",
            Stability::Stable => "stable",
            Stability::Beta => "beta",
            Stability::Dev => "dev",
            Stability::Canary => "canary",
        }
    }
}

/// Host operating system an archive targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostOs {
    All,
    Linux,
    Mac,
    Win,
}

impl HostOs {
    /// Host OS of the running process
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            HostOs::Win
        } else if cfg!(target_os = "macos") {
            HostOs::Mac
        } else {
            HostOs::Linux
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HostOs::All => "all",
            HostOs::Linux => "linux",
            HostOs::Mac => "mac",
            HostOs::Win => "win",
        }
    }
}

/// Expected digest of an archive, keyed by algorithm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Checksum {
    Sha256(String),
    Blake3(String),
}

/// A downloadable archive of a bundle for one host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Archive {
    pub host_os: HostOs,
    pub url: String,
    /// Archive size in bytes
    pub size: u64,
    pub checksum: Checksum,
}

/// A bundle entry in a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    /// Bundle name, unique within a manifest
    pub name: String,

    /// Human readable version
    #[serde(deserialize_with = "version_string::deserialize")]
    pub version: String,

    /// Monotonic build number; a higher remote revision means an update is available
    pub revision: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub stability: Stability,

    /// Whether the bundle is installed when no names are given
    #[serde(with = "yes_no", default)]
    pub recommended: bool,

    #[serde(default)]
    pub archives: Vec<Archive>,

    /// Subdirectory of the unpacked archive that becomes the bundle directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repath: Option<String>,
}

impl Bundle {
    /// Create a bundle without archives
    #[allow(dead_code)] // Used in tests
    pub fn new(name: impl Into<String>, revision: u32, stability: Stability) -> Self {
        Self {
            name: name.into(),
            version: revision.to_string(),
            revision,
            description: None,
            stability,
            recommended: false,
            archives: Vec::new(),
            repath: None,
        }
    }

    /// Pick the archive for a host, preferring an exact match over `all`
    pub fn archive_for_host(&self, host: HostOs) -> Option<&Archive> {
        self.archives
            .iter()
            .find(|a| a.host_os == host)
            .or_else(|| self.archives.iter().find(|a| a.host_os == HostOs::All))
    }
}
