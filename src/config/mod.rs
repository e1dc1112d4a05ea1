//! User configuration (`sdk_config.json`)
//!
//! Holds the additional manifest sources the user registered with
//! `sdkup sources --add`. Source order is significant: it is the merge
//! priority after the default source.


use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::error::{self, Result};
use crate::paths::ensure_dir;

/// Current config format version
pub const CONFIG_VERSION: u32 = 1;

/// Keyword accepted by [`Config::remove_source`] to drop every source
pub const ALL_SOURCES: &str = "all";

/// Persisted user configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Additional manifest URLs, in registration order
    #[serde(default)]
    pub sources: Vec<String>,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            sources: Vec::new(),
        }
    }
}

impl Config {
    /// Parse a config document
    pub fn from_json(json: &str, origin: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| error::config::parse_failed(origin, e.to_string()))
    }

    /// Serialize to pretty JSON with a trailing newline
    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)
            .map_err(|e| error::fs::serialize_failed("config", e))?;
        json.push('\n');
        Ok(json)
    }

    /// Load the config, falling back to defaults on any error
    ///
    /// A missing file is not an error. Unreadable or malformed files are
    /// logged and ignored so that no command is blocked by a broken config.
    pub fn load(path: &Path) -> Self {
        match Self::load_strict(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{}", e);
                Self::default()
            }
        }
    }

    /// Load the config, propagating read and parse errors
    ///
    /// Used by commands that rewrite the config, so a corrupt file is never
    /// silently replaced by defaults.
    pub fn load_strict(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(path).map_err(|e| error::fs::read_failed(path, e))?;
        Self::from_json(&content, &path.display().to_string())
    }

    /// Write the config, creating its directory if needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| error::fs::write_failed(path, e))
    }

    /// Register an additional source
    ///
    /// Rejects URLs that do not parse as absolute URLs and URLs already present.
    pub fn add_source(&mut self, url: &str) -> Result<()> {
        Url::parse(url).map_err(|e| error::config::invalid_url(url, e.to_string()))?;

        if self.sources.iter().any(|s| s == url) {
            return Err(error::config::source_exists(url));
        }

        self.sources.push(url.to_string());
        Ok(())
    }

    /// Remove a source, or every source when given `"all"`
    ///
    /// Returns the removed URLs.
    pub fn remove_source(&mut self, url: &str) -> Result<Vec<String>> {
        if url == ALL_SOURCES {
            return Ok(std::mem::take(&mut self.sources));
        }

        let pos = self
            .sources
            .iter()
            .position(|s| s == url)
            .ok_or_else(|| error::config::source_not_found(url))?;
        Ok(vec![self.sources.remove(pos)])
    }
}
