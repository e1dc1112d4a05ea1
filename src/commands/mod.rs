//! Command implementations for sdkup CLI
//!
//! Every command receives a [`CommandContext`] built once from the global
//! flags. Commands that change installed bundles run their batch inside
//! [`SdkWorkspace::mutate`](crate::workspace::SdkWorkspace::mutate) so the
//! local manifest is written even when a bundle fails.

pub mod helpers;
pub mod info;
pub mod list;
pub mod reinstall;
pub mod self_update;
pub mod sources;
pub mod uninstall;
pub mod update;
pub mod version;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::Result;
use crate::fetch::{Fetcher, load_combined_remote_manifest};
use crate::manifest::Manifest;
use crate::paths::SdkPaths;

/// Settings shared by all commands
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub paths: SdkPaths,
    /// Default manifest source, merged before any configured source
    pub manifest_url: String,
}

impl CommandContext {
    /// Resolve the context from the parsed command line
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        Ok(Self {
            paths: SdkPaths::resolve(cli.sdk_root.clone())?,
            manifest_url: cli.manifest_url.clone(),
        })
    }

    /// Load the user config, warning about and ignoring a broken file
    pub fn config(&self) -> Config {
        Config::load(&self.paths.config_file())
    }

    /// Fetch and merge the default manifest and every configured source
    pub fn remote_manifest(&self, fetcher: &dyn Fetcher) -> Result<Manifest> {
        load_combined_remote_manifest(fetcher, &self.manifest_url, &self.config())
    }
}
