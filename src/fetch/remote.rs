//! Loading and combining remote manifests

use tracing::{debug, info};

use crate::config::Config;
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::manifest::Manifest;

/// Fetch and parse a single remote manifest
pub fn load_remote_manifest(fetcher: &dyn Fetcher, url: &str) -> Result<Manifest> {
    let document = fetcher.fetch_document(url)?;
    Manifest::from_bytes(&document.bytes, url)
}

/// Build the authoritative remote view from every configured source
///
/// Sources are merged in priority order: `default_url` first, then the config
/// sources in the order they were registered. When two sources publish a
/// bundle of the same name, the entry from the earlier source wins. Any fetch
/// or parse failure aborts, since a partial view could hide installed bundles.
pub fn load_combined_remote_manifest(
    fetcher: &dyn Fetcher,
    default_url: &str,
    config: &Config,
) -> Result<Manifest> {
    let mut manifest = load_remote_manifest(fetcher, default_url)?;

    for source in &config.sources {
        let extra = load_remote_manifest(fetcher, source)?;
        let added = manifest.merge(&extra);
        debug!("Source {} contributed {} bundle(s)", source, added.len());
    }

    info!(
        "Remote manifest has {} bundle(s) from {} source(s)",
        manifest.bundles.len(),
        config.sources.len() + 1
    );
    Ok(manifest)
}
