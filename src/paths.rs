//! SDK path layout
//!
//! All on-disk locations are derived from a single [`SdkPaths`] value built at
//! startup and passed to every component that touches the file system.

use std::path::{Component, Path, PathBuf};

use crate::error::{self, Result};

/// Default SDK root directory name under the user's local data directory
const SDK_DIR: &str = "sdkup";

/// User data subdirectory of the SDK root (manifest, config, downloads)
pub const USER_DATA_DIR: &str = "sdk_cache";

/// Local manifest file name inside the user data directory
pub const MANIFEST_FILENAME: &str = "sdk_manifest.json";

/// Config file name inside the user data directory
pub const CONFIG_FILENAME: &str = "sdk_config.json";

/// Prefix of the staging directories created under the SDK root
pub const STAGING_PREFIX: &str = ".sdkup-staging-";

/// Suffix of the directory holding a bundle's previous contents during a swap
pub const BACKUP_SUFFIX: &str = ".sdkup-old";

/// Environment variable overriding the SDK root
pub const SDK_ROOT_ENV: &str = "SDKUP_SDK_ROOT";

/// Resolved SDK directory layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkPaths {
    /// Directory bundles are installed into, one subdirectory per bundle
    pub sdk_root: PathBuf,
    /// Directory holding the local manifest, config and downloaded archives
    pub data_dir: PathBuf,
}

impl SdkPaths {
    /// Build the layout for an SDK root
    pub fn new(sdk_root: impl Into<PathBuf>) -> Self {
        let sdk_root = sdk_root.into();
        let data_dir = sdk_root.join(USER_DATA_DIR);
        Self { sdk_root, data_dir }
    }

    /// Resolve the layout from an explicit root, falling back to the platform default
    ///
    /// The CLI maps both `--sdk-root` and `SDKUP_SDK_ROOT` onto `explicit`.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self> {
        if let Some(root) = explicit {
            return Ok(Self::new(root));
        }

        let base = dirs::data_local_dir()
            .ok_or_else(|| error::fs::io_error("Could not determine local data directory"))?;

        Ok(Self::new(base.join(SDK_DIR)))
    }

    /// Path of the local manifest file
    pub fn manifest_file(&self) -> PathBuf {
        self.data_dir.join(MANIFEST_FILENAME)
    }

    /// Path of the config file
    pub fn config_file(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILENAME)
    }

    /// Install directory of a bundle
    pub fn bundle_dir(&self, bundle_name: &str) -> PathBuf {
        self.sdk_root.join(bundle_name)
    }

    /// Download location of a bundle's archive
    ///
    /// Named after the bundle, never after the archive URL, so a manifest
    /// cannot point the download at the local manifest or config.
    pub fn archive_download_path(&self, bundle_name: &str) -> PathBuf {
        self.data_dir.join(format!("{bundle_name}.tar.gz"))
    }
}

/// Check that a bundle name can be used as a directory under the SDK root
///
/// The name must be a single plain path component and must not collide with
/// the data directory or the staging and backup directories.
pub fn check_bundle_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    let plain = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\']);
    if !plain {
        return Err(error::bundle::invalid_name(
            name,
            "must be a single directory name",
        ));
    }

    if name.eq_ignore_ascii_case(USER_DATA_DIR)
        || name.starts_with(STAGING_PREFIX)
        || name.ends_with(BACKUP_SUFFIX)
    {
        return Err(error::bundle::invalid_name(name, "name is reserved"));
    }
    Ok(())
}

/// Create a directory and its parents, mapping failures to `DirCreateFailed`
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| error::fs::dir_create_failed(path, e))
}
