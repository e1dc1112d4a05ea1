//! Local SDK state
//!
//! [`SdkWorkspace`] owns the local manifest for the duration of a command. It
//! is the only writer of `sdk_manifest.json`.
//!
//! ## Layout
//!
//! ```text
//! <sdk_root>/
//! ├── sdk_cache/
//! │   ├── sdk_manifest.json   # Installed bundles
//! │   ├── sdk_config.json     # Extra manifest sources
//! │   └── *.tar.gz            # Archives being installed
//! ├── sdk_tools/              # One directory per installed bundle
//! └── pepper_30/
//! ```


use std::fs;
use std::io::{ErrorKind, Write};

use tracing::{debug, error};

use crate::error::{self, Result};
use crate::manifest::Manifest;
use crate::paths::{SdkPaths, ensure_dir};

/// The local manifest together with where it lives
#[derive(Debug)]
pub struct SdkWorkspace {
    pub paths: SdkPaths,
    pub manifest: Manifest,
}

impl SdkWorkspace {
    /// Load the local manifest
    ///
    /// A missing file is an empty manifest. A file that cannot be parsed is an
    /// error, since writing over it would lose the record of what is installed.
    pub fn open(paths: SdkPaths) -> Result<Self> {
        let path = paths.manifest_file();

        let manifest = match fs::read(&path) {
            Ok(bytes) => Manifest::from_bytes(&bytes, &path.display().to_string())?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No local manifest at {}, starting empty", path.display());
                Manifest::new()
            }
            Err(e) => return Err(error::fs::read_failed(&path, e)),
        };

        Ok(Self { paths, manifest })
    }

    /// Write the local manifest atomically
    ///
    /// The document is written to a temporary file in the same directory and
    /// renamed over the old one, so readers never see a partial file.
    pub fn save(&self) -> Result<()> {
        let path = self.paths.manifest_file();
        ensure_dir(&self.paths.data_dir)?;

        let json = self.manifest.to_json()?;
        let mut file = tempfile::NamedTempFile::new_in(&self.paths.data_dir)
            .map_err(|e| error::fs::write_failed(&path, e))?;
        file.write_all(json.as_bytes())
            .map_err(|e| error::fs::write_failed(&path, e))?;
        file.persist(&path)
            .map_err(|e| error::fs::write_failed(&path, e.error))?;

        debug!(
            "Saved {} bundle(s) to {}",
            self.manifest.bundles.len(),
            path.display()
        );
        Ok(())
    }

    /// Run `f` against the local manifest, then save it no matter what
    ///
    /// If `f` fails its error is returned, and a save failure is only logged.
    /// If `f` succeeds, a save failure is the result.
    pub fn mutate<T>(&mut self, f: impl FnOnce(&mut Manifest) -> Result<T>) -> Result<T> {
        let result = f(&mut self.manifest);
        let saved = self.save();

        match (result, saved) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(save_err)) => Err(save_err),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(save_err)) => {
                error!("Failed to save local manifest: {}", save_err);
                Err(e)
            }
        }
    }
}
