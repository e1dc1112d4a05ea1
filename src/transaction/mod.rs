//! Transactional replacement of a bundle directory
//!
//! A bundle is installed by unpacking it into a staging directory and then
//! swapping the staging directory into place. The previous contents are moved
//! aside first and restored if the swap is not committed, so a failure never
//! leaves a half-written bundle behind.
//!
//! ## Usage
//!
//! ```ignore
//! let mut swap = DirectorySwap::begin(&paths.bundle_dir("pepper_30"))?;
//! swap.install_from(&staged_dir)?;
//!
//! // On success:
//! swap.commit();
//!
//! // On error (automatic via Drop if not committed):
//! // the previous directory is restored
//! ```


use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{self, Result};
use crate::paths::BACKUP_SUFFIX;

/// A pending replacement of one directory
#[derive(Debug)]
pub struct DirectorySwap {
    /// Directory being replaced
    target: PathBuf,

    /// Where the previous contents were moved, if there were any
    backup: Option<PathBuf>,

    /// Whether new contents have been moved into `target`
    installed: bool,

    /// Whether the swap has been committed
    committed: bool,
}

fn backup_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(BACKUP_SUFFIX);
    target.with_file_name(name)
}

impl DirectorySwap {
    /// Move the current contents of `target` aside
    pub fn begin(target: &Path) -> Result<Self> {
        let mut swap = Self {
            target: target.to_path_buf(),
            backup: None,
            installed: false,
            committed: false,
        };

        if target.exists() {
            let backup = backup_path(target);
            if backup.exists() {
                debug!("Removing stale backup {}", backup.display());
                fs::remove_dir_all(&backup).map_err(|e| error::fs::write_failed(&backup, e))?;
            }
            fs::rename(target, &backup).map_err(|e| error::fs::write_failed(target, e))?;
            swap.backup = Some(backup);
        }

        Ok(swap)
    }

    /// Move a staged directory into the target location
    pub fn install_from(&mut self, staged: &Path) -> Result<()> {
        fs::rename(staged, &self.target).map_err(|e| error::fs::write_failed(&self.target, e))?;
        self.installed = true;
        Ok(())
    }

    /// Keep the new contents and discard the previous ones
    pub fn commit(mut self) {
        self.committed = true;
        if let Some(backup) = self.backup.take() {
            if let Err(e) = fs::remove_dir_all(&backup) {
                warn!("Failed to remove {}: {}", backup.display(), e);
            }
        }
    }

    /// Restore the previous contents
    pub fn rollback(&mut self) -> Result<()> {
        if self.committed {
            return Ok(());
        }

        if self.installed && self.target.exists() {
            fs::remove_dir_all(&self.target)
                .map_err(|e| error::fs::write_failed(&self.target, e))?;
            self.installed = false;
        }

        if let Some(backup) = self.backup.take() {
            fs::rename(&backup, &self.target)
                .map_err(|e| error::fs::write_failed(&self.target, e))?;
            debug!("Restored {}", self.target.display());
        }

        Ok(())
    }
}

impl Drop for DirectorySwap {
    fn drop(&mut self) {
        if !self.committed {
            if let Err(e) = self.rollback() {
                warn!("Rollback of {} failed: {}", self.target.display(), e);
            }
        }
    }
}
