//! Bundle installation and removal
//!
//! [`Installer`] executes the plans produced by [`crate::reconcile`]:
//! - Downloading and verifying bundle archives
//! - Unpacking them into place through a [`DirectorySwap`]
//! - Recording every change in the local manifest as soon as it happens
//!
//! ## Bundle lifecycle
//!
//! ```text
//! Pending -> Fetching -> Verifying -> Unpacking -> Installed
//!     \          \            \            \
//!      +----------+------------+------------+---> Failed
//! ```
//!
//! A failed bundle leaves its local manifest entry and its install directory
//! exactly as they were, and the batch carries on with the next bundle.
//!
//! [`Uninstaller`] removes bundles the same way, one at a time, without any
//! network access.

pub mod unpack;

#[cfg(test)]
mod tests;

use std::fmt;
use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{self, Result, SdkError};
use crate::fetch::Fetcher;
use crate::fetch::checksum::verify_archive;
use crate::manifest::{Bundle, HostOs, Manifest};
use crate::paths::{STAGING_PREFIX, SdkPaths, check_bundle_name, ensure_dir};
use crate::progress::ProgressDisplay;
use crate::reconcile::{Planned, ReinstallAction, UpdateAction};
use crate::transaction::DirectorySwap;

/// Stage of a single bundle operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStage {
    Pending,
    Fetching,
    Verifying,
    Unpacking,
    Installed,
    /// Removing an uninstalled bundle's directory
    Removing,
    Failed,
    /// Terminal stage of a bundle that needed no work
    Unchanged,
}

impl InstallStage {
    pub fn as_str(self) -> &'static str {
        match self {
            InstallStage::Pending => "pending",
            InstallStage::Fetching => "fetching",
            InstallStage::Verifying => "verifying",
            InstallStage::Unpacking => "unpacking",
            InstallStage::Installed => "installed",
            InstallStage::Removing => "removing",
            InstallStage::Failed => "failed",
            InstallStage::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for InstallStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to one bundle in a batch
#[derive(Debug)]
pub enum BundleOutcome {
    /// Installed or updated; `from` is the revision that was replaced
    Installed { from: Option<u32>, to: u32 },
    Uninstalled,
    /// Already up to date
    Unchanged { revision: u32 },
    /// Not attempted, e.g. an unknown or not installed bundle
    Skipped(SdkError),
    /// Attempted and failed at `stage`
    Failed { stage: InstallStage, error: SdkError },
}

/// Outcome for one named bundle
#[derive(Debug)]
pub struct BundleReport {
    pub name: String,
    pub outcome: BundleOutcome,
}

/// Per-bundle outcomes of a batch, in processing order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub bundles: Vec<BundleReport>,
}

impl BatchReport {
    fn push(&mut self, name: String, outcome: BundleOutcome) {
        self.bundles.push(BundleReport { name, outcome });
    }

    /// Outcome recorded for `name`
    pub fn outcome(&self, name: &str) -> Option<&BundleOutcome> {
        self.bundles
            .iter()
            .find(|r| r.name == name)
            .map(|r| &r.outcome)
    }

    /// Names of bundles that failed
    pub fn failures(&self) -> Vec<String> {
        self.bundles
            .iter()
            .filter(|r| matches!(r.outcome, BundleOutcome::Failed { .. }))
            .map(|r| r.name.clone())
            .collect()
    }

    /// Turn the report into an error if any bundle failed
    ///
    /// Skipped bundles do not count as failures.
    pub fn into_result(self) -> Result<Self> {
        let names = self.failures();
        if names.is_empty() {
            Ok(self)
        } else {
            Err(SdkError::BundlesFailed { names })
        }
    }
}

fn show_progress(progress: Option<&ProgressDisplay>, name: &str, current: usize, total: usize) {
    if let Some(progress) = progress {
        progress.update_bundle(name, current, total);
    }
}

fn bundle_done(progress: Option<&ProgressDisplay>) {
    if let Some(progress) = progress {
        progress.inc_bundle();
    }
}

fn advance(name: &str, stage: &mut InstallStage, next: InstallStage) {
    debug!("{}: {} -> {}", name, stage, next);
    *stage = next;
}

/// Executes install, reinstall and uninstall plans
pub struct Installer<'a> {
    fetcher: &'a dyn Fetcher,
    paths: &'a SdkPaths,
    host: HostOs,
    progress: Option<&'a ProgressDisplay>,
}

impl<'a> Installer<'a> {
    /// Create an installer for the running host
    pub fn new(fetcher: &'a dyn Fetcher, paths: &'a SdkPaths) -> Self {
        Self {
            fetcher,
            paths,
            host: HostOs::current(),
            progress: None,
        }
    }

    /// Select archives for another host
    #[allow(dead_code)] // Used in tests
    pub fn with_host(mut self, host: HostOs) -> Self {
        self.host = host;
        self
    }

    /// Report progress on the given display
    pub fn with_progress(mut self, progress: &'a ProgressDisplay) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Create the directories every batch writes into
    ///
    /// Failing here is fatal to the batch.
    fn prepare_dirs(&self) -> Result<()> {
        ensure_dir(&self.paths.sdk_root)?;
        ensure_dir(&self.paths.data_dir)
    }

    /// Install or update every bundle in `plan`
    ///
    /// `local` is updated after each bundle that installs successfully.
    pub fn update(
        &self,
        plan: Vec<Planned<UpdateAction>>,
        local: &mut Manifest,
    ) -> Result<BatchReport> {
        self.prepare_dirs()?;
        let total = plan.len();
        let mut report = BatchReport::default();

        for (i, Planned { name, action }) in plan.into_iter().enumerate() {
            show_progress(self.progress, &name, i + 1, total);
            let outcome = match action {
                UpdateAction::UnknownBundle => {
                    BundleOutcome::Skipped(error::bundle::unknown(&name))
                }
                UpdateAction::NoActionNeeded { revision } => {
                    debug!("{}: {} -> {}", name, InstallStage::Pending, InstallStage::Unchanged);
                    BundleOutcome::Unchanged { revision }
                }
                UpdateAction::NeedsInstallOrUpdate {
                    bundle,
                    installed_revision,
                } => self.install(bundle, installed_revision, local),
            };
            bundle_done(self.progress);
            report.push(name, outcome);
        }

        Ok(report)
    }

    /// Fetch and place again the exact bundles recorded locally
    pub fn reinstall(
        &self,
        plan: Vec<Planned<ReinstallAction>>,
        local: &mut Manifest,
    ) -> Result<BatchReport> {
        self.prepare_dirs()?;
        let total = plan.len();
        let mut report = BatchReport::default();

        for (i, Planned { name, action }) in plan.into_iter().enumerate() {
            show_progress(self.progress, &name, i + 1, total);
            let outcome = match action {
                ReinstallAction::NotInstalled => {
                    BundleOutcome::Skipped(error::bundle::not_installed(&name))
                }
                ReinstallAction::Reinstall(bundle) => {
                    let revision = bundle.revision;
                    self.install(bundle, Some(revision), local)
                }
            };
            bundle_done(self.progress);
            report.push(name, outcome);
        }

        Ok(report)
    }

    /// Run one bundle through the pipeline and record the result
    fn install(&self, bundle: Bundle, from: Option<u32>, local: &mut Manifest) -> BundleOutcome {
        let mut stage = InstallStage::Pending;
        match self.run_pipeline(&bundle, &mut stage) {
            Ok(()) => {
                advance(&bundle.name, &mut stage, InstallStage::Installed);
                let to = bundle.revision;
                info!("Installed {} revision {}", bundle.name, to);
                local.set_bundle(bundle);
                BundleOutcome::Installed { from, to }
            }
            Err(error) => {
                let failed_at = stage;
                advance(&bundle.name, &mut stage, InstallStage::Failed);
                warn!("{} failed while {}: {}", bundle.name, failed_at, error);
                BundleOutcome::Failed {
                    stage: failed_at,
                    error,
                }
            }
        }
    }

    fn run_pipeline(&self, bundle: &Bundle, stage: &mut InstallStage) -> Result<()> {
        check_bundle_name(&bundle.name)?;
        advance(&bundle.name, stage, InstallStage::Fetching);
        let archive = bundle
            .archive_for_host(self.host)
            .ok_or_else(|| error::bundle::no_archive_for_host(&bundle.name, self.host.as_str()))?;
        let archive_path = self.paths.archive_download_path(&bundle.name);

        let download_pb = self.progress.map(|p| p.start_download(&bundle.name));
        let downloaded = self
            .fetcher
            .download(&archive.url, &archive_path, download_pb.as_ref());
        if let (Some(progress), Some(pb)) = (self.progress, download_pb.as_ref()) {
            progress.finish_download(pb);
        }
        if let Err(e) = downloaded {
            discard(&archive_path);
            return Err(e);
        }

        advance(&bundle.name, stage, InstallStage::Verifying);
        verify_archive(&archive_path, archive)?;

        advance(&bundle.name, stage, InstallStage::Unpacking);
        let placed = self.place(bundle, &archive_path);
        discard(&archive_path);
        placed
    }

    /// Unpack into a staging directory and swap it into the bundle directory
    fn place(&self, bundle: &Bundle, archive_path: &Path) -> Result<()> {
        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(&self.paths.sdk_root)
            .map_err(|e| error::fs::dir_create_failed(&self.paths.sdk_root, e))?;

        unpack::extract_tar_gz(archive_path, staging.path())
            .map_err(|e| error::bundle::unpack_failed(&bundle.name, e))?;
        let content = unpack::content_root(staging.path(), bundle.repath.as_deref())
            .map_err(|e| error::bundle::unpack_failed(&bundle.name, e))?;

        let mut swap = DirectorySwap::begin(&self.paths.bundle_dir(&bundle.name))?;
        swap.install_from(&content)?;
        swap.commit();
        Ok(())
    }
}

/// Removes installed bundles
///
/// Works from the local manifest alone and never fetches anything.
pub struct Uninstaller<'a> {
    paths: &'a SdkPaths,
    progress: Option<&'a ProgressDisplay>,
}

impl<'a> Uninstaller<'a> {
    pub fn new(paths: &'a SdkPaths) -> Self {
        Self {
            paths,
            progress: None,
        }
    }

    /// Report progress on the given display
    pub fn with_progress(mut self, progress: &'a ProgressDisplay) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Remove installed bundles and their local manifest entries
    pub fn uninstall(&self, names: &[String], local: &mut Manifest) -> Result<BatchReport> {
        let mut report = BatchReport::default();

        for (i, name) in names.iter().enumerate() {
            if report.outcome(name).is_some() {
                continue;
            }
            show_progress(self.progress, name, i + 1, names.len());
            let outcome = if local.find_bundle(name).is_none() {
                BundleOutcome::Skipped(error::bundle::not_installed(name))
            } else {
                match self.remove_bundle_dir(name) {
                    Ok(()) => {
                        local.remove_bundle(name);
                        info!("Uninstalled {}", name);
                        BundleOutcome::Uninstalled
                    }
                    Err(error) => BundleOutcome::Failed {
                        stage: InstallStage::Removing,
                        error,
                    },
                }
            };
            bundle_done(self.progress);
            report.push(name.clone(), outcome);
        }

        Ok(report)
    }

    fn remove_bundle_dir(&self, name: &str) -> Result<()> {
        debug!("{}: {} -> {}", name, InstallStage::Pending, InstallStage::Removing);
        check_bundle_name(name)?;
        let dir = self.paths.bundle_dir(name);
        if dir.exists() {
            fs::remove_dir_all(&dir).map_err(|e| error::bundle::remove_failed(name, e))?;
        } else {
            debug!("{} has no directory at {}", name, dir.display());
        }
        Ok(())
    }
}

/// Remove a downloaded archive that is no longer needed
fn discard(path: &Path) {
    if path.exists() {
        if let Err(e) = fs::remove_file(path) {
            warn!("Failed to remove {}: {}", path.display(), e);
        }
    }
}
