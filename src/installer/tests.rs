//! Tests for installer module

use super::*;
use crate::config::Config;
use crate::fetch::checksum::sha256_hex;
use crate::manifest::{Checksum, Stability};
use crate::reconcile::{plan_reinstall, plan_update};
use crate::test_fixtures::{MemoryFetcher, bundle, bundle_with_archive, manifest, tar_gz};
use tempfile::TempDir;

fn setup() -> (TempDir, SdkPaths) {
    let temp = TempDir::new().unwrap();
    let paths = SdkPaths::new(temp.path().join("sdk"));
    (temp, paths)
}

fn url_for(name: &str, revision: u32) -> String {
    format!("https://storage.example.com/{}_r{}.tar.gz", name, revision)
}

/// A bundle whose archive contains a single VERSION file
fn published(name: &str, revision: u32) -> (Bundle, Vec<u8>) {
    let bytes = tar_gz(&[("VERSION", &revision.to_string())]);
    let bundle = bundle_with_archive(name, revision, &url_for(name, revision), &bytes);
    (bundle, bytes)
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

fn write_installed(paths: &SdkPaths, name: &str, marker: &str) {
    let dir = paths.bundle_dir(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("VERSION"), marker).unwrap();
}

fn read_installed(paths: &SdkPaths, name: &str) -> String {
    fs::read_to_string(paths.bundle_dir(name).join("VERSION")).unwrap()
}

fn leftover_staging(paths: &SdkPaths) -> Vec<String> {
    fs::read_dir(&paths.sdk_root)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .filter(|n| n.starts_with(STAGING_PREFIX) || n.ends_with(".sdkup-old"))
        .collect()
}

#[test]
fn test_update_with_no_names_installs_recommended() {
    let (_temp, paths) = setup();
    let (mut tools, bytes) = published("sdk_tools", 5);
    tools.recommended = true;
    let remote = manifest(&[tools.clone(), bundle("pepper_30", 1, Stability::Beta)]);
    let fetcher = MemoryFetcher::new().with(&tools.archives[0].url, bytes);
    let mut local = Manifest::new();

    let plan = plan_update(&[], &remote, &local, false);
    let report = Installer::new(&fetcher, &paths)
        .update(plan, &mut local)
        .unwrap();

    assert!(matches!(
        report.outcome("sdk_tools"),
        Some(BundleOutcome::Installed { from: None, to: 5 })
    ));
    assert_eq!(local.bundles.len(), 1);
    assert_eq!(local.find_bundle("sdk_tools").unwrap().revision, 5);
    assert_eq!(read_installed(&paths, "sdk_tools"), "5");
    assert!(!paths.archive_download_path("sdk_tools").exists());
    assert!(report.into_result().is_ok());
}

#[test]
fn test_failed_fetch_does_not_stop_batch() {
    let (_temp, paths) = setup();
    let (a, a_bytes) = published("a", 1);
    let (b, _) = published("b", 2);
    let (c, c_bytes) = published("c", 1);
    let remote = manifest(&[a.clone(), b, c.clone()]);
    let fetcher = MemoryFetcher::new()
        .with(&a.archives[0].url, a_bytes)
        .with(&c.archives[0].url, c_bytes);

    let mut local = manifest(&[bundle("b", 1, Stability::Stable)]);
    write_installed(&paths, "b", "old");

    let plan = plan_update(&names(&["a", "b", "c"]), &remote, &local, false);
    let report = Installer::new(&fetcher, &paths)
        .update(plan, &mut local)
        .unwrap();

    assert_eq!(local.find_bundle("a").unwrap().revision, 1);
    assert_eq!(local.find_bundle("b").unwrap().revision, 1);
    assert_eq!(local.find_bundle("c").unwrap().revision, 1);
    assert_eq!(read_installed(&paths, "b"), "old");
    assert!(matches!(
        report.outcome("b"),
        Some(BundleOutcome::Failed {
            stage: InstallStage::Fetching,
            error: SdkError::FetchFailed { .. }
        })
    ));
    assert_eq!(report.failures(), vec!["b"]);

    let err = report.into_result().unwrap_err();
    assert!(matches!(err, SdkError::BundlesFailed { ref names } if names == &["b"]));
}

#[test]
fn test_checksum_mismatch_fails_bundle_and_removes_archive() {
    let (_temp, paths) = setup();
    let (pepper, bytes) = published("pepper_30", 3);
    let tampered: Vec<u8> = bytes.iter().map(|b| b ^ 0xff).collect();
    assert_eq!(
        pepper.archives[0].checksum,
        Checksum::Sha256(sha256_hex(&bytes))
    );
    let url = pepper.archives[0].url.clone();
    let fetcher = MemoryFetcher::new().with(&url, tampered);
    let mut local = Manifest::new();

    let plan = plan_update(&names(&["pepper_30"]), &manifest(&[pepper]), &local, false);
    let report = Installer::new(&fetcher, &paths)
        .update(plan, &mut local)
        .unwrap();

    assert!(matches!(
        report.outcome("pepper_30"),
        Some(BundleOutcome::Failed {
            stage: InstallStage::Verifying,
            error: SdkError::ChecksumMismatch { .. }
        })
    ));
    assert!(local.find_bundle("pepper_30").is_none());
    assert!(!paths.archive_download_path("pepper_30").exists());
    assert!(!paths.bundle_dir("pepper_30").exists());
}

#[test]
fn test_unknown_bundle_is_skipped_not_failed() {
    let (_temp, paths) = setup();
    let fetcher = MemoryFetcher::new();
    let mut local = Manifest::new();

    let plan = plan_update(&names(&["nope"]), &Manifest::new(), &local, false);
    let report = Installer::new(&fetcher, &paths)
        .update(plan, &mut local)
        .unwrap();

    assert!(matches!(
        report.outcome("nope"),
        Some(BundleOutcome::Skipped(SdkError::UnknownBundle { .. }))
    ));
    assert!(report.into_result().is_ok());
}

#[test]
fn test_up_to_date_bundle_is_unchanged() {
    let (_temp, paths) = setup();
    let (pepper, _) = published("pepper_30", 3);
    let fetcher = MemoryFetcher::new();
    let mut local = manifest(&[pepper.clone()]);

    let plan = plan_update(&names(&["pepper_30"]), &manifest(&[pepper]), &local, false);
    let report = Installer::new(&fetcher, &paths)
        .update(plan, &mut local)
        .unwrap();

    assert!(matches!(
        report.outcome("pepper_30"),
        Some(BundleOutcome::Unchanged { revision: 3 })
    ));
    assert!(fetcher.requests().is_empty());
}

#[test]
fn test_update_replaces_previous_revision() {
    let (_temp, paths) = setup();
    let (old, _) = published("pepper_30", 3);
    let (new, bytes) = published("pepper_30", 4);
    let fetcher = MemoryFetcher::new().with(&new.archives[0].url, bytes);
    let mut local = manifest(&[old]);
    write_installed(&paths, "pepper_30", "3");
    fs::write(paths.bundle_dir("pepper_30").join("stale.txt"), "x").unwrap();

    let plan = plan_update(&names(&["pepper_30"]), &manifest(&[new]), &local, false);
    let report = Installer::new(&fetcher, &paths)
        .update(plan, &mut local)
        .unwrap();

    assert!(matches!(
        report.outcome("pepper_30"),
        Some(BundleOutcome::Installed {
            from: Some(3),
            to: 4
        })
    ));
    assert_eq!(read_installed(&paths, "pepper_30"), "4");
    assert!(!paths.bundle_dir("pepper_30").join("stale.txt").exists());
    assert!(leftover_staging(&paths).is_empty());
}

#[test]
fn test_repath_selects_archive_subdirectory() {
    let (_temp, paths) = setup();
    let bytes = tar_gz(&[("pepper_30/VERSION", "30"), ("README", "top level")]);
    let mut pepper = bundle_with_archive("pepper_30", 1, &url_for("pepper_30", 1), &bytes);
    pepper.repath = Some("pepper_30".to_string());
    let fetcher = MemoryFetcher::new().with(&pepper.archives[0].url, bytes);
    let mut local = Manifest::new();

    let plan = plan_update(&names(&["pepper_30"]), &manifest(&[pepper]), &local, false);
    Installer::new(&fetcher, &paths)
        .update(plan, &mut local)
        .unwrap();

    assert_eq!(read_installed(&paths, "pepper_30"), "30");
    assert!(!paths.bundle_dir("pepper_30").join("README").exists());
    assert!(leftover_staging(&paths).is_empty());
}

#[test]
fn test_unpack_failure_keeps_previous_directory() {
    let (_temp, paths) = setup();
    let garbage = b"not a tarball".to_vec();
    let broken = bundle_with_archive("pepper_30", 4, &url_for("pepper_30", 4), &garbage);
    let fetcher = MemoryFetcher::new().with(&broken.archives[0].url, garbage);
    let mut local = manifest(&[bundle("pepper_30", 3, Stability::Stable)]);
    write_installed(&paths, "pepper_30", "3");

    let plan = plan_update(&names(&["pepper_30"]), &manifest(&[broken]), &local, false);
    let report = Installer::new(&fetcher, &paths)
        .update(plan, &mut local)
        .unwrap();

    assert!(matches!(
        report.outcome("pepper_30"),
        Some(BundleOutcome::Failed {
            stage: InstallStage::Unpacking,
            error: SdkError::UnpackFailed { .. }
        })
    ));
    assert_eq!(read_installed(&paths, "pepper_30"), "3");
    assert_eq!(local.find_bundle("pepper_30").unwrap().revision, 3);
    assert!(leftover_staging(&paths).is_empty());
}

#[test]
fn test_no_archive_for_host() {
    let (_temp, paths) = setup();
    let (mut pepper, bytes) = published("pepper_30", 1);
    pepper.archives[0].host_os = HostOs::Linux;
    let fetcher = MemoryFetcher::new().with(&pepper.archives[0].url, bytes);
    let mut local = Manifest::new();

    let plan = plan_update(&names(&["pepper_30"]), &manifest(&[pepper]), &local, false);
    let report = Installer::new(&fetcher, &paths)
        .with_host(HostOs::Win)
        .update(plan, &mut local)
        .unwrap();

    assert!(matches!(
        report.outcome("pepper_30"),
        Some(BundleOutcome::Failed {
            stage: InstallStage::Fetching,
            error: SdkError::NoArchiveForHost { .. }
        })
    ));
    assert!(fetcher.requests().is_empty());
}

#[test]
fn test_reinstall_of_missing_bundle_touches_nothing() {
    let (_temp, paths) = setup();
    let fetcher = MemoryFetcher::new();
    let mut local = Manifest::new();

    let plan = plan_reinstall(&names(&["pepper_30"]), &local);
    let report = Installer::new(&fetcher, &paths)
        .reinstall(plan, &mut local)
        .unwrap();

    assert!(matches!(
        report.outcome("pepper_30"),
        Some(BundleOutcome::Skipped(SdkError::NotInstalled { .. }))
    ));
    assert!(fetcher.requests().is_empty());
    assert!(!paths.bundle_dir("pepper_30").exists());
    assert!(local.bundles.is_empty());
}

#[test]
fn test_reinstall_restores_recorded_revision() {
    let (_temp, paths) = setup();
    let (pepper, bytes) = published("pepper_30", 3);
    let fetcher = MemoryFetcher::new().with(&pepper.archives[0].url, bytes);
    let mut local = manifest(&[pepper]);
    write_installed(&paths, "pepper_30", "corrupted");

    let plan = plan_reinstall(&names(&["pepper_30"]), &local);
    let report = Installer::new(&fetcher, &paths)
        .reinstall(plan, &mut local)
        .unwrap();

    assert!(matches!(
        report.outcome("pepper_30"),
        Some(BundleOutcome::Installed {
            from: Some(3),
            to: 3
        })
    ));
    assert_eq!(read_installed(&paths, "pepper_30"), "3");
}

#[test]
fn test_failed_reinstall_keeps_previous_directory() {
    let (_temp, paths) = setup();
    let (pepper, _) = published("pepper_30", 3);
    let fetcher = MemoryFetcher::new();
    let mut local = manifest(&[pepper.clone()]);
    write_installed(&paths, "pepper_30", "3");

    let plan = plan_reinstall(&names(&["pepper_30"]), &local);
    let report = Installer::new(&fetcher, &paths)
        .reinstall(plan, &mut local)
        .unwrap();

    assert_eq!(report.failures(), vec!["pepper_30"]);
    assert_eq!(read_installed(&paths, "pepper_30"), "3");
    assert_eq!(local.find_bundle("pepper_30"), Some(&pepper));
}

#[test]
fn test_uninstall_removes_directory_and_entry() {
    let (_temp, paths) = setup();
    let mut local = manifest(&[
        bundle("pepper_30", 3, Stability::Stable),
        bundle("sdk_tools", 5, Stability::Stable),
    ]);
    write_installed(&paths, "pepper_30", "3");

    let report = Uninstaller::new(&paths)
        .uninstall(&names(&["pepper_30", "pepper_31", "pepper_30"]), &mut local)
        .unwrap();

    assert_eq!(report.bundles.len(), 2);
    assert!(matches!(
        report.outcome("pepper_30"),
        Some(BundleOutcome::Uninstalled)
    ));
    assert!(matches!(
        report.outcome("pepper_31"),
        Some(BundleOutcome::Skipped(SdkError::NotInstalled { .. }))
    ));
    assert!(!paths.bundle_dir("pepper_30").exists());
    assert!(local.find_bundle("pepper_30").is_none());
    assert!(local.find_bundle("sdk_tools").is_some());
    assert!(report.into_result().is_ok());
}

#[test]
fn test_uninstall_without_directory_still_drops_entry() {
    let (_temp, paths) = setup();
    let mut local = manifest(&[bundle("pepper_30", 3, Stability::Stable)]);

    let report = Uninstaller::new(&paths)
        .uninstall(&names(&["pepper_30"]), &mut local)
        .unwrap();

    assert!(matches!(
        report.outcome("pepper_30"),
        Some(BundleOutcome::Uninstalled)
    ));
    assert!(local.bundles.is_empty());
}

#[test]
fn test_failed_removal_only_fails_that_bundle() {
    let (_temp, paths) = setup();
    let mut local = manifest(&[
        bundle("pepper_30", 3, Stability::Stable),
        bundle("pepper_31", 1, Stability::Stable),
    ]);
    // A plain file where the bundle directory should be cannot be removed as a directory
    fs::create_dir_all(&paths.sdk_root).unwrap();
    fs::write(paths.bundle_dir("pepper_30"), "not a directory").unwrap();
    write_installed(&paths, "pepper_31", "1");

    let report = Uninstaller::new(&paths)
        .uninstall(&names(&["pepper_30", "pepper_31"]), &mut local)
        .unwrap();

    assert!(matches!(
        report.outcome("pepper_30"),
        Some(BundleOutcome::Failed {
            stage: InstallStage::Removing,
            error: SdkError::RemoveFailed { .. }
        })
    ));
    assert!(local.find_bundle("pepper_30").is_some());
    assert!(paths.bundle_dir("pepper_30").exists());

    assert!(matches!(
        report.outcome("pepper_31"),
        Some(BundleOutcome::Uninstalled)
    ));
    assert!(local.find_bundle("pepper_31").is_none());
    assert!(!paths.bundle_dir("pepper_31").exists());

    assert_eq!(report.failures(), vec!["pepper_30".to_string()]);
}

#[test]
fn test_bundle_name_cannot_escape_sdk_root() {
    let (temp, paths) = setup();
    let (escaping, bytes) = published("../escaped", 1);
    let fetcher = MemoryFetcher::new().with(&escaping.archives[0].url, bytes);
    let mut local = Manifest::new();

    let plan = plan_update(&names(&["../escaped"]), &manifest(&[escaping]), &local, false);
    let report = Installer::new(&fetcher, &paths)
        .update(plan, &mut local)
        .unwrap();

    assert!(matches!(
        report.outcome("../escaped"),
        Some(BundleOutcome::Failed {
            error: SdkError::InvalidBundleName { .. },
            ..
        })
    ));
    assert!(!temp.path().join("escaped").exists());
    assert!(fetcher.requests().is_empty());
    assert!(local.bundles.is_empty());
}

#[test]
fn test_bundle_named_like_data_dir_keeps_config() {
    let (_temp, paths) = setup();
    let mut config = Config::default();
    config.add_source("https://mirror.example.com/extra.json").unwrap();
    config.save(&paths.config_file()).unwrap();

    let (shadow, bytes) = published("sdk_cache", 1);
    let fetcher = MemoryFetcher::new().with(&shadow.archives[0].url, bytes);
    let mut local = Manifest::new();

    let plan = plan_update(&names(&["sdk_cache"]), &manifest(&[shadow]), &local, false);
    let report = Installer::new(&fetcher, &paths)
        .update(plan, &mut local)
        .unwrap();

    assert!(matches!(
        report.outcome("sdk_cache"),
        Some(BundleOutcome::Failed {
            error: SdkError::InvalidBundleName { .. },
            ..
        })
    ));
    assert_eq!(
        Config::load_strict(&paths.config_file()).unwrap().sources,
        vec!["https://mirror.example.com/extra.json".to_string()]
    );
}

#[test]
fn test_uninstall_refuses_path_like_name() {
    let (temp, paths) = setup();
    let outside = temp.path().join("outside");
    fs::create_dir_all(&outside).unwrap();
    let mut local = manifest(&[bundle("../outside", 1, Stability::Stable)]);

    let report = Uninstaller::new(&paths)
        .uninstall(&names(&["../outside"]), &mut local)
        .unwrap();

    assert!(matches!(
        report.outcome("../outside"),
        Some(BundleOutcome::Failed {
            stage: InstallStage::Removing,
            error: SdkError::InvalidBundleName { .. }
        })
    ));
    assert!(outside.is_dir());
    assert_eq!(local.bundles.len(), 1);
}

#[test]
fn test_stage_display() {
    assert_eq!(InstallStage::Verifying.to_string(), "verifying");
    assert_eq!(InstallStage::Unchanged.as_str(), "unchanged");
}
