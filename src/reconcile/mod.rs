//! Deciding what to do with each requested bundle
//!
//! The reconciler is pure: it compares the merged remote manifest with the
//! local manifest and produces a plan. Nothing here touches the file system.


use crate::manifest::{Bundle, Manifest, RECOMMENDED};

/// Derived installation state of a remote bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStatus {
    NotInstalled,
    Installed,
    UpdateAvailable,
}

/// Install status of `remote` given the local manifest
pub fn install_status(remote: &Bundle, local: &Manifest) -> InstallStatus {
    match local.find_bundle(&remote.name) {
        None => InstallStatus::NotInstalled,
        Some(installed) if remote.revision > installed.revision => InstallStatus::UpdateAvailable,
        Some(_) => InstallStatus::Installed,
    }
}

/// Decision for one requested bundle name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    /// Not present in any remote source
    UnknownBundle,
    /// Installed at the same or a newer revision
    NoActionNeeded { revision: u32 },
    /// Fetch and install `bundle`; `installed_revision` is the revision being replaced
    NeedsInstallOrUpdate {
        bundle: Bundle,
        installed_revision: Option<u32>,
    },
}

/// Decision for one bundle named in a reinstall request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReinstallAction {
    /// Re-fetch exactly this locally recorded bundle
    Reinstall(Bundle),
    NotInstalled,
}

/// A named decision, in request order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Planned<A> {
    pub name: String,
    pub action: A,
}

/// Replace `recommended` with every recommended bundle name
///
/// Names keep request order and duplicates are dropped. An empty request
/// expands to the recommended set.
pub fn expand_names(requested: &[String], remote: &Manifest) -> Vec<String> {
    let mut expanded: Vec<String> = Vec::new();
    let default_request = [RECOMMENDED.to_string()];
    let requested = if requested.is_empty() {
        &default_request[..]
    } else {
        requested
    };

    for name in requested {
        let names = if name == RECOMMENDED {
            remote.recommended_names()
        } else {
            vec![name.clone()]
        };
        for name in names {
            if !expanded.contains(&name) {
                expanded.push(name);
            }
        }
    }
    expanded
}

/// Plan an update of the requested bundles
///
/// Unknown names are recorded rather than failing the whole plan. With
/// `force`, installed bundles are fetched again even when up to date.
pub fn plan_update(
    requested: &[String],
    remote: &Manifest,
    local: &Manifest,
    force: bool,
) -> Vec<Planned<UpdateAction>> {
    expand_names(requested, remote)
        .into_iter()
        .map(|name| {
            let action = match remote.find_bundle(&name) {
                None => UpdateAction::UnknownBundle,
                Some(bundle) => decide(bundle, local.find_bundle(&name), force),
            };
            Planned { name, action }
        })
        .collect()
}

fn decide(remote: &Bundle, installed: Option<&Bundle>, force: bool) -> UpdateAction {
    match installed {
        Some(installed) if installed.revision >= remote.revision && !force => {
            UpdateAction::NoActionNeeded {
                revision: installed.revision,
            }
        }
        _ => UpdateAction::NeedsInstallOrUpdate {
            bundle: remote.clone(),
            installed_revision: installed.map(|b| b.revision),
        },
    }
}

/// Plan a reinstall from the local manifest alone
///
/// The remote manifest is deliberately not an input: a reinstall restores the
/// recorded revision and never upgrades.
pub fn plan_reinstall(requested: &[String], local: &Manifest) -> Vec<Planned<ReinstallAction>> {
    let mut plan: Vec<Planned<ReinstallAction>> = Vec::new();
    for name in requested {
        if plan.iter().any(|p| &p.name == name) {
            continue;
        }
        let action = match local.find_bundle(name) {
            Some(bundle) => ReinstallAction::Reinstall(bundle.clone()),
            None => ReinstallAction::NotInstalled,
        };
        plan.push(Planned {
            name: name.clone(),
            action,
        });
    }
    plan
}
