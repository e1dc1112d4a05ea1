//! List command implementation
//!
//! Lists every bundle in the merged remote manifest with its install status,
//! followed by installed bundles that no source publishes any more.

use console::Style;

use crate::cli::ListArgs;
use crate::commands::CommandContext;
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::manifest::{Bundle, Manifest};
use crate::reconcile::{InstallStatus, install_status};
use crate::workspace::SdkWorkspace;

/// Run list command
pub fn run(ctx: &CommandContext, fetcher: &dyn Fetcher, args: ListArgs) -> Result<()> {
    let workspace = SdkWorkspace::open(ctx.paths.clone())?;
    let remote = ctx.remote_manifest(fetcher)?;

    for line in list_lines(&remote, &workspace.manifest, args.revision) {
        println!("{}", line);
    }
    Ok(())
}

fn marker(status: InstallStatus) -> &'static str {
    match status {
        InstallStatus::NotInstalled => "  ",
        InstallStatus::Installed => "I ",
        InstallStatus::UpdateAvailable => "I*",
    }
}

fn bundle_line(bundle: &Bundle, status: InstallStatus, local: &Manifest, revision: bool) -> String {
    let mut line = format!(
        "  {} {} ({})",
        Style::new().bold().apply_to(marker(status)),
        bundle.name,
        bundle.stability.as_str()
    );

    if revision {
        line.push_str(&format!(" r{}", bundle.revision));
        if status == InstallStatus::UpdateAvailable {
            if let Some(installed) = local.find_bundle(&bundle.name) {
                line.push_str(&format!(
                    " {}",
                    Style::new()
                        .dim()
                        .apply_to(format!("(installed r{})", installed.revision))
                ));
            }
        }
    }
    line
}

/// Lines of the bundle listing
fn list_lines(remote: &Manifest, local: &Manifest, revision: bool) -> Vec<String> {
    let mut lines = vec![
        Style::new().bold().apply_to("Bundles:").to_string(),
        " I: installed".to_string(),
        " *: update available".to_string(),
        String::new(),
    ];

    for bundle in &remote.bundles {
        lines.push(bundle_line(bundle, install_status(bundle, local), local, revision));
    }

    let orphans: Vec<&Bundle> = local
        .bundles
        .iter()
        .filter(|b| remote.find_bundle(&b.name).is_none())
        .collect();
    if !orphans.is_empty() {
        lines.push(String::new());
        lines.push(
            Style::new()
                .bold()
                .apply_to("Installed but not in any source:")
                .to_string(),
        );
        for bundle in orphans {
            lines.push(bundle_line(bundle, InstallStatus::Installed, local, revision));
        }
    }

    lines
}
