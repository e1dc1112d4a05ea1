//! Output shared by the batch commands

use console::Style;
use tracing::warn;

use crate::error::Result;
use crate::installer::{BatchReport, BundleOutcome};
use crate::progress::ProgressDisplay;

/// One line describing a bundle outcome, or `None` for skipped bundles
fn outcome_line(name: &str, outcome: &BundleOutcome) -> Option<String> {
    let name = Style::new().bold().apply_to(name);
    let line = match outcome {
        BundleOutcome::Installed { from: None, to } => {
            format!("{} {} (r{})", Style::new().green().apply_to("Installed"), name, to)
        }
        BundleOutcome::Installed {
            from: Some(from),
            to,
        } if from == to => {
            format!("{} {} (r{})", Style::new().green().apply_to("Reinstalled"), name, to)
        }
        BundleOutcome::Installed {
            from: Some(from),
            to,
        } => format!(
            "{} {} (r{} -> r{})",
            Style::new().green().apply_to("Updated"),
            name,
            from,
            to
        ),
        BundleOutcome::Uninstalled => {
            format!("{} {}", Style::new().green().apply_to("Uninstalled"), name)
        }
        BundleOutcome::Unchanged { revision } => {
            format!("{} is already up to date (r{})", name, revision)
        }
        BundleOutcome::Skipped(_) => return None,
        BundleOutcome::Failed { stage, error } => format!(
            "{} {} while {}: {}",
            Style::new().red().bold().apply_to("Failed"),
            name,
            stage,
            error
        ),
    };
    Some(line)
}

/// Print a batch report
///
/// Skipped bundles are logged as warnings, failures go to stderr.
pub fn print_report(report: &BatchReport) {
    for bundle in &report.bundles {
        match &bundle.outcome {
            BundleOutcome::Skipped(e) => warn!("{}", e),
            BundleOutcome::Failed { .. } => {
                if let Some(line) = outcome_line(&bundle.name, &bundle.outcome) {
                    eprintln!("{}", line);
                }
            }
            outcome => {
                if let Some(line) = outcome_line(&bundle.name, outcome) {
                    println!("{}", line);
                }
            }
        }
    }
}

/// Close the progress display, print the report and fail if any bundle failed
///
/// Called after the local manifest has been saved.
pub fn finish_batch(progress: &ProgressDisplay, result: Result<BatchReport>) -> Result<()> {
    let report = match result {
        Ok(report) => {
            progress.finish();
            report
        }
        Err(e) => {
            progress.abandon();
            return Err(e);
        }
    };

    if report.bundles.is_empty() {
        println!("Nothing to do.");
    }
    print_report(&report);
    report.into_result().map(|_| ())
}
