//! Reinstall command implementation
//!
//! Restores bundles from the local manifest only. A newer remote revision is
//! never picked up here; use `update` for that.

use crate::cli::ReinstallArgs;
use crate::commands::CommandContext;
use crate::commands::helpers::finish_batch;
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::installer::Installer;
use crate::progress::ProgressDisplay;
use crate::reconcile::plan_reinstall;
use crate::workspace::SdkWorkspace;

/// Run reinstall command
pub fn run(ctx: &CommandContext, fetcher: &dyn Fetcher, args: ReinstallArgs) -> Result<()> {
    let mut workspace = SdkWorkspace::open(ctx.paths.clone())?;
    let plan = plan_reinstall(&args.bundles, &workspace.manifest);

    let progress = ProgressDisplay::new(plan.len() as u64);
    let installer = Installer::new(fetcher, &ctx.paths).with_progress(&progress);

    let result = workspace.mutate(|local| installer.reinstall(plan, local));
    finish_batch(&progress, result)
}
