//! Update command implementation
//!
//! Also serves `install`, which accepts the same arguments.

use crate::cli::UpdateArgs;
use crate::commands::CommandContext;
use crate::commands::helpers::finish_batch;
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::installer::Installer;
use crate::manifest::Manifest;
use crate::progress::ProgressDisplay;
use crate::reconcile::plan_update;
use crate::workspace::SdkWorkspace;

/// Run update command
pub fn run(ctx: &CommandContext, fetcher: &dyn Fetcher, args: UpdateArgs) -> Result<()> {
    let mut workspace = SdkWorkspace::open(ctx.paths.clone())?;
    let remote = ctx.remote_manifest(fetcher)?;
    update_bundles(ctx, fetcher, &mut workspace, &remote, &args.bundles, args.force)
}

/// Plan and run an update, saving the local manifest whatever happens
pub fn update_bundles(
    ctx: &CommandContext,
    fetcher: &dyn Fetcher,
    workspace: &mut SdkWorkspace,
    remote: &Manifest,
    names: &[String],
    force: bool,
) -> Result<()> {
    let plan = plan_update(names, remote, &workspace.manifest, force);
    let progress = ProgressDisplay::new(plan.len() as u64);
    let installer = Installer::new(fetcher, &ctx.paths).with_progress(&progress);

    let result = workspace.mutate(|local| installer.update(plan, local));
    finish_batch(&progress, result)
}
