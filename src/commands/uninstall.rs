//! Uninstall command implementation
//!
//! Works from the local manifest only, so it runs without network access.

use crate::cli::UninstallArgs;
use crate::commands::CommandContext;
use crate::commands::helpers::finish_batch;
use crate::error::Result;
use crate::installer::Uninstaller;
use crate::progress::ProgressDisplay;
use crate::workspace::SdkWorkspace;

/// Run uninstall command
pub fn run(ctx: &CommandContext, args: UninstallArgs) -> Result<()> {
    let mut workspace = SdkWorkspace::open(ctx.paths.clone())?;

    let progress = ProgressDisplay::new(args.bundles.len() as u64);
    let uninstaller = Uninstaller::new(&ctx.paths).with_progress(&progress);

    let result = workspace.mutate(|local| uninstaller.uninstall(&args.bundles, local));
    finish_batch(&progress, result)
}
