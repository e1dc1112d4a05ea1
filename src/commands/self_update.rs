//! Hidden `--update-sdk-tools` flag

use tracing::info;

use crate::commands::CommandContext;
use crate::commands::update::update_bundles;
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::manifest::SDK_TOOLS;
use crate::workspace::SdkWorkspace;

/// Force-update the `sdk_tools` bundle
///
/// Unlike a plain `update sdk_tools`, a bundle missing from every source is
/// an error.
pub fn run(ctx: &CommandContext, fetcher: &dyn Fetcher) -> Result<()> {
    let mut workspace = SdkWorkspace::open(ctx.paths.clone())?;
    let remote = ctx.remote_manifest(fetcher)?;
    remote.get_bundle(SDK_TOOLS)?;

    info!("Updating {}", SDK_TOOLS);
    update_bundles(
        ctx,
        fetcher,
        &mut workspace,
        &remote,
        &[SDK_TOOLS.to_string()],
        true,
    )
}
