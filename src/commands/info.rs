//! Info command implementation
//!
//! Shows what the merged remote manifest says about each requested bundle.

use console::Style;
use indicatif::HumanBytes;
use tracing::warn;

use crate::cli::InfoArgs;
use crate::commands::CommandContext;
use crate::error::{self, Result};
use crate::fetch::Fetcher;
use crate::manifest::Bundle;

/// Run info command
pub fn run(ctx: &CommandContext, fetcher: &dyn Fetcher, args: InfoArgs) -> Result<()> {
    let remote = ctx.remote_manifest(fetcher)?;

    for name in &args.bundles {
        match remote.find_bundle(name) {
            Some(bundle) => display_bundle(bundle),
            None => warn!("{}", error::bundle::unknown(name)),
        }
    }

    Ok(())
}

fn display_bundle(bundle: &Bundle) {
    let label = Style::new().bold();

    println!("{}", Style::new().bold().yellow().apply_to(&bundle.name));
    if let Some(ref description) = bundle.description {
        println!("  {} {}", label.apply_to("Description:"), description);
    }
    println!("  {} {}", label.apply_to("Version:"), bundle.version);
    println!("  {} {}", label.apply_to("Revision:"), bundle.revision);
    println!("  {} {}", label.apply_to("Stability:"), bundle.stability.as_str());
    println!(
        "  {} {}",
        label.apply_to("Recommended:"),
        if bundle.recommended { "yes" } else { "no" }
    );

    if !bundle.archives.is_empty() {
        println!("  {}", label.apply_to("Archives:"));
        for archive in &bundle.archives {
            println!(
                "    {:<6}{:>10}  {}",
                Style::new().cyan().apply_to(archive.host_os.as_str()),
                HumanBytes(archive.size).to_string(),
                Style::new().dim().apply_to(&archive.url)
            );
        }
    }
}
