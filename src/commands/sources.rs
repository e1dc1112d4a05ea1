//! Sources command implementation
//!
//! Manages the additional manifest sources stored in `sdk_config.json`. The
//! config is loaded strictly here: a corrupt file is reported instead of
//! being replaced by defaults.

use clap::CommandFactory;
use console::Style;

use crate::cli::{Cli, SourcesArgs};
use crate::commands::CommandContext;
use crate::config::Config;
use crate::error::Result;

/// Run sources command
pub fn run(ctx: &CommandContext, args: SourcesArgs) -> Result<()> {
    let path = ctx.paths.config_file();
    let mut config = Config::load_strict(&path)?;

    if let Some(url) = args.add {
        config.add_source(&url)?;
        config.save(&path)?;
        println!("{} {}", Style::new().green().apply_to("Added source"), url);
    } else if let Some(url) = args.remove {
        let removed = config.remove_source(&url)?;
        config.save(&path)?;
        for url in removed {
            println!("{} {}", Style::new().green().apply_to("Removed source"), url);
        }
    } else if args.list {
        list_sources(&config);
    } else {
        let mut cmd = Cli::command();
        if let Some(sources) = cmd.find_subcommand_mut("sources") {
            sources.print_help()?;
        }
    }

    Ok(())
}

fn list_sources(config: &Config) {
    if config.sources.is_empty() {
        println!("No additional sources.");
        return;
    }

    println!("Additional sources ({}):", config.sources.len());
    for source in &config.sources {
        println!("  {}", source);
    }
}
