//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{ArgAction, ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

use crate::paths::SDK_ROOT_ENV;

/// Manifest consulted before any configured source
pub const DEFAULT_MANIFEST_URL: &str =
    "https://storage.googleapis.com/sdkup-mirror/sdk/sdk_manifest.json";

/// Environment variable overriding the default manifest URL
pub const MANIFEST_URL_ENV: &str = "SDKUP_MANIFEST_URL";

/// sdkup - SDK bundle updater
///
/// Install, update and remove the bundles that make up an SDK.
#[derive(Parser, Debug)]
#[command(
    name = "sdkup",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "SDK bundle updater",
    long_about = "sdkup keeps the bundles of an SDK (toolchains, tools, libraries) up to date. \
                  It merges the default manifest with any extra sources you register and \
                  installs, updates, reinstalls or removes bundles on request.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  sdkup list\n    \
                  sdkup update\n    \
                  sdkup update pepper_30 --force\n    \
                  sdkup info sdk_tools\n    \
                  sdkup sources --add https://example.com/manifest.json"
)]
pub struct Cli {
    /// Override the default URL of the bundle manifest
    #[arg(
        long = "manifest-url",
        short = 'U',
        global = true,
        value_name = "URL",
        env = MANIFEST_URL_ENV,
        default_value = DEFAULT_MANIFEST_URL
    )]
    pub manifest_url: String,

    /// SDK root directory (defaults to the local data directory)
    #[arg(long, global = true, value_name = "DIR", env = SDK_ROOT_ENV)]
    pub sdk_root: Option<PathBuf>,

    /// Increase log verbosity (-v for info, -vv for debug)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Force-update the sdk_tools bundle and exit
    #[arg(long, hide = true)]
    pub update_sdk_tools: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Display information about bundles
    Info(InfoArgs),

    /// List all available bundles
    List(ListArgs),

    /// Update bundles to the latest revision
    Update(UpdateArgs),

    /// Install bundles (same as update)
    Install(UpdateArgs),

    /// Uninstall bundles
    Uninstall(UninstallArgs),

    /// Restore bundles to the revision recorded locally
    Reinstall(ReinstallArgs),

    /// Manage additional manifest sources
    Sources(SourcesArgs),

    /// Show version information
    Version,
}

/// Arguments for the info command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show a bundle:\n    sdkup info pepper_30\n\n\
                  Show several bundles:\n    sdkup info sdk_tools pepper_30")]
pub struct InfoArgs {
    /// Bundle names
    #[arg(required = true, value_name = "BUNDLE")]
    pub bundles: Vec<String>,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List available bundles:\n    sdkup list\n\n\
                  Include revision numbers:\n    sdkup list --revision")]
pub struct ListArgs {
    /// Display revision numbers
    #[arg(long, short = 'r')]
    pub revision: bool,
}

/// Arguments for the update and install commands
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Update the recommended bundles:\n    sdkup update\n\n\
                  Update specific bundles:\n    sdkup update sdk_tools pepper_30\n\n\
                  Fetch a bundle again even if it is up to date:\n    sdkup update pepper_30 --force")]
pub struct UpdateArgs {
    /// Bundle names, or 'recommended' (the default)
    #[arg(value_name = "BUNDLE")]
    pub bundles: Vec<String>,

    /// Update bundles even if the local revision matches the remote revision
    #[arg(long, short = 'F')]
    pub force: bool,
}

/// Arguments for the uninstall command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Uninstall a bundle:\n    sdkup uninstall pepper_30")]
pub struct UninstallArgs {
    /// Bundle names
    #[arg(required = true, value_name = "BUNDLE")]
    pub bundles: Vec<String>,
}

/// Arguments for the reinstall command
///
/// Reinstall never moves a bundle to a newer revision.
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Restore a damaged bundle:\n    sdkup reinstall pepper_30")]
pub struct ReinstallArgs {
    /// Bundle names
    #[arg(required = true, value_name = "BUNDLE")]
    pub bundles: Vec<String>,
}

/// Arguments for the sources command
#[derive(Parser, Debug)]
#[command(
    group(ArgGroup::new("action").args(["add", "remove", "list"])),
    after_help = "EXAMPLES:\n  \
                  Add a source:\n    sdkup sources --add https://example.com/manifest.json\n\n\
                  Remove every additional source:\n    sdkup sources --remove all\n\n\
                  List sources:\n    sdkup sources --list"
)]
pub struct SourcesArgs {
    /// Add an additional manifest source
    #[arg(long, short = 'a', value_name = "URL")]
    pub add: Option<String>,

    /// Remove a manifest source ('all' removes every additional source)
    #[arg(long, short = 'r', value_name = "URL")]
    pub remove: Option<String>,

    /// List additional manifest sources
    #[arg(long, short = 'l')]
    pub list: bool,
}
