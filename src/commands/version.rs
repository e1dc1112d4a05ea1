//! Version command implementation

use crate::error::Result;
use crate::manifest::MANIFEST_VERSION;

/// Run version command
pub fn run() -> Result<()> {
    println!("sdkup {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Build info:");
    println!("  Manifest format: {}", MANIFEST_VERSION);
    println!("  Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    println!("  Profile: {}", build_profile());

    Ok(())
}

fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}
