//! Tools command - print the tool catalogue.

use flatwiki_core::tools::catalogue;

/// Run the tools command.
pub fn run() -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&catalogue())?);
    Ok(())
}
