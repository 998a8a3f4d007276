//! Subcommand implementations.

pub mod config;
pub mod list;
pub mod read;
pub mod resources;
pub mod search;
pub mod serve;
pub mod tools;

use crate::OutputFormat;
use flatwiki_core::{Outcome, Report};
use serde::Serialize;
use serde_json::json;

/// Print an engine outcome in the requested format.
///
/// JSON output carries the structured payload on success and the rendered
/// message otherwise.
pub fn emit<T: Report + Serialize>(outcome: Outcome<T>, output: OutputFormat) -> anyhow::Result<()> {
    match output {
        OutputFormat::Text => println!("{}", outcome),
        OutputFormat::Json => {
            let status = outcome.status();
            let value = match outcome {
                Outcome::Ok(payload) => json!({ "status": status, "result": payload }),
                other => json!({ "status": status, "text": other.to_string() }),
            };
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}
