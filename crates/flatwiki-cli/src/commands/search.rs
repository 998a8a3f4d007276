//! Search command - full-text search across page bodies.

use crate::app::App;
use crate::commands::emit;
use crate::OutputFormat;
use std::time::Instant;

/// Run the search command.
pub fn run(app: &App, query: &str, case_sensitive: bool, output: OutputFormat) -> anyhow::Result<()> {
    let start = Instant::now();
    let outcome = app.engine.search(query, case_sensitive);
    let elapsed = start.elapsed();

    let status = outcome.status();
    emit(outcome, output)?;

    eprintln!();
    eprintln!(
        "Search {} in {:.3}ms",
        status,
        elapsed.as_secs_f64() * 1000.0
    );

    Ok(())
}
