//! Read command - print one page.

use crate::app::App;
use crate::commands::emit;
use crate::OutputFormat;

/// Run the read command.
pub fn run(app: &App, page: &str, output: OutputFormat) -> anyhow::Result<()> {
    emit(app.engine.read(page), output)
}
