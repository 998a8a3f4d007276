//! List command - pages grouped by group.

use crate::app::App;
use crate::commands::emit;
use crate::OutputFormat;

/// Run the list command.
pub fn run(app: &App, group: Option<&str>, output: OutputFormat) -> anyhow::Result<()> {
    emit(app.engine.list(group), output)
}
