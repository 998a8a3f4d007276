//! Resource commands - pages as addressable resources.

use crate::app::App;
use crate::commands::emit;
use crate::OutputFormat;

/// List every page as a resource.
pub fn list(app: &App, output: OutputFormat) -> anyhow::Result<()> {
    emit(app.engine.resources(), output)
}

/// Read one page by resource URI.
pub fn read(app: &App, uri: &str, output: OutputFormat) -> anyhow::Result<()> {
    emit(app.engine.read_resource(uri), output)
}
