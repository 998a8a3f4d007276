//! Tool catalogue and dispatch.
//!
//! Transports that expose the engine as named tools (search_wiki,
//! read_page, list_pages) share this module: it describes each tool with a
//! JSON Schema and turns a tool name plus JSON arguments into an engine call.
//! The registry borrows the engine it was built with; there is no global
//! instance.

use crate::engine::QueryEngine;
use crate::error::{FlatwikiError, Result};
use crate::outcome::{Outcome, Report, Status};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

pub const SEARCH_WIKI: &str = "search_wiki";
pub const READ_PAGE: &str = "read_page";
pub const LIST_PAGES: &str = "list_pages";

/// Description of one callable tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// The tools every transport should advertise.
pub fn catalogue() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: SEARCH_WIKI,
            description: "Search for text across all PmWiki pages. Returns pages containing \
                          the search text with a context snippet.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Text to search for in the wiki"
                    },
                    "case_sensitive": {
                        "type": "boolean",
                        "description": "Case-sensitive search (default: false)",
                        "default": false
                    }
                },
                "required": ["query"]
            }),
        },
        ToolSpec {
            name: READ_PAGE,
            description: "Read the complete content of a specific wiki page. Use the format \
                          'Group.PageName' or 'Group/PageName'.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "page_name": {
                        "type": "string",
                        "description": "Page name (e.g., Main.HomePage or Main/HomePage)"
                    }
                },
                "required": ["page_name"]
            }),
        },
        ToolSpec {
            name: LIST_PAGES,
            description: "List all available pages in the wiki, optionally filtered by group.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "group": {
                        "type": "string",
                        "description": "Group name to filter pages (optional)"
                    }
                }
            }),
        },
    ]
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
    #[serde(default)]
    case_sensitive: bool,
}

#[derive(Debug, Deserialize)]
struct ReadArgs {
    page_name: String,
}

#[derive(Debug, Default, Deserialize)]
struct ListArgs {
    #[serde(default)]
    group: Option<String>,
}

/// Text payload plus status, as returned to a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolResponse {
    pub status: Status,
    pub text: String,
}

impl ToolResponse {
    /// Render an engine outcome
    pub fn from_outcome<T: Report>(outcome: Outcome<T>) -> Self {
        ToolResponse {
            status: outcome.status(),
            text: outcome.to_string(),
        }
    }

    /// Render a rejected request
    pub fn from_error(err: &FlatwikiError) -> Self {
        let text = match err {
            FlatwikiError::UnknownTool { name } => format!("Unknown tool: {}", name),
            other => format!("Error: {}", other),
        };
        ToolResponse {
            status: Status::Error,
            text,
        }
    }
}

/// Dispatches tool calls to a borrowed engine.
#[derive(Debug, Clone, Copy)]
pub struct ToolRegistry<'a> {
    engine: &'a QueryEngine,
}

impl<'a> ToolRegistry<'a> {
    /// Bind the catalogue to `engine`
    pub fn new(engine: &'a QueryEngine) -> Self {
        ToolRegistry { engine }
    }

    /// The advertised tools
    pub fn tools(&self) -> Vec<ToolSpec> {
        catalogue()
    }

    /// Call a tool, returning an error for unknown tools or arguments that
    /// do not fit the tool's schema.
    pub fn try_call(&self, name: &str, arguments: Value) -> Result<ToolResponse> {
        debug!(tool = %name, "Calling tool");
        // A missing arguments object means "no arguments".
        let arguments = if arguments.is_null() {
            json!({})
        } else {
            arguments
        };

        match name {
            SEARCH_WIKI => {
                let args: SearchArgs = parse_args(name, arguments)?;
                Ok(ToolResponse::from_outcome(
                    self.engine.search(&args.query, args.case_sensitive),
                ))
            }
            READ_PAGE => {
                let args: ReadArgs = parse_args(name, arguments)?;
                Ok(ToolResponse::from_outcome(self.engine.read(&args.page_name)))
            }
            LIST_PAGES => {
                let args: ListArgs = parse_args(name, arguments)?;
                Ok(ToolResponse::from_outcome(
                    self.engine.list(args.group.as_deref()),
                ))
            }
            _ => Err(FlatwikiError::UnknownTool {
                name: name.to_string(),
            }),
        }
    }

    /// Call a tool, rendering every failure as a response.
    pub fn call(&self, name: &str, arguments: Value) -> ToolResponse {
        self.try_call(name, arguments).unwrap_or_else(|err| {
            warn!(tool = %name, error = %err, "Tool call rejected");
            ToolResponse::from_error(&err)
        })
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(tool: &str, arguments: Value) -> Result<T> {
    serde_json::from_value(arguments).map_err(|e| FlatwikiError::InvalidArguments {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}
