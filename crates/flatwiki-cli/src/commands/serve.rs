//! Serve command - JSON-lines request loop on stdin/stdout.
//!
//! Each input line is one request; each request gets exactly one response
//! line. Requests either call a tool:
//!
//! ```json
//! {"id": 1, "tool": "search_wiki", "arguments": {"query": "backup"}}
//! ```
//!
//! or invoke a method: `tools/list`, `resources/list`, or `resources/read`
//! with a `uri`. Malformed lines get an error response and the loop goes on.

use crate::app::App;
use flatwiki_core::tools::ToolRegistry;
use flatwiki_core::{Outcome, QueryEngine, Status, ToolResponse};
use serde::Deserialize;
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct Request {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    tool: Option<String>,
    #[serde(default)]
    arguments: Value,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    uri: Option<String>,
}

/// Run the serve command.
pub fn run(app: &App) -> anyhow::Result<()> {
    info!("Serving tool calls on stdin");
    let stdin = io::stdin();
    let stdout = io::stdout();
    let handled = serve(&app.engine, stdin.lock(), stdout.lock())?;
    info!(requests = handled, "Input closed");
    Ok(())
}

/// Answer requests from `input` until it is exhausted, returning the number
/// of requests handled.
pub fn serve<R: BufRead, W: Write>(
    engine: &QueryEngine,
    mut input: R,
    mut output: W,
) -> anyhow::Result<usize> {
    let registry = ToolRegistry::new(engine);
    let mut handled = 0;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => match serde_json::from_str::<Request>(line) {
                Ok(request) => {
                    let id = request.id.clone();
                    with_id(handle(&registry, engine, request), id)
                }
                Err(e) => {
                    warn!(error = %e, "Malformed request");
                    error_response(&format!("Error: invalid request: {}", e))
                }
            },
            Err(e) => {
                warn!(error = %e, "Request is not valid UTF-8");
                error_response(&format!("Error: invalid request: {}", e))
            }
        };

        serde_json::to_writer(&mut output, &response)?;
        output.write_all(b"\n")?;
        output.flush()?;
        handled += 1;
    }

    Ok(handled)
}

fn handle(registry: &ToolRegistry<'_>, engine: &QueryEngine, request: Request) -> Value {
    if let Some(tool) = request.tool {
        debug!(tool = %tool, "Tool request");
        return tool_response(registry.call(&tool, request.arguments));
    }

    match request.method.as_deref() {
        Some("tools/list") => json!({ "status": Status::Success, "tools": registry.tools() }),
        Some("resources/list") => match engine.resources() {
            Outcome::Ok(list) => json!({
                "status": if list.resources.is_empty() { Status::Empty } else { Status::Success },
                "resources": list.resources,
            }),
            other => tool_response(ToolResponse::from_outcome(other)),
        },
        Some("resources/read") => match request.uri {
            Some(uri) => tool_response(ToolResponse::from_outcome(engine.read_resource(&uri))),
            None => error_response("Error: resources/read requires a uri"),
        },
        Some(other) => error_response(&format!("Unknown method: {}", other)),
        None => error_response("Error: request needs a tool or a method"),
    }
}

fn tool_response(response: ToolResponse) -> Value {
    json!({ "status": response.status, "text": response.text })
}

fn error_response(text: &str) -> Value {
    json!({ "status": Status::Error, "text": text })
}

fn with_id(mut response: Value, id: Option<Value>) -> Value {
    if let (Some(id), Some(map)) = (id, response.as_object_mut()) {
        map.insert("id".to_string(), id);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_engine() -> (TempDir, QueryEngine) {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("Main.HomePage"), "text=Hello%0aWorld").unwrap();
        let engine = QueryEngine::open(temp_dir.path());
        (temp_dir, engine)
    }

    fn run_lines(engine: &QueryEngine, input: &str) -> Vec<Value> {
        run_bytes(engine, input.as_bytes())
    }

    fn run_bytes(engine: &QueryEngine, input: &[u8]) -> Vec<Value> {
        let mut out = Vec::new();
        serve(engine, input, &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_tool_call() {
        let (_temp_dir, engine) = make_engine();
        let responses = run_lines(
            &engine,
            r#"{"id": 7, "tool": "read_page", "arguments": {"page_name": "Main/HomePage"}}"#,
        );

        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], json!(7));
        assert_eq!(responses[0]["status"], json!("success"));
        assert_eq!(responses[0]["text"], json!("# Main/HomePage\n\nHello\nWorld"));
    }

    #[test]
    fn test_methods() {
        let (_temp_dir, engine) = make_engine();
        let input = concat!(
            r#"{"method": "tools/list"}"#,
            "\n",
            r#"{"method": "resources/list"}"#,
            "\n",
            r#"{"method": "resources/read", "uri": "pmwiki://Main.HomePage"}"#,
            "\n",
            r#"{"method": "resources/read", "uri": "file:///etc/passwd"}"#,
            "\n",
        );
        let responses = run_lines(&engine, input);

        assert_eq!(responses[0]["tools"].as_array().unwrap().len(), 3);
        assert_eq!(
            responses[1]["resources"][0]["uri"],
            json!("pmwiki://Main.HomePage")
        );
        assert_eq!(responses[2]["text"], json!("Hello\nWorld"));
        assert_eq!(responses[3]["status"], json!("invalid_address"));
    }

    #[test]
    fn test_bad_lines_do_not_stop_the_loop() {
        let (_temp_dir, engine) = make_engine();
        let input = "not json\n\n{\"tool\": \"nope\"}\n{\"method\": \"resources/list\"}\n";
        let responses = run_lines(&engine, input);

        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0]["status"], json!("error"));
        assert_eq!(responses[1]["text"], json!("Unknown tool: nope"));
        assert_eq!(responses[2]["status"], json!("success"));
    }

    #[test]
    fn test_non_utf8_line_is_answered_and_skipped() {
        let (_temp_dir, engine) = make_engine();
        let input = b"{\"tool\": \"list_pages\"}\n\xff\xfe garbage\n{\"id\": 3, \"tool\": \"list_pages\"}\n";
        let responses = run_bytes(&engine, input);

        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0]["status"], json!("success"));
        assert_eq!(responses[1]["status"], json!("error"));
        assert!(responses[1]["text"]
            .as_str()
            .unwrap()
            .starts_with("Error: invalid request:"));
        assert_eq!(responses[2]["id"], json!(3));
        assert_eq!(responses[2]["status"], json!("success"));
    }

    #[test]
    fn test_last_line_without_newline() {
        let (_temp_dir, engine) = make_engine();
        let responses = run_lines(&engine, r#"{"method": "tools/list"}"#);
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["tools"][0]["name"], json!("search_wiki"));
    }
}
