//! MCP JSON-RPC 2.0 server — reads requests from stdin, writes responses to
//! stdout.
//!
//! The protocol is newline-delimited JSON over STDIO; tracing goes to stderr
//! so it never interferes with the stream. The snapshot file is re-read for
//! every tool call, keeping each operation a one-shot build over whatever
//! the file holds at that moment.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use super::tools;
use super::types::*;
use crate::snapshot::Snapshot;

/// Load a snapshot from its JSON file form.
pub fn load_snapshot(path: &Path) -> anyhow::Result<Snapshot> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading snapshot file {}", path.display()))?;
    Snapshot::from_json(&raw)
        .with_context(|| format!("parsing snapshot file {}", path.display()))
}

/// Run the MCP server loop against a snapshot file until stdin closes.
pub fn run(snapshot_path: PathBuf) {
    info!(snapshot = %snapshot_path.display(), "MCP server starting");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!(error = %e, "failed to read stdin");
                break;
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let request: JsonRpcRequest = match serde_json::from_str(trimmed) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "invalid JSON-RPC request");
                let response =
                    JsonRpcResponse::error(None, -32700, format!("Parse error: {}", e));
                write_response(&mut stdout, &response);
                continue;
            }
        };

        if let Some(response) = handle_request(&snapshot_path, &request) {
            write_response(&mut stdout, &response);
        }
    }

    info!("MCP server shutting down");
}

/// Handle one request; notifications return None.
fn handle_request(snapshot_path: &Path, request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
    let id = request.id.clone();

    match request.method.as_str() {
        "initialize" => {
            info!("client initializing");
            Some(JsonRpcResponse::success(
                id,
                json!({
                    "protocolVersion": "2024-11-05",
                    "capabilities": { "tools": {} },
                    "serverInfo": {
                        "name": "refgraph",
                        "version": env!("CARGO_PKG_VERSION"),
                    }
                }),
            ))
        }

        "notifications/initialized" => {
            info!("client initialized");
            None
        }

        "tools/list" => {
            debug!("listing tools");
            Some(JsonRpcResponse::success(
                id,
                json!({ "tools": tools::list_tools() }),
            ))
        }

        "tools/call" => {
            let params: ToolsCallParams = match serde_json::from_value(request.params.clone()) {
                Ok(p) => p,
                Err(e) => {
                    return Some(JsonRpcResponse::error(
                        id,
                        -32602,
                        format!("Invalid params: {}", e),
                    ));
                }
            };

            debug!(tool = %params.name, "calling tool");

            // Fresh snapshot per call; the graph built from it is dropped
            // with the response.
            let snapshot = match load_snapshot(snapshot_path) {
                Ok(s) => s,
                Err(e) => {
                    return Some(JsonRpcResponse::error(
                        id,
                        -32603,
                        format!("Snapshot load failed: {:#}", e),
                    ));
                }
            };

            let result = tools::call_tool(&snapshot, &params.name, &params.arguments);
            Some(JsonRpcResponse::success(
                id,
                serde_json::to_value(result).unwrap_or(Value::Null),
            ))
        }

        "ping" => Some(JsonRpcResponse::success(
            id,
            Value::Object(Default::default()),
        )),

        _ => {
            warn!(method = %request.method, "unknown method");
            Some(JsonRpcResponse::error(
                id,
                -32601,
                format!("Method not found: {}", request.method),
            ))
        }
    }
}

/// Write a JSON-RPC response to stdout (newline-delimited).
fn write_response(stdout: &mut impl Write, response: &JsonRpcResponse) {
    let json = serde_json::to_string(response).unwrap_or_default();
    let _ = writeln!(stdout, "{}", json);
    let _ = stdout.flush();
}
