//! Refgraph MCP server — scene reference analysis for AI agents.
//!
//! Runs a JSON-RPC 2.0 server over STDIO that exposes the five graph
//! operations through the Model Context Protocol (MCP).
//!
//! Usage:
//!   refgraph-mcp <snapshot.json>
//!
//! The snapshot file is re-read on every tool call, so edits to it are
//! picked up without restarting the server.

use std::path::PathBuf;
use std::process::exit;

use tracing::info;

fn main() {
    // Tracing to stderr (MCP uses stdout for the protocol)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let snapshot_path = match std::env::args().nth(1) {
        Some(p) => PathBuf::from(p),
        None => {
            eprintln!("usage: refgraph-mcp <snapshot.json>");
            exit(2);
        }
    };

    // Fail fast on an unreadable snapshot instead of erroring per call.
    if let Err(e) = refgraph::mcp::server::load_snapshot(&snapshot_path) {
        eprintln!("error: {:#}", e);
        exit(1);
    }

    info!("MCP server ready — waiting for JSON-RPC requests on stdin");
    refgraph::mcp::server::run(snapshot_path);
}
