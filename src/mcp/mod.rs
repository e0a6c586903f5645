//! MCP server — exposes the five graph operations over JSON-RPC 2.0 stdio.

pub mod server;
pub mod tools;
pub mod types;
