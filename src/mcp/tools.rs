//! MCP tool implementations — maps tool calls to graph operations.

use serde_json::{json, Value};

use super::types::{ToolDefinition, ToolsCallResult};
use crate::ops::{
    analyze_object, analyze_scene, find_orphans, find_references_from, find_references_to,
    AnalyzeOptions, Report,
};
use crate::snapshot::Snapshot;

/// Option properties shared by every tool schema.
fn option_properties() -> Value {
    json!({
        "format": {
            "type": "string",
            "description": "Output encoding (default: json; unknown names fall back to json)",
            "enum": ["json", "dot", "mermaid", "summary"]
        },
        "includeHierarchy": {
            "type": "boolean",
            "description": "Include parent/child hierarchy edges (default: true)"
        },
        "includeEvents": {
            "type": "boolean",
            "description": "Include event-listener edges (default: true)"
        },
        "includeChildren": {
            "type": "boolean",
            "description": "Expand descendants when analyzing one entity (default: false)"
        },
        "maxDepth": {
            "type": "integer",
            "description": "Depth cap for descendant expansion (default: 7)"
        }
    })
}

/// Return the list of all available tools with their JSON schemas.
pub fn list_tools() -> Vec<ToolDefinition> {
    let mut with_id = option_properties();
    with_id["id"] = json!({
        "type": "string",
        "description": "Entity id: its slash-joined hierarchy path (e.g., 'Root/Arm/Hand')"
    });

    vec![
        ToolDefinition {
            name: "refgraph_scene".to_string(),
            description: "Build the reference graph for the whole scene snapshot: hierarchy, \
                field references, event-listener bindings, and asset references."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": option_properties()
            }),
        },
        ToolDefinition {
            name: "refgraph_object".to_string(),
            description: "Analyze one entity: its direct incoming and outgoing references, \
                optionally expanded over its descendants."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": with_id.clone(),
                "required": ["id"]
            }),
        },
        ToolDefinition {
            name: "refgraph_references_to".to_string(),
            description: "Find everything that references an entity, directly or through a \
                chain of references. Each hit is annotated with its shortest depth."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": with_id.clone(),
                "required": ["id"]
            }),
        },
        ToolDefinition {
            name: "refgraph_references_from".to_string(),
            description: "Find everything an entity references, directly or through a chain \
                of references. Each hit is annotated with its shortest depth."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": with_id,
                "required": ["id"]
            }),
        },
        ToolDefinition {
            name: "refgraph_orphans".to_string(),
            description: "List nodes no other node references (scene roots are exempt)."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": option_properties()
            }),
        },
    ]
}

/// Dispatch a tool call to the appropriate operation.
pub fn call_tool(snapshot: &Snapshot, name: &str, arguments: &Value) -> ToolsCallResult {
    // Absent arguments arrive as null; treat that as "all defaults".
    let args = if arguments.is_null() {
        json!({})
    } else {
        arguments.clone()
    };
    let options: AnalyzeOptions = match serde_json::from_value(args) {
        Ok(o) => o,
        Err(e) => return ToolsCallResult::error(format!("Invalid arguments: {}", e)),
    };

    let outcome = match name {
        "refgraph_scene" => analyze_scene(snapshot, &options),
        "refgraph_object" => match required_id(arguments) {
            Ok(id) => analyze_object(snapshot, id, &options),
            Err(e) => return e,
        },
        "refgraph_references_to" => match required_id(arguments) {
            Ok(id) => find_references_to(snapshot, id, &options),
            Err(e) => return e,
        },
        "refgraph_references_from" => match required_id(arguments) {
            Ok(id) => find_references_from(snapshot, id, &options),
            Err(e) => return e,
        },
        "refgraph_orphans" => find_orphans(snapshot, &options),
        _ => return ToolsCallResult::error(format!("Unknown tool: {}", name)),
    };

    match outcome {
        Ok(report) => ToolsCallResult::text(report_text(report)),
        Err(e) => ToolsCallResult::error(e.to_string()),
    }
}

fn required_id(arguments: &Value) -> Result<&str, ToolsCallResult> {
    arguments
        .get("id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ToolsCallResult::error("Missing required parameter: id".to_string()))
}

/// The formatted body, with the warning count prepended when extraction was
/// only partially successful.
fn report_text(report: Report) -> String {
    if report.warnings > 0 {
        format!(
            "warning: {} field(s) unreadable during extraction\n{}",
            report.warnings, report.body
        )
    } else {
        report.body
    }
}
