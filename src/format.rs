//! Result formatter — renders a `GraphResult` into one of four encodings.
//!
//! json is the only lossless encoding; dot and mermaid are for diagram
//! tooling, summary for humans. Unknown format names fall back to json.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::types::{EdgeKind, GraphResult, NodeKind};

/// The supported output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Json,
    Dot,
    Mermaid,
    Summary,
}

impl OutputFormat {
    /// Resolve a format name. Unknown names fall back to json rather than
    /// failing, so callers never see a format error.
    pub fn from_name(name: &str) -> Self {
        match name {
            "json" => OutputFormat::Json,
            "dot" => OutputFormat::Dot,
            "mermaid" => OutputFormat::Mermaid,
            "summary" => OutputFormat::Summary,
            other => {
                debug!(format = %other, "unknown format, falling back to json");
                OutputFormat::Json
            }
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Dot => write!(f, "dot"),
            OutputFormat::Mermaid => write!(f, "mermaid"),
            OutputFormat::Summary => write!(f, "summary"),
        }
    }
}

/// Render a query result in the requested encoding.
pub fn render(result: &GraphResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => render_json(result),
        OutputFormat::Dot => render_dot(result),
        OutputFormat::Mermaid => render_mermaid(result),
        OutputFormat::Summary => render_summary(result),
    }
}

fn render_json(result: &GraphResult) -> String {
    serde_json::to_string_pretty(result).unwrap_or_default()
}

fn render_dot(result: &GraphResult) -> String {
    let mut dot = String::from("digraph refs {\n");
    dot.push_str("  rankdir=TB;\n");
    dot.push_str("  node [shape=box];\n\n");

    for node in &result.nodes {
        let _ = writeln!(
            dot,
            "  \"{}\" [label=\"{}\"{}];",
            dot_escape(&node.id),
            dot_escape(&node.display_name),
            dot_node_attrs(node.kind)
        );
    }

    dot.push('\n');

    for edge in &result.edges {
        let label = if edge.label.is_empty() {
            String::new()
        } else {
            format!("label=\"{}\", ", dot_escape(&edge.label))
        };
        let _ = writeln!(
            dot,
            "  \"{}\" -> \"{}\" [{}style={}];",
            dot_escape(&edge.from),
            dot_escape(&edge.to),
            label,
            dot_edge_style(edge.kind)
        );
    }

    dot.push_str("}\n");
    dot
}

fn dot_node_attrs(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Entity => "",
        NodeKind::Behavior => ", shape=component",
        NodeKind::Asset => ", shape=ellipse",
        NodeKind::Unresolved => ", style=dashed",
    }
}

fn dot_edge_style(kind: EdgeKind) -> &'static str {
    match kind {
        EdgeKind::Hierarchy => "solid",
        EdgeKind::FieldReference => "bold",
        EdgeKind::EventListener => "dashed",
        EdgeKind::AssetReference => "dotted",
    }
}

fn dot_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn render_mermaid(result: &GraphResult) -> String {
    let mut out = String::from("flowchart TD\n");

    // Mermaid node ids cannot carry slashes, so nodes get positional
    // aliases; node order is already deterministic.
    let alias: std::collections::HashMap<&str, String> = result
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), format!("n{}", i)))
        .collect();

    for node in &result.nodes {
        let _ = writeln!(
            out,
            "    {}[\"{}\"]",
            alias[node.id.as_str()],
            mermaid_escape(&node.display_name)
        );
    }

    for edge in &result.edges {
        let (from, to) = (&alias[edge.from.as_str()], &alias[edge.to.as_str()]);
        let arrow = match edge.kind {
            EdgeKind::Hierarchy => "-->",
            EdgeKind::FieldReference => "==>",
            EdgeKind::EventListener => "-.->",
            EdgeKind::AssetReference => "-.->",
        };
        if edge.label.is_empty() {
            let _ = writeln!(out, "    {} {} {}", from, arrow, to);
        } else {
            let _ = writeln!(
                out,
                "    {} {}|{}| {}",
                from,
                arrow,
                mermaid_escape(&edge.label),
                to
            );
        }
    }

    out
}

fn mermaid_escape(s: &str) -> String {
    s.replace(['"', '|', '[', ']'], "_")
}

fn render_summary(result: &GraphResult) -> String {
    let s = &result.summary;
    let mut out = String::new();
    let _ = writeln!(out, "Nodes: {}", s.node_count);
    let _ = writeln!(out, "Edges: {}", s.edge_count);
    let _ = writeln!(out, "  hierarchy: {}", s.hierarchy_edges);
    let _ = writeln!(out, "  field_reference: {}", s.field_reference_edges);
    let _ = writeln!(out, "  event_listener: {}", s.event_listener_edges);
    let _ = writeln!(out, "  asset_reference: {}", s.asset_reference_edges);
    if s.orphans.is_empty() {
        let _ = writeln!(out, "Orphans: none");
    } else {
        let _ = writeln!(out, "Orphans: {}", s.orphans.join(", "));
    }
    let _ = writeln!(out, "Longest reference chain: {}", s.longest_chain);
    let _ = writeln!(out, "Warnings: {}", s.warnings);

    if let Some(hits) = &result.references {
        let _ = writeln!(out, "References: {}", hits.len());
        for hit in hits {
            let label = if hit.label.is_empty() {
                String::new()
            } else {
                format!(" '{}'", hit.label)
            };
            let _ = writeln!(
                out,
                "  {} ({}{}, depth {})",
                hit.id, hit.via, label, hit.depth
            );
        }
    }

    out
}
