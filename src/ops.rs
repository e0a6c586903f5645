//! The five exposed operations.
//!
//! Each operation is one-shot: enumerate, extract, assemble, query, format,
//! then drop the graph. The options record mirrors the wire form used by the
//! command-dispatch layer (camelCase keys, all fields defaulted).

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::format::{render, OutputFormat};
use crate::graph::{build_graph, GraphResult, RefGraph};
use crate::registry::Scope;
use crate::snapshot::Snapshot;

/// Options shared by all five operations.
///
/// `format` stays a string so unknown names can fall back to json instead of
/// failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyzeOptions {
    pub format: String,
    pub include_hierarchy: bool,
    pub include_events: bool,
    pub include_children: bool,
    pub max_depth: usize,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            include_hierarchy: true,
            include_events: true,
            include_children: false,
            max_depth: 7,
        }
    }
}

/// A formatted success payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub format: OutputFormat,
    pub body: String,
    /// Unreadable-field count from extraction; non-fatal.
    pub warnings: usize,
}

/// Analyze the whole snapshot graph.
pub fn analyze_scene(snapshot: &Snapshot, options: &AnalyzeOptions) -> Result<Report> {
    run(snapshot, options, |graph| {
        Ok(graph.analyze_scene(options.include_hierarchy, options.include_events))
    })
}

/// Analyze the subgraph around one entity.
pub fn analyze_object(snapshot: &Snapshot, id: &str, options: &AnalyzeOptions) -> Result<Report> {
    run(snapshot, options, |graph| {
        graph.analyze_object(
            id,
            options.include_children,
            options.include_events,
            options.max_depth,
        )
    })
}

/// Find every node that references `id`, directly or transitively.
pub fn find_references_to(
    snapshot: &Snapshot,
    id: &str,
    options: &AnalyzeOptions,
) -> Result<Report> {
    run(snapshot, options, |graph| graph.find_references_to(id))
}

/// Find every node `id` references, directly or transitively.
pub fn find_references_from(
    snapshot: &Snapshot,
    id: &str,
    options: &AnalyzeOptions,
) -> Result<Report> {
    run(snapshot, options, |graph| graph.find_references_from(id))
}

/// Find nodes with no incoming edges (snapshot roots exempt).
pub fn find_orphans(snapshot: &Snapshot, options: &AnalyzeOptions) -> Result<Report> {
    run(snapshot, options, |graph| Ok(graph.find_orphans()))
}

/// Shared build-query-format pipeline.
///
/// Queries need whole-snapshot visibility for incoming edges, so operations
/// always build over `Scope::WholeSnapshot`; narrower scopes remain
/// available through `build_graph` directly.
fn run(
    snapshot: &Snapshot,
    options: &AnalyzeOptions,
    query: impl FnOnce(&RefGraph) -> Result<GraphResult>,
) -> Result<Report> {
    let graph = build_graph(snapshot, &Scope::WholeSnapshot)?;
    let result = query(&graph)?;
    let format = OutputFormat::from_name(&options.format);

    info!(
        format = %format,
        nodes = result.summary.node_count,
        edges = result.summary.edge_count,
        warnings = result.summary.warnings,
        "operation complete"
    );

    Ok(Report {
        format,
        warnings: result.summary.warnings,
        body: render(&result, format),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;
    use crate::snapshot::{BehaviorSnapshot, FieldValue, SceneEntity};

    fn scene() -> Snapshot {
        Snapshot::new(vec![SceneEntity::new("Root")
            .with_child(
                SceneEntity::new("Child1").with_behavior(
                    BehaviorSnapshot::new("Follower").with_field(
                        "target",
                        FieldValue::Entity {
                            path: "Root/Child2".to_string(),
                        },
                    ),
                ),
            )
            .with_child(SceneEntity::new("Child2"))])
    }

    #[test]
    fn analyze_scene_defaults_to_json() {
        let report = analyze_scene(&scene(), &AnalyzeOptions::default()).unwrap();
        assert_eq!(report.format, OutputFormat::Json);
        let result: GraphResult = serde_json::from_str(&report.body).unwrap();
        assert_eq!(result.nodes.len(), 3);
        assert_eq!(result.edges.len(), 3);
    }

    #[test]
    fn unsupported_format_returns_json_payload() {
        let mut options = AnalyzeOptions::default();
        options.format = "xml".to_string();
        let fallback = analyze_scene(&scene(), &options).unwrap();

        options.format = "json".to_string();
        let json = analyze_scene(&scene(), &options).unwrap();

        assert_eq!(fallback.format, OutputFormat::Json);
        assert_eq!(fallback.body, json.body);
    }

    #[test]
    fn analyze_object_unknown_id_errors() {
        let err = analyze_object(&scene(), "Root/Ghost", &AnalyzeOptions::default()).unwrap_err();
        assert!(matches!(err, GraphError::NotFound(_)));
    }

    #[test]
    fn references_to_report_in_summary_format() {
        let mut options = AnalyzeOptions::default();
        options.format = "summary".to_string();
        let report = find_references_to(&scene(), "Root/Child2", &options).unwrap();
        assert!(report.body.contains("References: 2"));
        assert!(report.body.contains("Root (hierarchy, depth 1)"));
        assert!(report.body.contains("Root/Child1 (field_reference 'target', depth 1)"));
    }

    #[test]
    fn orphans_report_is_empty_for_connected_scene() {
        let report = find_orphans(&scene(), &AnalyzeOptions::default()).unwrap();
        let result: GraphResult = serde_json::from_str(&report.body).unwrap();
        assert!(result.nodes.is_empty());
    }

    #[test]
    fn warnings_surface_on_the_report() {
        let snapshot = Snapshot::new(vec![SceneEntity::new("Root").with_behavior(
            BehaviorSnapshot::new("Flaky").with_field("broken", FieldValue::Unreadable),
        )]);
        let report = analyze_scene(&snapshot, &AnalyzeOptions::default()).unwrap();
        assert_eq!(report.warnings, 1);
    }

    #[test]
    fn options_parse_from_camel_case_wire_form() {
        let options: AnalyzeOptions = serde_json::from_str(
            r#"{"format": "mermaid", "includeChildren": true, "maxDepth": 3}"#,
        )
        .unwrap();
        assert_eq!(options.format, "mermaid");
        assert!(options.include_children);
        assert!(options.include_hierarchy);
        assert_eq!(options.max_depth, 3);
    }
}
