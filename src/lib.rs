//! # Refgraph
//!
//! Object-reference graph engine for editor scene snapshots.
//!
//! Given an in-memory snapshot of a scene — entities in a tree, each with
//! attached behavior modules whose reference-carrying fields and event
//! containers were captured — refgraph builds a directed graph of how
//! everything relates (hierarchy, typed field references, event-listener
//! bindings, asset references) and answers structural queries over it.
//!
//! ## Key properties
//!
//! - **One-shot**: every operation builds a fresh graph and discards it with
//!   the response. No cache, no invalidation, no locking.
//! - **Deterministic**: stable ancestry-derived ids, sorted output; the same
//!   snapshot always renders the same answer.
//! - **Cycle-safe**: all traversals are visited-set BFS, so reference cycles
//!   never cause non-termination.
//! - **Loss-averse**: dangling references become `Unresolved` placeholder
//!   nodes, and unreadable fields become a warning count, never a failure.
//!
//! ## Quick start
//!
//! ```rust
//! use refgraph::ops::{analyze_scene, AnalyzeOptions};
//! use refgraph::snapshot::{SceneEntity, Snapshot};
//!
//! let snapshot = Snapshot::new(vec![
//!     SceneEntity::new("Root").with_child(SceneEntity::new("Player")),
//! ]);
//!
//! let report = analyze_scene(&snapshot, &AnalyzeOptions::default()).unwrap();
//! assert!(report.body.contains("Root/Player"));
//! ```

pub mod error;
pub mod extract;
pub mod format;
pub mod graph;
pub mod mcp;
pub mod ops;
pub mod registry;
pub mod snapshot;

// Re-exports for convenience
pub use error::{GraphError, Result};

// Graph re-exports
pub use format::{render, OutputFormat};
pub use graph::{build_graph, Edge, EdgeKind, GraphResult, Node, NodeKind, RefGraph, ReferenceHit};
pub use ops::{
    analyze_object, analyze_scene, find_orphans, find_references_from, find_references_to,
    AnalyzeOptions, Report,
};
pub use registry::Scope;
pub use snapshot::{BehaviorSnapshot, FieldValue, SceneEntity, Snapshot};

#[cfg(test)]
mod tests {
    use super::*;

    /// Root with two children; Child1 holds a field reference to Child2 and
    /// an event listener on it.
    fn scene() -> Snapshot {
        Snapshot::new(vec![SceneEntity::new("Root")
            .with_child(
                SceneEntity::new("Child1").with_behavior(
                    BehaviorSnapshot::new("Follower")
                        .with_field(
                            "target",
                            FieldValue::Entity {
                                path: "Root/Child2".to_string(),
                            },
                        )
                        .with_listener("onArrive", "Root/Child2", "Celebrate"),
                ),
            )
            .with_child(SceneEntity::new("Child2"))])
    }

    #[test]
    fn test_build_determinism() {
        let snapshot = scene();
        let a = build_graph(&snapshot, &Scope::WholeSnapshot).unwrap();
        let b = build_graph(&snapshot, &Scope::WholeSnapshot).unwrap();

        let ra = a.analyze_scene(true, true);
        let rb = b.analyze_scene(true, true);
        assert_eq!(ra.nodes, rb.nodes);
        assert_eq!(ra.edges, rb.edges);
        assert_eq!(ra.summary.orphans, rb.summary.orphans);
    }

    #[test]
    fn test_id_uniqueness_under_duplicate_names() {
        let snapshot = Snapshot::new(vec![SceneEntity::new("Root")
            .with_child(SceneEntity::new("Enemy"))
            .with_child(SceneEntity::new("Enemy"))]);

        let graph = build_graph(&snapshot, &Scope::WholeSnapshot).unwrap();
        let result = graph.analyze_scene(true, true);

        let mut ids: Vec<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
        let before = ids.len();
        ids.dedup();
        assert_eq!(ids.len(), before);
        assert_eq!(
            result
                .nodes
                .iter()
                .filter(|n| n.display_name == "Enemy")
                .count(),
            2
        );
    }

    #[test]
    fn test_cycle_safety() {
        // A -> B -> C -> A through field references.
        let snapshot = Snapshot::new(vec![
            SceneEntity::new("A").with_behavior(BehaviorSnapshot::new("Link").with_field(
                "next",
                FieldValue::Entity {
                    path: "B".to_string(),
                },
            )),
            SceneEntity::new("B").with_behavior(BehaviorSnapshot::new("Link").with_field(
                "next",
                FieldValue::Entity {
                    path: "C".to_string(),
                },
            )),
            SceneEntity::new("C").with_behavior(BehaviorSnapshot::new("Link").with_field(
                "next",
                FieldValue::Entity {
                    path: "A".to_string(),
                },
            )),
        ]);

        let graph = build_graph(&snapshot, &Scope::WholeSnapshot).unwrap();
        let result = graph.find_references_from("A").unwrap();
        let hits = result.references.unwrap();
        let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "C"]);
    }

    #[test]
    fn test_orphan_coverage_law() {
        // Root with C1, C2 where C1 references C2: nothing is an orphan.
        let report = find_orphans(&scene(), &AnalyzeOptions::default()).unwrap();
        let result: GraphResult = serde_json::from_str(&report.body).unwrap();
        assert!(result.nodes.is_empty());
        assert!(result.summary.orphans.is_empty());
    }

    #[test]
    fn test_reference_lookup_example() {
        let snapshot = Snapshot::new(vec![SceneEntity::new("Root")
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
            .with_child(SceneEntity::new("Child2"))]);

        let graph = build_graph(&snapshot, &Scope::WholeSnapshot).unwrap();

        let full = graph.analyze_scene(true, true);
        assert_eq!(full.nodes.len(), 3);
        assert_eq!(full.edges.len(), 3);

        let result = graph.find_references_to("Root/Child2").unwrap();
        let hits = result.references.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "Root");
        assert_eq!(hits[0].via, EdgeKind::Hierarchy);
        assert_eq!(hits[0].depth, 1);
        assert_eq!(hits[1].id, "Root/Child1");
        assert_eq!(hits[1].via, EdgeKind::FieldReference);
        assert_eq!(hits[1].label, "target");
        assert_eq!(hits[1].depth, 1);
    }

    #[test]
    fn test_dangling_reference_yields_unresolved_node() {
        let snapshot = Snapshot::new(vec![SceneEntity::new("Root").with_behavior(
            BehaviorSnapshot::new("Follower").with_field(
                "target",
                FieldValue::Entity {
                    path: "Root/Deleted".to_string(),
                },
            ),
        )]);

        let graph = build_graph(&snapshot, &Scope::WholeSnapshot).unwrap();
        let result = graph.analyze_scene(true, true);

        let placeholders: Vec<&Node> = result
            .nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Unresolved)
            .collect();
        assert_eq!(placeholders.len(), 1);
        assert_eq!(placeholders[0].id, "Root/Deleted");
        // The edge survives intact.
        assert_eq!(result.edges.len(), 1);
        assert_eq!(result.edges[0].to, "Root/Deleted");
    }

    #[test]
    fn test_format_fallback() {
        let snapshot = scene();
        let mut options = AnalyzeOptions::default();
        options.format = "xml".to_string();
        let fallback = analyze_scene(&snapshot, &options).unwrap();

        options.format = "json".to_string();
        let json = analyze_scene(&snapshot, &options).unwrap();

        assert_eq!(fallback.body, json.body);
    }

    #[test]
    fn test_json_round_trip() {
        let snapshot = scene();
        let graph = build_graph(&snapshot, &Scope::WholeSnapshot).unwrap();
        let result = graph.analyze_scene(true, true);

        let body = render(&result, OutputFormat::Json);
        let parsed: GraphResult = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed.nodes, result.nodes);
        assert_eq!(parsed.edges, result.edges);
    }

    #[test]
    fn test_event_listener_edges() {
        let graph = build_graph(&scene(), &Scope::WholeSnapshot).unwrap();
        let result = graph.analyze_scene(true, true);
        let listener = result
            .edges
            .iter()
            .find(|e| e.kind == EdgeKind::EventListener)
            .unwrap();
        assert_eq!(listener.from, "Root/Child1");
        assert_eq!(listener.to, "Root/Child2");
        assert_eq!(listener.label, "Celebrate");

        let filtered = graph.analyze_scene(true, false);
        assert!(filtered
            .edges
            .iter()
            .all(|e| e.kind != EdgeKind::EventListener));
    }

    #[test]
    fn test_asset_references_reach_the_rendered_graph() {
        let snapshot = Snapshot::new(vec![SceneEntity::new("Root").with_behavior(
            BehaviorSnapshot::new("Renderer").with_field(
                "material",
                FieldValue::Asset {
                    path: "Assets/Materials/Lava.mat".to_string(),
                },
            ),
        )]);

        let mut options = AnalyzeOptions::default();
        options.format = "dot".to_string();
        let report = analyze_scene(&snapshot, &options).unwrap();
        assert!(report
            .body
            .contains("\"Root\" -> \"Assets/Materials/Lava.mat\""));
        assert!(report.body.contains("style=dotted"));
    }

    #[test]
    fn test_analyze_object_end_to_end() {
        let report =
            analyze_object(&scene(), "Root/Child1", &AnalyzeOptions::default()).unwrap();
        let result: GraphResult = serde_json::from_str(&report.body).unwrap();
        // Incoming hierarchy, outgoing field reference, outgoing listener.
        assert_eq!(result.edges.len(), 3);
        assert!(result.nodes.iter().any(|n| n.id == "Root/Child2"));
    }
}
