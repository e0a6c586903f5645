//! Core types for the reference graph.
//!
//! Defines node kinds, edge kinds, and the result structures shared by all
//! five queries and the formatter.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of a node in the reference graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// An addressable entity in the snapshot.
    Entity,
    /// A behavior module attached to an entity.
    Behavior,
    /// A non-entity asset (material, clip, ...), keyed by asset path.
    Asset,
    /// A placeholder for a reference target not enumerable in scope.
    Unresolved,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Entity => write!(f, "entity"),
            NodeKind::Behavior => write!(f, "behavior"),
            NodeKind::Asset => write!(f, "asset"),
            NodeKind::Unresolved => write!(f, "unresolved"),
        }
    }
}

/// The kind of an edge (relationship) in the reference graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Parent entity to child entity.
    Hierarchy,
    /// A typed field pointing at another entity.
    FieldReference,
    /// A persistent event-listener binding, labeled with the target method.
    EventListener,
    /// A field pointing at a non-entity asset.
    AssetReference,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Hierarchy => write!(f, "hierarchy"),
            EdgeKind::FieldReference => write!(f, "field_reference"),
            EdgeKind::EventListener => write!(f, "event_listener"),
            EdgeKind::AssetReference => write!(f, "asset_reference"),
        }
    }
}

/// A node in the reference graph.
///
/// Ids are stable slash-joined ancestry paths for entities and asset paths
/// for assets; unique within a snapshot even under duplicate display names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub display_name: String,
}

impl Node {
    pub fn entity(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Entity,
            display_name: display_name.into(),
        }
    }

    pub fn asset(path: impl Into<String>) -> Self {
        let id = path.into();
        let display_name = last_segment(&id).to_string();
        Self {
            id,
            kind: NodeKind::Asset,
            display_name,
        }
    }

    pub fn unresolved(id: impl Into<String>) -> Self {
        let id = id.into();
        let display_name = last_segment(&id).to_string();
        Self {
            id,
            kind: NodeKind::Unresolved,
            display_name,
        }
    }
}

/// The trailing path segment, used as a display name for minted nodes.
fn last_segment(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}

/// A directed edge in the reference graph.
///
/// `label` carries the field name for references, the target method name for
/// event listeners, and is empty for hierarchy edges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
    pub label: String,
}

impl Edge {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        kind: EdgeKind,
        label: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind,
            label: label.into(),
        }
    }

    /// The identity used for deduplication.
    pub fn key(&self) -> (String, String, EdgeKind, String) {
        (
            self.from.clone(),
            self.to.clone(),
            self.kind,
            self.label.clone(),
        )
    }
}

/// One node discovered by a reference lookup, annotated with how and how far
/// away it was found.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceHit {
    pub id: String,
    pub display_name: String,
    pub kind: NodeKind,
    /// The edge kind of the first discovered link toward the origin.
    pub via: EdgeKind,
    pub label: String,
    /// Shortest discovered hop count from the origin.
    pub depth: usize,
}

/// The answer to any of the five queries: a node/edge set plus summary
/// counts, and for reference lookups the per-hit annotations.
///
/// Nodes are sorted by id and edges by `(from, to, kind, label)` so identical
/// inputs render identically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphResult {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<ReferenceHit>>,
    pub summary: GraphSummary,
}

/// Summary counts over a result's node/edge set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub hierarchy_edges: usize,
    pub field_reference_edges: usize,
    pub event_listener_edges: usize,
    pub asset_reference_edges: usize,
    /// Nodes with no incoming edge in this result, snapshot roots exempt.
    pub orphans: Vec<String>,
    /// Maximum BFS depth reachable from any node over this result's edges.
    pub longest_chain: usize,
    /// Fields that could not be read during extraction.
    pub warnings: usize,
}
