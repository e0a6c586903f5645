//! Reference extractor — turns one entity into raw typed edges.
//!
//! Strictly one-hop: field and event containers on the entity's own
//! behaviors are scanned, but referenced entities are never recursed into.
//! Unreadable fields are skipped and counted, never fatal.

use tracing::debug;

use crate::graph::types::{Edge, EdgeKind, Node};
use crate::registry::EntityDescriptor;
use crate::snapshot::FieldValue;

/// Everything extracted from a single entity.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Synthetic nodes minted during extraction (asset nodes).
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    /// Count of fields that could not be read.
    pub warnings: usize,
}

/// Extract the raw edges for one enumerated entity.
pub fn extract(descriptor: &EntityDescriptor<'_>) -> Extraction {
    let mut out = Extraction::default();

    // One hierarchy edge from parent, skipped for scene roots.
    if let Some(parent) = &descriptor.parent {
        out.edges
            .push(Edge::new(parent, &descriptor.id, EdgeKind::Hierarchy, ""));
    }

    for behavior in &descriptor.entity.behaviors {
        for slot in &behavior.fields {
            collect_field(&descriptor.id, &slot.name, &slot.value, false, &mut out);
        }

        for event in &behavior.events {
            for binding in &event.listeners {
                out.edges.push(Edge::new(
                    &descriptor.id,
                    &binding.target,
                    EdgeKind::EventListener,
                    &binding.method,
                ));
            }
        }
    }

    if out.warnings > 0 {
        debug!(
            entity = %descriptor.id,
            warnings = out.warnings,
            "some fields were unreadable during extraction"
        );
    }

    out
}

/// Emit edges for one field value. Lists expand element-wise; nested lists
/// are not traversed (top-level fields and collections only).
fn collect_field(
    entity_id: &str,
    field_name: &str,
    value: &FieldValue,
    inside_list: bool,
    out: &mut Extraction,
) {
    match value {
        FieldValue::Empty => {}
        FieldValue::Entity { path } => {
            out.edges.push(Edge::new(
                entity_id,
                path,
                EdgeKind::FieldReference,
                field_name,
            ));
        }
        FieldValue::Asset { path } => {
            out.nodes.push(Node::asset(path.clone()));
            out.edges.push(Edge::new(
                entity_id,
                path,
                EdgeKind::AssetReference,
                field_name,
            ));
        }
        FieldValue::List { items } => {
            if inside_list {
                return;
            }
            for item in items {
                collect_field(entity_id, field_name, item, true, out);
            }
        }
        FieldValue::Unreadable => {
            out.warnings += 1;
        }
    }
}
