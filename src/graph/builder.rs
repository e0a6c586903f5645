//! Graph builder — runs enumerate/extract/assemble for one operation.
//!
//! This is the only entry point that produces a `RefGraph`. Each call builds
//! a fresh graph from the snapshot; nothing is cached across calls.

use tracing::debug;

use super::engine::RefGraph;
use super::types::{Edge, Node};
use crate::error::Result;
use crate::extract::extract;
use crate::registry::{enumerate, Scope};
use crate::snapshot::Snapshot;

/// Build a reference graph over the entities visible in `scope`.
///
/// Enumerates entities, extracts raw edges per entity, and assembles the
/// deduplicated graph. Unreadable fields accumulate into the graph's warning
/// count; they never fail the build.
pub fn build_graph(snapshot: &Snapshot, scope: &Scope) -> Result<RefGraph> {
    let descriptors = enumerate(snapshot, scope)?;

    let mut nodes: Vec<Node> = Vec::with_capacity(descriptors.len());
    let mut edges: Vec<Edge> = Vec::new();
    let mut roots: Vec<String> = Vec::new();
    let mut warnings = 0usize;

    for descriptor in &descriptors {
        nodes.push(Node::entity(&descriptor.id, &descriptor.display_name));
        if descriptor.is_root {
            roots.push(descriptor.id.clone());
        }

        let extraction = extract(descriptor);
        nodes.extend(extraction.nodes);
        edges.extend(extraction.edges);
        warnings += extraction.warnings;
    }

    debug!(
        entities = descriptors.len(),
        raw_edges = edges.len(),
        warnings,
        "extraction complete"
    );

    Ok(RefGraph::assemble(nodes, edges, roots, warnings))
}
