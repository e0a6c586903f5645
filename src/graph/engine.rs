//! The reference graph engine.
//!
//! Uses petgraph to store the directed reference graph and answers the five
//! structural queries. A graph is immutable once assembled and lives only
//! for the duration of one operation.

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

use super::types::*;
use crate::error::{GraphError, Result};

/// Edge payload stored in the petgraph.
#[derive(Debug, Clone)]
struct EdgeData {
    kind: EdgeKind,
    label: String,
}

/// An assembled, immutable reference graph with adjacency in both
/// directions. Forward and backward neighbor lookups are equally cheap,
/// since both query directions are first-class.
pub struct RefGraph {
    graph: DiGraph<Node, EdgeData>,
    /// Index: node id -> petgraph index.
    index: HashMap<String, NodeIndex>,
    /// Ids of snapshot roots, exempt from orphan detection.
    roots: HashSet<String>,
    /// Unreadable-field count carried over from extraction.
    warnings: usize,
}

impl RefGraph {
    /// Assemble a graph from registered nodes and raw edges.
    ///
    /// Edges identical in `(from, to, kind, label)` are deduplicated. An
    /// edge endpoint with no registered node gets an `Unresolved`
    /// placeholder instead of failing the build.
    pub fn assemble(
        nodes: Vec<Node>,
        edges: Vec<Edge>,
        roots: Vec<String>,
        warnings: usize,
    ) -> Self {
        let mut this = Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
            roots: roots.into_iter().collect(),
            warnings,
        };

        for node in nodes {
            this.intern(node);
        }

        let mut seen: HashSet<(String, String, EdgeKind, String)> = HashSet::new();
        for edge in edges {
            if !seen.insert(edge.key()) {
                continue;
            }
            let from = this.resolve(&edge.from);
            let to = this.resolve(&edge.to);
            this.graph.add_edge(
                from,
                to,
                EdgeData {
                    kind: edge.kind,
                    label: edge.label,
                },
            );
        }

        debug!(
            nodes = this.graph.node_count(),
            edges = this.graph.edge_count(),
            "graph assembled"
        );
        this
    }

    /// Register a node unless its id is already taken (first wins).
    fn intern(&mut self, node: Node) -> NodeIndex {
        if let Some(&idx) = self.index.get(&node.id) {
            return idx;
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.index.insert(id, idx);
        idx
    }

    /// Look up an id, minting an `Unresolved` placeholder if unknown.
    fn resolve(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        self.intern(Node::unresolved(id))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&idx| &self.graph[idx])
    }

    // ─── Queries ────────────────────────────────────────────────

    /// The full graph, optionally without hierarchy and/or event edges.
    pub fn analyze_scene(&self, include_hierarchy: bool, include_events: bool) -> GraphResult {
        let nodes: Vec<Node> = self.graph.node_weights().cloned().collect();
        let edges: Vec<Edge> = self
            .graph
            .edge_indices()
            .filter_map(|e| self.edge_at(e))
            .filter(|edge| match edge.kind {
                EdgeKind::Hierarchy => include_hierarchy,
                EdgeKind::EventListener => include_events,
                _ => true,
            })
            .collect();

        self.result(nodes, edges, None)
    }

    /// The subgraph around one entity: its direct outgoing and incoming
    /// edges, plus the same two sets for every descendant when
    /// `include_children` is set, bounded by `max_depth`.
    pub fn analyze_object(
        &self,
        id: &str,
        include_children: bool,
        include_events: bool,
        max_depth: usize,
    ) -> Result<GraphResult> {
        let start = *self
            .index
            .get(id)
            .ok_or_else(|| GraphError::NotFound(id.to_string()))?;

        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut queue: VecDeque<(NodeIndex, usize)> = VecDeque::new();
        let mut collected: HashSet<EdgeIndex> = HashSet::new();

        visited.insert(start);
        queue.push_back((start, 0));

        while let Some((idx, depth)) = queue.pop_front() {
            for direction in [Direction::Outgoing, Direction::Incoming] {
                for edge in self.graph.edges_directed(idx, direction) {
                    if edge.weight().kind == EdgeKind::EventListener && !include_events {
                        continue;
                    }
                    collected.insert(edge.id());
                }
            }

            // Descend the hierarchy, capped to defend against pathological
            // depth or extraction-induced cycles.
            if include_children && depth < max_depth {
                for edge in self.graph.edges_directed(idx, Direction::Outgoing) {
                    if edge.weight().kind != EdgeKind::Hierarchy {
                        continue;
                    }
                    let child = edge.target();
                    if visited.insert(child) {
                        queue.push_back((child, depth + 1));
                    }
                }
            }
        }

        let edges: Vec<Edge> = collected.iter().filter_map(|&e| self.edge_at(e)).collect();
        let mut node_ids: HashSet<NodeIndex> = visited;
        for &e in &collected {
            if let Some((a, b)) = self.graph.edge_endpoints(e) {
                node_ids.insert(a);
                node_ids.insert(b);
            }
        }
        let nodes: Vec<Node> = node_ids.iter().map(|&n| self.graph[n].clone()).collect();

        Ok(self.result(nodes, edges, None))
    }

    /// Every node that reaches `id` through one or more hops, annotated with
    /// its shortest discovered depth.
    pub fn find_references_to(&self, id: &str) -> Result<GraphResult> {
        self.reference_walk(id, Direction::Incoming)
    }

    /// Every node reachable from `id` through one or more hops, annotated
    /// with its shortest discovered depth.
    pub fn find_references_from(&self, id: &str) -> Result<GraphResult> {
        self.reference_walk(id, Direction::Outgoing)
    }

    /// Visited-set BFS in one direction. Cycle-safe by construction: a node
    /// is enqueued at most once, at its shortest discovered depth.
    fn reference_walk(&self, id: &str, direction: Direction) -> Result<GraphResult> {
        let start = *self
            .index
            .get(id)
            .ok_or_else(|| GraphError::NotFound(id.to_string()))?;

        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut queue: VecDeque<(NodeIndex, usize)> = VecDeque::new();
        let mut hits: Vec<ReferenceHit> = Vec::new();
        let mut edges: Vec<Edge> = Vec::new();

        visited.insert(start);
        queue.push_back((start, 0));

        while let Some((idx, depth)) = queue.pop_front() {
            for edge in self.graph.edges_directed(idx, direction) {
                let neighbor = match direction {
                    Direction::Incoming => edge.source(),
                    Direction::Outgoing => edge.target(),
                };
                if !visited.insert(neighbor) {
                    continue;
                }
                let node = &self.graph[neighbor];
                hits.push(ReferenceHit {
                    id: node.id.clone(),
                    display_name: node.display_name.clone(),
                    kind: node.kind,
                    via: edge.weight().kind,
                    label: edge.weight().label.clone(),
                    depth: depth + 1,
                });
                if let Some(discovered) = self.edge_at(edge.id()) {
                    edges.push(discovered);
                }
                queue.push_back((neighbor, depth + 1));
            }
        }

        hits.sort_by(|a, b| a.depth.cmp(&b.depth).then_with(|| a.id.cmp(&b.id)));

        let mut nodes: Vec<Node> = hits
            .iter()
            .filter_map(|h| self.node(&h.id).cloned())
            .collect();
        nodes.push(self.graph[start].clone());

        Ok(self.result(nodes, edges, Some(hits)))
    }

    /// Nodes with zero incoming edges, excluding snapshot roots. Sorted by
    /// id for determinism.
    pub fn find_orphans(&self) -> GraphResult {
        let nodes: Vec<Node> = self
            .graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .edges_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|idx| self.graph[idx].clone())
            .filter(|node| !self.roots.contains(&node.id))
            .collect();

        self.result(nodes, Vec::new(), None)
    }

    // ─── Internal helpers ───────────────────────────────────────

    /// Materialize one stored edge with its endpoint ids.
    fn edge_at(&self, e: EdgeIndex) -> Option<Edge> {
        let (from, to) = self.graph.edge_endpoints(e)?;
        let data = &self.graph[e];
        Some(Edge::new(
            self.graph[from].id.clone(),
            self.graph[to].id.clone(),
            data.kind,
            data.label.clone(),
        ))
    }

    /// Sort, dedupe, and summarize a node/edge set into a `GraphResult`.
    fn result(
        &self,
        mut nodes: Vec<Node>,
        mut edges: Vec<Edge>,
        references: Option<Vec<ReferenceHit>>,
    ) -> GraphResult {
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        nodes.dedup_by(|a, b| a.id == b.id);
        edges.sort_by(|a, b| a.key().cmp(&b.key()));
        let summary = self.summarize(&nodes, &edges);
        GraphResult {
            nodes,
            edges,
            references,
            summary,
        }
    }

    /// Summary counts over the node/edge set actually being returned.
    /// Orphans are judged against the edges in the set, so filtered renders
    /// report what the reader will see.
    fn summarize(&self, nodes: &[Node], edges: &[Edge]) -> GraphSummary {
        let mut summary = GraphSummary {
            node_count: nodes.len(),
            edge_count: edges.len(),
            warnings: self.warnings,
            ..Default::default()
        };
        for edge in edges {
            match edge.kind {
                EdgeKind::Hierarchy => summary.hierarchy_edges += 1,
                EdgeKind::FieldReference => summary.field_reference_edges += 1,
                EdgeKind::EventListener => summary.event_listener_edges += 1,
                EdgeKind::AssetReference => summary.asset_reference_edges += 1,
            }
        }

        let has_incoming: HashSet<&str> = edges.iter().map(|e| e.to.as_str()).collect();
        summary.orphans = nodes
            .iter()
            .filter(|n| !has_incoming.contains(n.id.as_str()) && !self.roots.contains(&n.id))
            .map(|n| n.id.clone())
            .collect();

        summary.longest_chain = longest_chain(nodes, edges);
        summary
    }
}

/// Length of the longest discovered reference chain: the maximum BFS depth
/// reachable from any node over the given edges. Visited-set BFS, so cycles
/// cannot cause non-termination.
fn longest_chain(nodes: &[Node], edges: &[Edge]) -> usize {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        adjacency
            .entry(edge.from.as_str())
            .or_default()
            .push(edge.to.as_str());
    }

    let mut longest = 0;
    for node in nodes {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<(&str, usize)> = VecDeque::new();
        visited.insert(node.id.as_str());
        queue.push_back((node.id.as_str(), 0));
        while let Some((id, depth)) = queue.pop_front() {
            longest = longest.max(depth);
            if let Some(neighbors) = adjacency.get(id) {
                for &next in neighbors {
                    if visited.insert(next) {
                        queue.push_back((next, depth + 1));
                    }
                }
            }
        }
    }
    longest
}
