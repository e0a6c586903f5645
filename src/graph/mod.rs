//! Reference graph module — the structural core of the crate.
//!
//! Provides the graph data model, the assembly path, and the five query
//! algorithms over an assembled graph.

pub mod builder;
pub mod engine;
pub mod types;

pub use builder::build_graph;
pub use engine::RefGraph;
pub use types::{Edge, EdgeKind, GraphResult, GraphSummary, Node, NodeKind, ReferenceHit};
