#![deny(missing_docs)]
#![doc = include_str!("../docs/graph-api.md")]

//! Insertion-ordered mesh hypergraph used by the refinement grammar.

mod audit;
mod flags;
mod generators;
mod hash;
mod hypergraph;
mod ids;
mod serialization;

pub use audit::{ArityAnomaly, StructuralReport};
pub use flags::{grammar_arities, DuplicatePolicy, GraphConfig, GRAPH_SCHEMA};
pub use generators::{initial_mesh, quad_strip, single_hexagon};
pub use hash::canonical_hash;
pub use hypergraph::{is_mesh_edge, Edge, MeshGraph, Node};

/// Re-export serialization helpers for downstream crates.
pub use serialization::{graph_from_bytes, graph_from_json, graph_to_bytes, graph_to_json};
