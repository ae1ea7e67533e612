#![deny(missing_docs)]
#![doc = include_str!("../docs/core-api.md")]

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod errors;
pub mod geometry;
pub mod provenance;

pub use errors::{AmrError, ErrorInfo};
pub use geometry::Point;
pub use provenance::SchemaVersion;

/// Identifier for a node stored in a mesh hypergraph.
///
/// Identifiers are handed out in insertion order and never reused, so
/// comparing two identifiers is an identity comparison of the nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Identifier for an edge or hyperedge stored in a mesh hypergraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(u64);

impl EdgeId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Label carried by every plain mesh node.
pub const NODE_LABEL: &str = "V";
/// Label of a mesh edge.
pub const EDGE_LABEL: &str = "E";
/// Label of a quadrilateral element.
pub const QUAD_LABEL: &str = "Q";
/// Label of a hexagonal element.
pub const HEXAGON_LABEL: &str = "S";
