use amr_core::errors::{AmrError, ErrorInfo};
use amr_core::{NodeId, Point};
use serde::{Deserialize, Serialize};

use crate::flags::{GraphConfig, GRAPH_SCHEMA};
use crate::hypergraph::MeshGraph;

/// Serializes the graph to a compact binary representation using `bincode`.
pub fn graph_to_bytes(graph: &MeshGraph) -> Result<Vec<u8>, AmrError> {
    let serializable = SerializableGraph::from_graph(graph);
    bincode::serialize(&serializable)
        .map_err(|err| AmrError::Serde(ErrorInfo::new("serialize-bytes", err.to_string())))
}

/// Restores a graph from its binary representation.
pub fn graph_from_bytes(bytes: &[u8]) -> Result<MeshGraph, AmrError> {
    let serializable: SerializableGraph = bincode::deserialize(bytes)
        .map_err(|err| AmrError::Serde(ErrorInfo::new("deserialize-bytes", err.to_string())))?;
    serializable.into_graph()
}

/// Serializes the graph to a JSON string.
pub fn graph_to_json(graph: &MeshGraph) -> Result<String, AmrError> {
    let serializable = SerializableGraph::from_graph(graph);
    serde_json::to_string_pretty(&serializable)
        .map_err(|err| AmrError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}

/// Restores a graph from a JSON string.
pub fn graph_from_json(json: &str) -> Result<MeshGraph, AmrError> {
    let serializable: SerializableGraph = serde_json::from_str(json)
        .map_err(|err| AmrError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))?;
    serializable.into_graph()
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableGraph {
    config: GraphConfig,
    nodes: Vec<SerializableNode>,
    edges: Vec<SerializableEdge>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableNode {
    x: f64,
    y: f64,
    label: String,
}

// Removed edges are kept as tombstones so identifiers survive a round trip.
#[derive(Debug, Serialize, Deserialize)]
struct SerializableEdge {
    alive: bool,
    nodes: Vec<u64>,
    label: String,
    marked: bool,
    border: bool,
}

impl SerializableGraph {
    fn from_graph(graph: &MeshGraph) -> Self {
        let nodes = graph
            .nodes()
            .map(|(_, node)| SerializableNode {
                x: node.x(),
                y: node.y(),
                label: node.label().to_string(),
            })
            .collect();
        let edges = graph
            .edge_records()
            .iter()
            .map(|record| SerializableEdge {
                alive: record.alive,
                nodes: record.edge.nodes().iter().map(|id| id.as_raw()).collect(),
                label: record.edge.label().to_string(),
                marked: record.edge.is_marked(),
                border: record.edge.is_border(),
            })
            .collect();
        Self {
            config: graph.config().clone(),
            nodes,
            edges,
        }
    }

    fn into_graph(self) -> Result<MeshGraph, AmrError> {
        if !GRAPH_SCHEMA.is_compatible_with(&self.config.schema_version) {
            return Err(AmrError::Serde(
                ErrorInfo::new("schema-mismatch", "unsupported graph schema version")
                    .with_context("found", format!("{:?}", self.config.schema_version))
                    .with_context("supported", format!("{GRAPH_SCHEMA:?}")),
            ));
        }
        let mut graph = MeshGraph::new(self.config);
        for node in self.nodes {
            graph.add_node(Point::new(node.x, node.y), node.label);
        }
        for edge in self.edges {
            let nodes: Vec<NodeId> = edge.nodes.into_iter().map(NodeId::from_raw).collect();
            graph.restore_edge(edge.alive, nodes, edge.label, edge.marked, edge.border)?;
        }
        Ok(graph)
    }
}
