use std::collections::BTreeSet;
use std::fmt;

use amr_core::{
    errors::{AmrError, ErrorInfo},
    EdgeId, NodeId, Point, EDGE_LABEL,
};

use crate::flags::{DuplicatePolicy, GraphConfig};
use crate::ids::{edge_index, make_edge, make_node, node_index};

/// A mesh node: a fixed position and a kind label.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    position: Point,
    label: String,
}

impl Node {
    /// Position of the node.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Horizontal coordinate.
    pub fn x(&self) -> f64 {
        self.position.x
    }

    /// Vertical coordinate.
    pub fn y(&self) -> f64 {
        self.position.y
    }

    /// Kind label of the node.
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// An edge (two nodes) or hyperedge (more than two nodes) with its flags.
///
/// Node order is significant: positions `i` and `(i + 1) % n` are adjacent
/// on the element boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    nodes: Vec<NodeId>,
    label: String,
    marked: bool,
    border: bool,
}

impl Edge {
    /// Nodes of the edge in their stored order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Number of nodes joined by the edge.
    pub fn arity(&self) -> usize {
        self.nodes.len()
    }

    /// Label of the edge (`E`, `Q`, `S`, ...).
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether the refinement mark `R` is set.
    pub fn is_marked(&self) -> bool {
        self.marked
    }

    /// Refinement mark as the grammar's `R ∈ {0, 1}`.
    pub fn r(&self) -> u8 {
        u8::from(self.marked)
    }

    /// Whether the border flag `B` is set.
    pub fn is_border(&self) -> bool {
        self.border
    }

    /// Whether the edge joins more than two nodes.
    pub fn is_hyperedge(&self) -> bool {
        self.nodes.len() > 2
    }

    /// Whether this is a simple edge joining `a` and `b` in either orientation.
    pub fn connects(&self, a: NodeId, b: NodeId) -> bool {
        match self.nodes.as_slice() {
            [first, second] => (*first == a && *second == b) || (*first == b && *second == a),
            _ => false,
        }
    }

    /// Consecutive node pairs around the element boundary, wrapping around.
    pub fn boundary_pairs(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        let n = self.nodes.len();
        (0..n).map(move |i| (self.nodes[i], self.nodes[(i + 1) % n]))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NodeRecord {
    pub(crate) node: Node,
    incident: BTreeSet<EdgeId>,
}

#[derive(Debug, Clone)]
pub(crate) struct EdgeRecord {
    pub(crate) alive: bool,
    pub(crate) edge: Edge,
}

/// Insertion-ordered mesh hypergraph.
///
/// Nodes and edges live in arenas indexed by their identifiers. Removing an
/// edge tombstones its slot, so identifiers stay valid handles and are never
/// reused. Nodes are never removed.
#[derive(Debug, Clone)]
pub struct MeshGraph {
    config: GraphConfig,
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
    live_edges: usize,
}

impl MeshGraph {
    /// Creates an empty graph with the provided configuration.
    pub fn new(config: GraphConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            edges: Vec::new(),
            live_edges: 0,
        }
    }

    /// Returns the configuration used by this graph.
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Adds a node at `position`.
    pub fn add_node(&mut self, position: Point, label: impl Into<String>) -> NodeId {
        let id = make_node(self.nodes.len());
        self.nodes.push(NodeRecord {
            node: Node {
                position,
                label: label.into(),
            },
            incident: BTreeSet::new(),
        });
        id
    }

    /// Adds a simple edge between `a` and `b` with `R = 0`.
    ///
    /// Existing edges between the pair are not looked up unless the graph
    /// is configured with [`DuplicatePolicy::Reject`].
    pub fn add_edge(
        &mut self,
        a: NodeId,
        b: NodeId,
        is_border: bool,
        label: impl Into<String>,
    ) -> Result<EdgeId, AmrError> {
        self.insert_edge(vec![a, b], label.into(), is_border)
    }

    /// Adds an edge over `nodes`, keeping their order, with `R = 0` and no
    /// border flag.
    pub fn add_hyperedge(
        &mut self,
        nodes: &[NodeId],
        label: impl Into<String>,
    ) -> Result<EdgeId, AmrError> {
        self.insert_edge(nodes.to_vec(), label.into(), false)
    }

    /// Returns the first live simple edge joining `a` and `b`, in insertion order.
    pub fn get_edge_between(&self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        let record = self.nodes.get(node_index(a))?;
        // incidence sets are ordered by id, which is insertion order
        record
            .incident
            .iter()
            .copied()
            .find(|id| self.edges[edge_index(*id)].edge.connects(a, b))
    }

    /// Removes `edge` from the graph. Returns `false` when it was not present.
    ///
    /// The edge's nodes stay in the graph even if nothing references them.
    pub fn remove_edge(&mut self, edge: EdgeId) -> bool {
        let Some(record) = self.edges.get_mut(edge_index(edge)) else {
            return false;
        };
        if !record.alive {
            return false;
        }
        record.alive = false;
        self.live_edges -= 1;
        for node in &record.edge.nodes {
            if let Some(node) = self.nodes.get_mut(node_index(*node)) {
                node.incident.remove(&edge);
            }
        }
        true
    }

    /// Sets or clears the refinement mark `R` of `edge`.
    pub fn set_marked(&mut self, edge: EdgeId, marked: bool) -> Result<(), AmrError> {
        self.edge_mut(edge)?.marked = marked;
        Ok(())
    }

    /// Sets or clears the border flag `B` of `edge`.
    pub fn set_border(&mut self, edge: EdgeId, border: bool) -> Result<(), AmrError> {
        self.edge_mut(edge)?.border = border;
        Ok(())
    }

    /// Returns the node behind `id`.
    pub fn node(&self, id: NodeId) -> Result<&Node, AmrError> {
        self.nodes
            .get(node_index(id))
            .map(|record| &record.node)
            .ok_or_else(|| {
                graph_error("unknown-node", "node does not exist").with_context("node", id)
            })
    }

    /// Returns the live edge behind `id`.
    pub fn edge(&self, id: EdgeId) -> Result<&Edge, AmrError> {
        self.edges
            .get(edge_index(id))
            .filter(|record| record.alive)
            .map(|record| &record.edge)
            .ok_or_else(|| {
                graph_error("unknown-edge", "edge does not exist").with_context("edge", id)
            })
    }

    fn edge_mut(&mut self, id: EdgeId) -> Result<&mut Edge, AmrError> {
        self.edges
            .get_mut(edge_index(id))
            .filter(|record| record.alive)
            .map(|record| &mut record.edge)
            .ok_or_else(|| {
                graph_error("unknown-edge", "edge does not exist").with_context("edge", id)
            })
    }

    /// Returns whether `id` names a node of this graph.
    pub fn contains_node(&self, id: NodeId) -> bool {
        node_index(id) < self.nodes.len()
    }

    /// Returns whether `id` names a live edge of this graph.
    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.edges
            .get(edge_index(id))
            .is_some_and(|record| record.alive)
    }

    /// Iterates over all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, record)| (make_node(idx), &record.node))
    }

    /// Iterates over all live edges and hyperedges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, record)| record.alive)
            .map(|(idx, record)| (make_edge(idx), &record.edge))
    }

    /// Iterates over live hyperedges (more than two nodes) in insertion order.
    pub fn hyperedges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges().filter(|(_, edge)| edge.is_hyperedge())
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of live edges, hyperedges included.
    pub fn edge_count(&self) -> usize {
        self.live_edges
    }

    /// Number of live hyperedges.
    pub fn hyperedge_count(&self) -> usize {
        self.hyperedges().count()
    }

    /// Number of live edges carrying `label`.
    pub fn count_label(&self, label: &str) -> usize {
        self.edges().filter(|(_, edge)| edge.label == label).count()
    }

    /// Positions of the nodes of `edge`, in edge order.
    pub fn positions(&self, edge: EdgeId) -> Result<Vec<Point>, AmrError> {
        self.edge(edge)?
            .nodes
            .iter()
            .map(|node| self.node(*node).map(Node::position))
            .collect()
    }

    /// Mean position of the nodes of `edge`, recomputed on every call.
    pub fn reference_point(&self, edge: EdgeId) -> Result<Point, AmrError> {
        Point::mean(self.positions(edge)?).ok_or_else(|| {
            graph_error("empty-edge", "edge has no nodes").with_context("edge", edge)
        })
    }

    /// Returns all live edges touching `node`, ordered by identifier.
    pub fn edges_touching(&self, node: NodeId) -> Result<Vec<EdgeId>, AmrError> {
        let record = self.nodes.get(node_index(node)).ok_or_else(|| {
            graph_error("unknown-node", "node does not exist").with_context("node", node)
        })?;
        Ok(record.incident.iter().copied().collect())
    }

    /// Nodes joined to `node` by a live simple edge, ordered by identifier.
    pub fn neighbours(&self, node: NodeId) -> Result<Vec<NodeId>, AmrError> {
        let mut result = BTreeSet::new();
        for edge_id in self.edges_touching(node)? {
            let edge = &self.edges[edge_index(edge_id)].edge;
            if edge.is_hyperedge() {
                continue;
            }
            for other in &edge.nodes {
                if *other != node {
                    result.insert(*other);
                }
            }
        }
        Ok(result.into_iter().collect())
    }

    /// Returns the first node, in insertion order, within `tolerance` of `position`.
    pub fn find_node_at(&self, position: Point, tolerance: f64) -> Option<NodeId> {
        self.nodes()
            .find(|(_, node)| node.position.distance(&position) <= tolerance)
            .map(|(id, _)| id)
    }

    /// Returns whether `node` is referenced by no live edge.
    pub fn is_orphan(&self, node: NodeId) -> bool {
        self.nodes
            .get(node_index(node))
            .is_some_and(|record| record.incident.is_empty())
    }

    fn insert_edge(
        &mut self,
        nodes: Vec<NodeId>,
        label: String,
        border: bool,
    ) -> Result<EdgeId, AmrError> {
        if nodes.len() < 2 {
            return Err(graph_error("invalid-arity", "edges require at least two nodes")
                .with_context("label", &label)
                .with_context("nodes", nodes.len()));
        }
        if let Some(expected) = self.config.expected_arity(&label) {
            if expected != nodes.len() {
                return Err(graph_error(
                    "invalid-arity",
                    "edge arity does not match its label",
                )
                .with_context("label", &label)
                .with_context("expected", expected)
                .with_context("nodes", nodes.len()));
            }
        }
        for node in &nodes {
            if !self.contains_node(*node) {
                return Err(graph_error("unknown-node", "node does not exist")
                    .with_context("node", node)
                    .with_hint("nodes must be created through this graph"));
            }
        }
        if nodes.len() == 2 && self.config.duplicate_policy == DuplicatePolicy::Reject {
            if let Some(existing) = self.get_edge_between(nodes[0], nodes[1]) {
                return Err(graph_error("duplicate-edge", "simple edge already exists")
                    .with_context("existing", existing)
                    .with_context("label", &label));
            }
        }
        let id = make_edge(self.edges.len());
        for node in &nodes {
            self.nodes[node_index(*node)].incident.insert(id);
        }
        self.edges.push(EdgeRecord {
            alive: true,
            edge: Edge {
                nodes,
                label,
                marked: false,
                border,
            },
        });
        self.live_edges += 1;
        Ok(id)
    }

    /// Returns every stored edge slot, tombstones included.
    pub(crate) fn edge_records(&self) -> &[EdgeRecord] {
        &self.edges
    }

    /// Restores an edge slot verbatim while rebuilding a serialized graph.
    pub(crate) fn restore_edge(
        &mut self,
        alive: bool,
        nodes: Vec<NodeId>,
        label: String,
        marked: bool,
        border: bool,
    ) -> Result<EdgeId, AmrError> {
        if !alive {
            let id = make_edge(self.edges.len());
            self.edges.push(EdgeRecord {
                alive: false,
                edge: Edge {
                    nodes,
                    label,
                    marked,
                    border,
                },
            });
            return Ok(id);
        }
        let id = self.insert_edge(nodes, label, border)?;
        self.set_marked(id, marked)?;
        Ok(id)
    }
}

impl Default for MeshGraph {
    fn default() -> Self {
        Self::new(GraphConfig::default())
    }
}

impl fmt::Display for MeshGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Nodes:")?;
        for (id, node) in self.nodes() {
            writeln!(f, "  {id} {} {}", node.label, node.position)?;
        }
        writeln!(f, "Edges:")?;
        for (id, edge) in self.edges() {
            let nodes: Vec<String> = edge.nodes.iter().map(ToString::to_string).collect();
            write!(f, "  {id} {} [{}] R={}", edge.label, nodes.join(", "), edge.r())?;
            if edge.border {
                write!(f, " B")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Returns whether `edge` is a plain mesh edge (`E`, two nodes).
pub fn is_mesh_edge(edge: &Edge) -> bool {
    !edge.is_hyperedge() && edge.label() == EDGE_LABEL
}

pub(crate) fn graph_error(code: impl Into<String>, message: impl Into<String>) -> AmrError {
    AmrError::Graph(ErrorInfo::new(code, message))
}
