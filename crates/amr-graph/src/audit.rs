use std::collections::BTreeMap;

use amr_core::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};

use crate::flags::grammar_arities;
use crate::hypergraph::MeshGraph;

/// Structural findings that the graph tolerates but productions may trip on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralReport {
    /// Simple edges sharing a node pair with an earlier edge, as `(first, duplicate)`.
    pub duplicate_edges: Vec<(EdgeId, EdgeId)>,
    /// Edges whose node count disagrees with the arity of their label.
    pub arity_anomalies: Vec<ArityAnomaly>,
    /// Nodes no live edge refers to.
    pub orphan_nodes: Vec<NodeId>,
}

impl StructuralReport {
    /// Whether no duplicates and no arity anomalies were found.
    ///
    /// Orphan nodes are expected after refinement and do not count.
    pub fn is_clean(&self) -> bool {
        self.duplicate_edges.is_empty() && self.arity_anomalies.is_empty()
    }
}

/// An edge whose node count does not match its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArityAnomaly {
    /// Offending edge.
    pub edge: EdgeId,
    /// Its label.
    pub label: String,
    /// Arity expected for the label.
    pub expected: usize,
    /// Arity found.
    pub actual: usize,
}

impl MeshGraph {
    /// Scans the graph for duplicate simple edges, arity anomalies and orphans.
    ///
    /// Arities come from the configured label table, falling back to the
    /// grammar's own (`E` = 2, `Q` = 4, `S` = 6).
    pub fn audit(&self) -> StructuralReport {
        let arities = self
            .config()
            .label_arity
            .clone()
            .unwrap_or_else(grammar_arities);

        let mut report = StructuralReport::default();
        let mut first_by_pair: BTreeMap<(NodeId, NodeId), EdgeId> = BTreeMap::new();
        for (id, edge) in self.edges() {
            if let Some(expected) = arities.get(edge.label()) {
                if *expected != edge.arity() {
                    report.arity_anomalies.push(ArityAnomaly {
                        edge: id,
                        label: edge.label().to_string(),
                        expected: *expected,
                        actual: edge.arity(),
                    });
                }
            }
            if let [a, b] = edge.nodes() {
                let key = if a <= b { (*a, *b) } else { (*b, *a) };
                match first_by_pair.get(&key) {
                    Some(first) => report.duplicate_edges.push((*first, id)),
                    None => {
                        first_by_pair.insert(key, id);
                    }
                }
            }
        }
        report.orphan_nodes = self
            .nodes()
            .map(|(id, _)| id)
            .filter(|id| self.is_orphan(*id))
            .collect();
        report
    }
}
