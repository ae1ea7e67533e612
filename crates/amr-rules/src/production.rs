use amr_core::errors::{AmrError, ErrorInfo};
use amr_core::{EdgeId, NodeId};
use amr_graph::MeshGraph;
use serde::{Deserialize, Serialize};

/// Elements a production matched, handed from `can_apply` to `apply`.
///
/// `nodes` and `edges` are rule specific: for marking rules they are the
/// element's corners and boundary edges, for hexagon refinement the twelve
/// interleaved corner/midpoint nodes and the twelve half-edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchContext {
    /// Name of the production that produced the context.
    pub rule: &'static str,
    /// Edge or hyperedge the rule fired on.
    pub target: EdgeId,
    /// Matched nodes.
    pub nodes: Vec<NodeId>,
    /// Matched neighbouring edges.
    pub edges: Vec<EdgeId>,
}

/// Identifiers touched by a successful `apply`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyOutcome {
    /// Nodes created by the rewrite.
    pub created_nodes: Vec<NodeId>,
    /// Edges and hyperedges created by the rewrite, in creation order.
    pub created_edges: Vec<EdgeId>,
    /// Existing edges whose `R` flag was set.
    pub marked_edges: Vec<EdgeId>,
    /// Edges removed by the rewrite.
    pub removed_edges: Vec<EdgeId>,
}

/// A graph-grammar rule: a read-only match followed by a rewrite.
///
/// `apply` must only be given the context returned by the immediately
/// preceding successful `can_apply` on the same, unmodified graph.
/// Implementations check that the context came from them and that the
/// elements it names are still live, and fail before mutating anything
/// otherwise.
pub trait Production: Send + Sync {
    /// Short rule name such as `P4`.
    fn name(&self) -> &'static str;

    /// One-line description of what the rule does.
    fn description(&self) -> &'static str;

    /// Looks for a match, restricted to `scope` when given.
    ///
    /// `None` means the precondition does not hold. Never mutates.
    fn can_apply(&self, graph: &MeshGraph, scope: Option<EdgeId>) -> Option<MatchContext>;

    /// Performs the rewrite described by `context`.
    fn apply(&self, graph: &mut MeshGraph, context: &MatchContext)
        -> Result<ApplyOutcome, AmrError>;

    /// Matches and, when possible, applies in one call.
    fn try_apply(
        &self,
        graph: &mut MeshGraph,
        scope: Option<EdgeId>,
    ) -> Result<Option<ApplyOutcome>, AmrError> {
        match self.can_apply(graph, scope) {
            Some(context) => self.apply(graph, &context).map(Some),
            None => Ok(None),
        }
    }
}

/// Rejects contexts produced by another rule, of the wrong shape, or naming
/// elements that have since been removed.
pub(crate) fn ensure_context(
    graph: &MeshGraph,
    context: &MatchContext,
    rule: &'static str,
    nodes: usize,
    edges: usize,
) -> Result<(), AmrError> {
    if context.rule != rule {
        return Err(AmrError::Production(
            ErrorInfo::new("foreign-match", "context was produced by another production")
                .with_context("expected", rule)
                .with_context("found", context.rule),
        ));
    }
    if context.nodes.len() != nodes || context.edges.len() != edges {
        return Err(AmrError::Production(
            ErrorInfo::new("malformed-match", "context does not have the rule's shape")
                .with_context("rule", rule)
                .with_context("nodes", context.nodes.len())
                .with_context("edges", context.edges.len()),
        ));
    }
    let stale = std::iter::once(context.target)
        .chain(context.edges.iter().copied())
        .find(|edge| !graph.contains_edge(*edge));
    if let Some(edge) = stale {
        return Err(AmrError::Production(
            ErrorInfo::new("stale-match", "matched edge is no longer in the graph")
                .with_context("rule", rule)
                .with_context("edge", edge)
                .with_hint("call can_apply again on the current graph"),
        ));
    }
    if let Some(node) = context.nodes.iter().find(|node| !graph.contains_node(**node)) {
        return Err(AmrError::Production(
            ErrorInfo::new("stale-match", "matched node is not part of the graph")
                .with_context("rule", rule)
                .with_context("node", node),
        ));
    }
    Ok(())
}

/// Rejects a rewrite whose new edges would break the graph's label arities.
pub(crate) fn ensure_arities(
    graph: &MeshGraph,
    rule: &'static str,
    inserts: &[(&str, usize)],
) -> Result<(), AmrError> {
    for (label, arity) in inserts {
        if let Some(expected) = graph.config().expected_arity(label) {
            if expected != *arity {
                return Err(AmrError::Production(
                    ErrorInfo::new("arity-conflict", "rewrite would break a label arity")
                        .with_context("rule", rule)
                        .with_context("label", label)
                        .with_context("expected", expected)
                        .with_context("created", arity),
                ));
            }
        }
    }
    Ok(())
}
