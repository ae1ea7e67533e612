//! Matching helpers shared by the rules.

use amr_core::{AmrError, EdgeId, NodeId};
use amr_graph::{Edge, MeshGraph};

use crate::production::{ensure_context, ApplyOutcome, MatchContext};

/// Candidate edges in insertion order, or just the scoped one when it is live.
pub(crate) fn candidates<'g>(
    graph: &'g MeshGraph,
    scope: Option<EdgeId>,
) -> Box<dyn Iterator<Item = (EdgeId, &'g Edge)> + 'g> {
    match scope {
        Some(id) => Box::new(graph.edge(id).ok().map(|edge| (id, edge)).into_iter()),
        None => Box::new(graph.edges()),
    }
}

/// Simple edges along the boundary of `element`, one per consecutive node
/// pair, provided every one exists and passes `accept`.
pub(crate) fn boundary_edges(
    graph: &MeshGraph,
    element: &Edge,
    accept: impl Fn(&Edge) -> bool,
) -> Option<Vec<EdgeId>> {
    element
        .boundary_pairs()
        .map(|(a, b)| {
            let id = graph.get_edge_between(a, b)?;
            let edge = graph.edge(id).ok()?;
            accept(edge).then_some(id)
        })
        .collect()
}

/// A node `c`, not among `excluded`, such that edges `(a, c)` and `(c, b)`
/// exist and are unmarked. The first such node in insertion order wins.
pub(crate) fn hanging_node_between(
    graph: &MeshGraph,
    a: NodeId,
    b: NodeId,
    excluded: &[NodeId],
) -> Option<(NodeId, EdgeId, EdgeId)> {
    let unmarked = |id: EdgeId| graph.edge(id).is_ok_and(|edge| !edge.is_marked());
    graph
        .neighbours(a)
        .ok()?
        .into_iter()
        .filter(|c| !excluded.contains(c))
        .find_map(|c| {
            let ac = graph.get_edge_between(a, c)?;
            let cb = graph.get_edge_between(c, b)?;
            (unmarked(ac) && unmarked(cb)).then_some((c, ac, cb))
        })
}

/// Shared rewrite of the marking rules: set `R = 1` on every matched
/// boundary edge.
pub(crate) fn mark_boundary(
    graph: &mut MeshGraph,
    context: &MatchContext,
    rule: &'static str,
    corners: usize,
) -> Result<ApplyOutcome, AmrError> {
    ensure_context(graph, context, rule, corners, corners)?;
    for edge in &context.edges {
        graph.set_marked(*edge, true)?;
    }
    Ok(ApplyOutcome {
        marked_edges: context.edges.clone(),
        ..ApplyOutcome::default()
    })
}
