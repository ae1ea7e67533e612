use amr_core::{AmrError, EdgeId, EDGE_LABEL, NODE_LABEL};
use amr_graph::{is_mesh_edge, Edge, MeshGraph};
use tracing::debug;

use crate::matching::candidates;
use crate::production::{
    ensure_arities, ensure_context, ApplyOutcome, MatchContext, Production,
};

/// P4: splits a marked border edge at its midpoint.
///
/// The two halves are unmarked `E` edges that inherit the border flag; the
/// split edge is removed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplitBorderEdge;

impl SplitBorderEdge {
    /// Rule name.
    pub const NAME: &'static str = "P4";

    fn is_candidate(edge: &Edge) -> bool {
        is_mesh_edge(edge) && edge.is_border() && edge.is_marked()
    }
}

impl Production for SplitBorderEdge {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        "Break boundary edge marked for refinement into two unmarked halves."
    }

    fn can_apply(&self, graph: &MeshGraph, scope: Option<EdgeId>) -> Option<MatchContext> {
        candidates(graph, scope)
            .find(|(_, edge)| Self::is_candidate(edge))
            .map(|(id, edge)| MatchContext {
                rule: Self::NAME,
                target: id,
                nodes: edge.nodes().to_vec(),
                edges: vec![id],
            })
    }

    fn apply(
        &self,
        graph: &mut MeshGraph,
        context: &MatchContext,
    ) -> Result<ApplyOutcome, AmrError> {
        ensure_context(graph, context, Self::NAME, 2, 1)?;
        ensure_arities(graph, Self::NAME, &[(EDGE_LABEL, 2)])?;
        let edge = graph.edge(context.target)?;
        let border = edge.is_border();
        let (a, b) = (edge.nodes()[0], edge.nodes()[1]);
        let midpoint = graph.node(a)?.position().midpoint(&graph.node(b)?.position());

        let middle = graph.add_node(midpoint, NODE_LABEL);
        let first = graph.add_edge(a, middle, border, EDGE_LABEL)?;
        let second = graph.add_edge(middle, b, border, EDGE_LABEL)?;
        graph.remove_edge(context.target);

        debug!(
            rule = Self::NAME,
            split = %context.target,
            node = %middle,
            %midpoint,
            "broke border edge into two edges"
        );
        Ok(ApplyOutcome {
            created_nodes: vec![middle],
            created_edges: vec![first, second],
            removed_edges: vec![context.target],
            ..ApplyOutcome::default()
        })
    }
}
