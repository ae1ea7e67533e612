use amr_core::{AmrError, EdgeId, HEXAGON_LABEL};
use amr_graph::{is_mesh_edge, Edge, MeshGraph};
use tracing::debug;

use crate::matching::{boundary_edges, candidates, mark_boundary};
use crate::production::{ApplyOutcome, MatchContext, Production};

/// P10: marks the six boundary edges of a hexagon marked for refinement.
///
/// The first hexagon whose six sides are all unmarked `E` edges is used;
/// hexagons with a missing, relabelled or already marked side are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkHexagon;

impl MarkHexagon {
    /// Rule name.
    pub const NAME: &'static str = "P10";

    fn is_candidate(edge: &Edge) -> bool {
        edge.is_hyperedge()
            && edge.label() == HEXAGON_LABEL
            && edge.arity() == 6
            && edge.is_marked()
    }
}

impl Production for MarkHexagon {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        "Mark edges of hexagonal element for breaking"
    }

    fn can_apply(&self, graph: &MeshGraph, scope: Option<EdgeId>) -> Option<MatchContext> {
        candidates(graph, scope)
            .filter(|(_, edge)| Self::is_candidate(edge))
            .find_map(|(id, hexagon)| {
                let edges =
                    boundary_edges(graph, hexagon, |side| is_mesh_edge(side) && !side.is_marked())?;
                Some(MatchContext {
                    rule: Self::NAME,
                    target: id,
                    nodes: hexagon.nodes().to_vec(),
                    edges,
                })
            })
    }

    fn apply(
        &self,
        graph: &mut MeshGraph,
        context: &MatchContext,
    ) -> Result<ApplyOutcome, AmrError> {
        let outcome = mark_boundary(graph, context, Self::NAME, 6)?;
        debug!(
            rule = Self::NAME,
            hexagon = %context.target,
            edges = ?outcome.marked_edges,
            "marked hexagon edges for breaking"
        );
        Ok(outcome)
    }
}
