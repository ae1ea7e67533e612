use amr_core::errors::ErrorInfo;
use amr_core::{AmrError, EdgeId, NodeId, Point, EDGE_LABEL, HEXAGON_LABEL, NODE_LABEL, QUAD_LABEL};
use amr_graph::{Edge, MeshGraph};
use tracing::debug;

use crate::matching::{candidates, hanging_node_between};
use crate::production::{
    ensure_arities, ensure_context, ApplyOutcome, MatchContext, Production,
};

const CORNERS: usize = 6;
const RING: usize = 2 * CORNERS;

/// P11: red refinement of a hexagon whose six sides have been bisected.
///
/// The hexagon is replaced by six quadrilaterals meeting at its centroid.
/// Each side must carry a hanging node joined to both corners by unmarked
/// edges; the hanging node may not be one of the hexagon's own corners.
#[derive(Debug, Clone, Copy)]
pub struct RefineHexagon {
    refinement_criterion: bool,
}

impl Default for RefineHexagon {
    fn default() -> Self {
        Self {
            refinement_criterion: true,
        }
    }
}

impl RefineHexagon {
    /// Rule name.
    pub const NAME: &'static str = "P11";

    /// Creates the rule with the refinement criterion enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the rule with an explicit refinement criterion.
    ///
    /// With the criterion disabled a scoped match never succeeds; unscoped
    /// matching is unaffected.
    pub fn with_refinement_criterion(refinement_criterion: bool) -> Self {
        Self {
            refinement_criterion,
        }
    }

    /// Whether scoped matches are allowed.
    pub fn refinement_criterion(&self) -> bool {
        self.refinement_criterion
    }

    fn is_candidate(edge: &Edge) -> bool {
        edge.is_hyperedge()
            && edge.label() == HEXAGON_LABEL
            && edge.arity() == CORNERS
            && edge.is_marked()
    }

    fn match_hexagon(graph: &MeshGraph, id: EdgeId, hexagon: &Edge) -> Option<MatchContext> {
        let corners = hexagon.nodes();
        let mut nodes = Vec::with_capacity(RING);
        let mut edges = Vec::with_capacity(RING);
        for (a, b) in hexagon.boundary_pairs() {
            let (hanging, first, second) = hanging_node_between(graph, a, b, corners)?;
            nodes.extend([a, hanging]);
            edges.extend([first, second]);
        }
        Some(MatchContext {
            rule: Self::NAME,
            target: id,
            nodes,
            edges,
        })
    }
}

impl Production for RefineHexagon {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        "Refine hexagonal element with all sides broken into six quadrilaterals."
    }

    fn can_apply(&self, graph: &MeshGraph, scope: Option<EdgeId>) -> Option<MatchContext> {
        if scope.is_some() && !self.refinement_criterion {
            return None;
        }
        candidates(graph, scope)
            .filter(|(_, edge)| Self::is_candidate(edge))
            .find_map(|(id, hexagon)| Self::match_hexagon(graph, id, hexagon))
    }

    fn apply(
        &self,
        graph: &mut MeshGraph,
        context: &MatchContext,
    ) -> Result<ApplyOutcome, AmrError> {
        ensure_context(graph, context, Self::NAME, RING, RING)?;
        ensure_arities(graph, Self::NAME, &[(QUAD_LABEL, 4), (EDGE_LABEL, 2)])?;
        let ring = &context.nodes;

        let mut corners = Vec::with_capacity(CORNERS);
        for corner in ring.iter().step_by(2) {
            corners.push(graph.node(*corner)?.position());
        }
        let centroid = Point::mean(corners).ok_or_else(|| {
            AmrError::Production(
                ErrorInfo::new("malformed-match", "hexagon has no corners")
                    .with_context("rule", Self::NAME)
                    .with_context("hexagon", context.target),
            )
        })?;
        let center = graph.add_node(centroid, NODE_LABEL);

        let mut created_edges = Vec::with_capacity(2 * CORNERS);
        for i in 0..CORNERS {
            let quad: [NodeId; 4] = [
                center,
                ring[(2 * i + RING - 1) % RING],
                ring[2 * i],
                ring[2 * i + 1],
            ];
            created_edges.push(graph.add_hyperedge(&quad, QUAD_LABEL)?);
        }
        for i in 0..CORNERS {
            created_edges.push(graph.add_edge(center, ring[2 * i + 1], false, EDGE_LABEL)?);
        }
        graph.remove_edge(context.target);

        debug!(
            rule = Self::NAME,
            hexagon = %context.target,
            centroid = %centroid,
            created = created_edges.len(),
            "refined hexagon into quadrilaterals"
        );
        Ok(ApplyOutcome {
            created_nodes: vec![center],
            created_edges,
            removed_edges: vec![context.target],
            ..ApplyOutcome::default()
        })
    }
}
