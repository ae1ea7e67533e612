use amr_core::{AmrError, EdgeId, QUAD_LABEL};
use amr_graph::{Edge, MeshGraph};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matching::{boundary_edges, candidates, mark_boundary};
use crate::production::{ApplyOutcome, MatchContext, Production};

/// Which marked quadrilateral P1 settles on when several qualify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanOrder {
    /// Keep the last marked quadrilateral in graph order and only test that
    /// one. Earlier candidates are never reconsidered, even when the last
    /// one fails its boundary check.
    #[default]
    Last,
    /// Take the first marked quadrilateral whose boundary check succeeds.
    First,
}

/// P1: marks the four boundary edges of a quadrilateral marked for refinement.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkQuad {
    scan_order: ScanOrder,
}

impl MarkQuad {
    /// Rule name.
    pub const NAME: &'static str = "P1";

    /// Creates the rule with the reference scan order ([`ScanOrder::Last`]).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the rule with an explicit scan order.
    pub fn with_scan_order(scan_order: ScanOrder) -> Self {
        Self { scan_order }
    }

    /// Scan order in use.
    pub fn scan_order(&self) -> ScanOrder {
        self.scan_order
    }

    fn is_candidate(edge: &Edge) -> bool {
        edge.label() == QUAD_LABEL && edge.arity() == 4 && edge.is_marked()
    }

    fn match_quad(graph: &MeshGraph, id: EdgeId, quad: &Edge) -> Option<MatchContext> {
        let edges = boundary_edges(graph, quad, |edge| !edge.is_marked())?;
        Some(MatchContext {
            rule: Self::NAME,
            target: id,
            nodes: quad.nodes().to_vec(),
            edges,
        })
    }
}

impl Production for MarkQuad {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        "Marks edges of quadrilateral element, marked for refinement, for breaking."
    }

    fn can_apply(&self, graph: &MeshGraph, scope: Option<EdgeId>) -> Option<MatchContext> {
        let mut marked = candidates(graph, scope).filter(|(_, edge)| Self::is_candidate(edge));
        match self.scan_order {
            ScanOrder::Last => {
                let (id, quad) = marked.last()?;
                Self::match_quad(graph, id, quad)
            }
            ScanOrder::First => marked.find_map(|(id, quad)| Self::match_quad(graph, id, quad)),
        }
    }

    fn apply(
        &self,
        graph: &mut MeshGraph,
        context: &MatchContext,
    ) -> Result<ApplyOutcome, AmrError> {
        let outcome = mark_boundary(graph, context, Self::NAME, 4)?;
        debug!(
            rule = Self::NAME,
            quad = %context.target,
            edges = ?outcome.marked_edges,
            "marked quadrilateral edges for breaking"
        );
        Ok(outcome)
    }
}
