use std::fmt;
use std::str::FromStr;

use amr_core::errors::{AmrError, ErrorInfo};
use serde::{Deserialize, Serialize};

use crate::mark_hexagon::MarkHexagon;
use crate::mark_quad::{MarkQuad, ScanOrder};
use crate::production::Production;
use crate::refine_hexagon::RefineHexagon;
use crate::split_edge::SplitBorderEdge;

/// Knobs shared by the productions built from a [`RuleKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleOptions {
    /// Candidate selection for P1.
    pub quad_scan_order: ScanOrder,
    /// Whether P11 may match when scoped to a single hexagon.
    pub refinement_criterion: bool,
}

impl Default for RuleOptions {
    fn default() -> Self {
        Self {
            quad_scan_order: ScanOrder::default(),
            refinement_criterion: true,
        }
    }
}

/// Productions known to the grammar, addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    /// [`MarkQuad`].
    #[serde(alias = "mark-quad")]
    P1,
    /// [`SplitBorderEdge`].
    #[serde(alias = "split-border-edge")]
    P4,
    /// [`MarkHexagon`].
    #[serde(alias = "mark-hexagon")]
    P10,
    /// [`RefineHexagon`].
    #[serde(alias = "refine-hexagon")]
    P11,
}

impl RuleKind {
    /// Every rule, in the order a refinement pass runs them.
    pub const ALL: [RuleKind; 4] = [RuleKind::P10, RuleKind::P1, RuleKind::P4, RuleKind::P11];

    /// Short rule name.
    pub fn name(self) -> &'static str {
        match self {
            RuleKind::P1 => MarkQuad::NAME,
            RuleKind::P4 => SplitBorderEdge::NAME,
            RuleKind::P10 => MarkHexagon::NAME,
            RuleKind::P11 => RefineHexagon::NAME,
        }
    }

    /// Instantiates the production.
    pub fn build(self, options: &RuleOptions) -> Box<dyn Production> {
        match self {
            RuleKind::P1 => Box::new(MarkQuad::with_scan_order(options.quad_scan_order)),
            RuleKind::P4 => Box::new(SplitBorderEdge),
            RuleKind::P10 => Box::new(MarkHexagon),
            RuleKind::P11 => Box::new(RefineHexagon::with_refinement_criterion(
                options.refinement_criterion,
            )),
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RuleKind {
    type Err = AmrError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "P1" | "mark-quad" => Ok(RuleKind::P1),
            "P4" | "split-border-edge" => Ok(RuleKind::P4),
            "P10" | "mark-hexagon" => Ok(RuleKind::P10),
            "P11" | "refine-hexagon" => Ok(RuleKind::P11),
            other => Err(AmrError::Config(
                ErrorInfo::new("unknown-rule", "no production with this name")
                    .with_context("rule", other)
                    .with_hint("expected one of P1, P4, P10, P11"),
            )),
        }
    }
}

/// Builds the productions named in `kinds`, in order.
pub fn build_all(kinds: &[RuleKind], options: &RuleOptions) -> Vec<Box<dyn Production>> {
    kinds.iter().map(|kind| kind.build(options)).collect()
}
