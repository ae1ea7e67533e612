#![deny(missing_docs)]
#![doc = include_str!("../docs/rules-api.md")]

//! Graph-grammar productions for hexagon/quadrilateral mesh refinement.

mod mark_hexagon;
mod mark_quad;
mod matching;
mod production;
mod refine_hexagon;
mod registry;
mod split_edge;

pub use mark_hexagon::MarkHexagon;
pub use mark_quad::{MarkQuad, ScanOrder};
pub use production::{ApplyOutcome, MatchContext, Production};
pub use refine_hexagon::RefineHexagon;
pub use registry::{build_all, RuleKind, RuleOptions};
pub use split_edge::SplitBorderEdge;
