mod common;

use amr_core::{EdgeId, Point};
use amr_graph::{canonical_hash, quad_strip, single_hexagon};
use amr_rules::{
    build_all, MarkHexagon, MarkQuad, MatchContext, Production, RefineHexagon, RuleKind,
    RuleOptions, ScanOrder, SplitBorderEdge,
};
use common::prepare_hexagon;

#[test]
fn stale_context_is_rejected_without_mutation() {
    let mut graph = single_hexagon(Point::new(0.0, 0.0), 1.0, true).unwrap();
    MarkHexagon.try_apply(&mut graph, None).unwrap().unwrap();

    let context = SplitBorderEdge.can_apply(&graph, None).unwrap();
    SplitBorderEdge.apply(&mut graph, &context).unwrap();
    let hash = canonical_hash(&graph);
    let nodes = graph.node_count();

    let err = SplitBorderEdge.apply(&mut graph, &context).unwrap_err();
    assert_eq!(err.code(), "stale-match");
    assert_eq!(canonical_hash(&graph), hash);
    assert_eq!(graph.node_count(), nodes);
}

#[test]
fn refine_context_goes_stale_after_refinement() {
    let mut graph = prepare_hexagon(Point::new(0.0, 0.0), 1.0);
    let rule = RefineHexagon::new();
    let context = rule.can_apply(&graph, None).unwrap();
    rule.apply(&mut graph, &context).unwrap();
    let nodes = graph.node_count();

    let err = rule.apply(&mut graph, &context).unwrap_err();
    assert_eq!(err.code(), "stale-match");
    assert_eq!(graph.node_count(), nodes);
}

#[test]
fn foreign_context_is_rejected() {
    let mut graph = single_hexagon(Point::new(0.0, 0.0), 1.0, true).unwrap();
    let context = MarkHexagon.can_apply(&graph, None).unwrap();
    let hash = canonical_hash(&graph);

    let err = MarkQuad::new().apply(&mut graph, &context).unwrap_err();
    assert_eq!(err.code(), "foreign-match");
    assert_eq!(err.info().context.get("found").map(String::as_str), Some("P10"));
    assert_eq!(canonical_hash(&graph), hash);
}

#[test]
fn malformed_context_is_rejected() {
    let mut graph = quad_strip(1).unwrap();
    let (edge, _) = graph.edges().next().unwrap();
    let context = MatchContext {
        rule: "P4",
        target: edge,
        nodes: Vec::new(),
        edges: vec![edge],
    };
    let err = SplitBorderEdge.apply(&mut graph, &context).unwrap_err();
    assert_eq!(err.code(), "malformed-match");

    let context = MatchContext {
        rule: "P4",
        target: EdgeId::from_raw(999),
        nodes: graph.edge(edge).unwrap().nodes().to_vec(),
        edges: vec![EdgeId::from_raw(999)],
    };
    let err = SplitBorderEdge.apply(&mut graph, &context).unwrap_err();
    assert_eq!(err.code(), "stale-match");
}

#[test]
fn can_apply_never_mutates() {
    let graph = prepare_hexagon(Point::new(1.0, 1.0), 1.0);
    let hash = canonical_hash(&graph);
    let rules = build_all(&RuleKind::ALL, &RuleOptions::default());
    for rule in &rules {
        let _ = rule.can_apply(&graph, None);
    }
    assert_eq!(canonical_hash(&graph), hash);
}

#[test]
fn dead_scope_never_matches() {
    let mut graph = single_hexagon(Point::new(0.0, 0.0), 1.0, true).unwrap();
    let (hexagon, _) = graph.hyperedges().next().unwrap();
    assert!(MarkHexagon.can_apply(&graph, Some(EdgeId::from_raw(42))).is_none());
    graph.remove_edge(hexagon);
    assert!(MarkHexagon.can_apply(&graph, Some(hexagon)).is_none());
}

#[test]
fn rule_kinds_parse_and_build() {
    assert_eq!("P10".parse::<RuleKind>().unwrap(), RuleKind::P10);
    assert_eq!("split-border-edge".parse::<RuleKind>().unwrap(), RuleKind::P4);
    let err = "P7".parse::<RuleKind>().unwrap_err();
    assert_eq!(err.code(), "unknown-rule");

    let kind: RuleKind = serde_json::from_str("\"refine-hexagon\"").unwrap();
    assert_eq!(kind, RuleKind::P11);
    assert_eq!(serde_json::to_string(&RuleKind::P1).unwrap(), "\"P1\"");

    let options = RuleOptions {
        quad_scan_order: ScanOrder::First,
        refinement_criterion: false,
    };
    for kind in RuleKind::ALL {
        let rule = kind.build(&options);
        assert_eq!(rule.name(), kind.name());
        assert_eq!(kind.to_string(), kind.name());
        assert!(!rule.description().is_empty());
    }
}

#[test]
fn rule_options_defaults_from_partial_json() {
    let options: RuleOptions = serde_json::from_str(r#"{"quad_scan_order":"first"}"#).unwrap();
    assert_eq!(options.quad_scan_order, ScanOrder::First);
    assert!(options.refinement_criterion);
    assert_eq!(RuleOptions::default().quad_scan_order, ScanOrder::Last);
}
