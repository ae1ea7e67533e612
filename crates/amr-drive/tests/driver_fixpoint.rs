use std::path::Path;

use amr_core::errors::{AmrError, ErrorInfo};
use amr_core::Point;
use amr_graph::{initial_mesh, single_hexagon, MeshGraph};
use amr_rules::{build_all, MarkHexagon, RuleKind, RuleOptions, SplitBorderEdge};
use amr_drive::{Driver, DriverOptions, Renderer};

struct FailingRenderer;

impl Renderer for FailingRenderer {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, _graph: &MeshGraph, _destination: Option<&Path>) -> Result<(), AmrError> {
        Err(AmrError::Driver(ErrorInfo::new("snapshot-write", "disk full")))
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

fn refinement_rules() -> Vec<Box<dyn amr_rules::Production>> {
    build_all(
        &[RuleKind::P10, RuleKind::P4, RuleKind::P11, RuleKind::P1],
        &RuleOptions::default(),
    )
}

#[test]
fn single_hexagon_reaches_fixpoint() {
    init_tracing();
    let graph = single_hexagon(Point::new(0.0, 0.0), 1.0, true).unwrap();
    let mut driver = Driver::new(graph, DriverOptions::default());

    let applied = driver.apply_while(&refinement_rules()).unwrap();
    assert_eq!(applied, 8);
    assert_eq!(driver.step(), 8);
    assert_eq!(driver.graph().node_count(), 13);
    assert_eq!(driver.graph().count_label("Q"), 6);
    assert_eq!(driver.graph().count_label("S"), 0);

    let rules: Vec<_> = driver.history().iter().map(|record| record.rule.as_str()).collect();
    assert_eq!(rules[0], "P10");
    assert!(rules[1..7].iter().all(|rule| *rule == "P4"));
    assert_eq!(rules[7], "P11");
    assert!(driver.history().iter().all(|record| record.snapshot.is_none()));

    // a second run has nothing left to do
    assert_eq!(driver.apply_while(&refinement_rules()).unwrap(), 0);
}

#[test]
fn initial_mesh_stops_at_interior_sides() {
    init_tracing();
    let graph = initial_mesh(5.0).unwrap();
    let mut driver = Driver::new(graph, DriverOptions::default());
    let target = driver.target_node_at(Point::new(7.5, -6.5), 0.1);
    assert!(target.is_some());
    assert_eq!(driver.target(), Some(Point::new(7.5, -6.5)));

    let marked = driver.mark_nearest("S").unwrap().unwrap();
    let center = driver.graph().reference_point(marked).unwrap();
    assert!(center.x > 0.0);

    let applied = driver.apply_while(&refinement_rules()).unwrap();
    // six sides marked, only the three border sides can be split
    assert_eq!(applied, 4);
    assert_eq!(driver.step(), 5);
    assert_eq!(driver.graph().node_count(), 15);
    assert_eq!(driver.graph().count_label("S"), 2);
    assert!(driver.graph().contains_edge(marked));
}

#[test]
fn apply_once_prefers_the_closest_candidate() {
    let mut graph = initial_mesh(5.0).unwrap();
    let hexagons: Vec<_> = graph
        .edges()
        .filter(|(_, edge)| edge.label() == "S")
        .map(|(id, _)| id)
        .collect();
    for hexagon in &hexagons {
        graph.set_marked(*hexagon, true).unwrap();
    }
    let mut driver = Driver::new(graph, DriverOptions::default());

    // without a target the first match wins
    let left = driver.closest_candidate(&MarkHexagon, Point::new(-100.0, 0.0));
    assert_eq!(left, Some(hexagons[0]));

    driver.set_target(Some(Point::new(7.5, -6.5)));
    assert_eq!(
        driver.closest_candidate(&MarkHexagon, Point::new(7.5, -6.5)),
        Some(hexagons[1])
    );
    let outcome = driver.apply_once(&MarkHexagon).unwrap().unwrap();
    assert_eq!(outcome.marked_edges.len(), 6);
    assert_eq!(driver.history()[0].target, hexagons[1]);

    // P4 has no hyperedge candidates and falls back to its own order
    assert!(driver.apply_once(&SplitBorderEdge).unwrap().is_some());
    assert_eq!(driver.step(), 2);
}

#[test]
fn apply_once_reports_no_match() {
    let graph = single_hexagon(Point::new(0.0, 0.0), 1.0, false).unwrap();
    let mut driver = Driver::new(graph, DriverOptions::default());
    assert!(driver.apply_once(&MarkHexagon).unwrap().is_none());
    assert_eq!(driver.step(), 0);
    assert!(driver.mark_nearest("Q").unwrap().is_none());
}

#[test]
fn missing_target_node_clears_target() {
    let graph = initial_mesh(5.0).unwrap();
    let mut driver = Driver::new(graph, DriverOptions::default());
    driver.set_target(Some(Point::new(1.0, 1.0)));
    assert!(driver.target_node_at(Point::new(100.0, 100.0), 0.1).is_none());
    assert_eq!(driver.target(), None);
}

#[test]
fn step_limit_is_enforced() {
    let graph = single_hexagon(Point::new(0.0, 0.0), 1.0, true).unwrap();
    let options = DriverOptions {
        max_steps: 3,
        ..DriverOptions::default()
    };
    let mut driver = Driver::new(graph, options);
    let err = driver.apply_while(&refinement_rules()).unwrap_err();
    assert_eq!(err.code(), "step-limit");
    assert_eq!(driver.step(), 3);
}

#[test]
fn failed_render_still_counts_the_step() {
    let graph = single_hexagon(Point::new(0.0, 0.0), 1.0, true).unwrap();
    let options = DriverOptions {
        output_dir: Some("unused".into()),
        ..DriverOptions::default()
    };
    let mut driver = Driver::new(graph, options).with_renderer(Box::new(FailingRenderer));

    let err = driver.apply_once(&MarkHexagon).unwrap_err();
    assert_eq!(err.code(), "snapshot-write");
    assert_eq!(driver.step(), 1);
    assert_eq!(driver.history().len(), 1);
    assert_eq!(driver.history()[0].rule, "P10");
    assert!(driver.history()[0].snapshot.is_none());
    assert!(driver.pages().is_empty());
    assert!(driver
        .graph()
        .edges()
        .filter(|(_, edge)| edge.label() == "E")
        .all(|(_, edge)| edge.is_marked()));
}
