#![allow(dead_code)]

use std::collections::BTreeMap;
use std::f64::consts::PI;

use amr_core::{EdgeId, NodeId, Point};
use amr_graph::{single_hexagon, GraphConfig, MeshGraph};
use amr_rules::{MarkHexagon, Production, RefineHexagon, SplitBorderEdge};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

/// Boundary sides of `element`, in boundary order.
pub fn sides(graph: &MeshGraph, element: EdgeId) -> Vec<EdgeId> {
    let edge = graph.edge(element).unwrap();
    edge.boundary_pairs()
        .map(|(a, b)| graph.get_edge_between(a, b).unwrap())
        .collect()
}

/// Runs P10 once and P4 until every side of the only hexagon is split.
pub fn prepare_hexagon(center: Point, radius: f64) -> MeshGraph {
    let mut graph = single_hexagon(center, radius, true).unwrap();
    MarkHexagon.try_apply(&mut graph, None).unwrap().unwrap();
    let mut splits = 0;
    while SplitBorderEdge.try_apply(&mut graph, None).unwrap().is_some() {
        splits += 1;
    }
    assert_eq!(splits, 6);
    graph
}

/// Full mark, split and refine sequence on a fresh hexagon.
pub fn refine_hexagon(center: Point, radius: f64) -> MeshGraph {
    let mut graph = prepare_hexagon(center, radius);
    RefineHexagon::new()
        .try_apply(&mut graph, None)
        .unwrap()
        .unwrap();
    graph
}

/// Every live edge with its nodes, label and flags.
pub fn snapshot(graph: &MeshGraph) -> BTreeMap<EdgeId, (Vec<u64>, String, bool, bool)> {
    graph
        .edges()
        .map(|(id, edge)| {
            (
                id,
                (
                    edge.nodes().iter().map(|node| node.as_raw()).collect(),
                    edge.label().to_string(),
                    edge.is_marked(),
                    edge.is_border(),
                ),
            )
        })
        .collect()
}

/// A marked unit hexagon at the origin whose sides are already split,
/// built directly on a graph with `config`.
pub struct Bisected {
    pub graph: MeshGraph,
    pub hexagon: EdgeId,
    pub corners: Vec<NodeId>,
    pub midpoints: Vec<NodeId>,
}

pub fn bisected_hexagon(config: GraphConfig) -> Bisected {
    let mut graph = MeshGraph::new(config);
    let corners: Vec<NodeId> = (0..6)
        .map(|k| {
            let angle = PI / 3.0 * k as f64;
            graph.add_node(Point::new(angle.cos(), angle.sin()), "V")
        })
        .collect();
    let mut midpoints = Vec::with_capacity(6);
    for i in 0..6 {
        let (a, b) = (corners[i], corners[(i + 1) % 6]);
        let position = graph
            .node(a)
            .unwrap()
            .position()
            .midpoint(&graph.node(b).unwrap().position());
        let middle = graph.add_node(position, "V");
        graph.add_edge(a, middle, true, "E").unwrap();
        graph.add_edge(middle, b, true, "E").unwrap();
        midpoints.push(middle);
    }
    let hexagon = graph.add_hyperedge(&corners, "S").unwrap();
    graph.set_marked(hexagon, true).unwrap();
    Bisected {
        graph,
        hexagon,
        corners,
        midpoints,
    }
}
