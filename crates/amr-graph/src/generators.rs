use std::f64::consts::PI;

use amr_core::errors::{AmrError, ErrorInfo};
use amr_core::{NodeId, Point, EDGE_LABEL, HEXAGON_LABEL, NODE_LABEL, QUAD_LABEL};

use crate::hypergraph::MeshGraph;

/// Builds a single regular hexagonal element.
///
/// Six corners counter-clockwise from angle zero, six border `E` edges and
/// one `S` hyperedge whose `R` flag is set to `marked`.
pub fn single_hexagon(center: Point, radius: f64, marked: bool) -> Result<MeshGraph, AmrError> {
    if radius.is_nan() || radius <= 0.0 {
        return Err(AmrError::Graph(
            ErrorInfo::new("invalid-radius", "hexagon radius must be positive")
                .with_context("radius", radius),
        ));
    }
    let mut graph = MeshGraph::default();
    let corners: Vec<NodeId> = (0..6)
        .map(|k| {
            let angle = PI / 3.0 * k as f64;
            graph.add_node(
                Point::new(
                    center.x + radius * angle.cos(),
                    center.y + radius * angle.sin(),
                ),
                NODE_LABEL,
            )
        })
        .collect();
    for i in 0..6 {
        graph.add_edge(corners[i], corners[(i + 1) % 6], true, EDGE_LABEL)?;
    }
    let hexagon = graph.add_hyperedge(&corners, HEXAGON_LABEL)?;
    graph.set_marked(hexagon, marked)?;
    Ok(graph)
}

/// Builds `count` unit quadrilaterals in a row sharing their vertical sides.
///
/// Outer sides are border edges, shared sides are interior. Quads are listed
/// left to right as `[bottom_i, bottom_i+1, top_i+1, top_i]`, all unmarked.
pub fn quad_strip(count: usize) -> Result<MeshGraph, AmrError> {
    if count == 0 {
        return Err(AmrError::Graph(ErrorInfo::new(
            "empty-strip",
            "quad strip requires at least one element",
        )));
    }
    let mut graph = MeshGraph::default();
    let bottom: Vec<NodeId> = (0..=count)
        .map(|i| graph.add_node(Point::new(i as f64, 0.0), NODE_LABEL))
        .collect();
    let top: Vec<NodeId> = (0..=count)
        .map(|i| graph.add_node(Point::new(i as f64, 1.0), NODE_LABEL))
        .collect();
    for i in 0..count {
        graph.add_edge(bottom[i], bottom[i + 1], true, EDGE_LABEL)?;
        graph.add_edge(top[i], top[i + 1], true, EDGE_LABEL)?;
    }
    for i in 0..=count {
        let outer = i == 0 || i == count;
        graph.add_edge(bottom[i], top[i], outer, EDGE_LABEL)?;
    }
    for i in 0..count {
        graph.add_hyperedge(&[bottom[i], bottom[i + 1], top[i + 1], top[i]], QUAD_LABEL)?;
    }
    Ok(graph)
}

/// Builds the reference starting mesh: a central rectangle, a trapezoid
/// above and below it, and a hexagon on either side, all unmarked.
///
/// `scale` stretches the whole layout; the reference uses `5.0`.
pub fn initial_mesh(scale: f64) -> Result<MeshGraph, AmrError> {
    let mut graph = MeshGraph::default();
    let width = 2.0 * scale;
    let height = scale;
    let trap_height = 0.8 * scale;
    let trap_extra = 0.5 * scale;
    let hex_width = 0.8 * scale;

    let node = |graph: &mut MeshGraph, x: f64, y: f64| graph.add_node(Point::new(x, y), NODE_LABEL);

    let c1 = node(&mut graph, -width / 2.0, -height / 2.0);
    let c2 = node(&mut graph, width / 2.0, -height / 2.0);
    let c3 = node(&mut graph, width / 2.0, height / 2.0);
    let c4 = node(&mut graph, -width / 2.0, height / 2.0);
    graph.add_edge(c1, c2, false, EDGE_LABEL)?;
    graph.add_edge(c2, c3, false, EDGE_LABEL)?;
    graph.add_edge(c3, c4, false, EDGE_LABEL)?;
    graph.add_edge(c4, c1, false, EDGE_LABEL)?;
    graph.add_hyperedge(&[c1, c2, c3, c4], QUAD_LABEL)?;

    let bt1 = node(&mut graph, -width / 2.0 - trap_extra, -height / 2.0 - trap_height);
    let bt2 = node(&mut graph, width / 2.0 + trap_extra, -height / 2.0 - trap_height);
    graph.add_edge(bt1, bt2, true, EDGE_LABEL)?;
    graph.add_hyperedge(&[bt1, bt2, c2, c1], QUAD_LABEL)?;

    let tt1 = node(&mut graph, -width / 2.0 - trap_extra, height / 2.0 + trap_height);
    let tt2 = node(&mut graph, width / 2.0 + trap_extra, height / 2.0 + trap_height);
    graph.add_edge(tt1, tt2, true, EDGE_LABEL)?;
    graph.add_hyperedge(&[c4, tt1, tt2, c3], QUAD_LABEL)?;

    let lh1 = node(
        &mut graph,
        -width / 2.0 - hex_width - trap_extra,
        -height / 2.0 - trap_height / 2.0,
    );
    let lh2 = node(
        &mut graph,
        -width / 2.0 - hex_width - trap_extra,
        height / 2.0 + trap_height / 2.0,
    );
    graph.add_edge(bt1, lh1, true, EDGE_LABEL)?;
    graph.add_edge(lh1, lh2, true, EDGE_LABEL)?;
    graph.add_edge(lh2, tt1, true, EDGE_LABEL)?;
    graph.add_edge(tt1, c4, false, EDGE_LABEL)?;
    graph.add_edge(c1, bt1, false, EDGE_LABEL)?;
    graph.add_hyperedge(&[bt1, lh1, lh2, tt1, c4, c1], HEXAGON_LABEL)?;

    let rh1 = node(
        &mut graph,
        width / 2.0 + hex_width + trap_extra,
        -height / 2.0 - trap_height / 2.0,
    );
    let rh2 = node(
        &mut graph,
        width / 2.0 + hex_width + trap_extra,
        height / 2.0 + trap_height / 2.0,
    );
    graph.add_edge(c2, bt2, false, EDGE_LABEL)?;
    graph.add_edge(bt2, rh1, true, EDGE_LABEL)?;
    graph.add_edge(rh1, rh2, true, EDGE_LABEL)?;
    graph.add_edge(rh2, tt2, true, EDGE_LABEL)?;
    graph.add_edge(tt2, c3, false, EDGE_LABEL)?;
    graph.add_hyperedge(&[c2, bt2, rh1, rh2, tt2, c3], HEXAGON_LABEL)?;

    Ok(graph)
}
