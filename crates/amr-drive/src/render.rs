//! Graph snapshot renderers.

use std::fs;
use std::path::Path;

use amr_core::errors::{AmrError, ErrorInfo};
use amr_graph::{canonical_hash, graph_to_json, MeshGraph};
use tracing::info;

/// Produces a visual or serialized snapshot of a graph.
pub trait Renderer {
    /// File extension of the snapshots this renderer writes.
    fn extension(&self) -> &'static str;

    /// Renders `graph` to `destination`, or somewhere of the renderer's
    /// choosing (a log line, a window) when none is given.
    fn render(&self, graph: &MeshGraph, destination: Option<&Path>) -> Result<(), AmrError>;
}

/// Writes pretty JSON snapshots, or logs a one-line summary without a destination.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, graph: &MeshGraph, destination: Option<&Path>) -> Result<(), AmrError> {
        let Some(path) = destination else {
            info!(
                nodes = graph.node_count(),
                edges = graph.edge_count(),
                hyperedges = graph.hyperedge_count(),
                hash = %canonical_hash(graph),
                "graph snapshot"
            );
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                AmrError::Serde(
                    ErrorInfo::new("snapshot-mkdir", err.to_string())
                        .with_context("path", parent.display()),
                )
            })?;
        }
        let json = graph_to_json(graph)?;
        fs::write(path, json).map_err(|err| {
            AmrError::Serde(
                ErrorInfo::new("snapshot-write", err.to_string())
                    .with_context("path", path.display()),
            )
        })
    }
}
