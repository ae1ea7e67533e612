//! Runs the configured stages end to end.

use std::path::PathBuf;

use amr_core::errors::AmrError;
use amr_graph::{canonical_hash, MeshGraph};
use amr_rules::build_all;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{PipelineConfig, Stage};
use crate::driver::{Driver, DriverOptions, StepRecord};
use crate::render::Renderer;
use crate::report::{ManifestReport, ReportAssembler};

/// Outcome of [`run_pipeline`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Total applied steps.
    pub steps: usize,
    /// Every applied step in order.
    pub history: Vec<StepRecord>,
    /// Node count of the final graph.
    pub nodes: usize,
    /// Live edge count of the final graph.
    pub edges: usize,
    /// Canonical hash of the final graph.
    pub graph_hash: String,
    /// Assembled report, when one was configured.
    pub report: Option<PathBuf>,
}

/// Runs every stage of `config` against `graph` and returns the refined
/// graph with a summary of what happened.
pub fn run_pipeline(
    config: &PipelineConfig,
    graph: MeshGraph,
    renderer: Box<dyn Renderer>,
) -> Result<(MeshGraph, RunSummary), AmrError> {
    config.validate()?;
    let options = DriverOptions {
        max_steps: config.max_steps,
        output_dir: config.output_dir.clone(),
    };
    let mut driver = Driver::new(graph, options).with_renderer(renderer);
    if let Some(target) = config.target {
        driver.target_node_at(target, config.target_tolerance);
    }
    driver.render_start()?;

    for (index, stage) in config.stages.iter().enumerate() {
        let before = driver.step();
        match stage {
            Stage::Mark { label } => {
                driver.mark_nearest(label)?;
            }
            Stage::Once { rule } => {
                let production = rule.build(&config.rules);
                driver.apply_once(production.as_ref())?;
            }
            Stage::While { rules } => {
                let productions = build_all(rules, &config.rules);
                driver.apply_while(&productions)?;
            }
        }
        info!(stage = index, applied = driver.step() - before, "stage finished");
    }

    let report = match (&config.report, &config.output_dir) {
        (Some(meta), Some(dir)) => {
            let assembler = ManifestReport::new(dir.join(&meta.file));
            assembler.assemble(driver.pages(), meta)?;
            Some(assembler.path().to_path_buf())
        }
        _ => None,
    };

    let summary = RunSummary {
        steps: driver.step(),
        history: driver.history().to_vec(),
        nodes: driver.graph().node_count(),
        edges: driver.graph().edge_count(),
        graph_hash: canonical_hash(driver.graph()),
        report,
    };
    info!(steps = summary.steps, nodes = summary.nodes, "pipeline finished");
    Ok((driver.into_graph(), summary))
}
