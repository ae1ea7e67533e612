use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use amr_core::errors::AmrError;
use amr_core::Point;
use amr_drive::{
    run_pipeline, JsonRenderer, ManifestReport, PipelineConfig, ReportAssembler, ReportMeta,
    Renderer, STARTING_LABEL,
};
use amr_graph::{canonical_hash, graph_from_json, initial_mesh, single_hexagon, MeshGraph};
use tempfile::tempdir;

#[derive(Clone, Default)]
struct Recording {
    calls: Rc<RefCell<Vec<(usize, Option<PathBuf>)>>>,
}

impl Renderer for Recording {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, graph: &MeshGraph, destination: Option<&Path>) -> Result<(), AmrError> {
        self.calls
            .borrow_mut()
            .push((graph.node_count(), destination.map(Path::to_path_buf)));
        Ok(())
    }
}

#[test]
fn pipeline_writes_snapshots_and_report() {
    let dir = tempdir().unwrap();
    let config = PipelineConfig {
        output_dir: Some(dir.path().join("run")),
        target: Some(Point::new(7.5, -6.5)),
        report: Some(ReportMeta {
            authors: vec!["A. Author".to_string()],
            group: Some("3".to_string()),
            ..ReportMeta::default()
        }),
        ..PipelineConfig::default()
    };
    let graph = initial_mesh(5.0).unwrap();
    let (graph, summary) = run_pipeline(&config, graph, Box::new(JsonRenderer)).unwrap();

    assert_eq!(summary.steps, 5);
    assert_eq!(summary.history[0].rule, "mark-S");
    assert_eq!(summary.history[1].rule, "P10");
    assert_eq!(summary.nodes, graph.node_count());
    assert_eq!(summary.graph_hash, canonical_hash(&graph));

    let run = dir.path().join("run");
    assert!(run.join("starting-graph.json").exists());
    assert!(run.join("00-mark-S.json").exists());
    assert!(run.join("01-P10.json").exists());
    let last = run.join("04-P4.json");
    let restored = graph_from_json(&std::fs::read_to_string(&last).unwrap()).unwrap();
    assert_eq!(canonical_hash(&restored), canonical_hash(&graph));

    let report = summary.report.unwrap();
    assert_eq!(report, run.join("report.json"));
    let manifest = ManifestReport::load(&report).unwrap();
    assert_eq!(manifest.pages.len(), 6);
    assert_eq!(manifest.pages[0].label, STARTING_LABEL);
    assert_eq!(manifest.pages[1].label, "mark-S");
    assert_eq!(manifest.authors, vec!["A. Author".to_string()]);
    assert_eq!(manifest.group.as_deref(), Some("3"));
}

#[test]
fn pipeline_without_output_dir_only_renders_in_memory() {
    let recording = Recording::default();
    let config = PipelineConfig {
        report: Some(ReportMeta::default()),
        ..PipelineConfig::default()
    };
    let graph = single_hexagon(Point::new(0.0, 0.0), 1.0, false).unwrap();
    let (graph, summary) = run_pipeline(&config, graph, Box::new(recording.clone())).unwrap();

    assert_eq!(summary.steps, 9);
    assert_eq!(graph.node_count(), 13);
    assert!(summary.report.is_none());
    let calls = recording.calls.borrow();
    assert_eq!(calls.len(), 10);
    assert!(calls.iter().all(|(_, path)| path.is_none()));
    assert_eq!(calls[0].0, 6);
    assert_eq!(calls[9].0, 13);
}

#[test]
fn pipeline_respects_step_budget() {
    let config = PipelineConfig {
        max_steps: 2,
        ..PipelineConfig::default()
    };
    let graph = single_hexagon(Point::new(0.0, 0.0), 1.0, false).unwrap();
    let err = run_pipeline(&config, graph, Box::new(JsonRenderer)).unwrap_err();
    assert_eq!(err.code(), "step-limit");
}

#[test]
fn empty_report_is_an_error() {
    let dir = tempdir().unwrap();
    let assembler = ManifestReport::new(dir.path().join("report.json"));
    let err = assembler.assemble(&[], &ReportMeta::default()).unwrap_err();
    assert_eq!(err.code(), "empty-report");
    assert!(!assembler.path().exists());
}

#[test]
fn json_renderer_creates_parent_directories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("graph.json");
    let graph = single_hexagon(Point::new(0.0, 0.0), 1.0, true).unwrap();
    JsonRenderer.render(&graph, Some(&path)).unwrap();
    let restored = graph_from_json(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(canonical_hash(&restored), canonical_hash(&graph));
    JsonRenderer.render(&graph, None).unwrap();
}
