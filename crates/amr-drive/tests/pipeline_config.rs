use std::fs;

use amr_core::Point;
use amr_drive::{PipelineConfig, ReportMeta, Stage};
use amr_rules::{RuleKind, ScanOrder};
use tempfile::tempdir;

const FULL: &str = r#"
output_dir: out
target: { x: 7.5, y: -6.5 }
target_tolerance: 0.25
max_steps: 500
rules:
  quad_scan_order: first
  refinement_criterion: false
stages:
  - mode: mark
    label: S
  - mode: once
    rule: mark-hexagon
  - mode: while
    rules: [P4, P11]
report:
  title: Hexagon refinement
  authors: [A. Author, B. Author]
  group: "3"
"#;

#[test]
fn full_config_parses() {
    let config = PipelineConfig::from_yaml_str(FULL).unwrap();
    assert_eq!(config.target, Some(Point::new(7.5, -6.5)));
    assert_eq!(config.target_tolerance, 0.25);
    assert_eq!(config.max_steps, 500);
    assert_eq!(config.rules.quad_scan_order, ScanOrder::First);
    assert!(!config.rules.refinement_criterion);
    assert_eq!(
        config.stages,
        vec![
            Stage::Mark {
                label: "S".to_string()
            },
            Stage::Once { rule: RuleKind::P10 },
            Stage::While {
                rules: vec![RuleKind::P4, RuleKind::P11]
            },
        ]
    );
    let report = config.report.unwrap();
    assert_eq!(report.authors.len(), 2);
    assert_eq!(report.group.as_deref(), Some("3"));
    assert_eq!(report.file, ReportMeta::default().file);
}

#[test]
fn empty_document_uses_defaults() {
    let config = PipelineConfig::from_yaml_str("{}").unwrap();
    assert!(config.output_dir.is_none());
    assert!(config.target.is_none());
    assert_eq!(config.max_steps, PipelineConfig::default().max_steps);
    assert_eq!(config.stages, PipelineConfig::default().stages);
    assert_eq!(config.rules.quad_scan_order, ScanOrder::Last);
}

#[test]
fn yaml_round_trip() {
    let config = PipelineConfig::from_yaml_str(FULL).unwrap();
    let yaml = config.to_yaml_string().unwrap();
    let again = PipelineConfig::from_yaml_str(&yaml).unwrap();
    assert_eq!(again.stages, config.stages);
    assert_eq!(again.report, config.report);
    assert_eq!(again.target, config.target);
}

#[test]
fn invalid_values_are_rejected() {
    let err = PipelineConfig::from_yaml_str("max_steps: 0").unwrap_err();
    assert_eq!(err.code(), "invalid-max-steps");

    let err = PipelineConfig::from_yaml_str("target_tolerance: -1.0").unwrap_err();
    assert_eq!(err.code(), "invalid-tolerance");

    let err = PipelineConfig::from_yaml_str("stages:\n  - mode: while\n    rules: []\n").unwrap_err();
    assert_eq!(err.code(), "empty-stage");

    let err = PipelineConfig::from_yaml_str("stages:\n  - mode: once\n    rule: P7\n").unwrap_err();
    assert_eq!(err.code(), "config-parse");
}

#[test]
fn load_reports_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pipeline.yaml");
    fs::write(&path, FULL).unwrap();
    let config = PipelineConfig::load(&path).unwrap();
    assert_eq!(config.max_steps, 500);

    let missing = dir.path().join("missing.yaml");
    let err = PipelineConfig::load(&missing).unwrap_err();
    assert_eq!(err.code(), "config-read");
    assert!(err.info().context.contains_key("path"));
}
