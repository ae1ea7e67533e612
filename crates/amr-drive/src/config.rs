//! YAML pipeline configuration and its validation.

use std::fs;
use std::path::{Path, PathBuf};

use amr_core::errors::{AmrError, ErrorInfo};
use amr_core::{Point, HEXAGON_LABEL};
use amr_rules::{RuleKind, RuleOptions};
use serde::{Deserialize, Serialize};

/// YAML-configurable description of a refinement run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory receiving snapshots and the report. Nothing is written when unset.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Point refinement is steered towards.
    #[serde(default)]
    pub target: Option<Point>,
    /// Distance within which `target` snaps to an existing node.
    #[serde(default = "default_target_tolerance")]
    pub target_tolerance: f64,
    /// Upper bound on applied steps over the whole run.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    /// Options forwarded to the productions.
    #[serde(default)]
    pub rules: RuleOptions,
    /// Stages executed in order.
    #[serde(default = "default_stages")]
    pub stages: Vec<Stage>,
    /// Report assembled from the rendered snapshots.
    #[serde(default)]
    pub report: Option<ReportMeta>,
}

fn default_target_tolerance() -> f64 {
    0.1
}

fn default_max_steps() -> usize {
    10_000
}

fn default_stages() -> Vec<Stage> {
    vec![
        Stage::Mark {
            label: HEXAGON_LABEL.to_string(),
        },
        Stage::While {
            rules: vec![RuleKind::P10, RuleKind::P4, RuleKind::P11, RuleKind::P1],
        },
    ]
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            target: None,
            target_tolerance: default_target_tolerance(),
            max_steps: default_max_steps(),
            rules: RuleOptions::default(),
            stages: default_stages(),
            report: None,
        }
    }
}

impl PipelineConfig {
    /// Parses and validates a YAML document.
    pub fn from_yaml_str(contents: &str) -> Result<Self, AmrError> {
        let config: Self = serde_yaml::from_str(contents).map_err(|err| {
            AmrError::Config(ErrorInfo::new("config-parse", err.to_string()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a YAML file.
    pub fn load(path: &Path) -> Result<Self, AmrError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            AmrError::Config(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display()),
            )
        })?;
        Self::from_yaml_str(&contents)
            .map_err(|err| err.with_context("path", path.display()))
    }

    /// Serializes the configuration back to YAML.
    pub fn to_yaml_string(&self) -> Result<String, AmrError> {
        serde_yaml::to_string(self).map_err(|err| {
            AmrError::Config(ErrorInfo::new("config-serialize", err.to_string()))
        })
    }

    /// Checks bounds the deserializer cannot express.
    pub fn validate(&self) -> Result<(), AmrError> {
        if self.max_steps == 0 {
            return Err(AmrError::Config(
                ErrorInfo::new("invalid-max-steps", "max_steps must be positive")
                    .with_hint("omit the field to use the default"),
            ));
        }
        if self.target_tolerance.is_nan() || self.target_tolerance < 0.0 {
            return Err(AmrError::Config(
                ErrorInfo::new("invalid-tolerance", "target_tolerance must be non-negative")
                    .with_context("target_tolerance", self.target_tolerance),
            ));
        }
        for (index, stage) in self.stages.iter().enumerate() {
            if let Stage::While { rules } = stage {
                if rules.is_empty() {
                    return Err(AmrError::Config(
                        ErrorInfo::new("empty-stage", "while stage lists no rules")
                            .with_context("stage", index),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// One step of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum Stage {
    /// Flag the unmarked element with `label` nearest to the target.
    Mark {
        /// Element label, `S` or `Q`.
        label: String,
    },
    /// Apply a rule once, steered towards the target.
    Once {
        /// Rule to apply.
        rule: RuleKind,
    },
    /// Apply rules until a full pass changes nothing.
    While {
        /// Rules in pass order.
        rules: Vec<RuleKind>,
    },
}

/// Title page data for the assembled report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Report title.
    #[serde(default = "default_title")]
    pub title: String,
    /// Author names.
    #[serde(default)]
    pub authors: Vec<String>,
    /// Group identifier.
    #[serde(default)]
    pub group: Option<String>,
    /// Report file name relative to the output directory.
    #[serde(default = "default_report_file")]
    pub file: PathBuf,
}

fn default_title() -> String {
    "Mesh refinement".to_string()
}

fn default_report_file() -> PathBuf {
    PathBuf::from("report.json")
}

impl Default for ReportMeta {
    fn default() -> Self {
        Self {
            title: default_title(),
            authors: Vec::new(),
            group: None,
            file: default_report_file(),
        }
    }
}
