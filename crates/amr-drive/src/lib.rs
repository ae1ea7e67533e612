#![deny(missing_docs)]
#![doc = include_str!("../docs/drive-api.md")]

//! Rewrite driver, pipeline configuration and output collaborators.

pub mod config;
pub mod driver;
pub mod pipeline;
pub mod render;
pub mod report;

pub use config::{PipelineConfig, ReportMeta, Stage};
pub use driver::{Driver, DriverOptions, StepRecord, STARTING_LABEL};
pub use pipeline::{run_pipeline, RunSummary};
pub use render::{JsonRenderer, Renderer};
pub use report::{ManifestReport, ReportAssembler, ReportManifest, ReportPage};
