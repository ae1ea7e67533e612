//! Report manifest assembled from rendered snapshots.

use std::fs;
use std::path::{Path, PathBuf};

use amr_core::errors::{AmrError, ErrorInfo};
use serde::{Deserialize, Serialize};

use crate::config::ReportMeta;

/// A rendered snapshot and the caption it appears under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPage {
    /// Caption, either `Starting Graph` or the rule name.
    pub label: String,
    /// Snapshot location.
    pub path: PathBuf,
}

/// Collects rendered snapshots into a report document.
pub trait ReportAssembler {
    /// Builds the report from `pages` in order.
    fn assemble(&self, pages: &[ReportPage], meta: &ReportMeta) -> Result<(), AmrError>;
}

/// Structured manifest describing an assembled report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportManifest {
    /// Report title.
    pub title: String,
    /// Author names.
    pub authors: Vec<String>,
    /// Group identifier.
    pub group: Option<String>,
    /// RFC 3339 creation timestamp.
    pub generated_at: String,
    /// Pages in presentation order.
    pub pages: Vec<ReportPage>,
}

/// Writes the report as a JSON manifest at a fixed path.
#[derive(Debug, Clone)]
pub struct ManifestReport {
    path: PathBuf,
}

impl ManifestReport {
    /// Targets `path`; parent directories are created on demand.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Manifest location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads a manifest from disk.
    pub fn load(path: &Path) -> Result<ReportManifest, AmrError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            AmrError::Serde(
                ErrorInfo::new("manifest-read", err.to_string())
                    .with_context("path", path.display()),
            )
        })?;
        serde_json::from_str(&contents).map_err(|err| {
            AmrError::Serde(
                ErrorInfo::new("manifest-parse", err.to_string())
                    .with_context("path", path.display()),
            )
        })
    }
}

impl ReportAssembler for ManifestReport {
    fn assemble(&self, pages: &[ReportPage], meta: &ReportMeta) -> Result<(), AmrError> {
        if pages.is_empty() {
            return Err(AmrError::Driver(
                ErrorInfo::new("empty-report", "no snapshots were rendered")
                    .with_hint("set output_dir so that steps are written to disk"),
            ));
        }
        let manifest = ReportManifest {
            title: meta.title.clone(),
            authors: meta.authors.clone(),
            group: meta.group.clone(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            pages: pages.to_vec(),
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                AmrError::Serde(
                    ErrorInfo::new("manifest-mkdir", err.to_string())
                        .with_context("path", parent.display()),
                )
            })?;
        }
        let json = serde_json::to_string_pretty(&manifest).map_err(|err| {
            AmrError::Serde(
                ErrorInfo::new("manifest-serialize", err.to_string())
                    .with_context("path", self.path.display()),
            )
        })?;
        fs::write(&self.path, json).map_err(|err| {
            AmrError::Serde(
                ErrorInfo::new("manifest-write", err.to_string())
                    .with_context("path", self.path.display()),
            )
        })
    }
}
