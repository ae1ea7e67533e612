//! Step-by-step application of productions to an owned graph.

use std::path::PathBuf;

use amr_core::errors::{AmrError, ErrorInfo};
use amr_core::{EdgeId, NodeId, Point};
use amr_graph::MeshGraph;
use amr_rules::{ApplyOutcome, Production};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::render::Renderer;
use crate::report::ReportPage;

/// Caption of the snapshot taken before any step.
pub const STARTING_LABEL: &str = "Starting Graph";

/// Knobs for a [`Driver`].
#[derive(Debug, Clone)]
pub struct DriverOptions {
    /// Upper bound on the step counter.
    pub max_steps: usize,
    /// Where snapshots go; `None` renders without a destination.
    pub output_dir: Option<PathBuf>,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            max_steps: 10_000,
            output_dir: None,
        }
    }
}

/// Record of one applied step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Zero-based step index.
    pub step: usize,
    /// Rule name, or `mark-<label>` for a marking step.
    pub rule: String,
    /// Element the step fired on.
    pub target: EdgeId,
    /// Snapshot written after the step.
    pub snapshot: Option<PathBuf>,
}

/// Owns a graph and applies productions to it one step at a time.
pub struct Driver {
    graph: MeshGraph,
    options: DriverOptions,
    target: Option<Point>,
    step: usize,
    renderer: Option<Box<dyn Renderer>>,
    pages: Vec<ReportPage>,
    history: Vec<StepRecord>,
}

impl Driver {
    /// Creates a driver without a renderer or target.
    pub fn new(graph: MeshGraph, options: DriverOptions) -> Self {
        Self {
            graph,
            options,
            target: None,
            step: 0,
            renderer: None,
            pages: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Renders after every applied step.
    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Current graph.
    pub fn graph(&self) -> &MeshGraph {
        &self.graph
    }

    /// Gives the graph back.
    pub fn into_graph(self) -> MeshGraph {
        self.graph
    }

    /// Number of steps applied so far.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Applied steps in order.
    pub fn history(&self) -> &[StepRecord] {
        &self.history
    }

    /// Snapshots written so far.
    pub fn pages(&self) -> &[ReportPage] {
        &self.pages
    }

    /// Point scoped applications are steered towards.
    pub fn target(&self) -> Option<Point> {
        self.target
    }

    /// Steers scoped applications towards `target`, or clears it.
    pub fn set_target(&mut self, target: Option<Point>) {
        self.target = target;
    }

    /// Targets the first node within `tolerance` of `point`.
    ///
    /// Leaves the target unset and returns `None` when no node is that close.
    pub fn target_node_at(&mut self, point: Point, tolerance: f64) -> Option<NodeId> {
        let found = self
            .graph
            .find_node_at(point, tolerance)
            .and_then(|node| Some((node, self.graph.node(node).ok()?.position())));
        match found {
            Some((node, position)) => {
                info!(%position, "target node set");
                self.target = Some(position);
                Some(node)
            }
            None => {
                warn!(%point, tolerance, "target node not found, using default order");
                self.target = None;
                None
            }
        }
    }

    /// Among live hyperedges `production` can be scoped to, the one whose
    /// reference point is nearest to `target`. Earlier edges win ties.
    pub fn closest_candidate(
        &self,
        production: &dyn Production,
        target: Point,
    ) -> Option<EdgeId> {
        let mut best: Option<(EdgeId, f64)> = None;
        for (id, _) in self.graph.hyperedges() {
            if production.can_apply(&self.graph, Some(id)).is_none() {
                continue;
            }
            let Ok(center) = self.graph.reference_point(id) else {
                continue;
            };
            let distance = center.distance(&target);
            if !matches!(best, Some((_, nearest)) if nearest <= distance) {
                best = Some((id, distance));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Snapshot of the graph before any step.
    pub fn render_start(&mut self) -> Result<(), AmrError> {
        let destination = self.snapshot_path("starting-graph");
        self.render(STARTING_LABEL, destination)?;
        Ok(())
    }

    /// Applies `production` once, scoped to the candidate nearest the
    /// target when one is set. Returns `None` when nothing matches.
    pub fn apply_once(
        &mut self,
        production: &dyn Production,
    ) -> Result<Option<ApplyOutcome>, AmrError> {
        let scope = self
            .target
            .and_then(|target| self.closest_candidate(production, target));
        if let Some(edge) = scope {
            debug!(rule = production.name(), %edge, "scoped to closest candidate");
        }
        let Some(context) = production.can_apply(&self.graph, scope) else {
            debug!(step = self.step, rule = production.name(), "cannot apply");
            return Ok(None);
        };
        self.ensure_budget(production.name())?;
        let outcome = production.apply(&mut self.graph, &context)?;
        self.record(production.name(), context.target)?;
        Ok(Some(outcome))
    }

    /// Applies each production until it stops matching, and repeats the
    /// pass until one full pass applies nothing. Returns the number of
    /// applications.
    pub fn apply_while(
        &mut self,
        productions: &[Box<dyn Production>],
    ) -> Result<usize, AmrError> {
        let mut applied = 0;
        loop {
            let mut changed = false;
            for production in productions {
                while let Some(context) = production.can_apply(&self.graph, None) {
                    self.ensure_budget(production.name())?;
                    production.apply(&mut self.graph, &context)?;
                    self.record(production.name(), context.target)?;
                    applied += 1;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        debug!(applied, step = self.step, "fixpoint reached");
        Ok(applied)
    }

    /// Marks the unmarked live hyperedge labelled `label` nearest to the
    /// target, or the first one without a target.
    pub fn mark_nearest(&mut self, label: &str) -> Result<Option<EdgeId>, AmrError> {
        let mut chosen: Option<(EdgeId, f64)> = None;
        for (id, edge) in self.graph.hyperedges() {
            if edge.label() != label || edge.is_marked() {
                continue;
            }
            let Some(target) = self.target else {
                chosen = Some((id, 0.0));
                break;
            };
            let distance = self.graph.reference_point(id)?.distance(&target);
            if !matches!(chosen, Some((_, nearest)) if nearest <= distance) {
                chosen = Some((id, distance));
            }
        }
        let Some((edge, _)) = chosen else {
            debug!(label, "no element to mark");
            return Ok(None);
        };
        let name = format!("mark-{label}");
        self.ensure_budget(&name)?;
        self.graph.set_marked(edge, true)?;
        self.record(&name, edge)?;
        Ok(Some(edge))
    }

    fn ensure_budget(&self, rule: &str) -> Result<(), AmrError> {
        if self.step >= self.options.max_steps {
            return Err(AmrError::Driver(
                ErrorInfo::new("step-limit", "step budget exhausted")
                    .with_context("max_steps", self.options.max_steps)
                    .with_context("rule", rule)
                    .with_hint("raise max_steps or check the rules reach a fixpoint"),
            ));
        }
        Ok(())
    }

    /// The step is counted even when rendering its snapshot fails.
    fn record(&mut self, rule: &str, target: EdgeId) -> Result<(), AmrError> {
        info!(step = self.step, rule, %target, "applied");
        let destination = self.snapshot_path(&format!("{:02}-{rule}", self.step));
        self.history.push(StepRecord {
            step: self.step,
            rule: rule.to_string(),
            target,
            snapshot: None,
        });
        self.step += 1;
        let snapshot = self.render(rule, destination)?;
        if let Some(record) = self.history.last_mut() {
            record.snapshot = snapshot;
        }
        Ok(())
    }

    fn snapshot_path(&self, stem: &str) -> Option<PathBuf> {
        let dir = self.options.output_dir.as_ref()?;
        let extension = self.renderer.as_ref()?.extension();
        Some(dir.join(format!("{stem}.{extension}")))
    }

    fn render(
        &mut self,
        label: &str,
        destination: Option<PathBuf>,
    ) -> Result<Option<PathBuf>, AmrError> {
        let Some(renderer) = self.renderer.as_ref() else {
            return Ok(None);
        };
        renderer.render(&self.graph, destination.as_deref())?;
        if let Some(path) = &destination {
            self.pages.push(ReportPage {
                label: label.to_string(),
                path: path.clone(),
            });
        }
        Ok(destination)
    }
}
