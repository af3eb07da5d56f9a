// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Matching progress.
//!
//! ```text
//! BuildGraph.units ──filter is_counted──► jobs (declaration index)
//!                                          |
//!          buffer_unordered(n) + Semaphore |  reference missing ─► non-matching
//!                                          v
//!                       StructuralDiff::diff(reference, built?)
//!                                          |
//!                 sort by index ─► Measures per category / module / overall
//! ```
//!
//! A unit is matched when its built object is verified and the diff reports
//! every byte matching. Measure-only units add to the totals only.

pub mod diff;
pub mod report;


pub use diff::{DiffRequest, DiffSummary, ObjdiffCli, StructuralDiff, parse_summary};
pub use report::{GroupReport, Measures, ProgressReport};

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::graph::{BuildGraph, FsProbe, GraphUnit, SourceProbe};
use crate::project::{ModuleId, ProgressCategory, ProjectConfig};

/// Settings of one progress run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressOptions {
    pub include_host_units: bool,
    pub each_module: bool,
    pub categories: Vec<ProgressCategory>,
    /// Module names indexed by id.
    pub module_names: Vec<String>,
    pub show_bar: bool,
}

impl ProgressOptions {
    /// Options taken from the project's `[progress]` settings.
    #[must_use]
    pub fn from_project(project: &ProjectConfig) -> Self {
        let settings = project.progress();
        Self {
            include_host_units: settings.include_host_units,
            each_module: settings.each_module,
            categories: settings.categories.clone(),
            module_names: project.modules().iter().map(|m| m.name.clone()).collect(),
            show_bar: false,
        }
    }

    #[must_use]
    pub fn with_each_module(mut self, each_module: bool) -> Self {
        self.each_module |= each_module;
        self
    }

    #[must_use]
    pub const fn with_bar(mut self, show_bar: bool) -> Self {
        self.show_bar = show_bar;
        self
    }
}

/// Outcome for one counted unit.
#[derive(Debug, Clone, Copy)]
struct UnitResult {
    summary: Option<DiffSummary>,
    matched: bool,
}

/// Runs the structural diff over a graph and aggregates the results.
pub struct ProgressEngine {
    differ: Arc<dyn StructuralDiff>,
    probe: Arc<dyn SourceProbe>,
    options: ProgressOptions,
    semaphore: Arc<Semaphore>,
    cancel_token: CancellationToken,
}

impl ProgressEngine {
    /// Engine with one concurrent diff per available core.
    #[must_use]
    pub fn new(differ: Arc<dyn StructuralDiff>, options: ProgressOptions) -> Self {
        let max_concurrent = std::thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .unwrap_or(4);
        Self {
            differ,
            probe: Arc::new(FsProbe),
            options,
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            cancel_token: CancellationToken::new(),
        }
    }

    /// Limit concurrent diffs to `max_concurrent` (at least one).
    #[must_use]
    pub fn with_concurrency(mut self, max_concurrent: usize) -> Self {
        self.semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
        self
    }

    /// Replace the existence check for reference and built objects.
    #[must_use]
    pub fn with_probe(mut self, probe: Arc<dyn SourceProbe>) -> Self {
        self.probe = probe;
        self
    }

    #[must_use]
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Diff every counted unit of `graph` and aggregate.
    ///
    /// # Errors
    ///
    /// Returns the first diff failure, or an error when the run is cancelled.
    pub async fn compute(&self, graph: &BuildGraph) -> Result<ProgressReport> {
        let jobs: Vec<(usize, &GraphUnit)> = graph
            .units()
            .iter()
            .filter(|unit| unit.is_counted(self.options.include_host_units))
            .enumerate()
            .collect();
        debug!(units = jobs.len(), "computing progress");

        let bar = self.bar(jobs.len());
        let limit = self.semaphore.available_permits().max(1);
        let mut results: Vec<(usize, UnitResult)> = Vec::with_capacity(jobs.len());
        {
            let mut stream = futures_util::stream::iter(jobs.iter().copied())
                .map(|(index, unit)| async move { (index, self.measure(unit).await) })
                .buffer_unordered(limit);
            while let Some((index, result)) = stream.next().await {
                results.push((index, result?));
                bar.inc(1);
            }
        }
        bar.finish_and_clear();

        results.sort_by_key(|(index, _)| *index);
        let report = self.aggregate(graph, &jobs, &results);
        info!(
            version = graph.version(),
            matched = report.overall.matched_units,
            total = report.overall.total_units,
            "progress computed"
        );
        Ok(report)
    }

    async fn measure(&self, unit: &GraphUnit) -> Result<UnitResult> {
        if self.cancel_token.is_cancelled() {
            anyhow::bail!("progress calculation interrupted");
        }
        if !self.probe.exists(&unit.reference) {
            warn!(
                unit = %unit.name,
                path = %unit.reference.display(),
                library = %unit.library,
                "reference object missing, counted as non-matching"
            );
            return Ok(UnitResult {
                summary: None,
                matched: false,
            });
        }

        let verified = unit.is_verified();
        let base = if verified {
            unit.object
                .clone()
                .filter(|object| self.probe.exists(object))
        } else {
            None
        };
        if verified && base.is_none() {
            debug!(unit = %unit.name, "built object missing, measured only");
        }

        let request = DiffRequest {
            unit: unit.name.clone(),
            target: unit.reference.clone(),
            base,
        };
        let _permit = self.semaphore.acquire().await?;
        let summary = self
            .differ
            .diff(&request, self.cancel_token.clone())
            .await?;
        let compared = request.base.is_some();
        Ok(UnitResult {
            summary: Some(if compared {
                summary
            } else {
                DiffSummary {
                    matched_code: 0,
                    matched_data: 0,
                    ..summary
                }
            }),
            matched: compared && summary.is_full_match(),
        })
    }

    fn aggregate(
        &self,
        graph: &BuildGraph,
        jobs: &[(usize, &GraphUnit)],
        results: &[(usize, UnitResult)],
    ) -> ProgressReport {
        let mut overall = Measures::default();
        let mut categories: BTreeMap<&str, Measures> = BTreeMap::new();
        let mut modules: BTreeMap<ModuleId, Measures> = BTreeMap::new();

        for ((_, unit), (_, result)) in jobs.iter().zip(results) {
            let mut m = Measures {
                total_units: 1,
                ..Measures::default()
            };
            if let Some(summary) = result.summary {
                m.total_code = summary.total_code;
                m.total_data = summary.total_data;
                m.matched_code = summary.matched_code.min(summary.total_code);
                m.matched_data = summary.matched_data.min(summary.total_data);
            }
            if result.matched {
                m.matched_units = 1;
            }
            overall.absorb(&m);
            categories.entry(unit.category.as_str()).or_default().absorb(&m);
            modules.entry(unit.module).or_default().absorb(&m);
        }

        let mut category_reports = Vec::new();
        for declared in &self.options.categories {
            category_reports.push(GroupReport {
                id: declared.id.clone(),
                name: declared.name.clone(),
                measures: categories.remove(declared.id.as_str()).unwrap_or_default(),
            });
        }
        category_reports.extend(categories.into_iter().map(|(id, measures)| GroupReport {
            id: id.to_string(),
            name: id.to_string(),
            measures,
        }));

        let module_reports = if self.options.each_module {
            modules
                .into_iter()
                .map(|(id, measures)| {
                    let name = self
                        .options
                        .module_names
                        .get(id.0 as usize)
                        .cloned()
                        .unwrap_or_else(|| id.to_string());
                    GroupReport {
                        id: id.to_string(),
                        name,
                        measures,
                    }
                })
                .collect()
        } else {
            Vec::new()
        };

        ProgressReport {
            version: graph.version().to_string(),
            overall,
            categories: category_reports,
            modules: module_reports,
        }
    }

    fn bar(&self, len: usize) -> ProgressBar {
        if !self.options.show_bar {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len as u64);
        bar.set_style(bar_style());
        bar.set_message("diffing");
        bar
    }
}

/// Pre-validated progress bar style.
fn bar_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
        })
        .clone()
}
