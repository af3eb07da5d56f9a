// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `progress` command.

use std::io::IsTerminal;
use std::sync::Arc;

use tracing::info;

use crate::cli::global::GlobalOptions;
use crate::cli::project::ProgressArgs;
use crate::emit::write_if_changed;
use crate::error::Result;
use crate::graph::GraphBuilder;
use crate::progress::{ObjdiffCli, ProgressEngine, ProgressOptions, ProgressReport};
use crate::project::ProjectConfig;
use crate::toolchain::{Tool, Toolchain};

use super::load_project;

/// Main handler for the `progress` command.
///
/// # Errors
///
/// Returns an error if the project cannot be loaded, `objdiff-cli` cannot be
/// resolved, a diff fails, the run is interrupted, or the report file cannot
/// be written.
pub async fn run_progress_command(args: &ProgressArgs, global: &GlobalOptions) -> Result<()> {
    let loaded = load_project(global, &args.project)?;
    let project = &loaded.project;
    if !project.progress().enabled {
        info!("progress reporting is disabled for this project");
        return Ok(());
    }

    let toolchain = Toolchain::new(project.tools());
    let options = ProgressOptions::from_project(project)
        .with_each_module(args.verbose)
        .with_bar(std::io::stderr().is_terminal());
    let mut engine = progress_engine(project, &toolchain, options)?;
    if let Some(jobs) = args.jobs {
        engine = engine.with_concurrency(jobs);
    }

    let cancel_token = engine.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Received Ctrl+C, interrupting diffs...");
            cancel_token.cancel();
        }
    });

    let report = compute_report(project, &engine).await?;
    print!("{report}");

    if let Some(path) = &args.report {
        write_if_changed(path, &report.to_json()?).await?;
        info!(path = %path.display(), "progress report written");
    }
    Ok(())
}

/// Engine diffing with `objdiff-cli` as configured for `project`.
///
/// # Errors
///
/// Returns an error if `objdiff-cli` cannot be resolved.
pub fn progress_engine(
    project: &ProjectConfig,
    toolchain: &Toolchain,
    options: ProgressOptions,
) -> Result<ProgressEngine> {
    let command = toolchain.resolve(&Tool::Objdiff)?;
    let differ = ObjdiffCli::new(command).with_report_args(project.progress().report_args.clone());
    Ok(ProgressEngine::new(Arc::new(differ), options))
}

/// Build the graph for `project` and run `engine` over it.
///
/// # Errors
///
/// Returns an error if graph construction or any diff fails.
pub async fn compute_report(
    project: &ProjectConfig,
    engine: &ProgressEngine,
) -> Result<ProgressReport> {
    let graph = GraphBuilder::new(project).build()?;
    engine.compute(&graph).await
}
