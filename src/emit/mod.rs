// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Build plan emission.
//!
//! ```text
//! BuildGraph ──render_ninja──► build.ninja   ┐
//!            ──render_objdiff► objdiff.json  ┴─► write_if_changed (tokio::fs)
//! ```
//!
//! Both files are regenerated in full. A file whose content is unchanged is
//! left untouched so Ninja does not see a newer timestamp.

pub mod ninja;
pub mod objdiff;
mod plan;


pub use objdiff::{render_objdiff, unit_name};
pub use plan::{EmitOptions, render_ninja};

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ForgeResult, FsError, Result};
use crate::graph::BuildGraph;
use crate::project::ProjectConfig;
use crate::toolchain::Toolchain;

/// What [`emit`] wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitSummary {
    pub ninja_file: PathBuf,
    pub objdiff_file: PathBuf,
    /// Files whose content changed.
    pub written: Vec<PathBuf>,
}

/// Render and write `build.ninja` and `objdiff.json`.
///
/// # Errors
///
/// Returns an error if a tool cannot be resolved or a file cannot be written.
pub async fn emit(
    project: &ProjectConfig,
    graph: &BuildGraph,
    toolchain: &Toolchain,
    options: &EmitOptions,
) -> Result<EmitSummary> {
    let paths = project.paths();
    let ninja_file = paths.ninja_file();
    let objdiff_file = paths.objdiff_file();

    let ninja = render_ninja(project, graph, toolchain, options)?;
    let objdiff = render_objdiff(project, graph)?;

    let mut written = Vec::new();
    for (path, content) in [(&ninja_file, ninja), (&objdiff_file, objdiff)] {
        if write_if_changed(path, &content).await? {
            written.push(path.clone());
        }
    }

    info!(
        ninja = %ninja_file.display(),
        objdiff = %objdiff_file.display(),
        changed = written.len(),
        "build plan written"
    );
    Ok(EmitSummary {
        ninja_file,
        objdiff_file,
        written,
    })
}

/// Write `content` to `path` unless the file already holds it. Returns
/// whether the file was written.
///
/// # Errors
///
/// Returns `FsError::IoError` if the parent directory cannot be created or
/// the file cannot be written.
pub async fn write_if_changed(path: &Path, content: &str) -> ForgeResult<bool> {
    if let Ok(existing) = tokio::fs::read(path).await
        && existing == content.as_bytes()
    {
        debug!(path = %path.display(), "unchanged, not rewritten");
        return Ok(false);
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| io_error(parent, source))?;
    }
    tokio::fs::write(path, content)
        .await
        .map_err(|source| io_error(path, source))?;
    debug!(path = %path.display(), bytes = content.len(), "written");
    Ok(true)
}

fn io_error(path: &Path, source: std::io::Error) -> FsError {
    FsError::IoError {
        path: path.display().to_string(),
        source,
    }
}
