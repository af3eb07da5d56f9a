// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Undeclared source detection.
//!
//! ```text
//! src_dir ──find_files("**/*.{c,cp,cpp,cc,cxx,s}")──► on disk
//! libraries ─────────────────────────────────────────► declared (any version)
//!                     on disk − declared
//!                            |
//!          ignore | warn! per file | GraphError::UndeclaredSource
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use tracing::warn;

use crate::config::types::MissingConfigPolicy;
use crate::error::{GraphError, Result};
use crate::project::ProjectConfig;
use crate::utility::fs::walk::{WalkOptions, find_files};

/// Glob of every file kind a unit can declare.
pub const SOURCE_GLOB: &str = "**/*.{c,cp,cpp,cc,cxx,s}";

/// Source files under the project's source directories that no unit
/// declares, as `<src_dir>/<relative path>`.
///
/// Units restricted to other versions still count as declared. Source
/// directories that do not exist are skipped.
///
/// # Errors
///
/// Returns `GraphError::UndeclaredSource` for the first undeclared file when
/// the policy is `error`, or a walk error.
pub fn undeclared_sources(project: &ProjectConfig) -> Result<Vec<String>> {
    if project.missing_config() == MissingConfigPolicy::Ignore {
        return Ok(Vec::new());
    }

    let mut declared: BTreeMap<PathBuf, BTreeSet<&str>> = BTreeMap::new();
    declared.entry(project.src_dir().to_path_buf()).or_default();
    for library in project.libraries() {
        let entry = declared.entry(library.src_dir().to_path_buf()).or_default();
        entry.extend(library.units().iter().map(|u| u.source()));
    }

    let options = WalkOptions::for_source_tree();
    let mut undeclared = Vec::new();
    for (dir, sources) in &declared {
        if !dir.is_dir() {
            continue;
        }
        for file in find_files(dir, SOURCE_GLOB, &options)? {
            if !sources.contains(file.as_str()) {
                undeclared.push(format!("{}/{file}", dir.display()));
            }
        }
    }

    for path in &undeclared {
        match project.missing_config() {
            MissingConfigPolicy::Error => {
                return Err(GraphError::UndeclaredSource { path: path.clone() }.into());
            }
            _ => warn!(path = %path, "source file has no declared unit"),
        }
    }
    Ok(undeclared)
}
