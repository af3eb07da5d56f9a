// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `objdiff.json` project descriptor.
//!
//! ```text
//! {
//!   "min_version", "custom_make": "ninja", "custom_args": ["-f", <build.ninja>],
//!   "build_target": false, "build_base": true, "watch_patterns": [...],
//!   "units": [{ name, target_path, base_path?, metadata }],
//!   "progress_categories": [{ id, name }]
//! }
//! ```

use serde::Serialize;

use crate::graph::BuildGraph;
use crate::project::{EffectiveStatus, ProgressCategory, ProjectConfig};
use crate::toolchain::display_path;

/// Oldest diff tool release that reads this descriptor.
pub const MIN_VERSION: &str = "2.0.0-beta.5";

const WATCH_PATTERNS: &[&str] = &[
    "*.c", "*.cp", "*.cpp", "*.cc", "*.cxx", "*.h", "*.hpp", "*.inc", "*.s", "*.yml", "*.toml",
    "*.txt", "*.json",
];

#[derive(Debug, Serialize)]
struct Descriptor<'a> {
    min_version: &'static str,
    custom_make: &'static str,
    custom_args: Vec<String>,
    build_target: bool,
    build_base: bool,
    watch_patterns: &'static [&'static str],
    units: Vec<Unit>,
    progress_categories: &'a [ProgressCategory],
}

#[derive(Debug, Serialize)]
struct Unit {
    name: String,
    target_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    base_path: Option<String>,
    metadata: Metadata,
}

#[derive(Debug, Serialize)]
struct Metadata {
    complete: bool,
    progress_categories: Vec<String>,
    source_path: String,
}

/// Diff-report name of a unit: `<module>/<source without extension>`.
#[must_use]
pub fn unit_name(module: &str, source: &str) -> String {
    let stem = source.rsplit_once('.').map_or(source, |(stem, _)| stem);
    format!("{module}/{stem}")
}

/// Render the descriptor for every unit that takes part in progress.
///
/// # Errors
///
/// Returns a `serde_json` error if serialisation fails.
pub fn render_objdiff(project: &ProjectConfig, graph: &BuildGraph) -> serde_json::Result<String> {
    let include_host = project.progress().include_host_units;
    let units = graph
        .units()
        .iter()
        .filter(|unit| unit.is_counted(include_host))
        .map(|unit| {
            let module = project
                .module(unit.module)
                .map_or("main", |m| m.name.as_str());
            Unit {
                name: unit_name(module, &unit.name),
                target_path: display_path(&unit.reference),
                base_path: unit.object.as_deref().map(display_path),
                metadata: Metadata {
                    complete: unit.status == EffectiveStatus::Matching,
                    progress_categories: vec![unit.category.clone()],
                    source_path: display_path(&unit.source),
                },
            }
        })
        .collect();

    let descriptor = Descriptor {
        min_version: MIN_VERSION,
        custom_make: "ninja",
        custom_args: vec!["-f".to_string(), display_path(&project.paths().ninja_file())],
        build_target: false,
        build_base: true,
        watch_patterns: WATCH_PATTERNS,
        units,
        progress_categories: &project.progress().categories,
    };
    let mut text = serde_json::to_string_pretty(&descriptor)?;
    text.push('\n');
    Ok(text)
}
