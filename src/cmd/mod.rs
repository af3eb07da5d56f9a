// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> build_config_loader --> Config --> ProjectConfig
//!          --> cmd::run_* handlers: configure, progress, options, inis
//! ```

pub mod config;
pub mod configure;
pub mod progress;


use std::path::PathBuf;

use crate::cli::global::GlobalOptions;
use crate::cli::project::ProjectArgs;
use crate::config::loader::ConfigLoader;
use crate::config::{Config, ENV_PREFIX, PROJECT_FILE};
use crate::error::Result;
use crate::project::ProjectConfig;

/// Loader with every source the command line names, lowest priority first.
///
/// # Errors
///
/// Returns an error if an override is not `KEY=VALUE`.
pub fn build_config_loader(
    global: &GlobalOptions,
    project: Option<&ProjectArgs>,
) -> Result<ConfigLoader> {
    let mut loader = ConfigLoader::new();
    if !global.no_default_config {
        loader = loader.add_toml_file_optional(PROJECT_FILE);
    }
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader = loader.with_env_prefix(ENV_PREFIX);

    for assignment in global.to_config_overrides() {
        loader = loader.set_assignment(&assignment)?;
    }
    if let Some(project) = project {
        for assignment in project.to_config_overrides() {
            loader = loader.set_assignment(&assignment)?;
        }
    }
    Ok(loader)
}

/// A loaded project together with the files it was read from.
#[derive(Debug)]
pub struct LoadedProject {
    /// Project files that exist, in load order.
    pub files: Vec<PathBuf>,
    pub config: Config,
    pub project: ProjectConfig,
}

/// Load the merged configuration and the project for the selected version.
///
/// # Errors
///
/// Returns an error if a source cannot be read or parsed, or the project is
/// invalid (unknown version, preset, module or category).
pub fn load_project(global: &GlobalOptions, args: &ProjectArgs) -> Result<LoadedProject> {
    let loader = build_config_loader(global, Some(args))?;
    let files = loader
        .loaded_files()
        .into_iter()
        .map(|(_, path)| path)
        .collect();
    let config = loader.build()?;
    let project = ProjectConfig::new(&config, args.version.as_deref())?;
    tracing::debug!(
        project = project.name(),
        version = project.version(),
        libraries = project.libraries().len(),
        "project loaded"
    );
    Ok(LoadedProject {
        files,
        config,
        project,
    })
}
