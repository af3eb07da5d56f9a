// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `configure` command.
//!
//! ```text
//! load_project ─► undeclared_sources ─► GraphBuilder ─► emit
//!                  (warn / error)                         build.ninja, objdiff.json
//! ```

use tracing::info;

use crate::cli::global::GlobalOptions;
use crate::cli::project::ConfigureArgs;
use crate::emit::{EmitOptions, EmitSummary, emit};
use crate::error::Result;
use crate::graph::GraphBuilder;
use crate::graph::scan::undeclared_sources;
use crate::project::ProjectConfig;
use crate::toolchain::Toolchain;

use super::load_project;

/// Main handler for the `configure` command.
///
/// # Errors
///
/// Returns an error if the project cannot be loaded, graph construction
/// fails, a required tool cannot be resolved, or a file cannot be written.
pub async fn run_configure_command(args: &ConfigureArgs, global: &GlobalOptions) -> Result<()> {
    let loaded = load_project(global, &args.project)?;
    let options = EmitOptions {
        configure_command: std::env::args().map(|arg| shell_word(&arg)).collect(),
        configure_inputs: loaded.files,
    };
    let toolchain = Toolchain::new(loaded.project.tools());
    let summary = configure(&loaded.project, &toolchain, &options).await?;
    println!(
        "Wrote {} and {}",
        summary.ninja_file.display(),
        summary.objdiff_file.display()
    );
    Ok(())
}

/// Scan, build the graph and write the plan for `project`.
///
/// # Errors
///
/// See [`run_configure_command`].
pub async fn configure(
    project: &ProjectConfig,
    toolchain: &Toolchain,
    options: &EmitOptions,
) -> Result<EmitSummary> {
    let undeclared = undeclared_sources(project)?;
    let graph = GraphBuilder::new(project).build()?;
    let summary = emit(project, &graph, toolchain, options).await?;
    info!(
        version = project.version(),
        mode = ?graph.mode(),
        units = graph.units().len(),
        steps = graph.steps().len(),
        undeclared = undeclared.len(),
        "configured"
    );
    Ok(summary)
}

/// Quote an argument for the regeneration command line.
fn shell_word(arg: &str) -> String {
    if arg.is_empty() || arg.contains([' ', '\t', '"', '\'']) {
        format!("\"{}\"", arg.replace('"', "\\\""))
    } else {
        arg.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::shell_word;

    #[test]
    fn test_shell_word() {
        assert_eq!(shell_word("configure"), "configure");
        assert_eq!(shell_word("my dir/p.toml"), "\"my dir/p.toml\"");
        assert_eq!(shell_word(""), "\"\"");
    }
}
