// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! decomp-forge [global options] <command>
//! configure [project options]
//! progress  [project options] [--verbose] [--report FILE] [-j N]
//! options
//! inis
//! version
//! ```

pub mod global;
pub mod project;

#[cfg(test)]
mod tests;

use clap::{Parser, Subcommand};

use crate::cli::global::GlobalOptions;
use crate::cli::project::{ConfigureArgs, ProgressArgs};

/// Build-graph generator and matching-progress engine for decompilation
/// projects.
#[derive(Debug, Parser)]
#[command(
    name = "decomp-forge",
    author,
    version,
    about = "Decompilation build pipeline",
    long_about = "decomp-forge Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Generates build.ninja and objdiff.json from a declarative\n\
                  project file and reports matching progress. Run\n\
                  `decomp-forge configure` then `ninja`; see\n\
                  `decomp-forge <command> --help` for more information.",
    after_help = "PROJECT FILES:\n\n\
                  By default, `project.toml` in the current directory is loaded.\n\
                  Additional files given with --config are layered on top in order,\n\
                  then DECOMP_* environment variables (DECOMP_BUILD__NON_MATCHING=true),\n\
                  then --set overrides. Use --no-default-config to only use --config."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    Version,

    /// Lists all options and their values after merging.
    Options,

    /// Lists the project files that are loaded.
    Inis,

    /// Writes build.ninja and objdiff.json.
    Configure(ConfigureArgs),

    /// Diffs built objects against the references and reports progress.
    Progress(ProgressArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
