// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `configure` and `progress` arguments.
//!
//! # Flag Effects
//!
//! ```text
//! --version V      selected version          --map          build.generate_map
//! --build-dir DIR  build.build_dir           --debug        build.debug
//! --binutils DIR   tools.binutils            --warn W       build.warn
//! --compilers DIR  tools.compilers           --non-matching build.non_matching
//! --dtk/--objdiff/--wrapper/--sjiswrap       --no-progress  progress.enabled=false
//! ```
//!
//! Everything but `--version` becomes a configuration override applied last,
//! above `--set`.

use std::path::PathBuf;

use clap::Args;

use crate::config::types::WarnPolicy;

/// Options shared by `configure` and `progress`.
#[derive(Debug, Clone, Default, Args)]
pub struct ProjectArgs {
    /// Version to build (defaults to `project.default_version`, then the first
    /// declared version).
    #[arg(long = "version", id = "target_version", value_name = "VERSION")]
    pub version: Option<String>,

    /// Base build directory.
    #[arg(long = "build-dir", value_name = "DIR")]
    pub build_dir: Option<PathBuf>,

    /// Directory containing powerpc-eabi binutils.
    #[arg(long, value_name = "DIR")]
    pub binutils: Option<PathBuf>,

    /// Directory containing one subdirectory per compiler version.
    #[arg(long, value_name = "DIR")]
    pub compilers: Option<PathBuf>,

    /// Path to the decomp-toolkit binary.
    #[arg(long, value_name = "BIN")]
    pub dtk: Option<PathBuf>,

    /// Path to the objdiff-cli binary.
    #[arg(long, value_name = "BIN")]
    pub objdiff: Option<PathBuf>,

    /// Wrapper for Windows executables (wibo or wine).
    #[arg(long, value_name = "BIN")]
    pub wrapper: Option<PathBuf>,

    /// Path to sjiswrap.exe.
    #[arg(long, value_name = "EXE")]
    pub sjiswrap: Option<PathBuf>,

    /// Generate map files.
    #[arg(long)]
    pub map: bool,

    /// Build with debug information.
    #[arg(long)]
    pub debug: bool,

    /// Compiler warning policy.
    #[arg(long, value_enum, value_name = "POLICY")]
    pub warn: Option<WarnPolicy>,

    /// Link non-matching and equivalent units from source.
    #[arg(long = "non-matching")]
    pub non_matching: bool,

    /// Skip diff-only compiles and progress accounting.
    #[arg(long = "no-progress")]
    pub no_progress: bool,
}

impl ProjectArgs {
    /// Converts the flags to `KEY=VALUE` configuration overrides.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<String> {
        let mut overrides = Vec::new();

        let paths = [
            ("build.build_dir", &self.build_dir),
            ("tools.binutils", &self.binutils),
            ("tools.compilers", &self.compilers),
            ("tools.dtk", &self.dtk),
            ("tools.objdiff", &self.objdiff),
            ("tools.wrapper", &self.wrapper),
            ("tools.sjiswrap", &self.sjiswrap),
        ];
        for (key, path) in paths {
            if let Some(path) = path {
                overrides.push(format!("{key}={}", quoted(&path.display().to_string())));
            }
        }

        if self.map {
            overrides.push("build.generate_map=true".to_string());
        }
        if self.debug {
            overrides.push("build.debug=true".to_string());
        }
        if let Some(warn) = self.warn {
            overrides.push(format!("build.warn=\"{warn}\""));
        }
        if self.non_matching {
            overrides.push("build.non_matching=true".to_string());
        }
        if self.no_progress {
            overrides.push("progress.enabled=false".to_string());
        }
        overrides
    }
}

/// TOML literal string, so paths are never read as numbers or booleans.
fn quoted(value: &str) -> String {
    if value.contains('\'') {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        format!("'{value}'")
    }
}

/// Arguments for the `configure` command.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigureArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

/// Arguments for the `progress` command.
#[derive(Debug, Clone, Default, Args)]
pub struct ProgressArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Also break the report out per module.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Write the report as JSON to FILE.
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Maximum concurrent diff processes (defaults to the core count).
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,
}
