// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;

use clap::Parser;

use crate::cli::{Cli, Command};
use crate::config::types::WarnPolicy;
use crate::logging::LogFormat;

#[test]
fn test_parse_version() {
    let cli = Cli::try_parse_from(["decomp-forge", "version"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn test_parse_global_options() {
    let cli = Cli::try_parse_from([
        "decomp-forge",
        "-l",
        "4",
        "-c",
        "a.toml",
        "--config",
        "b.toml",
        "--set",
        "build.debug=true",
        "--log-format",
        "json",
        "options",
    ])
    .unwrap();
    assert_eq!(cli.global.log_level, Some(4));
    assert_eq!(
        cli.global.configs,
        [PathBuf::from("a.toml"), PathBuf::from("b.toml")]
    );
    assert_eq!(cli.global.to_config_overrides(), ["build.debug=true"]);
    assert_eq!(cli.global.log_format, Some(LogFormat::Json));
    assert!(matches!(cli.command, Some(Command::Options)));
}

#[test]
fn test_log_level_out_of_range() {
    assert!(Cli::try_parse_from(["decomp-forge", "-l", "6", "version"]).is_err());
}

#[test]
fn test_parse_configure() {
    let cli = Cli::try_parse_from([
        "decomp-forge",
        "configure",
        "--version",
        "B",
        "--dtk",
        "build/tools/dtk",
        "--map",
        "--warn",
        "error",
        "--non-matching",
    ])
    .unwrap();
    let Some(Command::Configure(args)) = cli.command else {
        panic!("configure expected");
    };
    assert_eq!(args.project.version.as_deref(), Some("B"));
    assert_eq!(args.project.warn, Some(WarnPolicy::Error));
    assert_eq!(
        args.project.to_config_overrides(),
        [
            "tools.dtk='build/tools/dtk'",
            "build.generate_map=true",
            "build.warn=\"error\"",
            "build.non_matching=true",
        ]
    );
}

#[test]
fn test_parse_progress() {
    let cli = Cli::try_parse_from([
        "decomp-forge",
        "progress",
        "-v",
        "--report",
        "report.json",
        "-j",
        "3",
        "--no-progress",
    ])
    .unwrap();
    let Some(Command::Progress(args)) = cli.command else {
        panic!("progress expected");
    };
    assert!(args.verbose);
    assert_eq!(args.report, Some(PathBuf::from("report.json")));
    assert_eq!(args.jobs, Some(3));
    assert_eq!(args.project.to_config_overrides(), ["progress.enabled=false"]);
}

#[test]
fn test_quoted_paths() {
    let cli = Cli::try_parse_from(["decomp-forge", "configure", "--build-dir", "it's"]).unwrap();
    let Some(Command::Configure(args)) = cli.command else {
        panic!("configure expected");
    };
    assert_eq!(args.project.to_config_overrides(), ["build.build_dir=\"it's\""]);
}

#[test]
fn test_unknown_command() {
    assert!(Cli::try_parse_from(["decomp-forge", "build"]).is_err());
}
