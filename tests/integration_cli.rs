// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for CLI parsing.
//!
//! Tests the CLI module with realistic command-line argument patterns.

use std::path::PathBuf;

use clap::Parser;
use decomp_forge::cli::{Cli, Command};
use decomp_forge::config::types::WarnPolicy;

// =============================================================================
// Configure Command
// =============================================================================

#[test]
fn cli_configure_no_args() {
    let cli = Cli::try_parse_from(["decomp-forge", "configure"]).unwrap();
    let Some(Command::Configure(args)) = cli.command else {
        panic!("configure expected");
    };
    assert!(args.project.to_config_overrides().is_empty());
    assert_eq!(args.project.version, None);
}

#[test]
fn cli_configure_full_toolchain() {
    let cli = Cli::try_parse_from([
        "decomp-forge",
        "configure",
        "--version",
        "GXXE01",
        "--build-dir",
        "out",
        "--binutils",
        "tools/binutils",
        "--compilers",
        "tools/compilers",
        "--wrapper",
        "/usr/bin/wibo",
        "--sjiswrap",
        "tools/sjiswrap.exe",
        "--debug",
    ])
    .unwrap();
    let Some(Command::Configure(args)) = cli.command else {
        panic!("configure expected");
    };
    assert_eq!(args.project.version.as_deref(), Some("GXXE01"));
    assert_eq!(args.project.compilers, Some(PathBuf::from("tools/compilers")));
    assert_eq!(
        args.project.to_config_overrides(),
        [
            "build.build_dir='out'",
            "tools.binutils='tools/binutils'",
            "tools.compilers='tools/compilers'",
            "tools.wrapper='/usr/bin/wibo'",
            "tools.sjiswrap='tools/sjiswrap.exe'",
            "build.debug=true",
        ]
    );
}

#[test]
fn cli_configure_warn_values() {
    for (value, policy) in [
        ("all", WarnPolicy::All),
        ("off", WarnPolicy::Off),
        ("error", WarnPolicy::Error),
    ] {
        let cli = Cli::try_parse_from(["decomp-forge", "configure", "--warn", value]).unwrap();
        let Some(Command::Configure(args)) = cli.command else {
            panic!("configure expected");
        };
        assert_eq!(args.project.warn, Some(policy));
    }
    assert!(Cli::try_parse_from(["decomp-forge", "configure", "--warn", "loud"]).is_err());
}

// =============================================================================
// Progress Command
// =============================================================================

#[test]
fn cli_progress_defaults() {
    let cli = Cli::try_parse_from(["decomp-forge", "progress"]).unwrap();
    let Some(Command::Progress(args)) = cli.command else {
        panic!("progress expected");
    };
    assert!(!args.verbose);
    assert_eq!(args.report, None);
    assert_eq!(args.jobs, None);
}

#[test]
fn cli_progress_with_objdiff() {
    let cli = Cli::try_parse_from([
        "decomp-forge",
        "progress",
        "--objdiff",
        "build/tools/objdiff-cli",
        "--verbose",
    ])
    .unwrap();
    let Some(Command::Progress(args)) = cli.command else {
        panic!("progress expected");
    };
    assert!(args.verbose);
    assert_eq!(
        args.project.to_config_overrides(),
        ["tools.objdiff='build/tools/objdiff-cli'"]
    );
}

// =============================================================================
// Global Options
// =============================================================================

#[test]
fn cli_global_before_command() {
    let cli = Cli::try_parse_from([
        "decomp-forge",
        "--no-default-config",
        "-c",
        "project.toml",
        "-s",
        "progress.each_module=true",
        "inis",
    ])
    .unwrap();
    assert!(cli.global.no_default_config);
    assert_eq!(cli.global.configs, [PathBuf::from("project.toml")]);
    assert_eq!(cli.global.to_config_overrides(), ["progress.each_module=true"]);
    assert!(matches!(cli.command, Some(Command::Inis)));
}

#[test]
fn cli_no_command() {
    let cli = Cli::try_parse_from(["decomp-forge"]).unwrap();
    assert!(cli.command.is_none());
}
