// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for configuration loading.
//!
//! Tests the Config and project layers with realistic project files.

use std::path::PathBuf;

use decomp_forge::config::Config;
use decomp_forge::config::types::WarnPolicy;
use decomp_forge::project::ProjectConfig;

const PROJECT: &str = r#"
[project]
name = "marble"
versions = ["GMBE01", "GMBJ01"]
default_version = "GMBE01"
ldflags = ["-fp hardware", "-nodefaults"]

[build]
build_dir = "build"

[progress]
categories = [
    { id = "game", name = "Game Code" },
    { id = "sdk", name = "SDK Code" },
]

[cflags.base]
flags = ["-proc gekko", "-O4,p"]

[cflags.game]
extends = "base"
flags = ["-inline auto"]

[[libs]]
name = "game"
mw_version = "GC/1.3.2"
cflags = "game"
progress_category = "game"
objects = [
    { source = "game/main.c", status = "Matching" },
    { source = "game/ball.c", matching_for = ["GMBJ01"] },
]

[[libs]]
name = "os"
mw_version = "GC/1.2.5n"
cflags = "base"
progress_category = "sdk"
objects = [{ source = "dolphin/os/OS.c", status = "NonMatching" }]
"#;

// =============================================================================
// Loading from TOML strings
// =============================================================================

#[test]
fn config_parse_project() {
    let config = Config::parse(PROJECT).unwrap();
    assert_eq!(config.project.name, "marble");
    assert_eq!(config.project.versions, ["GMBE01", "GMBJ01"]);
    assert_eq!(config.libs.len(), 2);
    assert_eq!(config.progress.categories.len(), 2);
    assert_eq!(config.cflags["game"].extends.as_deref(), Some("base"));
}

#[test]
fn config_from_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("project.toml");
    std::fs::write(&path, PROJECT).unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.project.name, "marble");
    assert!(Config::from_file(dir.path().join("missing.toml")).is_err());
}

#[test]
fn config_builder_layered() {
    let config = Config::builder()
        .add_toml_str(PROJECT)
        .add_toml_str("[build]\nnon_matching = true\nwarn = \"off\"\n")
        .build()
        .unwrap();
    assert!(config.build.non_matching);
    assert_eq!(config.build.warn, Some(WarnPolicy::Off));
    assert_eq!(config.build.build_dir, PathBuf::from("build"));
}

#[test]
fn config_builder_set_override() {
    let config = Config::builder()
        .add_toml_str(PROJECT)
        .set_assignment("project.default_version=\"GMBJ01\"")
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(config.default_version(), Some("GMBJ01"));
}

#[test]
fn config_format_options() {
    let config = Config::parse(PROJECT).unwrap();
    let lines = config.format_options();
    assert!(lines.iter().any(|l| l.contains("marble")));
}

// =============================================================================
// Project Resolution
// =============================================================================

#[test]
fn project_default_version() {
    let config = Config::parse(PROJECT).unwrap();
    let project = ProjectConfig::new(&config, None).unwrap();
    assert_eq!(project.version(), "GMBE01");
    assert_eq!(project.version_index(), 0);
    assert_eq!(project.libraries().len(), 2);
}

#[test]
fn project_explicit_version() {
    let config = Config::parse(PROJECT).unwrap();
    let project = ProjectConfig::new(&config, Some("GMBJ01")).unwrap();
    assert_eq!(project.version(), "GMBJ01");
    assert_eq!(project.version_index(), 1);
    assert_eq!(
        project.paths().ninja_file(),
        PathBuf::from("build/build.ninja")
    );
    assert_eq!(
        project.paths().split_config(),
        PathBuf::from("config/GMBJ01/config.yml")
    );
}

#[test]
fn project_unknown_version() {
    let config = Config::parse(PROJECT).unwrap();
    let err = ProjectConfig::new(&config, Some("GMBP01")).unwrap_err();
    assert!(err.to_string().contains("GMBP01"));
}

#[test]
fn project_unknown_category_rejected() {
    let toml = PROJECT.replace(
        "progress_category = \"sdk\"",
        "progress_category = \"bonus\"",
    );
    let config = Config::parse(&toml).unwrap();
    assert!(ProjectConfig::new(&config, None).is_err());
}
