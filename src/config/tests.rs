// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::merge::{flatten_preset, override_flags};
use super::paths::BuildPaths;
use super::types::{
    CflagsPreset, DeclaredStatus, MissingConfigPolicy, MissingSourcePolicy, ObjectOverride,
    WarnPolicy,
};
use super::{Config, ConfigLoader};
use crate::error::ConfigError;

fn preset(extends: Option<&str>, flags: &[&str]) -> CflagsPreset {
    CflagsPreset {
        extends: extends.map(str::to_string),
        flags: flags.iter().map(|f| (*f).to_string()).collect(),
    }
}

// --- Defaults ---

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.build.build_dir, PathBuf::from("build"));
    assert!(!config.build.non_matching);
    assert_eq!(config.build.missing_source, MissingSourcePolicy::Warn);
    assert_eq!(config.build.missing_config, MissingConfigPolicy::Warn);
    assert_eq!(config.build.release_cflags, ["-DNDEBUG=1"]);
    assert!(config.progress.enabled);
    assert!(config.progress.include_host_units);
    assert_eq!(config.project.linker_version, "GC/2.6");
    assert!(config.default_version().is_none());
}

#[test]
fn test_warn_policy_flags() {
    let flags: Vec<_> = [WarnPolicy::All, WarnPolicy::Off, WarnPolicy::Error]
        .into_iter()
        .map(WarnPolicy::flag)
        .collect();
    assert_eq!(flags, ["-W all", "-W off", "-W error"]);
    assert_eq!("ERROR".parse::<WarnPolicy>().ok(), Some(WarnPolicy::Error));
    assert!("loud".parse::<WarnPolicy>().is_err());
}

// --- Parsing ---

#[test]
fn test_config_parse() {
    let toml = r#"
[project]
name = "maximum"
versions = ["GXXE01", "NXXJ01"]
default_version = "NXXJ01"
asflags = ["-mgekko"]

[build]
non_matching = true
warn = "error"
missing_source = "error"

[tools]
dtk = "/opt/dtk"

[progress]
include_host_units = false
categories = [
    { id = "game", name = "Game Code" },
    { id = "sdk", name = "SDK Code" },
]

[cflags.base]
flags = ["-proc gekko"]

[[modules]]
name = "bingo"
ldflags = ["-sdata 0"]

[[libs]]
name = "os"
mw_version = "GC/1.2.5n"
cflags = "base"
progress_category = "sdk"
objects = [
    { source = "dolphin/os/OS.c", status = "NonMatching" },
    { source = "dolphin/os/OSTime.c", matching_for = ["NXXJ01"], extra_cflags = ["-char signed"] },
]

[link_order.main]
append = ["dummy.o"]
"#;
    let config = Config::parse(toml).unwrap();

    assert_eq!(config.project.name, "maximum");
    assert_eq!(config.default_version(), Some("NXXJ01"));
    assert!(config.build.non_matching);
    assert_eq!(config.build.warn, Some(WarnPolicy::Error));
    assert_eq!(config.build.missing_source, MissingSourcePolicy::Error);
    assert_eq!(config.tools.dtk, Some(PathBuf::from("/opt/dtk")));
    assert!(!config.progress.include_host_units);
    assert_eq!(config.progress.categories.len(), 2);
    assert_eq!(config.modules[0].name, "bingo");

    let lib = &config.libs[0];
    assert_eq!(lib.cflags.as_deref(), Some("base"));
    assert_eq!(lib.objects[0].status, Some(DeclaredStatus::NonMatching));
    assert_eq!(lib.objects[1].matching_for, ["NXXJ01"]);
    assert_eq!(lib.objects[1].extra_cflags, ["-char signed"]);
    assert_eq!(config.link_order["main"].append, ["dummy.o"]);
}

#[test]
fn test_config_unknown_field_rejected() {
    let result = Config::parse("[build]\nturbo = true\n");
    assert!(result.is_err());
}

#[test]
fn test_config_unknown_default_version() {
    let err = Config::parse("[project]\nversions = [\"A\"]\ndefault_version = \"B\"\n")
        .unwrap_err();
    let config_err = err.downcast_ref::<ConfigError>().unwrap();
    assert!(matches!(config_err, ConfigError::UnknownVersion { version, .. } if version == "B"));
}

#[test]
fn test_config_duplicate_version() {
    let err = Config::parse("[project]\nversions = [\"A\", \"A\"]\n").unwrap_err();
    assert!(err.to_string().contains("declared twice"));
}

#[test]
fn test_module_named_main_rejected() {
    let err = Config::parse("[[modules]]\nname = \"main\"\n").unwrap_err();
    let config_err = err.downcast_ref::<ConfigError>().unwrap();
    assert!(matches!(config_err, ConfigError::InvalidValue { section, .. } if section == "modules"));
    insta::assert_snapshot!(
        err.to_string(),
        @"invalid value for 'name' in section '[modules]': 'main' is reserved for the main image"
    );
}

#[test]
fn test_default_version_falls_back_to_first() {
    let config = Config::parse("[project]\nversions = [\"A\", \"B\"]\n").unwrap();
    assert_eq!(config.default_version(), Some("A"));
}

// --- Loader layering ---

#[test]
fn test_loader_later_source_wins() {
    let config = ConfigLoader::new()
        .add_toml_str("[build]\nbuild_dir = \"out\"\ndebug = true\n")
        .add_toml_str("[build]\nbuild_dir = \"out2\"\n")
        .build()
        .unwrap();
    assert_eq!(config.build.build_dir, PathBuf::from("out2"));
    assert!(config.build.debug);
}

#[test]
fn test_loader_set_assignment_parses_scalars() {
    let config = ConfigLoader::new()
        .set_assignment("build.non_matching=true")
        .unwrap()
        .set_assignment("build.build_dir=custom")
        .unwrap()
        .build()
        .unwrap();
    assert!(config.build.non_matching);
    assert_eq!(config.build.build_dir, PathBuf::from("custom"));
}

#[test]
fn test_loader_set_assignment_requires_equals() {
    assert!(ConfigLoader::new().set_assignment("build.debug").is_err());
}

#[test]
fn test_loader_tracks_files() {
    let dir = tempfile::tempdir().unwrap();
    let present = dir.path().join("project.toml");
    std::fs::write(&present, "[project]\nname = \"x\"\n").unwrap();
    let absent = dir.path().join("missing.toml");

    let loader = ConfigLoader::new()
        .add_toml_file_optional(&present)
        .add_toml_file_optional(&absent);
    let files = loader.loaded_files();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].1, present);
    assert!(loader.format_loaded_files()[0].starts_with("1. [optional]"));

    let config = loader.build().unwrap();
    assert_eq!(config.project.name, "x");
}

#[test]
fn test_loader_required_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let result = ConfigLoader::new()
        .add_toml_file(dir.path().join("nope.toml"))
        .build();
    assert!(result.is_err());
}

// --- Preset layering ---

#[test]
fn test_flatten_preset_parent_first() {
    let presets = BTreeMap::from([
        ("base".to_string(), preset(None, &["-O4,p", "-enum int"])),
        ("runtime".to_string(), preset(Some("base"), &["-inline auto"])),
        ("trk".to_string(), preset(Some("runtime"), &["-O2"])),
    ]);
    let flags = flatten_preset(&presets, "trk", "library 'trk'").unwrap();
    assert_eq!(flags, ["-O4,p", "-enum int", "-inline auto", "-O2"]);
}

#[test]
fn test_flatten_preset_unknown_parent() {
    let presets = BTreeMap::from([("rel".to_string(), preset(Some("nope"), &[]))]);
    let err = flatten_preset(&presets, "rel", "library 'rel'").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"unknown cflags preset 'nope' referenced by preset 'rel'");
}

#[test]
fn test_flatten_preset_cycle() {
    let presets = BTreeMap::from([
        ("a".to_string(), preset(Some("b"), &[])),
        ("b".to_string(), preset(Some("a"), &[])),
    ]);
    let err = flatten_preset(&presets, "a", "library 'x'").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"cflags preset 'a' extends itself through: a -> b -> a");
}

#[test]
fn test_override_flags_match_glob() {
    let overrides = vec![
        ObjectOverride {
            pattern: "dolphin/dvd/*.c".to_string(),
            extra_cflags: vec!["-char signed".to_string()],
        },
        ObjectOverride {
            pattern: "**/fstload.c".to_string(),
            extra_cflags: vec!["-O3".to_string()],
        },
    ];
    let flags = override_flags(&overrides, "dolphin/dvd/fstload.c").unwrap();
    assert_eq!(flags, ["-char signed", "-O3"]);
    assert!(override_flags(&overrides, "game/main.cpp").unwrap().is_empty());
}

// --- Paths ---

#[test]
fn test_build_paths_layout() {
    let paths = BuildPaths::new("build", "config", "GXXE01");
    let norm = |p: &Path| p.to_string_lossy().replace('\\', "/");
    assert_eq!(norm(&paths.object("game/main.cpp")), "build/GXXE01/src/game/main.o");
    assert_eq!(
        norm(&paths.reference_object("dolphin/os/OS.c")),
        "build/GXXE01/obj/dolphin/os/OS.o"
    );
    assert_eq!(norm(&paths.host_object("game/main.cpp")), "build/host/game/main.o");
    assert_eq!(norm(&paths.split_config()), "config/GXXE01/config.yml");
    assert_eq!(norm(&paths.module_plf("bingo")), "build/GXXE01/bingo.plf");
    assert_eq!(norm(&BuildPaths::map_for(&paths.main_elf())), "build/GXXE01/main.MAP");
}

// --- Options ---

#[test]
fn test_format_options_sorted_and_aligned() {
    let config = Config::parse("[project]\nversions = [\"A\"]\n").unwrap();
    let options = config.format_options();
    let keys: Vec<_> = options
        .iter()
        .map(|line| line.split(" = ").next().unwrap_or_default().trim_end().to_string())
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
    assert!(options.iter().any(|l| l.starts_with("project.default_version") && l.ends_with("= A")));
    assert!(options.iter().any(|l| l.starts_with("tools.dtk") && l.ends_with("(PATH)")));
}
