// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::BTreeMap;

use super::{
    EffectiveStatus, LinkOrderHook, LinkOrderRules, Library, MatchStatus, ModuleId, ModuleRules,
    ProjectConfig, SourceKind, TranslationUnit,
};
use crate::config::Config;
use crate::error::ConfigError;

const PROJECT: &str = r#"
[project]
name = "maximum"
versions = ["GXXE01", "NXXJ01"]
ldflags = ["-fp hardware"]

[build]
debug = true

[progress]
categories = [
    { id = "game", name = "Game Code" },
    { id = "sdk", name = "SDK Code" },
]

[cflags.base]
flags = ["-proc gekko", "-O4,p"]

[cflags.dolphin]
extends = "base"
flags = ["-char unsigned"]

[[modules]]
name = "bingo"
ldflags = ["-sdata 0"]

[[libs]]
name = "os"
mw_version = "GC/1.2.5n"
cflags = "dolphin"
extra_cflags = ["-D__GEKKO__"]
progress_category = "sdk"
objects = [
    { source = "dolphin/os/OS.c", status = "NonMatching" },
    { source = "dolphin/os/OSTime.c", matching_for = ["NXXJ01"] },
]

[[libs]]
name = "bingo"
mw_version = "GC/1.3.2"
cflags = "base"
progress_category = "game"
module = "bingo"
objects = [
    { source = "game/bingo/bingoBios.cpp", status = "Matching", cflags = "dolphin" },
]

[link_order.bingo]
append = ["dummy.o"]
"#;

fn project_with(extra: &str, version: Option<&str>) -> Result<ProjectConfig, ConfigError> {
    let config = Config::parse(&format!("{PROJECT}\n{extra}")).unwrap();
    ProjectConfig::new(&config, version)
}

fn unit(source: &str, status: MatchStatus) -> TranslationUnit {
    TranslationUnit::builder()
        .source(source)
        .status(status)
        .build()
        .unwrap()
}

// --- ProjectConfig ---

#[test]
fn test_project_defaults_to_first_version() {
    let project = project_with("", None).unwrap();
    assert_eq!(project.version(), "GXXE01");
    assert_eq!(project.version_index(), 0);
    assert_eq!(project.name(), "maximum");
}

#[test]
fn test_project_selects_version_index() {
    let project = project_with("", Some("NXXJ01")).unwrap();
    assert_eq!(project.version_index(), 1);
}

#[test]
fn test_project_unknown_version() {
    let err = project_with("", Some("GXXP01")).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"unknown version 'GXXP01' (known versions: GXXE01, NXXJ01)");
}

#[test]
fn test_project_requires_versions() {
    let err = ProjectConfig::new(&Config::default(), None).unwrap_err();
    assert!(matches!(err, ConfigError::MissingKey { ref key, .. } if key == "versions"));
}

#[test]
fn test_project_flattens_library_flags() {
    let project = project_with("", None).unwrap();
    let os = &project.libraries()[0];
    assert_eq!(
        os.base_cflags(),
        ["-proc gekko", "-O4,p", "-char unsigned", "-D__GEKKO__"]
    );
    let bingo = &project.libraries()[1];
    assert_eq!(
        bingo.units()[0].cflags_override(),
        Some(["-proc gekko", "-O4,p", "-char unsigned"].map(String::from).as_slice())
    );
}

#[test]
fn test_project_modules_and_ldflags() {
    let project = project_with("", None).unwrap();
    let names: Vec<_> = project.modules().iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["main", "bingo"]);
    assert_eq!(project.libraries()[1].module(), ModuleId(1));
    assert_eq!(project.flags().ldflags, ["-fp hardware", "-g"]);
}

#[test]
fn test_project_status_from_declaration() {
    let project = project_with("", None).unwrap();
    let units = project.libraries()[0].units();
    assert_eq!(units[0].status(), &MatchStatus::NonMatching);
    assert_eq!(
        units[1].status(),
        &MatchStatus::MatchingFor(vec!["NXXJ01".to_string()])
    );
}

#[test]
fn test_project_unknown_preset() {
    let config = Config::parse(&PROJECT.replace("cflags = \"base\"", "cflags = \"rel\"")).unwrap();
    let err = ProjectConfig::new(&config, None).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"unknown cflags preset 'rel' referenced by library 'bingo'");
}

#[test]
fn test_project_unknown_module() {
    let config = Config::parse(&PROJECT.replace("module = \"bingo\"", "module = \"jackpot\"")).unwrap();
    let err = ProjectConfig::new(&config, None).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"library 'bingo' refers to unknown module 'jackpot'");
}

#[test]
fn test_project_unknown_link_order_module() {
    let err = project_with("[link_order.jackpot]\nappend = [\"x.o\"]\n", None).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownModule { ref module, .. } if module == "jackpot"));
}

#[test]
fn test_project_undeclared_category() {
    let config = Config::parse(&PROJECT.replace("progress_category = \"game\"", "progress_category = \"tools\"")).unwrap();
    let err = ProjectConfig::new(&config, None).unwrap_err();
    assert!(err.to_string().contains("undeclared category 'tools'"));
}

#[test]
fn test_project_status_and_matching_for_conflict() {
    let config = Config::parse(&PROJECT.replace(
        "matching_for = [\"NXXJ01\"]",
        "status = \"Matching\", matching_for = [\"NXXJ01\"]",
    ))
    .unwrap();
    let err = ProjectConfig::new(&config, None).unwrap_err();
    assert!(matches!(err, ConfigError::MalformedUnit { ref name, .. } if name == "dolphin/os/OSTime.c"));
}

#[test]
fn test_project_matching_for_unknown_version() {
    let config = Config::parse(&PROJECT.replace("[\"NXXJ01\"]", "[\"NXXJ02\"]")).unwrap();
    let err = ProjectConfig::new(&config, None).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownVersion { ref version, .. } if version == "NXXJ02"));
}

#[test]
fn test_project_missing_mw_version() {
    let config = Config::parse(&PROJECT.replace("mw_version = \"GC/1.3.2\"\n", "")).unwrap();
    let err = ProjectConfig::new(&config, None).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"malformed declaration 'bingo': library field 'mw_version' is required");
}

// --- Model ---

#[test]
fn test_matching_for_collapses_per_version() {
    let status = MatchStatus::MatchingFor(vec!["A".to_string()]);
    assert_eq!(status.effective("A"), EffectiveStatus::Matching);
    assert_eq!(status.effective("B"), EffectiveStatus::NonMatching);
}

#[test]
fn test_source_kind_by_extension() {
    assert_eq!(SourceKind::from_path("a/b.c"), Some(SourceKind::C));
    assert_eq!(SourceKind::from_path("a/b.cp"), Some(SourceKind::Cpp));
    assert_eq!(SourceKind::from_path("a/b.s"), Some(SourceKind::Asm));
    assert_eq!(SourceKind::from_path("a/b.h"), None);
}

#[test]
fn test_unit_builder_rejects_bad_sources() {
    for source in ["", "../outside.c", "/abs/path.c", "notes.txt"] {
        let result = TranslationUnit::builder()
            .source(source)
            .status(MatchStatus::Matching)
            .build();
        assert!(result.is_err(), "{source:?} should be rejected");
    }
    let empty_for = TranslationUnit::builder()
        .source("a.c")
        .status(MatchStatus::MatchingFor(Vec::new()))
        .build();
    assert!(empty_for.is_err());
}

#[test]
fn test_unit_object_name_and_versions() {
    let u = TranslationUnit::builder()
        .source("game/main.cpp")
        .status(MatchStatus::Matching)
        .versions(vec!["A".to_string()])
        .build()
        .unwrap();
    assert_eq!(u.object_name(), "game/main.o");
    assert!(u.exists_in("A"));
    assert!(!u.exists_in("B"));
}

#[test]
fn test_library_builder_validates() {
    let err = Library::builder()
        .name("os")
        .mw_version("")
        .progress_category("sdk")
        .build()
        .unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"malformed declaration 'os': library field 'mw_version' is required");

    let dup = Library::builder()
        .name("os")
        .mw_version("GC/1.2.5n")
        .progress_category("sdk")
        .units(vec![
            unit("os/OS.c", MatchStatus::Matching),
            unit("os/OS.c", MatchStatus::NonMatching),
        ])
        .build();
    assert!(dup.is_err());
}

// --- Link order rules ---

#[test]
fn test_link_order_rules_apply_per_module() {
    let rules = LinkOrderRules::new(BTreeMap::from([(
        ModuleId::MAIN,
        ModuleRules {
            prepend: vec!["init.o".to_string()],
            append: vec!["dummy.o".to_string()],
            remove: vec!["y.o".to_string()],
        },
    )]));
    let order = vec!["x.o".to_string(), "y.o".to_string(), "z.o".to_string()];

    assert_eq!(
        rules.adjust(ModuleId::MAIN, order.clone()),
        ["init.o", "x.o", "z.o", "dummy.o"]
    );
    assert_eq!(rules.adjust(ModuleId(1), order.clone()), order);
}
