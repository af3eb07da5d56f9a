// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{BuildGraph, CompilePurpose, GraphBuilder, SourceProbe, Step};
use crate::config::Config;
use crate::error::GraphError;
use crate::project::{EffectiveStatus, LinkOrderHook, ModuleId, ProjectConfig};

const PROJECT: &str = r#"
[project]
versions = ["A", "B"]

[[libs]]
name = "game"
mw_version = "GC/1.3.2"
progress_category = "game"
objects = [
    { source = "x.c", status = "Matching" },
    { source = "y.c", status = "Matching" },
    { source = "z.c", status = "Matching" },
    { source = "dummy.c", status = "Matching", extra = true },
]
"#;

/// Every path under `src/` exists, nothing else does.
struct SourcesOnly;

impl SourceProbe for SourcesOnly {
    fn exists(&self, path: &Path) -> bool {
        path.starts_with("src")
    }
}

/// Exactly the listed paths exist.
struct Files(Vec<PathBuf>);

impl SourceProbe for Files {
    fn exists(&self, path: &Path) -> bool {
        self.0.iter().any(|p| p == path)
    }
}

/// Appends `dummy.o` to the main module and counts its calls.
#[derive(Default)]
struct AppendDummy {
    calls: AtomicUsize,
}

impl LinkOrderHook for AppendDummy {
    fn adjust(&self, module: ModuleId, mut objects: Vec<String>) -> Vec<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if module.is_main() {
            objects.push("dummy.o".to_string());
        }
        objects
    }
}

fn project(toml: &str, version: &str) -> ProjectConfig {
    let config = Config::parse(toml).unwrap();
    ProjectConfig::new(&config, Some(version)).unwrap()
}

fn with_build(toml: &str, build: &str) -> String {
    format!("{toml}\n[build]\n{build}\n")
}

fn graph(project: &ProjectConfig) -> BuildGraph {
    GraphBuilder::new(project)
        .with_probe(&SourcesOnly)
        .build()
        .unwrap()
}

fn main_objects(graph: &BuildGraph) -> Vec<String> {
    graph
        .link_for(ModuleId::MAIN)
        .unwrap()
        .objects
        .iter()
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .collect()
}

fn compile_of<'a>(graph: &'a BuildGraph, unit: &str) -> Option<&'a super::CompileStep> {
    graph.steps().iter().find_map(|step| match step {
        Step::Compile(c) if c.unit == unit => Some(c),
        _ => None,
    })
}

// --- Link order ---

#[test]
fn test_strict_build_keeps_declared_order_without_hook_calls() {
    let p = project(PROJECT, "A");
    let hook = AppendDummy::default();
    let graph = GraphBuilder::new(&p)
        .with_probe(&SourcesOnly)
        .with_link_order_hook(&hook)
        .build()
        .unwrap();

    assert_eq!(hook.calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        main_objects(&graph),
        ["build/A/src/x.o", "build/A/src/y.o", "build/A/src/z.o"]
    );
}

#[test]
fn test_non_matching_build_applies_hook() {
    let p = project(&with_build(PROJECT, "non_matching = true"), "A");
    let hook = AppendDummy::default();
    let graph = GraphBuilder::new(&p)
        .with_probe(&SourcesOnly)
        .with_link_order_hook(&hook)
        .build()
        .unwrap();

    assert_eq!(hook.calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        main_objects(&graph),
        [
            "build/A/src/x.o",
            "build/A/src/y.o",
            "build/A/src/z.o",
            "build/A/src/dummy.o",
        ]
    );
}

#[test]
fn test_configured_rules_drop_unknown_names() {
    let toml = format!(
        "{}\n[link_order.main]\nprepend = [\"ghost.o\"]\nremove = [\"y.o\"]\nappend = [\"dummy.o\"]\n",
        with_build(PROJECT, "non_matching = true")
    );
    let p = project(&toml, "A");
    let graph = graph(&p);
    assert_eq!(
        main_objects(&graph),
        ["build/A/src/x.o", "build/A/src/z.o", "build/A/src/dummy.o"]
    );
}

#[test]
fn test_extra_unit_compiled_but_not_linked_in_strict_mode() {
    let p = project(PROJECT, "A");
    let graph = graph(&p);
    assert!(compile_of(&graph, "dummy.c").is_some());
    assert!(!main_objects(&graph).iter().any(|o| o.ends_with("dummy.o")));
}

// --- Version resolution ---

const MATCHING_FOR: &str = r#"
[project]
versions = ["A", "B"]

[[libs]]
name = "game"
mw_version = "GC/1.3.2"
progress_category = "game"
objects = [
    { source = "u.c", matching_for = ["A"] },
    { source = "eq.c", status = "Equivalent" },
]
"#;

#[test]
fn test_matching_for_declared_version_links_built_object() {
    let p = project(MATCHING_FOR, "A");
    let graph = graph(&p);
    let compile = compile_of(&graph, "u.c").unwrap();
    assert_eq!(compile.purpose, CompilePurpose::Link);
    assert_eq!(main_objects(&graph)[0], "build/A/src/u.o");
}

#[test]
fn test_matching_for_other_version_links_reference() {
    let p = project(MATCHING_FOR, "B");
    let graph = graph(&p);

    let unit = &graph.units()[0];
    assert_eq!(unit.status, EffectiveStatus::NonMatching);
    assert!(!unit.included);

    let compile = compile_of(&graph, "u.c").unwrap();
    assert_eq!(compile.purpose, CompilePurpose::DiffOnly);
    assert_eq!(main_objects(&graph)[0], "build/B/obj/u.o");
}

#[test]
fn test_no_diff_only_steps_without_progress() {
    let toml = format!("{MATCHING_FOR}\n[progress]\nenabled = false\n");
    let p = project(&toml, "B");
    let graph = graph(&p);
    assert!(compile_of(&graph, "u.c").is_none());
}

#[test]
fn test_equivalent_only_built_in_non_matching_mode() {
    let strict = graph(&project(MATCHING_FOR, "A"));
    assert!(compile_of(&strict, "eq.c").is_none());
    assert_eq!(main_objects(&strict)[1], "build/A/obj/eq.o");

    let all = graph(&project(&with_build(MATCHING_FOR, "non_matching = true"), "A"));
    assert_eq!(
        compile_of(&all, "eq.c").unwrap().purpose,
        CompilePurpose::Link
    );
    assert_eq!(main_objects(&all)[1], "build/A/src/eq.o");
}

#[test]
fn test_graph_is_deterministic() {
    let p = project(&with_build(PROJECT, "non_matching = true"), "A");
    assert_eq!(graph(&p), graph(&p));
}

// --- Errors and policies ---

#[test]
fn test_duplicate_output_path() {
    let toml = PROJECT.replace(
        "{ source = \"z.c\", status = \"Matching\" },",
        "{ source = \"z.c\", status = \"Matching\" },\n    { source = \"z.cpp\", status = \"Matching\" },",
    );
    let p = project(&toml, "A");
    let err = GraphBuilder::new(&p)
        .with_probe(&SourcesOnly)
        .build()
        .unwrap_err();
    let graph_err = err.downcast_ref::<GraphError>().unwrap();
    assert!(matches!(
        graph_err,
        GraphError::DuplicateOutputPath { first, second, .. } if first == "z.c" && second == "z.cpp"
    ));
}

#[test]
fn test_missing_source_is_skipped_with_warning() {
    let p = project(PROJECT, "A");
    let probe = Files(vec![PathBuf::from("src/x.c"), PathBuf::from("src/z.c")]);
    let graph = GraphBuilder::new(&p).with_probe(&probe).build().unwrap();

    assert!(compile_of(&graph, "y.c").is_none());
    assert!(!graph.units()[1].included);
    assert_eq!(
        main_objects(&graph),
        ["build/A/src/x.o", "build/A/obj/y.o", "build/A/src/z.o"]
    );
}

#[test]
fn test_missing_source_error_policy() {
    let p = project(&with_build(PROJECT, "missing_source = \"error\""), "A");
    let probe = Files(vec![PathBuf::from("src/x.c")]);
    let err = GraphBuilder::new(&p).with_probe(&probe).build().unwrap_err();
    assert!(matches!(
        err.downcast_ref::<GraphError>(),
        Some(GraphError::MissingSource { .. })
    ));
}

// --- Modules and finalize steps ---

const MODULES: &str = r#"
[project]
versions = ["A"]
link_modules_first = true

[build]
generate_map = true

[[modules]]
name = "bingo"
ldflags = ["-sdata 0"]

[[libs]]
name = "main"
mw_version = "GC/1.3.2"
progress_category = "game"
objects = [{ source = "main.c", status = "Matching" }]

[[libs]]
name = "bingo"
mw_version = "GC/1.3.2"
progress_category = "game"
module = "bingo"
host = true
objects = [{ source = "bingo/bios.cpp", status = "Matching" }]
"#;

#[test]
fn test_modules_link_separately() {
    let p = project(MODULES, "A");
    let graph = graph(&p);

    let overlay = graph.link_for(ModuleId(1)).unwrap();
    assert_eq!(overlay.name, "bingo");
    assert_eq!(overlay.output, Path::new("build/A/bingo.plf"));
    assert_eq!(overlay.flags.last().map(String::as_str), Some("-sdata 0"));
    assert_eq!(overlay.map.as_deref(), Some(Path::new("build/A/bingo.MAP")));

    let main = graph.link_for(ModuleId::MAIN).unwrap();
    assert_eq!(main.order_after, [PathBuf::from("build/A/bingo.plf")]);
    assert_eq!(main.objects, [PathBuf::from("build/A/src/main.o")]);
}

#[test]
fn test_host_library_gets_host_compile() {
    let graph = graph(&project(MODULES, "A"));
    let host: Vec<_> = graph
        .steps()
        .iter()
        .filter_map(|step| match step {
            Step::HostCompile(h) => Some(h),
            _ => None,
        })
        .collect();
    assert_eq!(host.len(), 1);
    assert!(host[0].cxx);
    assert_eq!(host[0].output, Path::new("build/host/bingo/bios.o"));
}

#[test]
fn test_finalize_steps() {
    let p = project(MODULES, "A");
    let probe = Files(vec![
        PathBuf::from("src/main.c"),
        PathBuf::from("src/bingo/bios.cpp"),
        PathBuf::from("config/A/config.yml"),
        PathBuf::from("config/A/build.sha1"),
    ]);
    let graph = GraphBuilder::new(&p).with_probe(&probe).build().unwrap();

    assert!(matches!(graph.steps().first(), Some(Step::Split { .. })));
    let kinds: Vec<&str> = graph
        .steps()
        .iter()
        .map(|step| match step {
            Step::Compile(_) => "compile",
            Step::Assemble(_) => "assemble",
            Step::HostCompile(_) => "host",
            Step::Link(_) => "link",
            Step::Elf2Dol { .. } => "elf2dol",
            Step::MakeRel { .. } => "makerel",
            Step::Split { .. } => "split",
            Step::Check { .. } => "check",
        })
        .collect();
    assert_eq!(
        kinds,
        ["split", "compile", "compile", "host", "link", "link", "elf2dol", "makerel", "check"]
    );

    let Some(Step::Check { inputs, .. }) = graph.steps().last() else {
        panic!("check step expected last");
    };
    assert_eq!(
        inputs,
        &[PathBuf::from("build/A/main.dol"), PathBuf::from("build/A/bingo.rel")]
    );
}
