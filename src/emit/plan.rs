// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `build.ninja` rendering.
//!
//! ```text
//! header      ninja_required_version, builddir
//! tools       dtk, mwld, as, ...      (only those the graph needs)
//! rules       mwcc, as, host_cc, link, elf2dol, makerel, split, check, configure
//! builds      split ─► compile/assemble ─► link ─► elf2dol/makerel ─► check
//! phonies     all_source, progress, all
//! default     all
//! ```
//!
//! Output only depends on the graph, the resolved tools and the options, so
//! an unchanged project renders byte-identical text.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::ninja::{Build, NinjaWriter, Rule};
use crate::error::ToolError;
use crate::graph::{BuildGraph, Step};
use crate::project::ProjectConfig;
use crate::toolchain::{Tool, Toolchain, display_path};

/// Inputs of the regeneration rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitOptions {
    /// Program and arguments that regenerate the plan.
    pub configure_command: Vec<String>,
    /// Files whose modification triggers regeneration.
    pub configure_inputs: Vec<PathBuf>,
}

const HEADER: &str = "Generated by decomp-forge. Do not edit; re-run `configure` instead.";

/// Render the Ninja plan for `graph`.
///
/// # Errors
///
/// Returns `ToolError::Unresolved` when a tool the graph needs cannot be
/// resolved.
pub fn render_ninja(
    project: &ProjectConfig,
    graph: &BuildGraph,
    toolchain: &Toolchain,
    options: &EmitOptions,
) -> Result<String, ToolError> {
    let uses = Uses::of(graph);
    let mut w = NinjaWriter::new();

    w.comment(HEADER);
    w.comment(&format!("project: {}  version: {}", project.name(), graph.version()));
    w.variable("ninja_required_version", "1.3");
    w.variable("builddir", &display_path(project.paths().build_dir()));
    w.newline();

    w.comment("Tools");
    w.variable("dtk", &toolchain.resolve(&Tool::Dtk)?.render());
    w.variable(
        "mwld",
        &toolchain
            .resolve(&Tool::Linker {
                mw_version: project.linker_version().to_string(),
            })?
            .render(),
    );
    if uses.assemble {
        w.variable("as", &toolchain.resolve(&Tool::Assembler)?.render());
    }
    w.newline();

    write_rules(&mut w, &uses, options);

    let mut compilers: BTreeMap<(String, bool), String> = BTreeMap::new();
    let split_marker = graph.steps().iter().find_map(|step| match step {
        Step::Split { marker, .. } => Some(marker.as_path()),
        _ => None,
    });
    let order_after_split: Vec<&Path> = split_marker.into_iter().collect();

    w.comment("Build steps");
    for step in graph.steps() {
        match step {
            Step::Split {
                config,
                marker,
                references,
            } => w.build(&Build {
                outputs: vec![marker],
                implicit_outputs: as_paths(references),
                rule: "split",
                inputs: vec![config],
                variables: vec![("out_dir", display_path(&project.paths().version_dir()))],
                ..Build::default()
            }),
            Step::Compile(c) => {
                let key = (c.mw_version.clone(), c.shift_jis);
                let mwcc = match compilers.get(&key) {
                    Some(command) => command.clone(),
                    None => {
                        let command = toolchain
                            .resolve(&Tool::Compiler {
                                mw_version: c.mw_version.clone(),
                                shift_jis: c.shift_jis,
                            })?
                            .render();
                        compilers.insert(key, command.clone());
                        command
                    }
                };
                w.build(&Build {
                    outputs: vec![&c.output],
                    rule: "mwcc",
                    inputs: vec![&c.source],
                    order_only: order_after_split.clone(),
                    variables: vec![
                        ("mwcc", mwcc),
                        ("cflags", c.flags.join(" ")),
                        ("basedir", parent_of(&c.output)),
                        ("basefile", display_path(&c.output.with_extension(""))),
                    ],
                    ..Build::default()
                });
            }
            Step::Assemble(a) => w.build(&Build {
                outputs: vec![&a.output],
                rule: "as",
                inputs: vec![&a.source],
                order_only: order_after_split.clone(),
                variables: vec![("asflags", a.flags.join(" "))],
                ..Build::default()
            }),
            Step::HostCompile(h) => {
                let host = toolchain.resolve(&Tool::HostCompiler { cxx: h.cxx })?;
                w.build(&Build {
                    outputs: vec![&h.output],
                    rule: "host_cc",
                    inputs: vec![&h.source],
                    variables: vec![("host", host.render()), ("cflags", h.flags.join(" "))],
                    ..Build::default()
                });
            }
            Step::Link(link) => {
                let mut flags = link.flags.clone();
                if let Some(map) = &link.map {
                    flags.push(format!("-map {}", display_path(map)));
                }
                w.build(&Build {
                    outputs: vec![&link.output],
                    implicit_outputs: link.map.iter().map(PathBuf::as_path).collect(),
                    rule: "link",
                    inputs: as_paths(&link.objects),
                    order_only: as_paths(&link.order_after),
                    variables: vec![("ldflags", flags.join(" "))],
                    ..Build::default()
                });
            }
            Step::Elf2Dol { input, output } => w.build(&Build {
                outputs: vec![output],
                rule: "elf2dol",
                inputs: vec![input],
                ..Build::default()
            }),
            Step::MakeRel {
                main,
                modules,
                outputs,
            } => {
                let mut inputs = vec![main.as_path()];
                inputs.extend(as_paths(modules));
                w.build(&Build {
                    outputs: as_paths(outputs),
                    rule: "makerel",
                    inputs,
                    variables: vec![("config", display_path(&project.paths().split_config()))],
                    ..Build::default()
                });
            }
            Step::Check {
                checksum,
                inputs,
                stamp,
            } => w.build(&Build {
                outputs: vec![stamp],
                rule: "check",
                inputs: vec![checksum],
                implicit: as_paths(inputs),
                ..Build::default()
            }),
        }
    }
    w.newline();

    write_phonies(&mut w, project, graph);
    write_configure(&mut w, project, options);

    w.newline();
    w.default_targets(&[Path::new("all")]);
    Ok(w.finish())
}

/// Which rule kinds the graph needs.
#[derive(Debug, Default)]
struct Uses {
    compile: bool,
    assemble: bool,
    host: bool,
    makerel: bool,
    split: bool,
    check: bool,
}

impl Uses {
    fn of(graph: &BuildGraph) -> Self {
        let mut uses = Self::default();
        for step in graph.steps() {
            match step {
                Step::Compile(_) => uses.compile = true,
                Step::Assemble(_) => uses.assemble = true,
                Step::HostCompile(_) => uses.host = true,
                Step::MakeRel { .. } => uses.makerel = true,
                Step::Split { .. } => uses.split = true,
                Step::Check { .. } => uses.check = true,
                Step::Link(_) | Step::Elf2Dol { .. } => {}
            }
        }
        uses
    }
}

fn write_rules(w: &mut NinjaWriter, uses: &Uses, options: &EmitOptions) {
    w.comment("Rules");
    if uses.compile {
        w.rule(&Rule {
            name: "mwcc",
            command: "$mwcc $cflags -MMD -c $in -o $basedir",
            description: Some("MWCC $out"),
            depfile: Some("$basefile.d"),
            deps: Some("gcc"),
            ..Rule::default()
        });
    }
    if uses.assemble {
        w.rule(&Rule {
            name: "as",
            command: "$as $asflags -o $out $in -MD $out.d",
            description: Some("AS $out"),
            depfile: Some("$out.d"),
            deps: Some("gcc"),
            ..Rule::default()
        });
    }
    if uses.host {
        w.rule(&Rule {
            name: "host_cc",
            command: "$host $cflags -c -o $out $in",
            description: Some("HOSTCC $out"),
            ..Rule::default()
        });
    }
    w.rule(&Rule {
        name: "link",
        command: "$mwld $ldflags -o $out @$out.rsp",
        description: Some("LINK $out"),
        rspfile: Some("$out.rsp"),
        rspfile_content: Some("$in_newline"),
        ..Rule::default()
    });
    w.rule(&Rule {
        name: "elf2dol",
        command: "$dtk elf2dol $in $out",
        description: Some("DOL $out"),
        ..Rule::default()
    });
    if uses.makerel {
        w.rule(&Rule {
            name: "makerel",
            command: "$dtk rel make -w -c $config $in",
            description: Some("REL"),
            ..Rule::default()
        });
    }
    if uses.split {
        w.rule(&Rule {
            name: "split",
            command: "$dtk dol split $in $out_dir",
            description: Some("SPLIT $in"),
            ..Rule::default()
        });
    }
    if uses.check {
        w.rule(&Rule {
            name: "check",
            command: "$dtk shasum -q -c $in -o $out",
            description: Some("CHECK $in"),
            ..Rule::default()
        });
    }
    if !options.configure_command.is_empty() {
        w.rule(&Rule {
            name: "configure",
            command: "$configure",
            description: Some("Regenerating build files"),
            generator: true,
            ..Rule::default()
        });
    }
    w.newline();
}

fn write_phonies(w: &mut NinjaWriter, project: &ProjectConfig, graph: &BuildGraph) {
    w.comment("Targets");
    w.build(&Build {
        outputs: vec![Path::new("all_source")],
        rule: "phony",
        inputs: graph.compile_outputs(),
        ..Build::default()
    });

    let diff_artifacts: Vec<&Path> = graph
        .units()
        .iter()
        .filter_map(|unit| unit.object.as_deref())
        .collect();
    w.build(&Build {
        outputs: vec![Path::new("progress")],
        rule: "phony",
        inputs: diff_artifacts,
        ..Build::default()
    });

    let paths = project.paths();
    let mut finals = vec![paths.main_dol()];
    for step in graph.steps() {
        match step {
            Step::MakeRel { outputs, .. } => finals.extend(outputs.iter().cloned()),
            Step::Check { stamp, .. } => finals.push(stamp.clone()),
            _ => {}
        }
    }
    w.build(&Build {
        outputs: vec![Path::new("all")],
        rule: "phony",
        inputs: as_paths(&finals),
        ..Build::default()
    });
}

fn write_configure(w: &mut NinjaWriter, project: &ProjectConfig, options: &EmitOptions) {
    if options.configure_command.is_empty() {
        return;
    }
    let paths = project.paths();
    let ninja_file = paths.ninja_file();
    let objdiff_file = paths.objdiff_file();
    let mut inputs = as_paths(&options.configure_inputs);
    inputs.extend(project.reconfig_deps().iter().map(PathBuf::as_path));
    w.build(&Build {
        outputs: vec![&ninja_file],
        implicit_outputs: vec![&objdiff_file],
        rule: "configure",
        inputs,
        variables: vec![("configure", options.configure_command.join(" "))],
        ..Build::default()
    });
}

fn as_paths(paths: &[PathBuf]) -> Vec<&Path> {
    paths.iter().map(PathBuf::as_path).collect()
}

fn parent_of(path: &Path) -> String {
    path.parent().map(display_path).unwrap_or_default()
}
