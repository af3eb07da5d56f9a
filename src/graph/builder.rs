// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Graph construction.
//!
//! ```text
//! for lib in libraries, for unit in lib:
//!     resolve ─► None: not part of this version
//!             └► compile wanted? (included, or NonMatching with progress on)
//!                    source missing: warn + skip | GraphError::MissingSource
//!                    .s ─► Assemble   else ─► Compile   host lib ─► HostCompile
//!
//! for module:
//!     declared = non-extra units, declaration order
//!     non_matching ─► hook.adjust(module, declared)
//!     name ─► built object | reference object | (unknown: warn, drop)
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use tracing::{debug, warn};

use super::{
    AssembleStep, BuildGraph, CompilePurpose, CompileStep, FsProbe, GraphUnit, HostCompileStep,
    LinkStep, SourceProbe, Step,
};
use crate::config::paths::BuildPaths;
use crate::config::types::MissingSourcePolicy;
use crate::error::{GraphError, Result};
use crate::project::{EffectiveStatus, LinkOrderHook, ModuleDecl, ProjectConfig, SourceKind};
use crate::resolve::{ResolveContext, ResolveMode, resolve};

/// Builds a [`BuildGraph`] from a project.
pub struct GraphBuilder<'a> {
    project: &'a ProjectConfig,
    hook: Option<&'a dyn LinkOrderHook>,
    probe: &'a dyn SourceProbe,
}

impl<'a> GraphBuilder<'a> {
    /// Builder using the configured `[link_order]` rules and the real
    /// filesystem.
    #[must_use]
    pub fn new(project: &'a ProjectConfig) -> Self {
        let rules = project.link_order();
        Self {
            project,
            hook: (!rules.is_empty()).then_some(rules as &dyn LinkOrderHook),
            probe: &FsProbe,
        }
    }

    /// Replace the link-order hook.
    #[must_use]
    pub fn with_link_order_hook(mut self, hook: &'a dyn LinkOrderHook) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Replace the filesystem probe.
    #[must_use]
    pub fn with_probe(mut self, probe: &'a dyn SourceProbe) -> Self {
        self.probe = probe;
        self
    }

    /// Build the graph.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A unit's flags cannot be resolved (`ConfigError`).
    /// - Two units produce the same object (`GraphError::DuplicateOutputPath`).
    /// - A source is missing under `MissingSourcePolicy::Error`.
    pub fn build(&self) -> Result<BuildGraph> {
        let project = self.project;
        let ctx = ResolveContext::for_project(project)?;

        let mut units = Vec::new();
        let mut steps = Vec::new();
        self.unit_steps(&ctx, &mut units, &mut steps)?;

        let mut links = Vec::new();
        for module in project.modules() {
            links.push(self.link_step(&ctx, module, &units));
        }
        if project.link_modules_first() {
            let overlays: Vec<PathBuf> = links
                .iter()
                .filter(|link| !link.module.is_main())
                .map(|link| link.output.clone())
                .collect();
            if let Some(main) = links.iter_mut().find(|link| link.module.is_main()) {
                main.order_after = overlays;
            }
        }

        let finalize = self.finalize_steps(&links);
        let mut graph_steps = Vec::with_capacity(steps.len() + links.len() + finalize.len() + 1);
        graph_steps.extend(self.split_step(&units));
        graph_steps.extend(steps);
        graph_steps.extend(links.into_iter().map(Step::Link));
        graph_steps.extend(finalize);

        debug!(
            version = project.version(),
            units = units.len(),
            steps = graph_steps.len(),
            "build graph constructed"
        );

        Ok(BuildGraph {
            version: project.version().to_string(),
            mode: ctx.mode(),
            units,
            steps: graph_steps,
        })
    }

    fn unit_steps(
        &self,
        ctx: &ResolveContext<'_>,
        units: &mut Vec<GraphUnit>,
        steps: &mut Vec<Step>,
    ) -> Result<()> {
        let project = self.project;
        let paths = project.paths();
        let diff_only = project.progress().enabled && ctx.mode() == ResolveMode::Strict;
        let asflags = ctx.placeholders().expand(&project.flags().asflags);
        let mut outputs: BTreeMap<PathBuf, String> = BTreeMap::new();

        for library in project.libraries() {
            for unit in library.units() {
                let Some(resolved) = resolve(unit, library, ctx)? else {
                    continue;
                };
                let name = unit.source();
                let object_path = paths.object(name);
                if let Some(first) = outputs.insert(object_path.clone(), name.to_string()) {
                    return Err(GraphError::DuplicateOutputPath {
                        path: object_path.display().to_string(),
                        first,
                        second: name.to_string(),
                    }
                    .into());
                }

                let source = library.src_dir().join(name);
                let mut included = resolved.included;
                let mut object = None;
                let wants_compile = included
                    || (diff_only && resolved.status == EffectiveStatus::NonMatching);

                if wants_compile {
                    if self.probe.exists(&source) {
                        let purpose = if included {
                            CompilePurpose::Link
                        } else {
                            CompilePurpose::DiffOnly
                        };
                        let kind = unit.kind();
                        if kind == SourceKind::Asm {
                            steps.push(Step::Assemble(AssembleStep {
                                unit: name.to_string(),
                                source: source.clone(),
                                output: object_path.clone(),
                                flags: asflags.clone(),
                                purpose,
                            }));
                        } else {
                            steps.push(Step::Compile(CompileStep {
                                unit: name.to_string(),
                                source: source.clone(),
                                output: object_path.clone(),
                                flags: resolved.flags,
                                mw_version: unit
                                    .mw_version()
                                    .unwrap_or_else(|| library.mw_version())
                                    .to_string(),
                                shift_jis: library.shift_jis(),
                                purpose,
                            }));
                            if library.is_host() && included {
                                steps.push(Step::HostCompile(HostCompileStep {
                                    unit: name.to_string(),
                                    source: source.clone(),
                                    output: paths.host_object(name),
                                    cxx: kind == SourceKind::Cpp,
                                    flags: project.tools().host_cflags.clone(),
                                }));
                            }
                        }
                        object = Some(object_path);
                    } else {
                        match project.missing_source() {
                            MissingSourcePolicy::Warn => {
                                warn!(
                                    unit = name,
                                    path = %source.display(),
                                    library = library.name(),
                                    "source file not found, unit skipped"
                                );
                                included = false;
                            }
                            MissingSourcePolicy::Error => {
                                return Err(GraphError::MissingSource {
                                    path: source.display().to_string(),
                                }
                                .into());
                            }
                        }
                    }
                }

                units.push(GraphUnit {
                    name: name.to_string(),
                    object_name: unit.object_name(),
                    library: library.name().to_string(),
                    module: library.module(),
                    category: project.category_of(library, unit).to_string(),
                    status: resolved.status,
                    included,
                    host: library.is_host(),
                    extra: unit.is_extra(),
                    source,
                    reference: paths.reference_object(name),
                    object,
                });
            }
        }
        Ok(())
    }

    fn link_step(
        &self,
        ctx: &ResolveContext<'_>,
        module: &ModuleDecl,
        units: &[GraphUnit],
    ) -> LinkStep {
        let project = self.project;
        let members: Vec<&GraphUnit> = units.iter().filter(|u| u.module == module.id).collect();

        let mut linkable: BTreeMap<&str, PathBuf> = BTreeMap::new();
        for unit in &members {
            let path = match (&unit.object, unit.included, unit.extra) {
                (Some(object), true, _) => Some(object.clone()),
                (_, _, false) => Some(unit.reference.clone()),
                (_, _, true) => None,
            };
            if let Some(path) = path {
                linkable.insert(unit.object_name.as_str(), path);
            }
        }

        let declared: Vec<String> = members
            .iter()
            .filter(|u| !u.extra)
            .map(|u| u.object_name.clone())
            .collect();
        let order = match self.hook {
            Some(hook) if project.non_matching() => hook.adjust(module.id, declared),
            _ => declared,
        };

        let mut objects = Vec::with_capacity(order.len());
        for name in &order {
            match linkable.get(name.as_str()) {
                Some(path) => objects.push(path.clone()),
                None => warn!(
                    module = %module.name,
                    object = %name,
                    "link order names an object no unit provides, dropped"
                ),
            }
        }

        let paths = project.paths();
        let output = if module.id.is_main() {
            paths.main_elf()
        } else {
            paths.module_plf(&module.name)
        };
        let mut flags = project.flags().ldflags.clone();
        flags.extend(module.ldflags.iter().cloned());

        LinkStep {
            module: module.id,
            name: module.name.clone(),
            objects,
            map: project.generate_map().then(|| BuildPaths::map_for(&output)),
            output,
            flags: ctx.placeholders().expand(&flags),
            order_after: Vec::new(),
        }
    }

    fn finalize_steps(&self, links: &[LinkStep]) -> Vec<Step> {
        let paths = self.project.paths();
        let mut steps = vec![Step::Elf2Dol {
            input: paths.main_elf(),
            output: paths.main_dol(),
        }];

        let overlays: Vec<&LinkStep> = links.iter().filter(|l| !l.module.is_main()).collect();
        let rels: Vec<PathBuf> = overlays.iter().map(|l| paths.module_rel(&l.name)).collect();
        if !overlays.is_empty() {
            steps.push(Step::MakeRel {
                main: paths.main_elf(),
                modules: overlays.iter().map(|l| l.output.clone()).collect(),
                outputs: rels.clone(),
            });
        }

        let checksum = paths.checksum_file();
        if self.probe.exists(&checksum) {
            let mut inputs = vec![paths.main_dol()];
            inputs.extend(rels);
            steps.push(Step::Check {
                checksum,
                inputs,
                stamp: paths.version_dir().join("ok"),
            });
        }
        steps
    }

    fn split_step(&self, units: &[GraphUnit]) -> Option<Step> {
        let paths = self.project.paths();
        let config = paths.split_config();
        if !self.probe.exists(&config) {
            return None;
        }
        let references: BTreeSet<PathBuf> = units
            .iter()
            .filter(|u| !u.extra)
            .map(|u| u.reference.clone())
            .collect();
        Some(Step::Split {
            config,
            marker: paths.split_marker(),
            references: references.into_iter().collect(),
        })
    }
}
