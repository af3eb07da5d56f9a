// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Build graph: every step needed to turn sources into the final images.
//!
//! ```text
//!  ProjectConfig ──► GraphBuilder::build()
//!                        |
//!     per unit:  resolve ─► source check ─► Compile / Assemble (+ HostCompile)
//!                        |
//!     per module: declared order ─► [hook, non-matching only] ─► Link
//!                        |
//!     finalize:  Elf2Dol, MakeRel, Check (build.sha1), Split (config.yml)
//!                        v
//!                   BuildGraph { units, steps }
//! ```
//!
//! The graph is data only. `emit` serialises it, `progress` walks its units.

mod builder;
pub mod scan;

#[cfg(test)]
mod tests;

pub use builder::GraphBuilder;

use std::path::{Path, PathBuf};

use crate::project::{EffectiveStatus, ModuleId};
use crate::resolve::ResolveMode;

/// Filesystem existence checks made while building the graph.
pub trait SourceProbe: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
}

/// [`SourceProbe`] backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl SourceProbe for FsProbe {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Why a unit is compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilePurpose {
    /// The object goes into a link.
    Link,
    /// The object only exists so the diff tool has something to compare.
    DiffOnly,
}

/// One translation unit as it takes part in this build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphUnit {
    /// Source path relative to the library source directory.
    pub name: String,
    /// Name used in link orders (`game/x.c` -> `game/x.o`).
    pub object_name: String,
    pub library: String,
    pub module: ModuleId,
    pub category: String,
    pub status: EffectiveStatus,
    /// Built from source and linked.
    pub included: bool,
    pub host: bool,
    pub extra: bool,
    pub source: PathBuf,
    pub reference: PathBuf,
    /// Built object, when a compile step exists.
    pub object: Option<PathBuf>,
}

impl GraphUnit {
    /// Whether the unit takes part in progress accounting.
    ///
    /// Extra units never do. `Equivalent` units only count when built, host
    /// units only when `include_host_units` is set.
    #[must_use]
    pub fn is_counted(&self, include_host_units: bool) -> bool {
        if self.extra || (self.host && !include_host_units) {
            return false;
        }
        self.status != EffectiveStatus::Equivalent || self.included
    }

    /// Whether the built object is compared against the reference. Other
    /// counted units are only measured.
    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.included && self.status != EffectiveStatus::NonMatching
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileStep {
    pub unit: String,
    pub source: PathBuf,
    pub output: PathBuf,
    pub flags: Vec<String>,
    pub mw_version: String,
    pub shift_jis: bool,
    pub purpose: CompilePurpose,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembleStep {
    pub unit: String,
    pub source: PathBuf,
    pub output: PathBuf,
    pub flags: Vec<String>,
    pub purpose: CompilePurpose,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostCompileStep {
    pub unit: String,
    pub source: PathBuf,
    pub output: PathBuf,
    pub cxx: bool,
    pub flags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkStep {
    pub module: ModuleId,
    pub name: String,
    pub objects: Vec<PathBuf>,
    pub output: PathBuf,
    pub flags: Vec<String>,
    pub map: Option<PathBuf>,
    /// Outputs that must exist before this link runs.
    pub order_after: Vec<PathBuf>,
}

/// A single node of the build plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Compile(CompileStep),
    Assemble(AssembleStep),
    HostCompile(HostCompileStep),
    Link(LinkStep),
    Elf2Dol {
        input: PathBuf,
        output: PathBuf,
    },
    MakeRel {
        main: PathBuf,
        modules: Vec<PathBuf>,
        outputs: Vec<PathBuf>,
    },
    Split {
        config: PathBuf,
        marker: PathBuf,
        references: Vec<PathBuf>,
    },
    Check {
        checksum: PathBuf,
        inputs: Vec<PathBuf>,
        stamp: PathBuf,
    },
}

/// The complete build graph for one `(version, mode)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildGraph {
    version: String,
    mode: ResolveMode,
    units: Vec<GraphUnit>,
    steps: Vec<Step>,
}

impl BuildGraph {
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub const fn mode(&self) -> ResolveMode {
        self.mode
    }

    /// Units in declaration order.
    #[must_use]
    pub fn units(&self) -> &[GraphUnit] {
        &self.units
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Link steps, main module first.
    pub fn links(&self) -> impl Iterator<Item = &LinkStep> {
        self.steps.iter().filter_map(|step| match step {
            Step::Link(link) => Some(link),
            _ => None,
        })
    }

    #[must_use]
    pub fn link_for(&self, module: ModuleId) -> Option<&LinkStep> {
        self.links().find(|link| link.module == module)
    }

    /// Outputs of every compile and assemble step, in step order.
    #[must_use]
    pub fn compile_outputs(&self) -> Vec<&Path> {
        self.steps
            .iter()
            .filter_map(|step| match step {
                Step::Compile(c) => Some(c.output.as_path()),
                Step::Assemble(a) => Some(a.output.as_path()),
                Step::HostCompile(h) => Some(h.output.as_path()),
                _ => None,
            })
            .collect()
    }
}
