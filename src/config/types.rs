// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration section types.
//!
//! # Config Structure
//!
//! ```text
//! Config: ProjectSection, BuildSection, ToolsSection, ProgressSection
//!         cflags presets, modules, libs (with objects), object overrides,
//!         link order rules
//! ```
//!
//! # Policies
//!
//! ```text
//! WarnPolicy:          all | off | error          (unset: compiler default)
//! MissingSourcePolicy: warn (default) | error
//! MissingConfigPolicy: ignore | warn (default) | error
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Compiler warning policy, mapped to a single warning flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WarnPolicy {
    All,
    Off,
    Error,
}

impl WarnPolicy {
    /// Compiler flag selected by this policy.
    #[must_use]
    pub const fn flag(self) -> &'static str {
        match self {
            Self::All => "-W all",
            Self::Off => "-W off",
            Self::Error => "-W error",
        }
    }
}

impl std::fmt::Display for WarnPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Off => write!(f, "off"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for WarnPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "off" => Ok(Self::Off),
            "error" => Ok(Self::Error),
            _ => Err(ConfigError::InvalidValue {
                section: "build".to_string(),
                key: "warn".to_string(),
                message: format!("expected 'all', 'off', or 'error', got '{s}'"),
            }),
        }
    }
}

/// What to do when a declared source file does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingSourcePolicy {
    /// Log and skip the unit.
    #[default]
    Warn,
    /// Fail graph construction.
    Error,
}

/// What to do when a source file exists but no unit declares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingConfigPolicy {
    Ignore,
    #[default]
    Warn,
    Error,
}

/// Matching status as written in the project file.
///
/// Version-dependent status is written as `matching_for = [...]` next to
/// (or instead of) `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclaredStatus {
    Matching,
    NonMatching,
    Equivalent,
}

/// `[project]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectSection {
    /// Project name, used in the generated files.
    pub name: String,
    /// Declared version identifiers. The position is the version index.
    pub versions: Vec<String>,
    /// Version selected when none is given on the command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_version: Option<String>,
    /// Root of the source tree.
    pub src_dir: PathBuf,
    /// Per-version configuration directory (`<config_dir>/<version>/...`).
    pub config_dir: PathBuf,
    /// Assembler flags for every `.s` unit.
    pub asflags: Vec<String>,
    /// Link flags shared by every module.
    pub ldflags: Vec<String>,
    /// Compiler version tag of the linker.
    pub linker_version: String,
    /// Default Shift-JIS handling for libraries.
    pub shift_jis: bool,
    /// Main image links only after every relocatable module.
    pub link_modules_first: bool,
    /// Additional files whose change re-runs `configure`.
    pub reconfig_deps: Vec<PathBuf>,
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            name: "project".to_string(),
            versions: Vec::new(),
            default_version: None,
            src_dir: PathBuf::from("src"),
            config_dir: PathBuf::from("config"),
            asflags: Vec::new(),
            ldflags: Vec::new(),
            linker_version: "GC/2.6".to_string(),
            shift_jis: true,
            link_modules_first: false,
            reconfig_deps: Vec::new(),
        }
    }
}

/// `[build]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildSection {
    pub build_dir: PathBuf,
    /// Link non-matching and equivalent units from source.
    pub non_matching: bool,
    /// Ask the linker for map files.
    pub generate_map: bool,
    /// Compile and link with debug information.
    pub debug: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warn: Option<WarnPolicy>,
    pub missing_source: MissingSourcePolicy,
    pub missing_config: MissingConfigPolicy,
    pub debug_cflags: Vec<String>,
    pub release_cflags: Vec<String>,
    /// Flags that identify the active version. `{version}` and
    /// `{version_index}` are substituted.
    pub build_identifier_cflags: Vec<String>,
    pub debug_ldflags: Vec<String>,
    pub map_ldflags: Vec<String>,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            build_dir: PathBuf::from("build"),
            non_matching: false,
            generate_map: false,
            debug: false,
            warn: None,
            missing_source: MissingSourcePolicy::default(),
            missing_config: MissingConfigPolicy::default(),
            debug_cflags: vec!["-sym on".to_string(), "-DDEBUG=1".to_string()],
            release_cflags: vec!["-DNDEBUG=1".to_string()],
            build_identifier_cflags: vec![
                "-DBUILD_VERSION={version_index}".to_string(),
                "-DVERSION_{version}".to_string(),
            ],
            debug_ldflags: vec!["-g".to_string()],
            map_ldflags: vec!["-mapunused".to_string()],
        }
    }
}

/// `[tools]` section. Unset paths are looked up in `PATH`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsSection {
    /// Directory containing `powerpc-eabi-as` and friends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binutils: Option<PathBuf>,
    /// Directory containing one sub-directory per compiler version tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compilers: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtk: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objdiff: Option<PathBuf>,
    /// `wibo` or `wine`, used to run the compilers on non-Windows hosts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapper: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sjiswrap: Option<PathBuf>,
    pub host_cc: String,
    pub host_cxx: String,
    pub host_cflags: Vec<String>,
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            binutils: None,
            compilers: None,
            dtk: None,
            objdiff: None,
            wrapper: None,
            sjiswrap: None,
            host_cc: "cc".to_string(),
            host_cxx: "c++".to_string(),
            host_cflags: vec!["-I include".to_string(), "-Wno-trigraphs".to_string()],
        }
    }
}

/// One `[[progress.categories]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategorySection {
    pub id: String,
    pub name: String,
}

/// `[progress]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProgressSection {
    pub enabled: bool,
    /// Break the report out per module.
    pub each_module: bool,
    /// Count units of host-built libraries.
    pub include_host_units: bool,
    /// Extra arguments passed to the diff tool.
    pub report_args: Vec<String>,
    pub categories: Vec<CategorySection>,
}

impl Default for ProgressSection {
    fn default() -> Self {
        Self {
            enabled: true,
            each_module: false,
            include_host_units: true,
            report_args: Vec::new(),
            categories: Vec::new(),
        }
    }
}

/// `[cflags.<name>]` preset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CflagsPreset {
    /// Parent preset whose flattened flags come first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    pub flags: Vec<String>,
}

/// `[[modules]]` entry. Ids are assigned in declaration order starting at 1.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModuleSection {
    pub name: String,
    pub ldflags: Vec<String>,
}

/// One object inside a `[[libs]]` entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ObjectSection {
    /// Source path relative to the library's source directory.
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DeclaredStatus>,
    /// Versions this unit matches for; the unit is non-matching elsewhere.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub matching_for: Vec<String>,
    /// Restrict the unit to these versions.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub versions: Vec<String>,
    /// Preset replacing the library's base flags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cflags: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_cflags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mw_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_category: Option<String>,
    /// Compiled but not part of the declared link order.
    pub extra: bool,
}

/// `[[libs]]` entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LibSection {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mw_version: Option<String>,
    /// Preset holding the base flags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cflags: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_cflags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_category: Option<String>,
    /// Also build the library with the host toolchain.
    pub host: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift_jis: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src_dir: Option<PathBuf>,
    /// Owning relocatable module; the main image when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    pub objects: Vec<ObjectSection>,
}

/// `[[object_overrides]]` entry, applied to every unit whose source path
/// matches `pattern`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ObjectOverride {
    pub pattern: String,
    pub extra_cflags: Vec<String>,
}

/// `[link_order.<module>]` rules. `main` names the main image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinkOrderSection {
    pub prepend: Vec<String>,
    pub append: Vec<String>,
    pub remove: Vec<String>,
}
