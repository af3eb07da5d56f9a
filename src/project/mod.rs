// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Immutable project model.
//!
//! ```text
//! Config (merged layers) + selected version
//!        |
//!        v
//! ProjectConfig::new()   validates version, presets, modules, units
//!        |
//!        +-- libraries: Vec<Library>            (flattened base flags)
//!        |     +-- units: Vec<TranslationUnit>  (declared status)
//!        +-- modules:   [main, overlay 1, ...]
//!        +-- link_order: LinkOrderRules
//!        +-- progress:   ProgressSettings
//! ```
//!
//! Every downstream component borrows the same `ProjectConfig`; nothing
//! mutates it after construction.

pub mod link_order;
pub mod model;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::config::merge::flatten_preset;
use crate::config::paths::BuildPaths;
use crate::config::types::{
    DeclaredStatus, LibSection, MissingConfigPolicy, MissingSourcePolicy, ObjectOverride,
    ObjectSection, ToolsSection, WarnPolicy,
};
use crate::error::ConfigError;

pub use link_order::{LinkOrderHook, LinkOrderRules, ModuleRules};
pub use model::{
    EffectiveStatus, Library, MatchStatus, ModuleDecl, ModuleId, ProgressCategory, SourceKind,
    TranslationUnit,
};

pub use crate::config::MAIN_MODULE_NAME;

/// Progress-related settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSettings {
    pub enabled: bool,
    pub each_module: bool,
    pub include_host_units: bool,
    pub report_args: Vec<String>,
    pub categories: Vec<ProgressCategory>,
}

/// Global flag tables, before placeholder expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagTables {
    pub debug_cflags: Vec<String>,
    pub release_cflags: Vec<String>,
    pub build_identifier_cflags: Vec<String>,
    pub asflags: Vec<String>,
    pub ldflags: Vec<String>,
}

/// Validated, immutable project description for one version.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    name: String,
    version: String,
    version_index: usize,
    versions: Vec<String>,
    paths: BuildPaths,
    src_dir: PathBuf,
    linker_version: String,
    non_matching: bool,
    generate_map: bool,
    debug: bool,
    warn: Option<WarnPolicy>,
    missing_source: MissingSourcePolicy,
    missing_config: MissingConfigPolicy,
    link_modules_first: bool,
    flags: FlagTables,
    object_overrides: Vec<ObjectOverride>,
    modules: Vec<ModuleDecl>,
    libraries: Vec<Library>,
    link_order: LinkOrderRules,
    progress: ProgressSettings,
    tools: ToolsSection,
    reconfig_deps: Vec<PathBuf>,
}

impl ProjectConfig {
    /// Build the project for `version` (or the configured default).
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when no versions are declared, the version is
    /// unknown, a preset, module or category reference does not resolve, or a
    /// library or unit declaration is malformed.
    pub fn new(config: &Config, version: Option<&str>) -> Result<Self, ConfigError> {
        let versions = config.project.versions.clone();
        if versions.is_empty() {
            return Err(ConfigError::MissingKey {
                section: "project".to_string(),
                key: "versions".to_string(),
            });
        }

        let version = version
            .or_else(|| config.default_version())
            .unwrap_or_default()
            .to_string();
        let version_index = versions
            .iter()
            .position(|v| *v == version)
            .ok_or_else(|| ConfigError::UnknownVersion {
                version: version.clone(),
                known: versions.clone(),
            })?;

        let modules = build_modules(config);
        let module_ids: BTreeMap<&str, ModuleId> = modules
            .iter()
            .map(|m| (m.name.as_str(), m.id))
            .collect();

        let categories: Vec<ProgressCategory> = config
            .progress
            .categories
            .iter()
            .map(|c| ProgressCategory {
                id: c.id.clone(),
                name: c.name.clone(),
            })
            .collect();

        let libraries = config
            .libs
            .iter()
            .map(|lib| build_library(config, lib, &module_ids, &categories, &versions))
            .collect::<Result<Vec<_>, _>>()?;

        let link_order = build_link_order(config, &module_ids)?;

        let mut ldflags = config.project.ldflags.clone();
        if config.build.debug {
            ldflags.extend(config.build.debug_ldflags.iter().cloned());
        }
        if config.build.generate_map {
            ldflags.extend(config.build.map_ldflags.iter().cloned());
        }

        Ok(Self {
            name: config.project.name.clone(),
            paths: BuildPaths::new(
                &config.build.build_dir,
                &config.project.config_dir,
                &version,
            ),
            version,
            version_index,
            versions,
            src_dir: config.project.src_dir.clone(),
            linker_version: config.project.linker_version.clone(),
            non_matching: config.build.non_matching,
            generate_map: config.build.generate_map,
            debug: config.build.debug,
            warn: config.build.warn,
            missing_source: config.build.missing_source,
            missing_config: config.build.missing_config,
            link_modules_first: config.project.link_modules_first,
            flags: FlagTables {
                debug_cflags: config.build.debug_cflags.clone(),
                release_cflags: config.build.release_cflags.clone(),
                build_identifier_cflags: config.build.build_identifier_cflags.clone(),
                asflags: config.project.asflags.clone(),
                ldflags,
            },
            object_overrides: config.object_overrides.clone(),
            modules,
            libraries,
            link_order,
            progress: ProgressSettings {
                enabled: config.progress.enabled,
                each_module: config.progress.each_module,
                include_host_units: config.progress.include_host_units,
                report_args: config.progress.report_args.clone(),
                categories,
            },
            tools: config.tools.clone(),
            reconfig_deps: config.project.reconfig_deps.clone(),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Active version identifier.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Position of the active version in the declared set.
    #[must_use]
    pub const fn version_index(&self) -> usize {
        self.version_index
    }

    #[must_use]
    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    #[must_use]
    pub const fn paths(&self) -> &BuildPaths {
        &self.paths
    }

    #[must_use]
    pub fn src_dir(&self) -> &Path {
        &self.src_dir
    }

    #[must_use]
    pub fn linker_version(&self) -> &str {
        &self.linker_version
    }

    #[must_use]
    pub const fn non_matching(&self) -> bool {
        self.non_matching
    }

    #[must_use]
    pub const fn generate_map(&self) -> bool {
        self.generate_map
    }

    #[must_use]
    pub const fn debug(&self) -> bool {
        self.debug
    }

    #[must_use]
    pub const fn warn(&self) -> Option<WarnPolicy> {
        self.warn
    }

    #[must_use]
    pub const fn missing_source(&self) -> MissingSourcePolicy {
        self.missing_source
    }

    #[must_use]
    pub const fn missing_config(&self) -> MissingConfigPolicy {
        self.missing_config
    }

    #[must_use]
    pub const fn link_modules_first(&self) -> bool {
        self.link_modules_first
    }

    #[must_use]
    pub const fn flags(&self) -> &FlagTables {
        &self.flags
    }

    #[must_use]
    pub fn object_overrides(&self) -> &[ObjectOverride] {
        &self.object_overrides
    }

    /// Main image first, then relocatable modules in id order.
    #[must_use]
    pub fn modules(&self) -> &[ModuleDecl] {
        &self.modules
    }

    #[must_use]
    pub fn module(&self, id: ModuleId) -> Option<&ModuleDecl> {
        self.modules.iter().find(|m| m.id == id)
    }

    #[must_use]
    pub fn libraries(&self) -> &[Library] {
        &self.libraries
    }

    #[must_use]
    pub const fn link_order(&self) -> &LinkOrderRules {
        &self.link_order
    }

    #[must_use]
    pub const fn progress(&self) -> &ProgressSettings {
        &self.progress
    }

    #[must_use]
    pub const fn tools(&self) -> &ToolsSection {
        &self.tools
    }

    #[must_use]
    pub fn reconfig_deps(&self) -> &[PathBuf] {
        &self.reconfig_deps
    }

    /// Category for a unit: its own override, else its library's.
    #[must_use]
    pub fn category_of<'a>(&self, library: &'a Library, unit: &'a TranslationUnit) -> &'a str {
        unit.progress_category()
            .unwrap_or_else(|| library.progress_category())
    }
}

fn build_modules(config: &Config) -> Vec<ModuleDecl> {
    std::iter::once(ModuleDecl {
        id: ModuleId::MAIN,
        name: MAIN_MODULE_NAME.to_string(),
        ldflags: Vec::new(),
    })
    .chain(config.modules.iter().zip(1u32..).map(|(m, id)| ModuleDecl {
        id: ModuleId(id),
        name: m.name.clone(),
        ldflags: m.ldflags.clone(),
    }))
    .collect()
}

fn build_library(
    config: &Config,
    lib: &LibSection,
    module_ids: &BTreeMap<&str, ModuleId>,
    categories: &[ProgressCategory],
    versions: &[String],
) -> Result<Library, ConfigError> {
    let lib_name = if lib.name.is_empty() {
        "<unnamed library>"
    } else {
        lib.name.as_str()
    };
    let referrer = format!("library '{lib_name}'");

    let mut base_cflags = match &lib.cflags {
        Some(preset) => flatten_preset(&config.cflags, preset, &referrer)?,
        None => Vec::new(),
    };
    base_cflags.extend(lib.extra_cflags.iter().cloned());

    let module = match lib.module.as_deref() {
        None => ModuleId::MAIN,
        Some(name) => {
            *module_ids
                .get(name)
                .ok_or_else(|| ConfigError::UnknownModule {
                    library: lib_name.to_string(),
                    module: name.to_string(),
                })?
        }
    };

    let check_category = |category: &str| -> Result<(), ConfigError> {
        if categories.is_empty() || categories.iter().any(|c| c.id == category) {
            Ok(())
        } else {
            Err(ConfigError::InvalidValue {
                section: "libs".to_string(),
                key: "progress_category".to_string(),
                message: format!("{referrer} uses undeclared category '{category}'"),
            })
        }
    };

    let mw_version = lib.mw_version.clone().ok_or_else(|| ConfigError::MalformedUnit {
        name: lib_name.to_string(),
        message: "library field 'mw_version' is required".to_string(),
    })?;
    let progress_category =
        lib.progress_category
            .clone()
            .ok_or_else(|| ConfigError::MalformedUnit {
                name: lib_name.to_string(),
                message: "library field 'progress_category' is required".to_string(),
            })?;
    check_category(&progress_category)?;

    let units = lib
        .objects
        .iter()
        .map(|object| {
            if let Some(category) = &object.progress_category {
                check_category(category)?;
            }
            build_unit(config, object, versions)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Library::builder()
        .name(lib.name.clone())
        .mw_version(mw_version)
        .progress_category(progress_category)
        .base_cflags(base_cflags)
        .host(lib.host)
        .shift_jis(lib.shift_jis.unwrap_or(config.project.shift_jis))
        .src_dir(lib.src_dir.clone().unwrap_or_else(|| config.project.src_dir.clone()))
        .module(module)
        .units(units)
        .build()
}

fn build_unit(
    config: &Config,
    object: &ObjectSection,
    versions: &[String],
) -> Result<TranslationUnit, ConfigError> {
    let check_versions = |listed: &[String]| -> Result<(), ConfigError> {
        match listed.iter().find(|v| !versions.contains(v)) {
            Some(unknown) => Err(ConfigError::UnknownVersion {
                version: unknown.clone(),
                known: versions.to_vec(),
            }),
            None => Ok(()),
        }
    };
    check_versions(&object.matching_for)?;
    check_versions(&object.versions)?;

    let status = match (object.status, object.matching_for.is_empty()) {
        (Some(DeclaredStatus::Matching), true) => MatchStatus::Matching,
        (Some(DeclaredStatus::NonMatching), true) => MatchStatus::NonMatching,
        (Some(DeclaredStatus::Equivalent), true) => MatchStatus::Equivalent,
        (None, false) => MatchStatus::MatchingFor(object.matching_for.clone()),
        (Some(_), false) => {
            return Err(ConfigError::MalformedUnit {
                name: object.source.clone(),
                message: "set either 'status' or 'matching_for', not both".to_string(),
            });
        }
        (None, true) => {
            return Err(ConfigError::MalformedUnit {
                name: object.source.clone(),
                message: "missing 'status'".to_string(),
            });
        }
    };

    let cflags_override = object
        .cflags
        .as_deref()
        .map(|preset| flatten_preset(&config.cflags, preset, &format!("object '{}'", object.source)))
        .transpose()?;

    TranslationUnit::builder()
        .source(object.source.clone())
        .status(status)
        .extra_cflags(object.extra_cflags.clone())
        .maybe_cflags_override(cflags_override)
        .versions(object.versions.clone())
        .extra(object.extra)
        .maybe_mw_version(object.mw_version.clone())
        .maybe_progress_category(object.progress_category.clone())
        .build()
}

fn build_link_order(
    config: &Config,
    module_ids: &BTreeMap<&str, ModuleId>,
) -> Result<LinkOrderRules, ConfigError> {
    let rules = config
        .link_order
        .iter()
        .map(|(name, section)| {
            let id = module_ids
                .get(name.as_str())
                .copied()
                .ok_or_else(|| ConfigError::UnknownModule {
                    library: "[link_order]".to_string(),
                    module: name.clone(),
                })?;
            Ok((
                id,
                ModuleRules {
                    prepend: section.prepend.clone(),
                    append: section.append.clone(),
                    remove: section.remove.clone(),
                },
            ))
        })
        .collect::<Result<BTreeMap<_, _>, ConfigError>>()?;
    Ok(LinkOrderRules::new(rules))
}
