// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Project file and configuration management.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low -> high)
//! 1. defaults
//! 2. project.toml (cwd, optional)
//! 3. --config FILE (repeatable, in order)
//! 4. DECOMP_* env vars
//! 5. --set KEY=VALUE
//! 6. explicit configure/progress flags
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! DECOMP_BUILD__NON_MATCHING=true  -> build.non_matching = true
//! DECOMP_TOOLS__DTK=/opt/dtk       -> tools.dtk = "/opt/dtk"
//! ```
//!
//! # Project File
//!
//! ```toml
//! [project]
//! versions = ["GXXE01", "NXXJ01"]
//!
//! [cflags.base]
//! flags = ["-proc gekko", "-O4,p"]
//!
//! [cflags.runtime]
//! extends = "base"
//! flags = ["-use_lmw_stmw on"]
//!
//! [[libs]]
//! name = "Runtime"
//! mw_version = "GC/1.2.5"
//! cflags = "runtime"
//! progress_category = "sdk"
//! objects = [
//!     { source = "Runtime/__mem.c", status = "Matching" },
//!     { source = "Runtime/abort_exit.c", matching_for = ["NXXJ01"] },
//! ]
//! ```

pub mod loader;
pub mod merge;
pub mod paths;
pub mod types;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::{
    BuildSection, CflagsPreset, LibSection, LinkOrderSection, ModuleSection, ObjectOverride,
    ProgressSection, ProjectSection, ToolsSection,
};

/// Default project file looked up in the working directory.
pub const PROJECT_FILE: &str = "project.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "DECOMP";

/// Name under which modules, `[link_order]` and objdiff units refer to the
/// main image.
pub const MAIN_MODULE_NAME: &str = "main";

/// Complete merged configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub project: ProjectSection,
    pub build: BuildSection,
    pub tools: ToolsSection,
    pub progress: ProgressSection,
    /// Compiler-flag presets, layered through `extends`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub cflags: BTreeMap<String, CflagsPreset>,
    /// Relocatable modules, in id order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<ModuleSection>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub libs: Vec<LibSection>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub object_overrides: Vec<ObjectOverride>,
    /// Link-order rules per module name (`main` for the main image).
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub link_order: BTreeMap<String, LinkOrderSection>,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use decomp_forge::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("project.toml")
    ///     .add_toml_file("config/local.toml")
    ///     .with_env_prefix("DECOMP")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Structural checks that do not depend on the selected version.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for duplicate versions, a default version
    /// outside the declared set, duplicate module or category names, or a
    /// module that takes the main image's name.
    pub fn validate(&self) -> Result<()> {
        if let Some(dup) = first_duplicate(self.project.versions.iter()) {
            return Err(ConfigError::InvalidValue {
                section: "project".to_string(),
                key: "versions".to_string(),
                message: format!("version '{dup}' is declared twice"),
            }
            .into());
        }
        if let Some(default) = &self.project.default_version
            && !self.project.versions.contains(default)
        {
            return Err(ConfigError::UnknownVersion {
                version: default.clone(),
                known: self.project.versions.clone(),
            }
            .into());
        }
        if let Some(dup) = first_duplicate(self.modules.iter().map(|m| &m.name)) {
            return Err(ConfigError::InvalidValue {
                section: "modules".to_string(),
                key: "name".to_string(),
                message: format!("module '{dup}' is declared twice"),
            }
            .into());
        }
        if self.modules.iter().any(|m| m.name == MAIN_MODULE_NAME) {
            return Err(ConfigError::InvalidValue {
                section: "modules".to_string(),
                key: "name".to_string(),
                message: format!("'{MAIN_MODULE_NAME}' is reserved for the main image"),
            }
            .into());
        }
        if let Some(dup) = first_duplicate(self.progress.categories.iter().map(|c| &c.id)) {
            return Err(ConfigError::InvalidValue {
                section: "progress".to_string(),
                key: "categories".to_string(),
                message: format!("category '{dup}' is declared twice"),
            }
            .into());
        }
        Ok(())
    }

    /// Version used when the command line does not pick one.
    #[must_use]
    pub fn default_version(&self) -> Option<&str> {
        self.project
            .default_version
            .as_deref()
            .or_else(|| self.project.versions.first().map(String::as_str))
    }

    /// Format configuration options for display.
    ///
    /// Output is deterministically ordered using `BTreeMap`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_project_options(&mut options);
        self.format_build_options(&mut options);
        self.format_tools_options(&mut options);
        self.format_progress_options(&mut options);
        self.format_declaration_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_project_options(&self, options: &mut BTreeMap<String, String>) {
        let p = &self.project;
        options.insert("project.name".into(), p.name.clone());
        options.insert("project.versions".into(), p.versions.join(", "));
        options.insert(
            "project.default_version".into(),
            self.default_version().unwrap_or_default().to_string(),
        );
        options.insert("project.src_dir".into(), p.src_dir.display().to_string());
        options.insert("project.config_dir".into(), p.config_dir.display().to_string());
        options.insert("project.asflags".into(), p.asflags.join(" "));
        options.insert("project.ldflags".into(), p.ldflags.join(" "));
        options.insert("project.linker_version".into(), p.linker_version.clone());
        options.insert("project.shift_jis".into(), p.shift_jis.to_string());
        options.insert(
            "project.link_modules_first".into(),
            p.link_modules_first.to_string(),
        );
    }

    fn format_build_options(&self, options: &mut BTreeMap<String, String>) {
        let b = &self.build;
        options.insert("build.build_dir".into(), b.build_dir.display().to_string());
        options.insert("build.non_matching".into(), b.non_matching.to_string());
        options.insert("build.generate_map".into(), b.generate_map.to_string());
        options.insert("build.debug".into(), b.debug.to_string());
        options.insert(
            "build.warn".into(),
            b.warn.map_or_else(String::new, |w| w.to_string()),
        );
        options.insert(
            "build.missing_source".into(),
            format!("{:?}", b.missing_source).to_lowercase(),
        );
        options.insert(
            "build.missing_config".into(),
            format!("{:?}", b.missing_config).to_lowercase(),
        );
    }

    fn format_tools_options(&self, options: &mut BTreeMap<String, String>) {
        let fmt = |p: &Option<std::path::PathBuf>| {
            p.as_ref()
                .map_or_else(|| "(PATH)".to_string(), |p| p.display().to_string())
        };
        let t = &self.tools;
        options.insert("tools.binutils".into(), fmt(&t.binutils));
        options.insert("tools.compilers".into(), fmt(&t.compilers));
        options.insert("tools.dtk".into(), fmt(&t.dtk));
        options.insert("tools.objdiff".into(), fmt(&t.objdiff));
        options.insert("tools.wrapper".into(), fmt(&t.wrapper));
        options.insert("tools.sjiswrap".into(), fmt(&t.sjiswrap));
        options.insert("tools.host_cc".into(), t.host_cc.clone());
        options.insert("tools.host_cxx".into(), t.host_cxx.clone());
    }

    fn format_progress_options(&self, options: &mut BTreeMap<String, String>) {
        let p = &self.progress;
        options.insert("progress.enabled".into(), p.enabled.to_string());
        options.insert("progress.each_module".into(), p.each_module.to_string());
        options.insert(
            "progress.include_host_units".into(),
            p.include_host_units.to_string(),
        );
        options.insert("progress.report_args".into(), p.report_args.join(" "));
        for category in &p.categories {
            options.insert(
                format!("progress.categories.{}", category.id),
                category.name.clone(),
            );
        }
    }

    fn format_declaration_options(&self, options: &mut BTreeMap<String, String>) {
        for (name, preset) in &self.cflags {
            let value = match &preset.extends {
                Some(parent) => format!("{parent} + {} flags", preset.flags.len()),
                None => format!("{} flags", preset.flags.len()),
            };
            options.insert(format!("cflags.{name}"), value);
        }
        for (index, module) in self.modules.iter().enumerate() {
            options.insert(format!("modules.{}", module.name), (index + 1).to_string());
        }
        for lib in &self.libs {
            options.insert(
                format!("libs.{}", lib.name),
                format!("{} objects", lib.objects.len()),
            );
        }
    }
}

fn first_duplicate<'a>(mut items: impl Iterator<Item = &'a String>) -> Option<&'a String> {
    let mut seen = std::collections::BTreeSet::new();
    items.find(|item| !seen.insert(item.as_str()))
}
