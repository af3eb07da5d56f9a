// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Version resolution: effective status, inclusion and flags of one unit.
//!
//! ```text
//! resolve(unit, library, ctx)
//!   |
//!   +-- unit restricted to other versions? ---------> None
//!   |
//!   +-- status   = declared.effective(version)
//!   +-- included = Matching, or any status in NonMatching mode
//!   +-- flags    = override | library base
//!                  ++ debug | release
//!                  ++ warning flag
//!                  ++ build-identifier flags
//!                  ++ unit extra
//!                  ++ object-override extra
//!                  (then {version} / {version_index} expanded)
//! ```
//!
//! The function is pure: the same inputs always give the same output.


use regex::Regex;

use crate::config::merge::override_flags;
use crate::error::ConfigError;
use crate::project::{EffectiveStatus, Library, ProjectConfig, TranslationUnit};

/// Which statuses are built from source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// Only `Matching` units.
    Strict,
    /// Every unit: the "build everything" request behind `--non-matching`.
    NonMatching,
}

impl ResolveMode {
    #[must_use]
    pub const fn from_non_matching(non_matching: bool) -> Self {
        if non_matching {
            Self::NonMatching
        } else {
            Self::Strict
        }
    }
}

/// Resolution result for one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUnit {
    pub status: EffectiveStatus,
    pub flags: Vec<String>,
    pub included: bool,
}

/// Everything `resolve` reads besides the unit and its library.
#[derive(Debug, Clone)]
pub struct ResolveContext<'a> {
    project: &'a ProjectConfig,
    mode: ResolveMode,
    placeholders: Placeholders,
}

impl<'a> ResolveContext<'a> {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the placeholder pattern cannot
    /// be compiled.
    pub fn new(project: &'a ProjectConfig, mode: ResolveMode) -> Result<Self, ConfigError> {
        Ok(Self {
            project,
            mode,
            placeholders: Placeholders::new(project.version(), project.version_index())?,
        })
    }

    /// Context for the project's own mode.
    ///
    /// # Errors
    ///
    /// See [`ResolveContext::new`].
    pub fn for_project(project: &'a ProjectConfig) -> Result<Self, ConfigError> {
        Self::new(project, ResolveMode::from_non_matching(project.non_matching()))
    }

    #[must_use]
    pub const fn project(&self) -> &'a ProjectConfig {
        self.project
    }

    #[must_use]
    pub const fn mode(&self) -> ResolveMode {
        self.mode
    }

    #[must_use]
    pub const fn placeholders(&self) -> &Placeholders {
        &self.placeholders
    }
}

/// Resolve `unit` of `library` for the active version.
///
/// Returns `Ok(None)` when the unit is restricted to versions that do not
/// include the active one.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` when an object-override glob is invalid.
pub fn resolve(
    unit: &TranslationUnit,
    library: &Library,
    ctx: &ResolveContext<'_>,
) -> Result<Option<ResolvedUnit>, ConfigError> {
    let project = ctx.project;
    let version = project.version();
    if !unit.exists_in(version) {
        return Ok(None);
    }

    let status = unit.status().effective(version);
    let included = match ctx.mode {
        ResolveMode::Strict => status == EffectiveStatus::Matching,
        ResolveMode::NonMatching => true,
    };

    let tables = project.flags();
    let mut flags: Vec<String> = unit
        .cflags_override()
        .unwrap_or_else(|| library.base_cflags())
        .to_vec();
    if project.debug() {
        flags.extend(tables.debug_cflags.iter().cloned());
    } else {
        flags.extend(tables.release_cflags.iter().cloned());
    }
    if let Some(warn) = project.warn() {
        flags.push(warn.flag().to_string());
    }
    flags.extend(tables.build_identifier_cflags.iter().cloned());
    flags.extend(unit.extra_cflags().iter().cloned());
    flags.extend(override_flags(project.object_overrides(), unit.source())?);

    Ok(Some(ResolvedUnit {
        status,
        flags: ctx.placeholders.expand(&flags),
        included,
    }))
}

/// `{version}` / `{version_index}` substitution for the active version.
#[derive(Debug, Clone)]
pub struct Placeholders {
    pattern: Regex,
    version: String,
    index: String,
}

impl Placeholders {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the pattern cannot be compiled.
    pub fn new(version: &str, version_index: usize) -> Result<Self, ConfigError> {
        let pattern =
            Regex::new(r"\{(version|version_index)\}").map_err(|e| ConfigError::InvalidValue {
                section: "build".to_string(),
                key: "placeholders".to_string(),
                message: e.to_string(),
            })?;
        Ok(Self {
            pattern,
            version: version.to_string(),
            index: version_index.to_string(),
        })
    }

    /// Substitute placeholders in every flag.
    #[must_use]
    pub fn expand(&self, flags: &[String]) -> Vec<String> {
        flags
            .iter()
            .map(|flag| {
                self.pattern
                    .replace_all(flag, |caps: &regex::Captures<'_>| match &caps[1] {
                        "version" => self.version.clone(),
                        _ => self.index.clone(),
                    })
                    .into_owned()
            })
            .collect()
    }
}
