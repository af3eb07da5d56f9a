// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Declarations: libraries, translation units, modules and categories.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Matching status of a translation unit as declared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MatchStatus {
    Matching,
    NonMatching,
    Equivalent,
    /// Matching for the listed versions, non-matching for every other one.
    MatchingFor(Vec<String>),
}

impl MatchStatus {
    /// Collapse the declared status for the active version.
    #[must_use]
    pub fn effective(&self, version: &str) -> EffectiveStatus {
        match self {
            Self::Matching => EffectiveStatus::Matching,
            Self::NonMatching => EffectiveStatus::NonMatching,
            Self::Equivalent => EffectiveStatus::Equivalent,
            Self::MatchingFor(versions) if versions.iter().any(|v| v == version) => {
                EffectiveStatus::Matching
            }
            Self::MatchingFor(_) => EffectiveStatus::NonMatching,
        }
    }
}

/// Status of a unit once the active version is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum EffectiveStatus {
    Matching,
    NonMatching,
    Equivalent,
}

impl std::fmt::Display for EffectiveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Matching => write!(f, "Matching"),
            Self::NonMatching => write!(f, "NonMatching"),
            Self::Equivalent => write!(f, "Equivalent"),
        }
    }
}

/// Kind of source, by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    C,
    Cpp,
    Asm,
}

impl SourceKind {
    /// Classify a source path by its extension.
    #[must_use]
    pub fn from_path(source: &str) -> Option<Self> {
        let ext = source.rsplit_once('.')?.1;
        match ext {
            "c" => Some(Self::C),
            "cp" | "cpp" | "cc" | "cxx" => Some(Self::Cpp),
            "s" => Some(Self::Asm),
            _ => None,
        }
    }
}

/// Module identifier. `ModuleId::MAIN` is the non-relocatable main image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ModuleId(pub u32);

impl ModuleId {
    pub const MAIN: Self = Self(0);

    #[must_use]
    pub const fn is_main(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A linkable module: the main image or a relocatable overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDecl {
    pub id: ModuleId,
    pub name: String,
    pub ldflags: Vec<String>,
}

/// Report grouping label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressCategory {
    pub id: String,
    pub name: String,
}

/// One source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationUnit {
    source: String,
    kind: SourceKind,
    status: MatchStatus,
    extra_cflags: Vec<String>,
    cflags_override: Option<Vec<String>>,
    versions: Vec<String>,
    extra: bool,
    mw_version: Option<String>,
    progress_category: Option<String>,
}

#[bon::bon]
impl TranslationUnit {
    /// Validated constructor, exposed as `TranslationUnit::builder()`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MalformedUnit` for an empty or escaping source
    /// path, an unknown source extension, or an empty `MatchingFor` set.
    #[builder(on(String, into))]
    pub fn new(
        source: String,
        status: MatchStatus,
        #[builder(default)] extra_cflags: Vec<String>,
        cflags_override: Option<Vec<String>>,
        #[builder(default)] versions: Vec<String>,
        #[builder(default)] extra: bool,
        mw_version: Option<String>,
        progress_category: Option<String>,
    ) -> Result<Self, ConfigError> {
        let malformed = |message: &str| ConfigError::MalformedUnit {
            name: source.clone(),
            message: message.to_string(),
        };
        if source.is_empty() {
            return Err(malformed("source path is empty"));
        }
        if source.starts_with('/') || source.split('/').any(|part| part == "..") {
            return Err(malformed("source path must stay inside the source directory"));
        }
        let kind = SourceKind::from_path(&source).ok_or_else(|| {
            malformed("unknown source extension (expected .c, .cp, .cpp, .cc, .cxx or .s)")
        })?;
        if matches!(&status, MatchStatus::MatchingFor(v) if v.is_empty()) {
            return Err(malformed("matching_for lists no versions"));
        }
        Ok(Self {
            source,
            kind,
            status,
            extra_cflags,
            cflags_override,
            versions,
            extra,
            mw_version,
            progress_category,
        })
    }
}

impl TranslationUnit {
    /// Source path relative to the library's source directory.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub const fn kind(&self) -> SourceKind {
        self.kind
    }

    #[must_use]
    pub const fn status(&self) -> &MatchStatus {
        &self.status
    }

    #[must_use]
    pub fn extra_cflags(&self) -> &[String] {
        &self.extra_cflags
    }

    /// Flags replacing the library base, if any.
    #[must_use]
    pub fn cflags_override(&self) -> Option<&[String]> {
        self.cflags_override.as_deref()
    }

    /// Versions this unit exists in. Empty means every version.
    #[must_use]
    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    /// Whether the unit is compiled but left out of the declared link order.
    #[must_use]
    pub const fn is_extra(&self) -> bool {
        self.extra
    }

    #[must_use]
    pub fn mw_version(&self) -> Option<&str> {
        self.mw_version.as_deref()
    }

    #[must_use]
    pub fn progress_category(&self) -> Option<&str> {
        self.progress_category.as_deref()
    }

    /// Whether the unit is part of the project for `version`.
    #[must_use]
    pub fn exists_in(&self, version: &str) -> bool {
        self.versions.is_empty() || self.versions.iter().any(|v| v == version)
    }

    /// Object file name used in link orders, e.g. `game/main.o`.
    #[must_use]
    pub fn object_name(&self) -> String {
        match self.source.rsplit_once('.') {
            Some((stem, _)) => format!("{stem}.o"),
            None => format!("{}.o", self.source),
        }
    }
}

/// A named group of units sharing flags, compiler and category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Library {
    name: String,
    mw_version: String,
    progress_category: String,
    base_cflags: Vec<String>,
    host: bool,
    shift_jis: bool,
    src_dir: PathBuf,
    module: ModuleId,
    units: Vec<TranslationUnit>,
}

#[bon::bon]
impl Library {
    /// Validated constructor, exposed as `Library::builder()`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MalformedUnit` when a required field is blank or
    /// two units share a source path.
    #[builder(on(String, into))]
    pub fn new(
        name: String,
        mw_version: String,
        progress_category: String,
        #[builder(default)] base_cflags: Vec<String>,
        #[builder(default)] host: bool,
        #[builder(default)] shift_jis: bool,
        #[builder(default = PathBuf::from("src"), into)] src_dir: PathBuf,
        #[builder(default = ModuleId::MAIN)] module: ModuleId,
        #[builder(default)] units: Vec<TranslationUnit>,
    ) -> Result<Self, ConfigError> {
        for (field, value) in [
            ("name", &name),
            ("mw_version", &mw_version),
            ("progress_category", &progress_category),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::MalformedUnit {
                    name: if name.is_empty() {
                        "<unnamed library>".to_string()
                    } else {
                        name.clone()
                    },
                    message: format!("library field '{field}' is required"),
                });
            }
        }
        let mut seen = std::collections::BTreeSet::new();
        if let Some(dup) = units.iter().find(|u| !seen.insert(u.source())) {
            return Err(ConfigError::MalformedUnit {
                name: name.clone(),
                message: format!("source '{}' is declared twice", dup.source()),
            });
        }
        Ok(Self {
            name,
            mw_version,
            progress_category,
            base_cflags,
            host,
            shift_jis,
            src_dir,
            module,
            units,
        })
    }
}

impl Library {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Compiler version tag, e.g. `GC/1.3.2`.
    #[must_use]
    pub fn mw_version(&self) -> &str {
        &self.mw_version
    }

    #[must_use]
    pub fn progress_category(&self) -> &str {
        &self.progress_category
    }

    /// Flattened base flags.
    #[must_use]
    pub fn base_cflags(&self) -> &[String] {
        &self.base_cflags
    }

    /// Whether the library is also built with the host toolchain.
    #[must_use]
    pub const fn is_host(&self) -> bool {
        self.host
    }

    #[must_use]
    pub const fn shift_jis(&self) -> bool {
        self.shift_jis
    }

    #[must_use]
    pub fn src_dir(&self) -> &Path {
        &self.src_dir
    }

    #[must_use]
    pub const fn module(&self) -> ModuleId {
        self.module
    }

    #[must_use]
    pub fn units(&self) -> &[TranslationUnit] {
        &self.units
    }
}
