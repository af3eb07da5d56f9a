// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Derived build paths.
//!
//! ```text
//! <build_dir>/
//!   build.ninja
//!   objdiff.json
//!   host/<src>.o             (host-toolchain objects)
//!   <version>/
//!     src/<src>.o            (built objects)
//!     obj/<src>.o            (reference objects from the split)
//!     include/
//!     main.elf  main.dol
//!     <module>.plf  <module>.rel
//!     report.json
//!
//! <config_dir>/<version>/
//!   config.yml               (split configuration)
//!   build.sha1               (checksums of the final images)
//! ```
//!
//! Every path is a pure function of the build directory, the version and the
//! source path, so regenerating the plan yields identical file names.

use std::path::{Path, PathBuf};

/// Paths for one `(build_dir, version)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPaths {
    build_dir: PathBuf,
    config_dir: PathBuf,
    version: String,
}

impl BuildPaths {
    #[must_use]
    pub fn new(build_dir: impl Into<PathBuf>, config_dir: impl Into<PathBuf>, version: &str) -> Self {
        Self {
            build_dir: build_dir.into(),
            config_dir: config_dir.into(),
            version: version.to_string(),
        }
    }

    #[must_use]
    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// `<build_dir>/<version>`.
    #[must_use]
    pub fn version_dir(&self) -> PathBuf {
        self.build_dir.join(&self.version)
    }

    /// Built object for `source`.
    #[must_use]
    pub fn object(&self, source: &str) -> PathBuf {
        with_object_extension(self.version_dir().join("src").join(source))
    }

    /// Reference object for `source`, produced by the split step.
    #[must_use]
    pub fn reference_object(&self, source: &str) -> PathBuf {
        with_object_extension(self.version_dir().join("obj").join(source))
    }

    /// Host-toolchain object for `source`.
    #[must_use]
    pub fn host_object(&self, source: &str) -> PathBuf {
        with_object_extension(self.build_dir.join("host").join(source))
    }

    #[must_use]
    pub fn ninja_file(&self) -> PathBuf {
        self.build_dir.join("build.ninja")
    }

    #[must_use]
    pub fn objdiff_file(&self) -> PathBuf {
        self.build_dir.join("objdiff.json")
    }

    /// Split configuration for the active version.
    #[must_use]
    pub fn split_config(&self) -> PathBuf {
        self.config_dir.join(&self.version).join("config.yml")
    }

    /// Checksum file for the active version.
    #[must_use]
    pub fn checksum_file(&self) -> PathBuf {
        self.config_dir.join(&self.version).join("build.sha1")
    }

    /// Marker written by the split step.
    #[must_use]
    pub fn split_marker(&self) -> PathBuf {
        self.version_dir().join("config.json")
    }

    /// Linked output of the main image.
    #[must_use]
    pub fn main_elf(&self) -> PathBuf {
        self.version_dir().join("main.elf")
    }

    #[must_use]
    pub fn main_dol(&self) -> PathBuf {
        self.version_dir().join("main.dol")
    }

    /// Linked output of relocatable module `name`.
    #[must_use]
    pub fn module_plf(&self, name: &str) -> PathBuf {
        self.version_dir().join(format!("{name}.plf"))
    }

    #[must_use]
    pub fn module_rel(&self, name: &str) -> PathBuf {
        self.version_dir().join(format!("{name}.rel"))
    }

    /// Map file next to a linked output.
    #[must_use]
    pub fn map_for(linked: &Path) -> PathBuf {
        linked.with_extension("MAP")
    }
}

/// Replace the source extension with `.o`, keeping dotted stems intact.
fn with_object_extension(path: PathBuf) -> PathBuf {
    path.with_extension("o")
}
