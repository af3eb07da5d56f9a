// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Toolchain resolution.
//!
//! ```text
//! Tool::Compiler { mw_version }
//!        |
//!        v
//!  explicit path ([tools] / --flag)
//!        | none
//!        v
//!  PATH lookup (which)
//!        | none
//!        v
//!  ToolError::Unresolved
//!
//! ToolCommand = [wrapper] [sjiswrap] executable
//!   wrapper:  wibo / wine, only for Windows binaries on other hosts
//!   sjiswrap: Shift-JIS libraries, when available
//! ```
//!
//! Resolution never touches the build graph: the emitter asks for the
//! command of each tool kind it actually needs, so a project without
//! host libraries never requires a host compiler.


use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::types::ToolsSection;
use crate::core::process::builder::ProcessBuilder;
use crate::error::ToolError;

/// Tool kinds the build plan and the progress engine invoke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tool {
    /// Metrowerks C/C++ compiler for one version tag.
    Compiler { mw_version: String, shift_jis: bool },
    /// GNU assembler from binutils.
    Assembler,
    /// Metrowerks linker for one version tag.
    Linker { mw_version: String },
    /// Compiler for host builds (`cxx` selects the C++ driver).
    HostCompiler { cxx: bool },
    /// decomp-toolkit: split, elf2dol, rel make, checksum.
    Dtk,
    /// Structural diff tool.
    Objdiff,
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compiler { mw_version, .. } => write!(f, "mwcceppc ({mw_version})"),
            Self::Assembler => write!(f, "powerpc-eabi-as"),
            Self::Linker { mw_version } => write!(f, "mwldeppc ({mw_version})"),
            Self::HostCompiler { cxx: false } => write!(f, "host C compiler"),
            Self::HostCompiler { cxx: true } => write!(f, "host C++ compiler"),
            Self::Dtk => write!(f, "dtk"),
            Self::Objdiff => write!(f, "objdiff-cli"),
        }
    }
}

/// Fully resolved command prefix: program followed by leading arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    argv: Vec<String>,
}

impl ToolCommand {
    fn new(program: &Path) -> Self {
        Self {
            argv: vec![display_path(program)],
        }
    }

    /// Put `program` in front of the current command.
    fn wrapped_by(mut self, program: &Path) -> Self {
        self.argv.insert(0, display_path(program));
        self
    }

    #[must_use]
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Command prefix as one shell word list, for build rules.
    #[must_use]
    pub fn render(&self) -> String {
        self.argv.join(" ")
    }

    /// Process builder for running this command directly.
    #[must_use]
    pub fn to_process(&self) -> ProcessBuilder {
        let (program, rest) = self
            .argv
            .split_first()
            .map_or(("", &[][..]), |(p, rest)| (p.as_str(), rest));
        ProcessBuilder::new(program).args(rest)
    }
}

/// PATH lookup strategy.
pub(crate) type PathLookup = fn(&str) -> Option<PathBuf>;

/// Tool locations derived from `[tools]`.
#[derive(Debug, Clone)]
pub struct Toolchain {
    tools: ToolsSection,
    lookup: PathLookup,
    windows_host: bool,
}

impl Toolchain {
    #[must_use]
    pub fn new(tools: &ToolsSection) -> Self {
        Self {
            tools: tools.clone(),
            lookup: ProcessBuilder::find,
            windows_host: cfg!(windows),
        }
    }

    /// Replace the PATH lookup.
    #[cfg(test)]
    #[must_use]
    pub(crate) const fn with_lookup(mut self, lookup: PathLookup) -> Self {
        self.lookup = lookup;
        self
    }

    /// Treat the host as Windows (no wrapper) or not.
    #[cfg(test)]
    #[must_use]
    pub(crate) const fn with_windows_host(mut self, windows_host: bool) -> Self {
        self.windows_host = windows_host;
        self
    }

    /// Resolve the command prefix for `tool`.
    ///
    /// # Errors
    ///
    /// Returns `ToolError::Unresolved` when neither an explicit path nor a
    /// PATH lookup yields the executable.
    pub fn resolve(&self, tool: &Tool) -> Result<ToolCommand, ToolError> {
        match tool {
            Tool::Compiler {
                mw_version,
                shift_jis,
            } => {
                let exe = self.metrowerks(tool, mw_version, "mwcceppc")?;
                let mut command = ToolCommand::new(&exe);
                if *shift_jis
                    && let Some(sjiswrap) = self.sjiswrap()
                {
                    command = command.wrapped_by(&sjiswrap);
                }
                Ok(self.with_wrapper(command))
            }
            Tool::Linker { mw_version } => {
                let exe = self.metrowerks(tool, mw_version, "mwldeppc")?;
                Ok(self.with_wrapper(ToolCommand::new(&exe)))
            }
            Tool::Assembler => {
                let exe = self.executable_name("powerpc-eabi-as");
                let path = match &self.tools.binutils {
                    Some(dir) => dir.join(&exe),
                    None => self.lookup(tool, &exe, "pass --binutils DIR")?,
                };
                Ok(ToolCommand::new(&path))
            }
            Tool::HostCompiler { cxx } => {
                let program = if *cxx {
                    &self.tools.host_cxx
                } else {
                    &self.tools.host_cc
                };
                if program.is_empty() {
                    return Err(ToolError::Unresolved {
                        tool: tool.to_string(),
                        hint: "set tools.host_cc / tools.host_cxx".to_string(),
                    });
                }
                Ok(ToolCommand::new(Path::new(program)))
            }
            Tool::Dtk => {
                self.explicit_or_path(tool, self.tools.dtk.as_deref(), "dtk", "pass --dtk BIN")
            }
            Tool::Objdiff => self.explicit_or_path(
                tool,
                self.tools.objdiff.as_deref(),
                "objdiff-cli",
                "pass --objdiff BIN",
            ),
        }
    }

    fn explicit_or_path(
        &self,
        tool: &Tool,
        explicit: Option<&Path>,
        name: &str,
        hint: &str,
    ) -> Result<ToolCommand, ToolError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => self.lookup(tool, &self.executable_name(name), hint)?,
        };
        Ok(ToolCommand::new(&path))
    }

    /// `<compilers>/<mw_version>/<name>.exe`, else `<name>` on PATH.
    fn metrowerks(&self, tool: &Tool, mw_version: &str, name: &str) -> Result<PathBuf, ToolError> {
        match &self.tools.compilers {
            Some(dir) => Ok(dir.join(mw_version).join(format!("{name}.exe"))),
            None => self.lookup(tool, name, "pass --compilers DIR"),
        }
    }

    fn sjiswrap(&self) -> Option<PathBuf> {
        self.tools
            .sjiswrap
            .clone()
            .or_else(|| (self.lookup)("sjiswrap"))
    }

    /// Windows binaries need wibo or wine on other hosts.
    fn with_wrapper(&self, command: ToolCommand) -> ToolCommand {
        if self.windows_host {
            return command;
        }
        let wrapper = self
            .tools
            .wrapper
            .clone()
            .or_else(|| (self.lookup)("wibo"))
            .or_else(|| (self.lookup)("wine"));
        match wrapper {
            Some(wrapper) => command.wrapped_by(&wrapper),
            None => command,
        }
    }

    fn lookup(&self, tool: &Tool, name: &str, hint: &str) -> Result<PathBuf, ToolError> {
        (self.lookup)(name).ok_or_else(|| ToolError::Unresolved {
            tool: tool.to_string(),
            hint: format!("{hint} or put '{name}' on PATH"),
        })
    }

    fn executable_name(&self, name: &str) -> String {
        if self.windows_host {
            format!("{name}.exe")
        } else {
            name.to_string()
        }
    }
}

/// Render a path with forward slashes so generated files do not depend on
/// the host separator.
#[must_use]
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
