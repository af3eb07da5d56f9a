// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!              ForgeError (~16 bytes)
//!                     |
//!     +------+------+------+------+
//!     |      |      |      |      |
//!     v      v      v      v      v
//!    Cfg   Graph   Tool  Proc    Fs
//!    Box    Box    Box    Box    Box
//!
//! Sub-errors (unboxed internally):
//!   Config   UnknownVersion, UnknownPreset, MalformedUnit, ParseError
//!   Graph    DuplicateOutputPath, MissingSource, UndeclaredSource
//!   Tool     Unresolved, InvalidDiffOutput
//!   Process  SpawnFailed, NonZeroExit
//!   Fs       IoError
//! ```
//!
//! Configuration errors are fatal and surface before any graph exists.
//! Graph errors are resolution warnings that a policy escalated to fatal.

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`ForgeError`].
pub type ForgeResult<T> = std::result::Result<T, ForgeError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at two words on the stack.
#[derive(Debug, Error)]
pub enum ForgeError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Build graph construction error.
    #[error("graph error: {0}")]
    Graph(#[from] Box<GraphError>),

    /// External tool resolution error.
    #[error("tool error: {0}")]
    Tool(#[from] Box<ToolError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Filesystem error.
    #[error("filesystem error: {0}")]
    Fs(#[from] Box<FsError>),
}

macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for ForgeError {
                fn from(err: $error) -> Self {
                    ForgeError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ConfigError => Config,
    GraphError => Graph,
    ToolError => Tool,
    ProcessError => Process,
    FsError => Fs,
}

// --- Config Errors ---

/// Configuration-related errors. All of them are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },

    /// The requested target version is not part of the declared version set.
    #[error("unknown version '{version}' (known versions: {})", known.join(", "))]
    UnknownVersion { version: String, known: Vec<String> },

    /// A library or preset refers to a compiler-flag preset that does not exist.
    #[error("unknown cflags preset '{name}' referenced by {referrer}")]
    UnknownPreset { name: String, referrer: String },

    /// Preset inheritance loops back on itself.
    #[error("cflags preset '{name}' extends itself through: {}", chain.join(" -> "))]
    PresetCycle { name: String, chain: Vec<String> },

    /// A library refers to a module that is not declared.
    #[error("library '{library}' refers to unknown module '{module}'")]
    UnknownModule { library: String, module: String },

    /// A library or unit declaration is missing a required field or is inconsistent.
    #[error("malformed declaration '{name}': {message}")]
    MalformedUnit { name: String, message: String },

    /// Configuration file not found.
    #[error("config file not found: {0}")]
    NotFound(String),
}

// --- Graph Errors ---

/// Errors raised while constructing the build graph.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Two translation units resolve to the same object path.
    #[error("units '{first}' and '{second}' both produce '{path}'")]
    DuplicateOutputPath {
        path: String,
        first: String,
        second: String,
    },

    /// A declared source file does not exist (missing-source policy is `error`).
    #[error("source file not found: {path}")]
    MissingSource { path: String },

    /// A source file exists on disk but no unit declares it (missing-config policy is `error`).
    #[error("source file has no declared unit: {path}")]
    UndeclaredSource { path: String },
}

// --- Tool Errors ---

/// External tool resolution errors.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A required tool was neither configured nor found in PATH.
    #[error("required tool '{tool}' not found; {hint}")]
    Unresolved { tool: String, hint: String },

    /// The structural diff tool produced output that could not be interpreted.
    #[error("could not read diff result for '{unit}': {message}")]
    InvalidDiffOutput { unit: String, message: String },
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with non-zero status.
    #[error("process '{command}' exited with code {code}")]
    NonZeroExit { command: String, code: i32 },
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// General I/O error.
    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests;
