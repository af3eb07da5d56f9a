// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |            configure / progress
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |   TOML, layered settings  |
//!              '-------------+-------------'
//!                            v
//!              project (versions, libraries, units)
//!                            |
//!                 resolve (presets, overrides)
//!                            v
//!                 graph (units, build steps)
//!                  |                     |
//!                  v                     v
//!           emit (ninja, objdiff)   progress (diff, report)
//!                  |                     |
//!                  +------ toolchain ----+
//!
//!   +-----------------------------------------+
//!   |  core   process runner                  |
//!   +-----------------------------------------+
//!   |  foundation   error, logging, utility   |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod emit;
pub mod error;
pub mod graph;
pub mod logging;
pub mod progress;
pub mod project;
pub mod resolve;
pub mod toolchain;
pub mod utility;
