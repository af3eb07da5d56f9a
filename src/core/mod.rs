// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core runtime services.
//!
//! ```text
//!     core
//!      |
//!      v
//!   process
//!      |
//!   Builder --> tokio::process --> Output
//! ```

pub mod process;
