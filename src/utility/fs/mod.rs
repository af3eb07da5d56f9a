// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Filesystem utilities.
//!
//! ```text
//! walk:  find_files()   ignore::WalkParallel + wax glob
//!        WalkOptions    max_depth, hidden, gitignore, skip_dirs
//! ```

pub mod walk;

#[cfg(test)]
mod tests;
