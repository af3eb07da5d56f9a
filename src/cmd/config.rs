// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `options` and `inis` commands.

use crate::config::Config;

/// Display the merged configuration.
pub fn run_options_command(config: &Config) {
    for line in config.format_options() {
        println!("{line}");
    }
}

/// Display loaded project files.
pub fn run_inis_command(config_files: &[String]) {
    if config_files.is_empty() {
        println!("No project files loaded");
    } else {
        for line in config_files {
            println!("{line}");
        }
    }
}
