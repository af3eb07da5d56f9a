// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Compiler-flag preset layering and per-object overrides.
//!
//! ```text
//! [cflags.base]                    flags = [A, B]
//! [cflags.runtime] extends = base  flags = [C]
//!
//! flatten("runtime") --> [A, B, C]
//! ```
//!
//! A preset's parent chain is walked to the root, then flags are appended
//! root first. Later flags win when the compiler reads left to right.

use std::collections::BTreeMap;

use wax::Program as _;

use super::types::{CflagsPreset, ObjectOverride};
use crate::error::ConfigError;

/// Flatten preset `name` into its full flag list.
///
/// # Errors
///
/// Returns `ConfigError::UnknownPreset` if `name` or any ancestor is not
/// declared, and `ConfigError::PresetCycle` if the chain loops.
pub fn flatten_preset(
    presets: &BTreeMap<String, CflagsPreset>,
    name: &str,
    referrer: &str,
) -> Result<Vec<String>, ConfigError> {
    let mut chain: Vec<&str> = Vec::new();
    let mut current = name;
    let mut current_referrer = referrer.to_string();

    loop {
        if chain.contains(&current) {
            chain.push(current);
            return Err(ConfigError::PresetCycle {
                name: name.to_string(),
                chain: chain.into_iter().map(str::to_string).collect(),
            });
        }
        let preset = presets
            .get(current)
            .ok_or_else(|| ConfigError::UnknownPreset {
                name: current.to_string(),
                referrer: current_referrer.clone(),
            })?;
        chain.push(current);
        match preset.extends.as_deref() {
            Some(parent) => {
                current_referrer = format!("preset '{current}'");
                current = parent;
            }
            None => break,
        }
    }

    let flags = chain
        .iter()
        .rev()
        .filter_map(|preset| presets.get(*preset))
        .flat_map(|preset| preset.flags.iter().cloned())
        .collect();
    Ok(flags)
}

/// Collect the extra flags of every override whose glob matches `source`,
/// in declaration order.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if an override pattern is not a valid glob.
pub fn override_flags(
    overrides: &[ObjectOverride],
    source: &str,
) -> Result<Vec<String>, ConfigError> {
    let mut flags = Vec::new();
    for entry in overrides {
        let glob = wax::Glob::new(&entry.pattern).map_err(|e| ConfigError::InvalidValue {
            section: "object_overrides".to_string(),
            key: "pattern".to_string(),
            message: format!("'{}': {e}", entry.pattern),
        })?;
        if glob.is_match(source) {
            flags.extend(entry.extra_cflags.iter().cloned());
        }
    }
    Ok(flags)
}
