// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Aggregated progress figures.

use std::fmt;

use serde::Serialize;

/// Unit and byte counts for one grouping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Measures {
    pub total_units: u64,
    pub matched_units: u64,
    pub total_code: u64,
    pub matched_code: u64,
    pub total_data: u64,
    pub matched_data: u64,
}

impl Measures {
    /// Add `other` into `self`, saturating at `u64::MAX`.
    pub const fn absorb(&mut self, other: &Self) {
        self.total_units = self.total_units.saturating_add(other.total_units);
        self.matched_units = self.matched_units.saturating_add(other.matched_units);
        self.total_code = self.total_code.saturating_add(other.total_code);
        self.matched_code = self.matched_code.saturating_add(other.matched_code);
        self.total_data = self.total_data.saturating_add(other.total_data);
        self.matched_data = self.matched_data.saturating_add(other.matched_data);
    }

    #[must_use]
    pub fn unit_percent(&self) -> f64 {
        percent(self.matched_units, self.total_units)
    }

    #[must_use]
    pub fn code_percent(&self) -> f64 {
        percent(self.matched_code, self.total_code)
    }

    #[must_use]
    pub fn data_percent(&self) -> f64 {
        percent(self.matched_data, self.total_data)
    }
}

#[allow(clippy::cast_precision_loss)]
fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

/// Measures of one named grouping (category or module).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupReport {
    pub id: String,
    pub name: String,
    pub measures: Measures,
}

/// Result of a progress run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressReport {
    pub version: String,
    pub overall: Measures,
    /// Declared categories first, in declaration order, then any other
    /// category ids sorted.
    pub categories: Vec<GroupReport>,
    /// Per module, main first. Empty unless requested.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<GroupReport>,
}

impl ProgressReport {
    #[must_use]
    pub fn category(&self, id: &str) -> Option<&Measures> {
        self.categories
            .iter()
            .find(|group| group.id == id)
            .map(|group| &group.measures)
    }

    #[must_use]
    pub fn module(&self, name: &str) -> Option<&Measures> {
        self.modules
            .iter()
            .find(|group| group.name == name)
            .map(|group| &group.measures)
    }

    /// Pretty JSON with a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json` error if serialisation fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        Ok(text)
    }
}

fn write_group(f: &mut fmt::Formatter<'_>, name: &str, m: &Measures) -> fmt::Result {
    writeln!(
        f,
        "  {name}: {:.2}% matched ({} / {} units)",
        m.unit_percent(),
        m.matched_units,
        m.total_units
    )?;
    writeln!(
        f,
        "    Code: {} / {} bytes ({:.2}%)",
        m.matched_code,
        m.total_code,
        m.code_percent()
    )?;
    writeln!(
        f,
        "    Data: {} / {} bytes ({:.2}%)",
        m.matched_data,
        m.total_data,
        m.data_percent()
    )
}

impl fmt::Display for ProgressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Progress ({}):", self.version)?;
        write_group(f, "All", &self.overall)?;
        for group in &self.categories {
            write_group(f, &group.name, &group.measures)?;
        }
        if !self.modules.is_empty() {
            writeln!(f, "Modules:")?;
            for group in &self.modules {
                write_group(f, &group.name, &group.measures)?;
            }
        }
        Ok(())
    }
}
