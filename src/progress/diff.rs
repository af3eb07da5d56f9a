// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Structural diff adapter.
//!
//! ```text
//! DiffRequest { unit, target: reference .o, base: built .o? }
//!        |
//!   StructuralDiff::diff ──► DiffSummary { code/data totals and matches }
//!        |
//!   ObjdiffCli: <objdiff> diff --format json -1 <target> [-2 <base>] -o - [report args]
//! ```
//!
//! The summary may be the measures object itself or wrap it in `"measures"`.
//! Counts are accepted as JSON numbers or decimal strings. At least one of
//! `total_code` and `total_data` must be present; absent counts are zero.

use std::path::PathBuf;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Deserializer};
use tokio_util::sync::CancellationToken;

use crate::error::{Result, ToolError};
use crate::toolchain::{ToolCommand, display_path};

/// One unit to compare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRequest {
    pub unit: String,
    /// Reference object from the original binary.
    pub target: PathBuf,
    /// Built object. `None` measures the reference alone.
    pub base: Option<PathBuf>,
}

/// Byte counts reported for one unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct DiffSummary {
    #[serde(default, deserialize_with = "count")]
    pub total_code: u64,
    #[serde(default, deserialize_with = "count")]
    pub matched_code: u64,
    #[serde(default, deserialize_with = "count")]
    pub total_data: u64,
    #[serde(default, deserialize_with = "count")]
    pub matched_data: u64,
}

impl DiffSummary {
    /// Every code and data byte matches.
    #[must_use]
    pub const fn is_full_match(&self) -> bool {
        self.matched_code >= self.total_code && self.matched_data >= self.total_data
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Count {
    Number(u64),
    Text(String),
}

fn count<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u64, D::Error> {
    match Count::deserialize(deserializer)? {
        Count::Number(n) => Ok(n),
        Count::Text(text) => text.parse().map_err(serde::de::Error::custom),
    }
}

/// Parse the JSON summary printed for `unit`.
///
/// # Errors
///
/// Returns `ToolError::InvalidDiffOutput` when the text is not a summary.
pub fn parse_summary(unit: &str, text: &str) -> std::result::Result<DiffSummary, ToolError> {
    let invalid = |message: String| ToolError::InvalidDiffOutput {
        unit: unit.to_string(),
        message,
    };
    let value: serde_json::Value =
        serde_json::from_str(text.trim()).map_err(|e| invalid(e.to_string()))?;
    if !value.is_object() {
        return Err(invalid("expected a JSON object".to_string()));
    }
    let measures = value.get("measures").unwrap_or(&value);
    if measures.get("total_code").is_none() && measures.get("total_data").is_none() {
        return Err(invalid("no total_code or total_data".to_string()));
    }
    DiffSummary::deserialize(measures).map_err(|e| invalid(e.to_string()))
}

/// Compares a reference object with a built one.
pub trait StructuralDiff: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the comparison cannot be made.
    fn diff<'a>(
        &'a self,
        request: &'a DiffRequest,
        token: CancellationToken,
    ) -> BoxFuture<'a, Result<DiffSummary>>;
}

/// [`StructuralDiff`] backed by the `objdiff-cli` executable.
#[derive(Debug, Clone)]
pub struct ObjdiffCli {
    command: ToolCommand,
    report_args: Vec<String>,
}

impl ObjdiffCli {
    #[must_use]
    pub const fn new(command: ToolCommand) -> Self {
        Self {
            command,
            report_args: Vec::new(),
        }
    }

    /// Extra arguments appended to every invocation.
    #[must_use]
    pub fn with_report_args(mut self, args: Vec<String>) -> Self {
        self.report_args = args;
        self
    }

    /// Arguments after the command prefix for `request`.
    #[must_use]
    pub fn arguments(&self, request: &DiffRequest) -> Vec<String> {
        let mut args = vec![
            "diff".to_string(),
            "--format".to_string(),
            "json".to_string(),
            "-1".to_string(),
            display_path(&request.target),
        ];
        if let Some(base) = &request.base {
            args.push("-2".to_string());
            args.push(display_path(base));
        }
        args.push("-o".to_string());
        args.push("-".to_string());
        args.extend(self.report_args.iter().cloned());
        args
    }
}

impl StructuralDiff for ObjdiffCli {
    fn diff<'a>(
        &'a self,
        request: &'a DiffRequest,
        token: CancellationToken,
    ) -> BoxFuture<'a, Result<DiffSummary>> {
        Box::pin(async move {
            let output = self
                .command
                .to_process()
                .args(self.arguments(request))
                .name(format!("objdiff {}", request.unit))
                .capture_output()
                .run_with_cancellation(token)
                .await?;
            if output.is_interrupted() {
                anyhow::bail!("diff of '{}' interrupted", request.unit);
            }
            Ok(parse_summary(&request.unit, output.stdout())?)
        })
    }
}
