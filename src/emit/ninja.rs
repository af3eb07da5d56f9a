// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Minimal Ninja syntax writer.
//!
//! ```text
//! rule <name>
//!   command = ...
//! build <out> | <implicit out>: <rule> <in> | <implicit> || <order-only>
//!   <var> = <value>
//! ```
//!
//! Paths are escaped for `$`, space and `:`; variable values only for `$`.

use std::fmt::Write as _;
use std::path::Path;

use crate::toolchain::display_path;

/// One `rule` block.
#[derive(Debug, Clone, Default)]
pub struct Rule<'a> {
    pub name: &'a str,
    pub command: &'a str,
    pub description: Option<&'a str>,
    pub depfile: Option<&'a str>,
    pub deps: Option<&'a str>,
    pub rspfile: Option<&'a str>,
    pub rspfile_content: Option<&'a str>,
    pub generator: bool,
}

/// One `build` statement.
#[derive(Debug, Clone, Default)]
pub struct Build<'a> {
    pub outputs: Vec<&'a Path>,
    pub implicit_outputs: Vec<&'a Path>,
    pub rule: &'a str,
    pub inputs: Vec<&'a Path>,
    pub implicit: Vec<&'a Path>,
    pub order_only: Vec<&'a Path>,
    pub variables: Vec<(&'a str, String)>,
}

/// Accumulates a Ninja file in memory.
#[derive(Debug, Default)]
pub struct NinjaWriter {
    out: String,
}

impl NinjaWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn comment(&mut self, text: &str) {
        for line in text.lines() {
            let _ = writeln!(self.out, "# {line}");
        }
    }

    pub fn newline(&mut self) {
        self.out.push('\n');
    }

    pub fn variable(&mut self, key: &str, value: &str) {
        let _ = writeln!(self.out, "{key} = {}", escape(value));
    }

    pub fn rule(&mut self, rule: &Rule<'_>) {
        let _ = writeln!(self.out, "rule {}", rule.name);
        self.indented("command", Some(rule.command));
        self.indented("description", rule.description);
        self.indented("depfile", rule.depfile);
        self.indented("deps", rule.deps);
        self.indented("rspfile", rule.rspfile);
        self.indented("rspfile_content", rule.rspfile_content);
        if rule.generator {
            self.indented("generator", Some("1"));
        }
    }

    pub fn build(&mut self, build: &Build<'_>) {
        let mut line = String::from("build");
        push_paths(&mut line, &build.outputs);
        if !build.implicit_outputs.is_empty() {
            line.push_str(" |");
            push_paths(&mut line, &build.implicit_outputs);
        }
        line.push_str(": ");
        line.push_str(build.rule);
        push_paths(&mut line, &build.inputs);
        if !build.implicit.is_empty() {
            line.push_str(" |");
            push_paths(&mut line, &build.implicit);
        }
        if !build.order_only.is_empty() {
            line.push_str(" ||");
            push_paths(&mut line, &build.order_only);
        }
        self.out.push_str(&line);
        self.out.push('\n');
        for (key, value) in &build.variables {
            let _ = writeln!(self.out, "  {key} = {}", escape(value));
        }
    }

    pub fn default_targets(&mut self, targets: &[&Path]) {
        let mut line = String::from("default");
        push_paths(&mut line, targets);
        self.out.push_str(&line);
        self.out.push('\n');
    }

    #[must_use]
    pub fn finish(self) -> String {
        self.out
    }

    // Rule bodies reference `$in`, `$out` and per-build variables: unescaped.
    fn indented(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value {
            let _ = writeln!(self.out, "  {key} = {value}");
        }
    }
}

fn push_paths(line: &mut String, paths: &[&Path]) {
    for path in paths {
        line.push(' ');
        line.push_str(&escape_path(&display_path(path)));
    }
}

/// Escape a variable value.
#[must_use]
pub fn escape(value: &str) -> String {
    value.replace('$', "$$")
}

/// Escape a path in a `build` or `default` line.
#[must_use]
pub fn escape_path(path: &str) -> String {
    path.replace('$', "$$")
        .replace(' ', "$ ")
        .replace(':', "$:")
}
