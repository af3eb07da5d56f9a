// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Parallel source tree traversal.
//!
//! ```text
//! find_files(root, glob, opts)
//!        |
//!        v
//!   ignore::WalkParallel --(flume)--> collector thread
//!        |                               |
//!   filter_entry(skip_dirs)          sort + dedup
//!                                        |
//!                                        v
//!                               Vec<relative path>
//! ```

use crate::error::Result;
use bon::Builder;
use flume::bounded;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::warn;
use wax::{Glob, Program};

/// Options for parallel directory traversal.
#[derive(Debug, Clone, Builder)]
pub struct WalkOptions {
    /// Maximum depth to traverse (None = unlimited)
    #[builder(setters(name = with_max_depth))]
    max_depth: Option<usize>,
    /// Include hidden files/directories
    #[builder(setters(name = with_include_hidden), default = false)]
    include_hidden: bool,
    /// Respect .gitignore files
    #[builder(setters(name = with_respect_gitignore), default = true)]
    respect_gitignore: bool,
    /// Skip directories with these exact names
    #[builder(setters(name = with_skip_dirs), default)]
    skip_dirs: Vec<String>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl WalkOptions {
    #[must_use]
    pub const fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    #[must_use]
    pub const fn include_hidden(&self) -> bool {
        self.include_hidden
    }

    #[must_use]
    pub const fn respect_gitignore(&self) -> bool {
        self.respect_gitignore
    }

    #[must_use]
    pub fn skip_dirs(&self) -> &[String] {
        &self.skip_dirs
    }

    /// Options for scanning a decompilation source tree.
    ///
    /// Generated and scratch directories are skipped; `.gitignore` is
    /// honoured so that vendored or generated sources can be excluded there.
    #[must_use]
    pub fn for_source_tree() -> Self {
        Self::builder()
            .with_skip_dirs(vec![
                ".git".to_string(),
                "build".to_string(),
                "__pycache__".to_string(),
            ])
            .build()
    }
}

/// Builds a `WalkBuilder` with the given options, using `filter_entry` for directory skipping.
fn build_walker(root: &Path, options: &WalkOptions) -> WalkBuilder {
    let mut builder = WalkBuilder::new(root);

    if let Some(depth) = options.max_depth() {
        builder.max_depth(Some(depth));
    }

    builder.hidden(!options.include_hidden());

    // Outside a git checkout `git_ignore` alone would not apply .gitignore files.
    builder.require_git(false);
    builder.git_ignore(options.respect_gitignore());
    builder.git_global(options.respect_gitignore());
    builder.git_exclude(options.respect_gitignore());

    if !options.skip_dirs().is_empty() {
        let skip_dirs: Arc<Vec<String>> = Arc::new(options.skip_dirs().to_vec());
        builder.filter_entry(move |entry| {
            !(entry.file_type().is_some_and(|ft| ft.is_dir())
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| skip_dirs.iter().any(|skip| skip == name)))
        });
    }

    builder
}

/// Finds files under `root` whose root-relative path matches `pattern`.
///
/// Paths are returned relative to `root`, with `/` separators, sorted so that
/// callers can report them deterministically.
///
/// # Errors
///
/// Returns an error if:
/// - The root directory does not exist.
/// - The glob pattern is invalid.
///
/// # Example
/// ```no_run
/// use decomp_forge::utility::fs::walk::{find_files, WalkOptions};
///
/// let sources = find_files("src", "**/*.{c,cpp}", &WalkOptions::for_source_tree())?;
/// for source in sources {
///     println!("{source}");
/// }
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn find_files<P: AsRef<Path>>(
    root: P,
    pattern: &str,
    options: &WalkOptions,
) -> Result<Vec<String>> {
    let root = root.as_ref();

    if !root.exists() {
        anyhow::bail!("root directory does not exist: {}", root.display());
    }

    let glob =
        Glob::new(pattern).map_err(|e| anyhow::anyhow!("invalid glob pattern '{pattern}': {e}"))?;

    // Bounded so a huge tree cannot outrun the collector.
    let (tx, rx) = bounded::<PathBuf>(1000);
    let glob = Arc::new(glob);
    let root_path = root.to_path_buf();
    let error_count = Arc::new(AtomicUsize::new(0));

    let mut files = std::thread::scope(|scope| {
        let collector = scope.spawn(move || {
            rx.iter()
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .collect::<Vec<String>>()
        });

        build_walker(root, options).build_parallel().run(|| {
            let tx = tx.clone();
            let glob = Arc::clone(&glob);
            let root_path = root_path.clone();
            let error_count = Arc::clone(&error_count);

            Box::new(move |entry_result| {
                match entry_result {
                    Ok(entry) => {
                        if entry.file_type().is_some_and(|ft| ft.is_file())
                            && let Ok(rel_path) = entry.path().strip_prefix(&root_path)
                            && glob.is_match(rel_path)
                        {
                            // The collector outlives every walker thread.
                            let _ = tx.send(rel_path.to_path_buf());
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "walk error");
                        error_count.fetch_add(1, Ordering::Relaxed);
                    }
                }
                ignore::WalkState::Continue
            })
        });
        drop(tx);

        collector.join().unwrap_or_default()
    });

    let errors = error_count.load(Ordering::Relaxed);
    if errors > 0 {
        warn!(root = %root.display(), errors, "some entries could not be read");
    }

    files.sort();
    files.dedup();
    Ok(files)
}
