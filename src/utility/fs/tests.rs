// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::walk::{WalkOptions, find_files};
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn touch(root: &TempDir, rel: &str) {
    let path = root.path().join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, "").unwrap();
}

#[test]
fn test_find_files_relative_and_sorted() {
    let temp = temp_dir();
    touch(&temp, "game/b.cpp");
    touch(&temp, "game/a.c");
    touch(&temp, "dolphin/os/OS.c");
    touch(&temp, "notes.txt");

    let found = find_files(temp.path(), "**/*.{c,cpp}", &WalkOptions::default()).unwrap();
    assert_eq!(found, ["dolphin/os/OS.c", "game/a.c", "game/b.cpp"]);
}

#[test]
fn test_find_files_skips_dirs() {
    let temp = temp_dir();
    touch(&temp, "build/GXXE01/src/game/a.c");
    touch(&temp, "game/a.c");

    let found = find_files(temp.path(), "**/*.c", &WalkOptions::for_source_tree()).unwrap();
    assert_eq!(found, ["game/a.c"]);
}

#[test]
fn test_find_files_respects_gitignore() {
    let temp = temp_dir();
    std::fs::write(temp.path().join(".gitignore"), "vendor/\n").unwrap();
    touch(&temp, "vendor/zlib.c");
    touch(&temp, "game/a.c");

    let found = find_files(temp.path(), "**/*.c", &WalkOptions::default()).unwrap();
    assert_eq!(found, ["game/a.c"]);
}

#[test]
fn test_find_files_max_depth() {
    let temp = temp_dir();
    touch(&temp, "top.c");
    touch(&temp, "deep/nested/x.c");

    let options = WalkOptions::builder().with_max_depth(1).build();
    let found = find_files(temp.path(), "**/*.c", &options).unwrap();
    assert_eq!(found, ["top.c"]);
}

#[test]
fn test_find_files_missing_root() {
    let temp = temp_dir();
    let result = find_files(temp.path().join("absent"), "**/*", &WalkOptions::default());
    assert!(result.is_err());
}

#[test]
fn test_find_files_invalid_glob() {
    let temp = temp_dir();
    let result = find_files(temp.path(), "**/{a", &WalkOptions::default());
    assert!(result.is_err());
}
