// decomp-forge: decompilation build pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{ConfigError, ForgeError, ForgeResult, GraphError};

#[test]
fn test_unknown_version_display() {
    let err = ConfigError::UnknownVersion {
        version: "GXXP01".to_string(),
        known: vec!["GXXE01".to_string(), "NXXJ01".to_string()],
    };
    insta::assert_snapshot!(err.to_string(), @"unknown version 'GXXP01' (known versions: GXXE01, NXXJ01)");
}

#[test]
fn test_duplicate_output_display() {
    let err = GraphError::DuplicateOutputPath {
        path: "build/GXXE01/src/game/a.o".to_string(),
        first: "game/a.c".to_string(),
        second: "game/a.cpp".to_string(),
    };
    insta::assert_snapshot!(
        err.to_string(),
        @"units 'game/a.c' and 'game/a.cpp' both produce 'build/GXXE01/src/game/a.o'"
    );
}

#[test]
fn test_boxed_conversion_keeps_message() {
    let err: ForgeError = GraphError::MissingSource {
        path: "src/game/x.c".to_string(),
    }
    .into();
    assert_eq!(err.to_string(), "graph error: source file not found: src/game/x.c");
}

#[test]
fn test_forge_error_size() {
    let size = std::mem::size_of::<ForgeError>();
    assert!(size <= 24, "ForgeError is {size} bytes, expected <= 24");
}

#[test]
fn test_forge_result_size() {
    let size = std::mem::size_of::<ForgeResult<()>>();
    assert!(size <= 24, "ForgeResult<()> is {size} bytes, expected <= 24");
}
