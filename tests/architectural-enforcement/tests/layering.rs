//! Integration Test: Core/Surface Layering
//!
//! **Policy**: `neurosearch-core` is headless. It must not depend on or import
//! any terminal UI crate, and library code propagates errors instead of
//! panicking.

use std::fs;

use architectural_enforcement::{production_lines, rust_files, violation, workspace_root};

const UI_CRATES: &[&str] = &["ratatui", "crossterm", "textwrap"];

#[test]
fn test_core_manifest_has_no_ui_dependencies() {
    let manifest = fs::read_to_string(workspace_root().join("search/core/Cargo.toml"))
        .expect("core manifest should exist");

    for krate in UI_CRATES {
        assert!(
            !manifest
                .lines()
                .any(|l| l.trim_start().starts_with(&format!("{krate} "))
                    || l.trim_start().starts_with(&format!("{krate}="))),
            "search/core must not depend on {krate}"
        );
    }
}

#[test]
fn test_core_sources_do_not_import_ui_crates() {
    let mut violations = Vec::new();
    for path in rust_files("search/core/src") {
        for line in production_lines(&path) {
            if UI_CRATES
                .iter()
                .any(|k| line.code.contains(&format!("{k}::")))
            {
                violations.push(violation(&path, &line));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "UI imports in search core:\n  {}",
        violations.join("\n  ")
    );
}

#[test]
fn test_no_unwrap_in_library_code() {
    let mut violations = Vec::new();
    for dir in ["search/core/src", "tui/src"] {
        for path in rust_files(dir) {
            for line in production_lines(&path) {
                if line.code.contains(".unwrap()") || line.code.contains(".expect(") {
                    violations.push(violation(&path, &line));
                }
            }
        }
    }

    assert!(
        violations.is_empty(),
        "unwrap/expect in library code:\n  {}",
        violations.join("\n  ")
    );
}
