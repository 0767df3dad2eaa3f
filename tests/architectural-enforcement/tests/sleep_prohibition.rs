//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code MUST NOT call sleep to wait for things.
//! **Exceptions**: Frame rate limiting and the frame tick in the TUI app loop.
//!
//! The search core waits on the endpoint future and a oneshot channel; the
//! TUI polls once per frame. Neither should ever need to sleep.

use architectural_enforcement::{production_lines, rust_files, violation, CodeLine};

fn is_sleep(line: &CodeLine) -> bool {
    line.code.contains("::sleep(") || line.code.contains(".sleep(")
}

#[test]
fn test_no_sleep_in_core() {
    let violations: Vec<String> = rust_files("search/core/src")
        .iter()
        .flat_map(|path| {
            production_lines(path)
                .into_iter()
                .filter(is_sleep)
                .map(|line| violation(path, &line))
                .collect::<Vec<_>>()
        })
        .collect();

    assert!(
        violations.is_empty(),
        "sleep calls in search core:\n  {}",
        violations.join("\n  ")
    );
}

#[test]
fn test_tui_sleeps_only_in_frame_loop() {
    let violations: Vec<String> = rust_files("tui/src")
        .iter()
        .filter(|path| !path.ends_with("tui/src/app.rs"))
        .flat_map(|path| {
            production_lines(path)
                .into_iter()
                .filter(is_sleep)
                .map(|line| violation(path, &line))
                .collect::<Vec<_>>()
        })
        .collect();

    assert!(
        violations.is_empty(),
        "sleep calls outside the frame loop:\n  {}",
        violations.join("\n  ")
    );
}
