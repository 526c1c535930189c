//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code MUST NOT call sleep methods. Animation timing
//! goes through the controller's interval-driven ticker; the demo's render
//! loop waits on a `tokio::time::interval` too.
//! **Exceptions**: test code (`#[cfg(test)]` modules and `tests/` directories
//! are not scanned).

use architectural_enforcement::scan;

const PRODUCTION_DIRS: &[&str] = &["animator/core/src", "animator/demo/src"];

fn is_sleep_call(code: &str) -> bool {
    code.contains("::sleep(") || code.contains(".sleep(")
}

/// Test that production code does not contain sleep() calls
#[test]
fn test_no_sleep_in_production_code() {
    let violations = scan(PRODUCTION_DIRS, is_sleep_call);

    if !violations.is_empty() {
        eprintln!("\n❌ CRITICAL: Sleep calls found in production code!\n");
        for violation in &violations {
            eprintln!("  ❌ {violation}");
        }
        eprintln!("\n✅ Use instead:");
        eprintln!("  - tokio::time::interval() for periodic work");
        eprintln!("  - channels / select! to wait for events");

        panic!(
            "\nFound {} sleep violation(s) in production code.\nFix these before merging!",
            violations.len()
        );
    }
}

#[test]
fn test_detector_matches_common_forms() {
    assert!(is_sleep_call("std::thread::sleep(d);"));
    assert!(is_sleep_call("tokio::time::sleep(d).await;"));
    assert!(is_sleep_call("runtime.sleep(d)"));
    assert!(!is_sleep_call("let sleepy = 1;"));
    assert!(!is_sleep_call("interval.tick().await"));
}
