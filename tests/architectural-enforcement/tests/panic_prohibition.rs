//! Integration Test: Panic Prohibition in the Core Library
//!
//! **Policy**: After construction every controller operation is total, so the
//! core library's production code MUST NOT call `unwrap()` or `expect()`.
//! Errors are returned (construction, config) or degraded to a fallback.
//! **Exceptions**: test code and doc examples (comments are not scanned).

use architectural_enforcement::scan;

const CORE_DIRS: &[&str] = &["animator/core/src"];

fn is_panicking_call(code: &str) -> bool {
    code.contains(".unwrap()") || code.contains(".expect(")
}

#[test]
fn test_no_unwrap_or_expect_in_core() {
    let violations = scan(CORE_DIRS, is_panicking_call);

    if !violations.is_empty() {
        eprintln!("\n❌ unwrap()/expect() found in core production code!\n");
        for violation in &violations {
            eprintln!("  ❌ {violation}");
        }
        panic!(
            "\nFound {} panicking call(s) in core production code.",
            violations.len()
        );
    }
}

#[test]
fn test_detector_ignores_fallible_combinators() {
    assert!(is_panicking_call("let x = y.unwrap();"));
    assert!(is_panicking_call("let x = y.expect(\"boom\");"));
    assert!(!is_panicking_call("let x = y.unwrap_or(0);"));
    assert!(!is_panicking_call("let x = y.unwrap_or_else(|| 0);"));
    assert!(!is_panicking_call("let x = y.unwrap_or_default();"));
}
