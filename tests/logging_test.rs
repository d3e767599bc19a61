//! Tests for `src/logging.rs`.

use faultline::logging::{default_directive, init_cli, DEFAULT_FILTER, VERBOSE_FILTER};

#[test]
fn verbosity_picks_the_directive() {
    assert_eq!(default_directive(false), DEFAULT_FILTER);
    assert_eq!(default_directive(true), VERBOSE_FILTER);
}

#[test]
fn init_cli_tolerates_repeat_calls() {
    // Only the first call installs a subscriber; the rest must not panic.
    init_cli(false, false);
    init_cli(true, true);
}
