//! Category auto-detection.
//!
//! Probes run in a fixed order and the first hit wins. Each probe is a loose
//! structural cue rather than a grammar: a wrong guess only costs grouping
//! quality, and the extractor still falls back to `generic` on a miss.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::category::Category;

static PROBES: LazyLock<Vec<(Category, Regex)>> = LazyLock::new(compile_probes);

/// Probe sources, in detection order. `generic` has no probe: it is the
/// terminal case.
const PROBE_SOURCES: [(Category, &str); 7] = [
    (Category::Typescript, r"error TS\d+:"),
    (
        Category::Eslint,
        r"(?m)^[ \t]*(?:[^\s:][^:\n]*:)?\d+:\d+[ \t]+(?:error|warning)[ \t]+",
    ),
    (Category::Jest, r"(?m)^[ \t]*(?:FAIL[ \t]|●[ \t]|✕[ \t])"),
    (
        Category::Python,
        r#"Traceback \(most recent call last\)|File "[^"\n]+", line \d+"#,
    ),
    (Category::Rust, r"error\[E\d{4}\]:"),
    (Category::Go, r"(?m)\.go:\d+:\d+:"),
    (
        Category::Gcc,
        r"(?m)\.(?:c|h|cc|cp|cpp|cxx|c\+\+|hpp|hh|hxx|h\+\+|m|mm):\d+:\d+:[ \t]*(?:fatal[ \t]+)?(?:error|warning):",
    ),
];

fn compile_probes() -> Vec<(Category, Regex)> {
    PROBE_SOURCES
        .iter()
        .filter_map(|(category, source)| match Regex::new(source) {
            Ok(regex) => Some((*category, regex)),
            Err(e) => {
                warn!(category = %category, error = %e, "failed to compile detection probe");
                None
            }
        })
        .collect()
}

/// Pick the category whose probe first matches `text`, or `Generic`.
pub fn detect(text: &str) -> Category {
    let detected = PROBES
        .iter()
        .find(|(_, probe)| probe.is_match(text))
        .map_or(Category::Generic, |(category, _)| *category);
    debug!(category = %detected, "detected input category");
    detected
}
