//! Error extraction: run a category's pattern over the whole input.

use serde::Serialize;
use tracing::debug;

use crate::category::{Category, Selection};
use crate::detect::detect;
use crate::patterns;
use crate::record::ErrorRecord;

/// Result of [`parse`]: which category was asked for, which one produced the
/// records, and the records themselves.
#[derive(Debug, Clone, Serialize)]
pub struct Parsed {
    /// Category chosen by the caller or by the detector.
    pub requested: Category,
    /// Category whose pattern produced `records` (differs after a fallback).
    pub used: Category,
    /// Records in textual order.
    pub records: Vec<ErrorRecord>,
}

/// Extract records from `text` using `category`'s pattern.
///
/// If a non-generic category yields nothing, the scan is repeated once with
/// the generic pattern. Never fails: unmatched input gives an empty vector.
pub fn extract(text: &str, category: Category) -> Vec<ErrorRecord> {
    extract_with_fallback(text, category).1
}

/// Resolve `selection` (running the detector for `Auto`) and extract.
pub fn parse(text: &str, selection: Selection) -> Parsed {
    let requested = match selection {
        Selection::Auto => detect(text),
        Selection::Forced(category) => category,
    };
    let (used, records) = extract_with_fallback(text, requested);
    Parsed {
        requested,
        used,
        records,
    }
}

fn extract_with_fallback(text: &str, category: Category) -> (Category, Vec<ErrorRecord>) {
    let records = scan(text, category);
    if !records.is_empty() || category == Category::Generic {
        return (category, records);
    }

    debug!(category = %category, "no records matched, retrying with generic pattern");
    (Category::Generic, scan(text, Category::Generic))
}

fn scan(text: &str, category: Category) -> Vec<ErrorRecord> {
    let Some(pattern) = patterns::pattern(category) else {
        return Vec::new();
    };
    let records: Vec<ErrorRecord> = pattern.records(text).collect();
    debug!(category = %category, count = records.len(), "extracted records");
    records
}
