//! Aggregate statistics over a parsed record set.
//!
//! Counts are taken over every record, not just the groups that survived a
//! `top` cut, so they describe the whole input.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::group::Group;
use crate::record::ErrorRecord;

/// Severity assumed for records that carry none.
pub const DEFAULT_SEVERITY: &str = "error";

/// Summary of a record set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    /// Number of records.
    pub total_errors: usize,
    /// Number of groups handed in.
    pub unique_patterns: usize,
    /// Distinct non-empty files across all records.
    pub files_affected: usize,
    /// Record count per category name.
    pub by_type: BTreeMap<String, usize>,
    /// Record count per severity, absent severities counted as "error".
    pub by_severity: BTreeMap<String, usize>,
    /// Most frequent code; ties go to the code seen first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_code: Option<String>,
}

/// Compute statistics for `groups` built from `records`.
pub fn stats(groups: &[Group], records: &[ErrorRecord]) -> Stats {
    let mut files: HashSet<&str> = HashSet::new();
    let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_severity: BTreeMap<String, usize> = BTreeMap::new();
    // Insertion-ordered so that ties resolve to the first code seen.
    let mut codes: Vec<(&str, usize)> = Vec::new();

    for record in records {
        if let Some(file) = record.file.as_deref().filter(|f| !f.is_empty()) {
            files.insert(file);
        }

        bump(&mut by_type, record.kind.as_str());
        bump(
            &mut by_severity,
            record.severity.as_deref().unwrap_or(DEFAULT_SEVERITY),
        );

        if let Some(code) = record.code.as_deref() {
            match codes.iter_mut().find(|(c, _)| *c == code) {
                Some((_, n)) => *n = n.saturating_add(1),
                None => codes.push((code, 1)),
            }
        }
    }

    let mut top_code: Option<(&str, usize)> = None;
    for &(code, n) in &codes {
        if top_code.map_or(true, |(_, best)| n > best) {
            top_code = Some((code, n));
        }
    }

    Stats {
        total_errors: records.len(),
        unique_patterns: groups.len(),
        files_affected: files.len(),
        by_type,
        by_severity,
        top_code: top_code.map(|(code, _)| code.to_owned()),
    }
}

fn bump(table: &mut BTreeMap<String, usize>, key: &str) {
    let slot = table.entry(key.to_owned()).or_insert(0);
    *slot = slot.saturating_add(1);
}
