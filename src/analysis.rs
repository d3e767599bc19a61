//! End-to-end pipeline: parse, group, optionally merge, summarize.

use serde::Serialize;
use tracing::info;

use crate::category::{Category, Selection};
use crate::extract::parse;
use crate::group::{group, merge_similar_groups, truncate_top, Group, GroupOptions, DEFAULT_TOP};
use crate::stats::{stats, Stats};

/// Inputs for [`analyze`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisOptions {
    /// Forced category or auto-detection.
    pub selection: Selection,
    /// Groups to keep after sorting; 0 keeps all.
    pub top: usize,
    /// Similarity threshold for fuzzy merging; `None` keeps exact groups.
    pub fuzzy: Option<f64>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            selection: Selection::Auto,
            top: DEFAULT_TOP,
            fuzzy: None,
        }
    }
}

/// Output of [`analyze`].
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    /// Category whose pattern produced the records.
    pub category: Category,
    /// Groups, highest count first, cut to `top`.
    pub groups: Vec<Group>,
    /// Statistics over every record and every group before the cut.
    pub stats: Stats,
}

/// Run the whole pipeline over `text`.
///
/// The `top` cut is applied last so that merging sees every group and
/// `unique_patterns` counts all of them.
pub fn analyze(text: &str, options: &AnalysisOptions) -> Analysis {
    let parsed = parse(text, options.selection);
    let mut groups = group(&parsed.records, &GroupOptions { top: 0 });
    if let Some(threshold) = options.fuzzy {
        groups = merge_similar_groups(groups, threshold);
    }

    let summary = stats(&groups, &parsed.records);
    truncate_top(&mut groups, options.top);

    info!(
        category = %parsed.used,
        records = summary.total_errors,
        patterns = summary.unique_patterns,
        "analysis complete"
    );

    Analysis {
        category: parsed.used,
        groups,
        stats: summary,
    }
}
