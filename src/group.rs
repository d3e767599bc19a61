//! Exact grouping by signature and greedy fuzzy merging of groups.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::category::Category;
use crate::record::ErrorRecord;
use crate::signature::signature;
use crate::similarity::similarity;

/// Default number of groups kept by [`group`].
pub const DEFAULT_TOP: usize = 10;

/// Records that share a signature (or were merged by similarity).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Grouping key.
    pub signature: String,
    /// Number of member records.
    pub count: usize,
    /// Member records in first-seen order.
    pub errors: Vec<ErrorRecord>,
    /// Distinct non-empty files among members, in first-seen order.
    pub files: Vec<String>,
    /// First record seen for this signature.
    pub representative: ErrorRecord,
    /// Code copied from the representative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Category copied from the representative.
    #[serde(rename = "type")]
    pub kind: Category,
    /// Severity copied from the representative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
}

impl Group {
    /// Start a group from its first record.
    pub fn new(signature: String, record: ErrorRecord) -> Self {
        let mut group = Self {
            signature,
            count: 0,
            errors: Vec::new(),
            files: Vec::new(),
            code: record.code.clone(),
            kind: record.kind,
            severity: record.severity.clone(),
            representative: record.clone(),
        };
        group.push(record);
        group
    }

    /// Add a member record.
    pub fn push(&mut self, record: ErrorRecord) {
        self.count = self.count.saturating_add(1);
        if let Some(file) = record.file.as_deref() {
            self.track_file(file);
        }
        self.errors.push(record);
    }

    /// Fold `other` into this group. Representative and metadata stay put.
    pub fn absorb(&mut self, other: Group) {
        self.count = self.count.saturating_add(other.count);
        for file in &other.files {
            self.track_file(file);
        }
        self.errors.extend(other.errors);
    }

    fn track_file(&mut self, file: &str) {
        if !file.is_empty() && !self.files.iter().any(|f| f == file) {
            self.files.push(file.to_owned());
        }
    }
}

/// Options for [`group`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupOptions {
    /// Keep at most this many groups; 0 keeps all.
    pub top: usize,
}

impl Default for GroupOptions {
    fn default() -> Self {
        Self { top: DEFAULT_TOP }
    }
}

/// Group records by exact signature.
///
/// Groups come back sorted by count, highest first; equal counts keep the
/// order in which their signatures were first seen.
pub fn group(records: &[ErrorRecord], options: &GroupOptions) -> Vec<Group> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for record in records {
        let key = signature(record);
        if let Some(&i) = index.get(&key) {
            if let Some(existing) = groups.get_mut(i) {
                existing.push(record.clone());
            }
        } else {
            index.insert(key.clone(), groups.len());
            groups.push(Group::new(key, record.clone()));
        }
    }

    sort_by_count(&mut groups);
    truncate_top(&mut groups, options.top);
    debug!(
        records = records.len(),
        groups = groups.len(),
        "grouped records by signature"
    );
    groups
}

/// Merge groups whose signatures are at least `threshold` similar.
///
/// One greedy pass in input order: each surviving group absorbs every later
/// group that scores against its own signature. Absorbed groups never become
/// anchors, so similarity is not chained transitively.
pub fn merge_similar_groups(groups: Vec<Group>, threshold: f64) -> Vec<Group> {
    let before = groups.len();
    let mut pending: VecDeque<Group> = groups.into();
    let mut merged = Vec::with_capacity(pending.len());

    while let Some(mut anchor) = pending.pop_front() {
        let mut rest = VecDeque::with_capacity(pending.len());
        for candidate in pending.drain(..) {
            if similarity(&anchor.signature, &candidate.signature) >= threshold {
                anchor.absorb(candidate);
            } else {
                rest.push_back(candidate);
            }
        }
        pending = rest;
        merged.push(anchor);
    }

    sort_by_count(&mut merged);
    debug!(
        before,
        after = merged.len(),
        threshold,
        "merged similar groups"
    );
    merged
}

/// Keep the first `top` groups; 0 means no limit.
pub fn truncate_top(groups: &mut Vec<Group>, top: usize) {
    if top > 0 {
        groups.truncate(top);
    }
}

/// Stable sort, highest count first.
fn sort_by_count(groups: &mut [Group]) {
    groups.sort_by(|a, b| b.count.cmp(&a.count));
}
