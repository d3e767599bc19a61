//! Tests for exact grouping and fuzzy merging.

use faultline::group::{merge_similar_groups, DEFAULT_TOP};
use faultline::{group, Category, ErrorRecord, Group, GroupOptions};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn record(message: &str, file: Option<&str>) -> ErrorRecord {
    let record = ErrorRecord::new(Category::Generic, message);
    match file {
        Some(f) => record.with_file(f),
        None => record,
    }
}

fn all() -> GroupOptions {
    GroupOptions { top: 0 }
}

fn counts(groups: &[Group]) -> Vec<usize> {
    groups.iter().map(|g| g.count).collect()
}

fn total(groups: &[Group]) -> usize {
    groups.iter().map(|g| g.count).sum()
}

// ---------------------------------------------------------------------------
// Exact grouping
// ---------------------------------------------------------------------------

#[test]
fn quoted_names_share_a_group() {
    let records = vec![
        ErrorRecord::new(Category::Typescript, "Cannot find name 'foo'").with_code("TS2304"),
        ErrorRecord::new(Category::Typescript, "Cannot find name 'bar'").with_code("TS2304"),
    ];
    let groups = group(&records, &GroupOptions::default());

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].count, 2);
    assert_eq!(groups[0].signature, "[TS2304] Cannot find name '<name>'");
}

#[test]
fn groups_sorted_by_count_descending() {
    let records: Vec<ErrorRecord> = ["B", "A", "A", "B", "A", "A", "B", "A"]
        .iter()
        .map(|name| record(&format!("{name} failed"), None))
        .collect();

    let groups = group(&records, &GroupOptions::default());
    assert_eq!(counts(&groups), vec![5, 3]);
    assert_eq!(groups[0].signature, "A failed");
    assert_eq!(groups[1].signature, "B failed");
}

#[test]
fn top_limits_group_count() {
    let mut records = Vec::new();
    for _ in 0..5 {
        for kind in 0..20 {
            records.push(record(&format!("failure kind {kind}"), None));
        }
    }
    assert_eq!(records.len(), 100);

    let groups = group(&records, &GroupOptions { top: 5 });
    assert_eq!(groups.len(), 5);
    assert_eq!(counts(&groups), vec![5; 5]);

    // Equal counts keep first-seen order.
    let signatures: Vec<&str> = groups.iter().map(|g| g.signature.as_str()).collect();
    assert_eq!(
        signatures,
        vec![
            "failure kind 0",
            "failure kind 1",
            "failure kind 2",
            "failure kind 3",
            "failure kind 4"
        ]
    );
}

#[test]
fn zero_top_keeps_everything_and_counts_add_up() {
    let records: Vec<ErrorRecord> = (0..37)
        .map(|i| record(&format!("problem {}", i % 13), None))
        .collect();
    let groups = group(&records, &all());
    assert_eq!(groups.len(), 13);
    assert_eq!(total(&groups), records.len());
}

#[test]
fn default_top_is_ten() {
    assert_eq!(GroupOptions::default().top, DEFAULT_TOP);
    assert_eq!(DEFAULT_TOP, 10);
    let records: Vec<ErrorRecord> = (0..15)
        .map(|i| record(&format!("distinct {i}"), None))
        .collect();
    assert_eq!(group(&records, &GroupOptions::default()).len(), 10);
}

#[test]
fn empty_input_gives_no_groups() {
    assert!(group(&[], &GroupOptions::default()).is_empty());
}

#[test]
fn files_are_unique_and_skip_absent() {
    let records = vec![
        record("boom", Some("a.rs")),
        record("boom", None),
        record("boom", Some("b.rs")),
        record("boom", Some("a.rs")),
    ];
    let groups = group(&records, &all());
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].count, 4);
    assert_eq!(groups[0].files, vec!["a.rs".to_owned(), "b.rs".to_owned()]);
    assert_eq!(groups[0].errors.len(), 4);
}

#[test]
fn representative_is_first_record_and_metadata_is_copied() {
    let first = ErrorRecord::new(Category::Eslint, "Unexpected console statement")
        .with_code("no-console")
        .with_severity("warning")
        .with_file("a.js")
        .with_location(Some(1), Some(1));
    let second = ErrorRecord::new(Category::Eslint, "Unexpected console statement")
        .with_code("no-console")
        .with_severity("error")
        .with_file("b.js");
    let groups = group(&[first.clone(), second.clone()], &all());

    let g = &groups[0];
    assert_eq!(g.representative, first);
    assert_eq!(g.errors, vec![first, second]);
    assert_eq!(g.code.as_deref(), Some("no-console"));
    assert_eq!(g.severity.as_deref(), Some("warning"));
    assert_eq!(g.kind, Category::Eslint);
}

// ---------------------------------------------------------------------------
// Fuzzy merging
// ---------------------------------------------------------------------------

#[test]
fn similar_groups_merge() {
    let records = vec![
        record("Cannot find foo", Some("a.ts")),
        record("Cannot find foo", Some("b.ts")),
        record("Cannot find bar", Some("c.ts")),
        record("Cannot find bar", Some("c.ts")),
        record("Cannot find bar", Some("a.ts")),
    ];
    let groups = group(&records, &all());
    assert_eq!(counts(&groups), vec![3, 2]);

    let merged = merge_similar_groups(groups, 0.5);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].count, 5);
    assert_eq!(merged[0].signature, "Cannot find bar");
    assert_eq!(
        merged[0].files,
        vec!["c.ts".to_owned(), "a.ts".to_owned(), "b.ts".to_owned()]
    );
    assert_eq!(merged[0].errors.len(), 5);
    assert_eq!(merged[0].errors[3].message, "Cannot find foo");
}

#[test]
fn dissimilar_groups_stay_apart() {
    let records = vec![
        record("Cannot find foo", None),
        record("Unexpected token in expression", None),
    ];
    let merged = merge_similar_groups(group(&records, &all()), 0.5);
    assert_eq!(merged.len(), 2);
}

#[test]
fn merge_is_single_pass_and_not_transitive() {
    let mut records = Vec::new();
    for _ in 0..3 {
        records.push(record("alpha beta gamma delta", None));
    }
    for _ in 0..2 {
        records.push(record("beta gamma delta epsilon", None));
    }
    records.push(record("gamma delta epsilon zeta", None));

    // alpha~beta and beta~zeta score 0.6, alpha~zeta only 1/3.
    let merged = merge_similar_groups(group(&records, &all()), 0.5);
    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].signature, "alpha beta gamma delta");
    assert_eq!(merged[0].count, 5);
    assert_eq!(merged[1].signature, "gamma delta epsilon zeta");
    assert_eq!(merged[1].count, 1);
}

#[test]
fn merged_groups_are_resorted() {
    let mut records = Vec::new();
    for _ in 0..4 {
        records.push(record("disk quota exceeded on volume", None));
    }
    for _ in 0..3 {
        records.push(record("Cannot find foo", None));
    }
    for _ in 0..2 {
        records.push(record("Cannot find bar", None));
    }
    let merged = merge_similar_groups(group(&records, &all()), 0.5);
    assert_eq!(counts(&merged), vec![5, 4]);
    assert_eq!(merged[0].signature, "Cannot find foo");
}

#[test]
fn merge_conserves_counts_for_any_threshold() {
    let records: Vec<ErrorRecord> = [
        "Cannot find foo",
        "Cannot find bar",
        "Cannot find foo",
        "type mismatch in call",
        "type mismatch in return",
        "",
        "segfault",
    ]
    .iter()
    .map(|m| record(m, None))
    .collect();

    for threshold in [0.0, 0.25, 0.5, 0.75, 1.0] {
        let groups = group(&records, &all());
        let before = total(&groups);
        let merged = merge_similar_groups(groups, threshold);
        assert_eq!(total(&merged), before, "threshold {threshold}");
        assert_eq!(total(&merged), records.len());
    }
}
