//! Tests for signature similarity scoring.

use faultline::similarity;

#[test]
fn equal_strings_score_one() {
    assert_eq!(similarity("Cannot find foo", "Cannot find foo"), 1.0);
    assert_eq!(similarity("", ""), 1.0);
    assert_eq!(similarity("!!!", "!!!"), 1.0);
}

#[test]
fn one_empty_side_scores_zero() {
    assert_eq!(similarity("", "abc"), 0.0);
    assert_eq!(similarity("abc", ""), 0.0);
}

#[test]
fn jaccard_over_word_tokens() {
    assert_eq!(similarity("Cannot find foo", "Cannot find bar"), 0.5);
    assert_eq!(similarity("a b c d", "a b c e"), 0.6);
}

#[test]
fn tokens_are_case_folded_and_split_on_punctuation() {
    assert_eq!(similarity("Cannot-Find: FOO", "cannot find foo!"), 1.0);
    assert_eq!(similarity("snake_case value", "snake case value"), 0.25);
}

#[test]
fn very_different_lengths_score_zero() {
    // Shares a token, but the length gap exceeds half the longer string.
    assert_eq!(similarity("error", "error in a very long message here"), 0.0);
}

#[test]
fn no_tokens_scores_zero() {
    assert_eq!(similarity("!!!", "???"), 0.0);
}

#[test]
fn symmetric_and_bounded() {
    let samples = [
        "",
        "Cannot find foo",
        "cannot find bar baz",
        "[TS2304] Cannot find name '<name>'",
        "[TS2304] Cannot find name '<name>'.",
        "segfault at <hex>",
        "!!!",
    ];
    for a in samples {
        for b in samples {
            let ab = similarity(a, b);
            assert_eq!(ab, similarity(b, a), "{a:?} vs {b:?}");
            assert!((0.0..=1.0).contains(&ab), "{a:?} vs {b:?} gave {ab}");
        }
    }
}
