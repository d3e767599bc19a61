//! Token-overlap similarity between signatures.

use std::collections::HashSet;

/// Jaccard similarity of the case-folded word-token sets of `a` and `b`.
///
/// Returns exactly 1.0 for equal strings (two empty strings included) and
/// exactly 0.0 when only one side is empty. Strings whose lengths differ by
/// more than half of the longer length score 0.0 without tokenizing.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let len_a = a.chars().count();
    let len_b = b.chars().count();
    let longer = len_a.max(len_b);
    let diff = len_a.abs_diff(len_b);
    if diff.saturating_mul(2) > longer {
        return 0.0;
    }

    let tokens_a = tokens(a);
    let tokens_b = tokens(b);
    let union = tokens_a.union(&tokens_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = tokens_a.intersection(&tokens_b).count();

    #[allow(clippy::cast_precision_loss)]
    let score = intersection as f64 / union as f64;
    score
}

/// Unique lowercase tokens, split on anything that is not a word character.
fn tokens(text: &str) -> HashSet<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}
