//! Signature derivation: collapse an error message into a grouping key.
//!
//! Rules run in a fixed order; paths go before quoted spans because quoted
//! paths would otherwise be swallowed by the quote rule.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::record::ErrorRecord;

/// Replacement for absolute file paths.
pub const PATH_TOKEN: &str = "<path>";
/// Replacement for `line N` / `col N` / `:N:N` positions.
pub const LOC_TOKEN: &str = "<loc>";
/// Replacement for short quoted spans.
pub const NAME_TOKEN: &str = "'<name>'";
/// Replacement for hexadecimal literals.
pub const HEX_TOKEN: &str = "<hex>";
/// Replacement for integers of five or more digits.
pub const ID_TOKEN: &str = "<id>";

/// Bound on re-normalization passes; see [`normalize_message`].
const MAX_PASSES: usize = 4;

/// POSIX `/a/b` runs or Windows `C:\a\b` paths.
const PATH: &str = r#"(?:/[^\s/'"`:()\[\]{},;]+)+|[A-Za-z]:\\[^\s'"`:]+"#;

/// A path wrapped in `quote`. Segments may contain spaces but must not
/// start with one.
fn quoted_path(quote: char) -> String {
    format!(r"{quote}(?:(?:/[^{quote}\s/:][^{quote}\n/:]*)+|[A-Za-z]:\\[^{quote}\n]+){quote}")
}

static RULES: LazyLock<Vec<Rule>> = LazyLock::new(compile_rules);

struct Rule {
    regex: Regex,
    replacement: String,
}

/// `(regex, replacement)` pairs in application order.
fn rule_sources() -> Vec<(String, String)> {
    vec![
        (
            format!(
                r"(?P<pre>^|[\s(\[=,])(?:{}|{}|{}|(?:{PATH}))",
                quoted_path('\''),
                quoted_path('"'),
                quoted_path('`'),
            ),
            format!("${{pre}}{PATH_TOKEN}"),
        ),
        (
            r"(?i)\b(?:line|col|column)[ \t]*:?[ \t]*\d+".to_owned(),
            LOC_TOKEN.to_owned(),
        ),
        (r":\d+:\d+".to_owned(), format!(":{LOC_TOKEN}")),
        (
            r#"(?P<pre>^|\W)(?:'[^'\n]{1,50}'|"[^"\n]{1,50}"|`[^`\n]{1,50}`)"#.to_owned(),
            format!("${{pre}}{NAME_TOKEN}"),
        ),
        (r"\b0[xX][0-9a-fA-F]+\b".to_owned(), HEX_TOKEN.to_owned()),
        (r"\b\d{5,}\b".to_owned(), ID_TOKEN.to_owned()),
    ]
}

fn compile_rules() -> Vec<Rule> {
    rule_sources()
        .into_iter()
        .filter_map(|(source, replacement)| match Regex::new(&source) {
            Ok(regex) => Some(Rule { regex, replacement }),
            Err(e) => {
                warn!(error = %e, "failed to compile signature rule");
                None
            }
        })
        .collect()
}

fn normalize_once(message: &str) -> String {
    let mut normalized = message.to_owned();
    for rule in RULES.iter() {
        normalized = rule
            .regex
            .replace_all(&normalized, rule.replacement.as_str())
            .into_owned();
    }
    normalized.trim().to_owned()
}

/// Normalize a free-text message (every rule except the code prefix).
///
/// The result is a fixed point: normalizing it again returns it unchanged.
/// A single pass already is one for ordinary input; extra passes only matter
/// when shortening a number pulls a long quoted span under the length limit.
pub fn normalize_message(message: &str) -> String {
    let mut current = normalize_once(message);
    for _ in 1..MAX_PASSES {
        let next = normalize_once(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

/// Signature for a `(code, message)` pair.
pub fn signature_of(code: Option<&str>, message: &str) -> String {
    let normalized = normalize_message(message);
    match code.map(str::trim).filter(|c| !c.is_empty()) {
        Some(code) => format!("[{code}] {normalized}"),
        None => normalized,
    }
}

/// Grouping key for a record. Depends only on its code and message.
pub fn signature(record: &ErrorRecord) -> String {
    signature_of(record.code.as_deref(), &record.message)
}
