//! Pattern registry: one regex-backed matching rule per category.
//!
//! Each [`Pattern`] pairs a compiled regex with the extraction rule for its
//! category. Patterns are compiled once per process into a [`Registry`] and
//! never mutated afterwards; scanning state lives only in the [`Records`]
//! iterator handed out per call.

use std::sync::LazyLock;

use regex::{CaptureMatches, Captures, Regex};
use tracing::{debug, warn};

use crate::category::Category;
use crate::record::ErrorRecord;

/// Message used for `FAIL <file>` lines that carry no test name.
pub const SUITE_FAILED_MESSAGE: &str = "test suite failed";

/// Default file for formats where the file prefix is optional.
pub const UNKNOWN_FILE: &str = "unknown";

static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::compile);

/// A structural match that could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedMatch {
    /// A numeric capture did not parse as a positive integer.
    #[error("capture '{field}' is not a positive integer: {value:?}")]
    Number {
        /// Capture group name.
        field: &'static str,
        /// Captured text.
        value: String,
    },
    /// A capture the extraction rule requires was empty.
    #[error("required capture '{0}' is missing")]
    Missing(&'static str),
}

/// Matching rule plus extraction rule for one category.
#[derive(Debug)]
pub struct Pattern {
    category: Category,
    regex: Regex,
}

impl Pattern {
    /// Compile the built-in pattern for `category`.
    ///
    /// # Errors
    ///
    /// Returns the regex compile error. Built-in sources are static, so this
    /// only fails if a source table entry is broken.
    pub fn compile(category: Category) -> Result<Self, regex::Error> {
        Ok(Self {
            category,
            regex: Regex::new(source(category))?,
        })
    }

    /// Category this pattern extracts.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Lazily scan `text`, yielding one record per well-formed match.
    ///
    /// Matches are non-overlapping and in left-to-right order. Calling this
    /// again restarts the scan from the beginning.
    pub fn records<'p, 't>(&'p self, text: &'t str) -> Records<'p, 't> {
        Records {
            pattern: self,
            captures: self.regex.captures_iter(text),
        }
    }

    /// Apply the extraction rule to one match.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedMatch`] when a captured field cannot be converted.
    pub fn build(&self, caps: &Captures<'_>) -> Result<ErrorRecord, MalformedMatch> {
        let whole = caps.get(0).ok_or(MalformedMatch::Missing("match"))?;
        let mut record = ErrorRecord::new(self.category, String::new());
        record.raw = whole.as_str().to_owned();
        record.position = whole.start();

        match self.category {
            Category::Typescript => {
                // `file(line,col)` and `file:line:col -` layouts use separate groups.
                let (file, line, col, code, msg) = if caps.name("paren_file").is_some() {
                    ("paren_file", "paren_line", "paren_col", "paren_code", "paren_msg")
                } else {
                    ("dash_file", "dash_line", "dash_col", "dash_code", "dash_msg")
                };
                record.file = Some(required(caps, file)?.to_owned());
                record.line = number(caps, line)?;
                record.column = number(caps, col)?;
                record.code = text(caps, code).map(str::to_owned);
                record.message = required(caps, msg)?.to_owned();
            }
            Category::Eslint => {
                record.file = Some(text(caps, "file").unwrap_or(UNKNOWN_FILE).to_owned());
                record.line = number(caps, "line")?;
                record.column = number(caps, "col")?;
                record.severity = text(caps, "severity").map(str::to_owned);
                record.message = required(caps, "msg")?.to_owned();
                record.code = text(caps, "rule").map(str::to_owned);
            }
            Category::Jest => {
                if let Some(file) = text(caps, "file") {
                    record.file = Some(file.to_owned());
                    record.message = text(caps, "suite_test")
                        .unwrap_or(SUITE_FAILED_MESSAGE)
                        .to_owned();
                } else if let Some(test) = text(caps, "sub") {
                    record.file = Some(required(caps, "head")?.to_owned());
                    record.message = test.to_owned();
                } else {
                    record.message = required(caps, "head")?.to_owned();
                }
            }
            Category::Python => {
                record.file = Some(text(caps, "file").unwrap_or(UNKNOWN_FILE).to_owned());
                record.line = number(caps, "line")?;
                record.function = text(caps, "func").map(str::to_owned);
                let class = required(caps, "exc")?;
                record.code = Some(class.to_owned());
                record.message = text(caps, "msg").unwrap_or(class).to_owned();
            }
            Category::Rust => {
                record.severity = text(caps, "severity").map(str::to_owned);
                record.code = text(caps, "code").map(str::to_owned);
                record.message = required(caps, "msg")?.to_owned();
                record.file = Some(required(caps, "file")?.to_owned());
                record.line = number(caps, "line")?;
                record.column = number(caps, "col")?;
            }
            Category::Go => {
                record.file = Some(required(caps, "file")?.to_owned());
                record.line = number(caps, "line")?;
                record.column = number(caps, "col")?;
                record.message = required(caps, "msg")?.to_owned();
            }
            Category::Gcc => {
                record.file = Some(required(caps, "file")?.to_owned());
                record.line = number(caps, "line")?;
                record.column = number(caps, "col")?;
                record.severity = text(caps, "severity").map(str::to_owned);
                record.message = required(caps, "msg")?.to_owned();
            }
            Category::Generic => {
                let marker = text(caps, "bracketed")
                    .or_else(|| text(caps, "bare"))
                    .ok_or(MalformedMatch::Missing("marker"))?;
                record.severity = Some(marker.to_lowercase());
                record.message = required(caps, "msg")?.to_owned();
            }
        }

        Ok(record)
    }
}

/// Lazy scan over one input, produced by [`Pattern::records`].
pub struct Records<'p, 't> {
    pattern: &'p Pattern,
    captures: CaptureMatches<'p, 't>,
}

impl Iterator for Records<'_, '_> {
    type Item = ErrorRecord;

    fn next(&mut self) -> Option<Self::Item> {
        for caps in self.captures.by_ref() {
            match self.pattern.build(&caps) {
                Ok(record) => return Some(record),
                Err(e) => {
                    debug!(
                        category = %self.pattern.category,
                        error = %e,
                        "skipping malformed match"
                    );
                }
            }
        }
        None
    }
}

/// Compiled patterns for every category.
#[derive(Debug)]
pub struct Registry {
    patterns: Vec<Pattern>,
}

impl Registry {
    /// Compile every built-in pattern. Broken entries are logged and left out.
    pub fn compile() -> Self {
        let patterns = Category::ALL
            .into_iter()
            .filter_map(|category| match Pattern::compile(category) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!(category = %category, error = %e, "failed to compile pattern");
                    None
                }
            })
            .collect();
        Self { patterns }
    }

    /// Process-wide registry, compiled on first use.
    pub fn global() -> &'static Self {
        &REGISTRY
    }

    /// Pattern registered for `category`.
    pub fn get(&self, category: Category) -> Option<&Pattern> {
        self.patterns.iter().find(|p| p.category == category)
    }
}

/// Shorthand for `Registry::global().get(category)`.
pub fn pattern(category: Category) -> Option<&'static Pattern> {
    Registry::global().get(category)
}

/// Regex source for each category's matching rule.
fn source(category: Category) -> &'static str {
    match category {
        Category::Typescript => concat!(
            r"(?m)^[ \t]*(?:",
            r#"(?P<paren_file>[^\s(][^(\n]*?)\((?P<paren_line>\d+),(?P<paren_col>\d+)\):[ \t]*error[ \t]+(?P<paren_code>TS\d+):[ \t]*(?P<paren_msg>[^\n]+?)"#,
            r"|",
            r"(?P<dash_file>[^\s:][^\n]*?):(?P<dash_line>\d+):(?P<dash_col>\d+)[ \t]+-[ \t]+error[ \t]+(?P<dash_code>TS\d+):[ \t]*(?P<dash_msg>[^\n]+?)",
            r")[ \t]*\r?$",
        ),
        Category::Eslint => concat!(
            r"(?m)^[ \t]*(?:(?P<file>[^\s:][^:\n]*):)?(?P<line>\d+):(?P<col>\d+)",
            r"[ \t]+(?P<severity>error|warning)[ \t]+(?P<msg>[^\n]+?)[ \t]{2,}",
            r"(?P<rule>[@\w][\w\-/@.]*)[ \t]*\r?$",
        ),
        Category::Jest => concat!(
            r"(?m)^[ \t]*(?:",
            r"FAIL[ \t]+(?P<file>\S+)(?:[ \t]+›[ \t]*(?P<suite_test>[^\n]+?))?",
            r"|",
            r"(?:●|✕|×)[ \t]+(?P<head>[^\n]+?)(?:[ \t]+›[ \t]+(?P<sub>[^\n]+?))?",
            r")(?:[ \t]+\(\d+(?:\.\d+)?[ \t]*m?s\))?[ \t]*\r?$",
        ),
        Category::Python => concat!(
            r#"(?m)(?:^[ \t]*File "(?P<file>[^"\n]+)", line (?P<line>\d+)(?:, in (?P<func>[^\n]+?))?[ \t]*\r?\n"#,
            r"(?:[^\n]*\n)*?)+",
            r"^(?P<exc>[A-Za-z_][\w.]*(?:Error|Exception|Warning|Exit|Interrupt|Iteration))",
            r"(?::[ \t]*(?P<msg>[^\n]*?))?[ \t]*\r?$",
        ),
        Category::Rust => concat!(
            r"(?m)^[ \t]*(?P<severity>error|warning)\[(?P<code>E\d{4})\]:[ \t]*(?P<msg>[^\n]+?)[ \t]*\r?\n",
            r"[ \t]*-->[ \t]*(?P<file>[^\n]+?):(?P<line>\d+):(?P<col>\d+)",
        ),
        Category::Go => concat!(
            r"(?m)^[ \t]*(?P<file>[^\s:][^:\n]*\.go):(?P<line>\d+)(?::(?P<col>\d+))?:",
            r"[ \t]*(?P<msg>[^\n]+?)[ \t]*\r?$",
        ),
        Category::Gcc => concat!(
            r"(?m)^[ \t]*(?P<file>[^\s:][^:\n]*\.(?:c|h|cc|cp|cpp|cxx|c\+\+|hpp|hh|hxx|h\+\+|m|mm)):",
            r"(?P<line>\d+):(?P<col>\d+):[ \t]*(?:fatal[ \t]+)?(?P<severity>error|warning):",
            r"[ \t]*(?P<msg>[^\n]+?)[ \t]*\r?$",
        ),
        Category::Generic => concat!(
            r"(?m)^[ \t]*(?:",
            r"\[(?P<bracketed>ERROR|Error|error|ERR|FATAL|Fatal|fatal)\]",
            r"|",
            r"(?P<bare>ERROR|Error|error|ERR|FATAL|Fatal|fatal)\b",
            r")(?:[ \t]*:)?[ \t]*(?P<msg>[^:\s][^\n]*?)[ \t]*\r?$",
        ),
    }
}

fn text<'h>(caps: &Captures<'h>, name: &str) -> Option<&'h str> {
    caps.name(name)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
}

fn required<'h>(caps: &Captures<'h>, name: &'static str) -> Result<&'h str, MalformedMatch> {
    text(caps, name).ok_or(MalformedMatch::Missing(name))
}

fn number(caps: &Captures<'_>, name: &'static str) -> Result<Option<u32>, MalformedMatch> {
    let Some(m) = caps.name(name) else {
        return Ok(None);
    };
    match m.as_str().parse::<u32>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(MalformedMatch::Number {
            field: name,
            value: m.as_str().to_owned(),
        }),
    }
}
