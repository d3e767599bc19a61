//! The error record produced by the extractor.

use serde::{Deserialize, Serialize};

use crate::category::Category;

/// One detected diagnostic occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Source file the diagnostic points at, if the format carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// 1-based line number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// 1-based column number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    /// Severity word as reported by the tool ("error", "warning", ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    /// Short diagnostic identifier such as `TS2304`, `E0425` or a lint rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Enclosing function, when the format reports one (Python frames).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    /// Human-readable description.
    pub message: String,
    /// Category of the pattern that produced this record.
    #[serde(rename = "type")]
    pub kind: Category,
    /// Exact matched text.
    pub raw: String,
    /// Byte offset of the match in the scanned text.
    pub position: usize,
}

impl ErrorRecord {
    /// Create a record with only the mandatory fields set.
    pub fn new(kind: Category, message: impl Into<String>) -> Self {
        Self {
            file: None,
            line: None,
            column: None,
            severity: None,
            code: None,
            function: None,
            message: message.into(),
            kind,
            raw: String::new(),
            position: 0,
        }
    }

    /// Set the source file.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Set the line and column.
    pub fn with_location(mut self, line: Option<u32>, column: Option<u32>) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    /// Set the severity.
    pub fn with_severity(mut self, severity: impl Into<String>) -> Self {
        self.severity = Some(severity.into());
        self
    }

    /// Set the diagnostic code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Human-readable `file:line:col` location, if a file is known.
    pub fn location(&self) -> Option<String> {
        let file = self.file.as_deref()?;
        Some(match (self.line, self.column) {
            (Some(line), Some(column)) => format!("{file}:{line}:{column}"),
            (Some(line), None) => format!("{file}:{line}"),
            _ => file.to_owned(),
        })
    }
}
