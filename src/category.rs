//! Diagnostic categories.
//!
//! Each category names one tool output format and maps to exactly one
//! pattern in [`crate::patterns`]. `Generic` is the universal fallback.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Diagnostic output format a piece of text resembles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// `tsc` compiler output.
    Typescript,
    /// ESLint stylish/compact output.
    Eslint,
    /// Jest test-runner failures.
    Jest,
    /// Python tracebacks.
    Python,
    /// rustc / cargo diagnostics.
    Rust,
    /// Go compiler and vet output.
    Go,
    /// GCC / Clang diagnostics for C-family sources.
    Gcc,
    /// Any line carrying an error-like marker.
    Generic,
}

impl Category {
    /// Every category, in detection probe order.
    pub const ALL: [Category; 8] = [
        Self::Typescript,
        Self::Eslint,
        Self::Jest,
        Self::Python,
        Self::Rust,
        Self::Go,
        Self::Gcc,
        Self::Generic,
    ];

    /// Lowercase name used on the command line and in serialized output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Typescript => "typescript",
            Self::Eslint => "eslint",
            Self::Jest => "jest",
            Self::Python => "python",
            Self::Rust => "rust",
            Self::Go => "go",
            Self::Gcc => "gcc",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown category name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}' (expected one of: typescript, eslint, jest, python, rust, go, gcc, generic, auto)")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == wanted)
            .ok_or_else(|| ParseCategoryError(s.to_owned()))
    }
}

/// How the extractor should pick a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    /// Run the detector over the input.
    #[default]
    Auto,
    /// Use the given category regardless of content.
    Forced(Category),
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Forced(category) => category.fmt(f),
        }
    }
}

impl FromStr for Selection {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        s.parse().map(Self::Forced)
    }
}
