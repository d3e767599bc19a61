//! Text, JSON and Markdown rendering of an [`Analysis`].

use std::fmt::{self, Write};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analysis::Analysis;
use crate::group::Group;

/// Default number of files listed per group.
pub const DEFAULT_MAX_FILES: usize = 5;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Plain terminal text.
    #[default]
    Text,
    /// Pretty-printed JSON of the whole analysis.
    Json,
    /// GitHub-flavoured Markdown.
    Markdown,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Markdown => "markdown",
        })
    }
}

/// Unknown output format name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown format '{0}' (expected text, json or markdown)")]
pub struct ParseFormatError(pub String);

impl FromStr for Format {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            _ => Err(ParseFormatError(s.to_owned())),
        }
    }
}

/// Errors produced while rendering.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// JSON serialization failed.
    #[error("failed to serialize analysis: {0}")]
    Json(#[from] serde_json::Error),
    /// Writing into the output buffer failed.
    #[error("failed to format output: {0}")]
    Fmt(#[from] fmt::Error),
}

/// Rendering knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Output format.
    pub format: Format,
    /// Files listed per group before eliding the rest.
    pub max_files: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: Format::Text,
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

/// Render `analysis` in the requested format.
///
/// # Errors
///
/// Returns [`RenderError`] if serialization or buffer formatting fails.
pub fn render(analysis: &Analysis, options: &RenderOptions) -> Result<String, RenderError> {
    match options.format {
        Format::Text => render_text(analysis, options.max_files),
        Format::Json => Ok(serde_json::to_string_pretty(analysis)?),
        Format::Markdown => render_markdown(analysis, options.max_files),
    }
}

fn render_text(analysis: &Analysis, max_files: usize) -> Result<String, RenderError> {
    let stats = &analysis.stats;
    let mut out = String::new();

    if stats.total_errors == 0 {
        writeln!(out, "No errors found.")?;
        return Ok(out);
    }

    writeln!(
        out,
        "{} errors, {} patterns, {} files affected (format: {})",
        stats.total_errors, stats.unique_patterns, stats.files_affected, analysis.category
    )?;
    if let Some(code) = &stats.top_code {
        writeln!(out, "Most frequent code: {code}")?;
    }

    for (rank, group) in (1..).zip(&analysis.groups) {
        writeln!(out)?;
        writeln!(out, "#{rank} {}x {}", group.count, group.signature)?;
        if let Some(location) = group.representative.location() {
            writeln!(out, "   at {location}")?;
        }
        writeln!(out, "   e.g. {}", group.representative.message)?;
        if !group.files.is_empty() {
            writeln!(out, "   files: {}", file_list(group, max_files, |f| f.to_owned()))?;
        }
    }

    Ok(out)
}

fn render_markdown(analysis: &Analysis, max_files: usize) -> Result<String, RenderError> {
    let stats = &analysis.stats;
    let mut out = String::new();

    writeln!(out, "# Error summary")?;
    writeln!(out)?;
    writeln!(out, "| Metric | Value |")?;
    writeln!(out, "|---|---|")?;
    writeln!(out, "| Format | {} |", analysis.category)?;
    writeln!(out, "| Total errors | {} |", stats.total_errors)?;
    writeln!(out, "| Unique patterns | {} |", stats.unique_patterns)?;
    writeln!(out, "| Files affected | {} |", stats.files_affected)?;
    if let Some(code) = &stats.top_code {
        writeln!(out, "| Top code | {} |", table_cell(code))?;
    }

    for (rank, group) in (1..).zip(&analysis.groups) {
        writeln!(out)?;
        writeln!(out, "## {rank}. {} ({})", inline_code(&group.signature), group.count)?;
        writeln!(out)?;
        writeln!(out, "- Type: {}", group.kind)?;
        if let Some(severity) = &group.severity {
            writeln!(out, "- Severity: {severity}")?;
        }
        match group.representative.location() {
            Some(location) => writeln!(
                out,
                "- Example: {} {}",
                inline_code(&location),
                group.representative.message
            )?,
            None => writeln!(out, "- Example: {}", group.representative.message)?,
        }
        if !group.files.is_empty() {
            writeln!(out, "- Files: {}", file_list(group, max_files, inline_code))?;
        }
    }

    Ok(out)
}

fn file_list(group: &Group, max_files: usize, show: impl Fn(&str) -> String) -> String {
    let shown: Vec<String> = group
        .files
        .iter()
        .take(max_files)
        .map(|f| show(f.as_str()))
        .collect();
    let hidden = group.files.len().saturating_sub(shown.len());
    if hidden > 0 {
        format!("{} (+{hidden} more)", shown.join(", "))
    } else {
        shown.join(", ")
    }
}

fn inline_code(text: &str) -> String {
    format!("`{}`", text.replace('`', "'"))
}

fn table_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
