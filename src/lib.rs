//! faultline: reduce noisy diagnostic output to a few error patterns.
//!
//! Pipeline: detect the output format, extract one [`ErrorRecord`] per
//! diagnostic, derive a normalized signature for each, group records by
//! signature (optionally merging near-identical groups), and summarize.
//!
//! Analysis itself performs no I/O. Input handling lives in the `faultline`
//! binary; [`config`] loads settings and [`render`] formats results.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod analysis;
pub mod category;
pub mod config;
pub mod detect;
pub mod extract;
pub mod group;
pub mod logging;
pub mod patterns;
pub mod record;
pub mod render;
pub mod signature;
pub mod similarity;
pub mod stats;

pub use analysis::{analyze, Analysis, AnalysisOptions};
pub use category::{Category, ParseCategoryError, Selection};
pub use detect::detect;
pub use extract::{extract, parse, Parsed};
pub use group::{group, merge_similar_groups, Group, GroupOptions};
pub use record::ErrorRecord;
pub use signature::signature;
pub use similarity::similarity;
pub use stats::{stats, Stats};
