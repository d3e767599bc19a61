//! Configuration loading for faultline.
//!
//! Loads `faultline.toml` with per-section defaults. All sections use
//! `#[serde(default)]` so a minimal or empty config file is valid.
//!
//! Precedence: CLI flags > env vars > config file > defaults. CLI flags are
//! applied by the binary; this module handles the rest.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::category::Selection;
use crate::group::DEFAULT_TOP;
use crate::render::{Format, DEFAULT_MAX_FILES};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "FAULTLINE_CONFIG";

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "faultline.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FaultlineConfig {
    /// Grouping and fuzzy-merge settings.
    pub grouping: GroupingConfig,
    /// Input interpretation.
    pub input: InputConfig,
    /// Output rendering.
    pub output: OutputConfig,
}

/// `[grouping]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    /// Groups to show; 0 shows all.
    pub top: usize,
    /// Merge groups with similar signatures.
    pub fuzzy: bool,
    /// Similarity threshold for fuzzy merging (0.0 - 1.0).
    pub threshold: f64,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            top: DEFAULT_TOP,
            fuzzy: false,
            threshold: default_threshold(),
        }
    }
}

/// `[input]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Category name or `"auto"`.
    pub category: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            category: "auto".to_owned(),
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format.
    pub format: Format,
    /// Files listed per group.
    pub max_files: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: Format::Text,
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

fn default_threshold() -> f64 {
    0.8
}

impl FaultlineConfig {
    /// Validate that configuration values are within sane bounds.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first offending setting.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.grouping.threshold),
            "grouping.threshold must be in [0.0, 1.0]"
        );
        anyhow::ensure!(self.output.max_files > 0, "output.max_files must be > 0");
        self.selection()?;
        Ok(())
    }

    /// Parsed `[input] category`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is neither `auto` nor a known category.
    pub fn selection(&self) -> anyhow::Result<Selection> {
        self.input
            .category
            .parse()
            .with_context(|| format!("invalid input.category '{}'", self.input.category))
    }

    /// Apply environment variable overrides (env > config > defaults).
    ///
    /// Takes a resolver function for testability (avoids `set_var` in tests).
    /// Unparsable values are ignored with a warning.
    pub fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("FAULTLINE_TOP") {
            match v.parse() {
                Ok(n) => self.grouping.top = n,
                Err(_) => ignore_override("FAULTLINE_TOP", &v),
            }
        }
        if let Some(v) = env("FAULTLINE_THRESHOLD") {
            match v.parse::<f64>() {
                Ok(t) if (0.0..=1.0).contains(&t) => {
                    self.grouping.threshold = t;
                    self.grouping.fuzzy = true;
                }
                _ => ignore_override("FAULTLINE_THRESHOLD", &v),
            }
        }
        if let Some(v) = env("FAULTLINE_FORMAT") {
            match v.parse() {
                Ok(format) => self.output.format = format,
                Err(_) => ignore_override("FAULTLINE_FORMAT", &v),
            }
        }
        if let Some(v) = env("FAULTLINE_CATEGORY") {
            match v.parse::<Selection>() {
                Ok(_) => self.input.category = v,
                Err(_) => ignore_override("FAULTLINE_CATEGORY", &v),
            }
        }
    }
}

fn ignore_override(var: &str, value: &str) {
    tracing::warn!(var, value, "ignoring invalid env override");
}

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or fails validation.
pub fn load_config(path: &Path) -> anyhow::Result<FaultlineConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    let config: FaultlineConfig = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config at {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

/// Resolve and load configuration, then apply env overrides.
///
/// An explicit path (argument, then `$FAULTLINE_CONFIG`) must exist. The
/// platform default location is optional: if it is missing, defaults are used.
///
/// # Errors
///
/// Returns an error if an explicit file is missing, or any file found fails
/// to load.
pub fn resolve_config(explicit: Option<&Path>) -> anyhow::Result<FaultlineConfig> {
    resolve_config_with(explicit, |key| std::env::var(key).ok())
}

/// [`resolve_config`] with a custom env resolver.
///
/// # Errors
///
/// Same as [`resolve_config`].
pub fn resolve_config_with(
    explicit: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<FaultlineConfig> {
    let explicit = explicit
        .map(Path::to_path_buf)
        .or_else(|| env(CONFIG_PATH_ENV).map(PathBuf::from));

    let mut config = match explicit {
        Some(path) => load_config(&path)?,
        None => match default_config_path() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "loading config from default location");
                load_config(&path)?
            }
            _ => FaultlineConfig::default(),
        },
    };

    config.apply_overrides(env);
    config.validate()?;
    Ok(config)
}

/// Platform config file location (e.g. `~/.config/faultline/faultline.toml`).
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "faultline")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
