//! TOML-based job configuration.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::align::DEFAULT_TOLERANCE;
use crate::table::ReadOptions;

/// Top-level job configuration parsed from TOML.
///
/// A job names its input (a single file, a list of files to concatenate, or a
/// per-entity file family), optionally a list of time stations to align, and
/// where to write the aligned rows. Load with [`JobConfig::from_toml_file`]
/// and check with [`JobConfig::validate`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    /// Input files and parsing options.
    #[serde(default)]
    pub input: InputConfig,
    /// Time station alignment.
    #[serde(default)]
    pub align: AlignConfig,
    /// Output destinations.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Input files and parsing options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// One file to read, or several to concatenate in the given order.
    pub files: Vec<String>,
    /// Per-entity file family to stack.
    pub family: Option<FamilyConfig>,
    /// Columns parsed as integers besides the built-in identifier columns.
    pub int_columns: Vec<String>,
    /// Build `<column>2row` index maps.
    pub index_maps: bool,
}

impl InputConfig {
    pub fn read_options(&self) -> ReadOptions {
        ReadOptions::new()
            .with_int_columns(self.int_columns.iter().cloned())
            .with_index_maps(self.index_maps)
    }
}

/// Per-entity file family `<prefix>_<id><suffix>`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FamilyConfig {
    pub prefix: String,
    #[serde(default = "default_suffix")]
    pub suffix: String,
    /// Entity ids substituted into the file name.
    pub ids: Vec<i64>,
    /// Optional per-entity arc lengths, one per id.
    #[serde(default)]
    pub arc_lengths: Vec<f64>,
}

fn default_suffix() -> String {
    ".res".to_string()
}

/// Time station alignment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlignConfig {
    /// Column holding available times; resolved as Time, time, t when absent.
    pub time_column: Option<String>,
    /// Requested times, ascending; negative means the final time.
    pub stations: Vec<f64>,
    /// Absolute tolerance when matching times.
    pub tolerance: f64,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            time_column: None,
            stations: Vec::new(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// Output destinations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Write aligned rows to this CSV file.
    pub csv: Option<String>,
    /// Print results as JSON instead of text.
    pub json: bool,
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"align.tolerance"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl JobConfig {
    /// Parses a job from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the job TOML file
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "job".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a job from a TOML string.
    ///
    /// # Arguments
    ///
    /// * `s` - TOML source with optional `[input]`, `[align]` and `[output]` tables
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let input = &self.input;

        match (&input.family, input.files.is_empty()) {
            (None, true) => errors.push(ConfigError {
                field: "input".into(),
                message: "one of input.files or input.family is required".into(),
            }),
            (Some(_), false) => errors.push(ConfigError {
                field: "input".into(),
                message: "input.files and input.family are mutually exclusive".into(),
            }),
            _ => {}
        }

        if let Some(family) = &input.family {
            if family.ids.is_empty() {
                errors.push(ConfigError {
                    field: "input.family.ids".into(),
                    message: "must not be empty".into(),
                });
            }
            if !family.arc_lengths.is_empty() && family.arc_lengths.len() != family.ids.len() {
                errors.push(ConfigError {
                    field: "input.family.arc_lengths".into(),
                    message: format!(
                        "must have one value per id ({}), got {}",
                        family.ids.len(),
                        family.arc_lengths.len()
                    ),
                });
            }
        }

        let al = &self.align;
        if !al.tolerance.is_finite() || al.tolerance < 0.0 {
            errors.push(ConfigError {
                field: "align.tolerance".into(),
                message: "must be finite and >= 0".into(),
            });
        }
        if al.stations.iter().any(|t| t.is_nan()) {
            errors.push(ConfigError {
                field: "align.stations".into(),
                message: "must not contain NaN".into(),
            });
        }
        if al
            .stations
            .iter()
            .filter(|t| **t >= 0.0)
            .collect::<Vec<_>>()
            .windows(2)
            .any(|w| w[1] < w[0])
        {
            errors.push(ConfigError {
                field: "align.stations".into(),
                message: "non-negative stations must be ascending".into(),
            });
        }

        errors
    }
}
