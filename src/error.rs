//! Crate-level error types.

use thiserror::Error;

/// Errors surfaced by DrishtiVO.
///
/// Runtime perception failures (too few features, failed fits, out-of-grid
/// points) are handled by degradation policies and never reach this enum;
/// it covers construction-time configuration problems and file I/O only.
#[derive(Error, Debug)]
pub enum DrishtiError {
    /// Reading a config or GPS file, or writing an export, failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A config file did not parse as YAML.
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// A config parsed but failed semantic validation.
    #[error("Invalid config: {0}")]
    Config(String),

    /// A GPS track CSV row was malformed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Grid image export failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DrishtiError>;
