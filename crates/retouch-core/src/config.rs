//! Session configuration.
//!
//! Loaded from JSON. Every field is optional and falls back to its default;
//! values that would break an invariant (inverted ranges, a zero gain
//! divisor, a JPEG quality of 0) are replaced with defaults and reported as
//! warnings rather than rejected.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::commit::CommitPolicy;
use crate::controls::SliderScale;
use crate::encode::ImageFormat;
use crate::params::ParameterLimits;
use crate::stages::Interpolation;

/// Errors raised while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config is not valid JSON for [`SessionConfig`].
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Export settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Format used when the caller does not pick one
    pub format: ImageFormat,
    /// JPEG quality, 1-100
    pub jpeg_quality: u8,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ImageFormat::Png,
            jpeg_quality: 90,
        }
    }
}

impl ExportOptions {
    fn sanitize(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();
        if !(1..=100).contains(&self.jpeg_quality) {
            let fixed = self.jpeg_quality.clamp(1, 100);
            warnings.push(format!(
                "export.jpeg_quality {} out of range 1-100; using {fixed}",
                self.jpeg_quality
            ));
            self.jpeg_quality = fixed;
        }
        warnings
    }
}

/// Everything an [`EditSession`](crate::EditSession) can be configured with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub commit: CommitPolicy,
    pub limits: ParameterLimits,
    pub sliders: SliderScale,
    pub export: ExportOptions,
    pub interpolation: Interpolation,
}

impl SessionConfig {
    /// Parse and sanitize a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let mut config: SessionConfig = serde_json::from_str(json)?;
        for warning in config.sanitize() {
            warn!(%warning, "config value replaced");
        }
        Ok(config)
    }

    /// Read, parse and sanitize a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Replace invalid values with defaults; returns one message per fix.
    pub fn sanitize(&mut self) -> Vec<String> {
        let mut warnings = self.limits.sanitize();
        warnings.extend(self.sliders.sanitize());
        warnings.extend(self.export.sanitize());
        warnings
    }
}
