//! Benchmark configuration
//!
//! Uses RON for the optional config file. Every field has a default, so a
//! file only needs the values it changes:
//!
//! ```ron
//! (amount: 5000, colorful: true)
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for config loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    pub window_width: i32,
    pub window_height: i32,
    /// Disable vsync so FPS reflects raw throughput
    pub uncapped_fps: bool,
    /// Bunnies spawned per update while the mouse is held
    pub amount: u32,
    pub colorful: bool,
    /// Added to vertical velocity every update (normalized units)
    pub gravity: f32,
    /// Seconds between metrics samples
    pub metrics_interval: f32,
    /// Samples kept per metrics plot
    pub plot_samples: usize,
    pub max_tps: f32,
    pub max_fps: f32,
    pub max_objects: f32,
    /// PNG to use for the bunny; a built-in sprite is drawn when unset
    pub sprite_path: Option<PathBuf>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            window_width: 800,
            window_height: 600,
            uncapped_fps: true,
            amount: 1000,
            colorful: false,
            gravity: 0.00095,
            metrics_interval: 0.5,
            plot_samples: 20,
            max_tps: 60.0,
            max_fps: 60.0,
            max_objects: 60000.0,
            sprite_path: None,
        }
    }
}

impl BenchConfig {
    pub fn from_ron_str(s: &str) -> Result<Self, ConfigError> {
        let config: BenchConfig = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a RON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&contents)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        let config = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .indentor("  ".to_string());
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Write this config as pretty RON.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_ron_string()?;
        fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_width <= 0 || self.window_height <= 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be positive, got {}x{}",
                self.window_width, self.window_height
            )));
        }
        if self.plot_samples == 0 {
            return Err(ConfigError::Invalid("plot_samples must be at least 1".into()));
        }
        if !(self.metrics_interval.is_finite() && self.metrics_interval > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "metrics_interval must be > 0, got {}",
                self.metrics_interval
            )));
        }
        if !self.gravity.is_finite() {
            return Err(ConfigError::Invalid(format!("gravity must be finite, got {}", self.gravity)));
        }
        for (name, max) in [
            ("max_tps", self.max_tps),
            ("max_fps", self.max_fps),
            ("max_objects", self.max_objects),
        ] {
            if !(max.is_finite() && max > 0.0) {
                return Err(ConfigError::Invalid(format!("{} must be > 0, got {}", name, max)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(BenchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = BenchConfig::from_ron_str("(amount: 5000, colorful: true)").unwrap();
        assert_eq!(config.amount, 5000);
        assert!(config.colorful);
        assert_eq!(config.window_width, 800);
        assert_eq!(config.plot_samples, 20);
    }

    #[test]
    fn test_parse_error() {
        let err = BenchConfig::from_ron_str("(amount: \"lots\")").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_errors() {
        let err = BenchConfig::from_ron_str("(window_width: 0)").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = BenchConfig::from_ron_str("(metrics_interval: -1.0)").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = BenchConfig::from_ron_str("(plot_samples: 0)").unwrap_err();
        assert!(err.to_string().contains("plot_samples"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bench.ron");

        let config = BenchConfig {
            amount: 250,
            sprite_path: Some(PathBuf::from("bunny.png")),
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(BenchConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = BenchConfig::load(&dir.path().join("nope.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
