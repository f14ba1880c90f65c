//! Engine configuration.
//!
//! Every component takes its configuration explicitly. Defaults match the
//! research pipeline's conventions and can be overridden from a TOML string.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::DataError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("n_splits must be >= 2, got {0}")]
    InvalidSplits(usize),

    #[error("Not enough samples for the requested number of splits: {n_samples} samples, n_splits={n_splits}")]
    InsufficientSamples { n_samples: usize, n_splits: usize },

    #[error("Missing OHLCV columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Duplicate column after lower-casing: {0}")]
    DuplicateColumn(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Not enough data to compute requested forward horizons: {len} prices, need at least {required}")]
    InsufficientHistory { len: usize, required: usize },

    #[error("horizons must be positive integers, got {0}")]
    InvalidHorizon(usize),

    #[error("horizons must not be empty")]
    NoHorizons,

    #[error("{name} must be > 0, got {value}")]
    InvalidWindow { name: &'static str, value: usize },

    #[error("{name} must be finite and in (0, 1], got {value}")]
    InvalidTolerance { name: &'static str, value: f64 },

    #[error("Config parse error: {0}")]
    Parse(String),

    #[error("Data error: {0}")]
    Data(#[from] DataError),
}

/// Lookback windows for the microstructure features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Short momentum window (bars).
    pub mom_short: usize,
    /// Long momentum window (bars).
    pub mom_long: usize,
    /// Realized volatility lookback (bars).
    pub vol_lookback: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            mom_short: 5,
            mom_long: 20,
            vol_lookback: 20,
        }
    }
}

impl WindowConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("mom_short", self.mom_short),
            ("mom_long", self.mom_long),
            ("vol_lookback", self.vol_lookback),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidWindow { name, value });
            }
        }
        Ok(())
    }

    /// Window of the trailing volume mean used by `vol_rel`.
    pub fn volume_mean_window(&self) -> usize {
        self.vol_lookback.clamp(5, 60)
    }
}

/// Purged k-fold configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Number of contiguous folds.
    pub n_splits: usize,
    /// Post-test buffer removed from training. Negative values clamp to 0.
    pub embargo: i64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            n_splits: 5,
            embargo: 0,
        }
    }
}

impl SplitConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_splits < 2 {
            return Err(ConfigError::InvalidSplits(self.n_splits));
        }
        Ok(())
    }
}

/// Forward label configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Forward horizons in bars.
    pub horizons: Vec<usize>,
    /// Trailing rows forced to missing.
    pub embargo_days: usize,
    /// Threshold for binary and meta labels.
    pub threshold: f64,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            horizons: vec![1, 5],
            embargo_days: 0,
            threshold: 0.0,
        }
    }
}

impl LabelConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horizons.is_empty() {
            return Err(ConfigError::NoHorizons);
        }
        if let Some(&h) = self.horizons.iter().find(|&&h| h == 0) {
            return Err(ConfigError::InvalidHorizon(h));
        }
        Ok(())
    }
}

/// Thresholds for the look-ahead heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Absolute correlation above which a feature/label pair is flagged.
    pub max_abs_corr: f64,
    /// Pairs with fewer jointly defined rows are skipped.
    pub min_overlap: usize,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            max_abs_corr: 0.999,
            min_overlap: 3,
        }
    }
}

impl AlignmentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.max_abs_corr.is_finite() || self.max_abs_corr <= 0.0 || self.max_abs_corr > 1.0 {
            return Err(ConfigError::InvalidTolerance {
                name: "max_abs_corr",
                value: self.max_abs_corr,
            });
        }
        // Pearson correlation needs two distinct points at minimum.
        if self.min_overlap < 2 {
            return Err(ConfigError::InvalidWindow {
                name: "min_overlap",
                value: self.min_overlap,
            });
        }
        Ok(())
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub windows: WindowConfig,
    pub split: SplitConfig,
    pub labels: LabelConfig,
    pub alignment: AlignmentConfig,
}

impl EngineConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.windows.validate()?;
        self.split.validate()?;
        self.labels.validate()?;
        self.alignment.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.windows.mom_short, 5);
        assert_eq!(config.windows.mom_long, 20);
        assert_eq!(config.windows.vol_lookback, 20);
        assert_eq!(config.split.n_splits, 5);
        assert_eq!(config.split.embargo, 0);
        assert_eq!(config.labels.embargo_days, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let raw = r#"
            [split]
            n_splits = 4
            embargo = 3

            [labels]
            horizons = [1, 10]
            threshold = 0.002
        "#;
        let config = EngineConfig::from_toml_str(raw).unwrap();
        assert_eq!(config.split.n_splits, 4);
        assert_eq!(config.split.embargo, 3);
        assert_eq!(config.labels.horizons, vec![1, 10]);
        assert_eq!(config.labels.embargo_days, 0);
        assert_eq!(config.windows, WindowConfig::default());
    }

    #[test]
    fn test_toml_rejects_single_split() {
        let err = EngineConfig::from_toml_str("[split]\nn_splits = 1\n").unwrap_err();
        assert_eq!(err, ConfigError::InvalidSplits(1));
        assert!(err.to_string().contains("n_splits"));
    }

    #[test]
    fn test_toml_parse_error() {
        let err = EngineConfig::from_toml_str("[split\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_zero_window_names_parameter() {
        let windows = WindowConfig {
            vol_lookback: 0,
            ..Default::default()
        };
        let err = windows.validate().unwrap_err();
        assert!(err.to_string().contains("vol_lookback"));
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let labels = LabelConfig {
            horizons: vec![1, 0],
            ..Default::default()
        };
        assert_eq!(labels.validate(), Err(ConfigError::InvalidHorizon(0)));
    }

    #[test]
    fn test_volume_mean_window_clamped() {
        let mut windows = WindowConfig::default();
        windows.vol_lookback = 2;
        assert_eq!(windows.volume_mean_window(), 5);
        windows.vol_lookback = 120;
        assert_eq!(windows.volume_mean_window(), 60);
        windows.vol_lookback = 20;
        assert_eq!(windows.volume_mean_window(), 20);
    }
}
