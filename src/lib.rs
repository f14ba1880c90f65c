//! Leakage-safe temporal cross-validation and labeling for financial time series.
//!
//! Raw OHLCV bars feed the [`FeatureTransformer`]; prices feed the label
//! functions. [`AlignmentValidator`] gates both frames before
//! [`PurgedKFold`] hands out train/test partitions to a training loop.

pub mod config;
pub mod data;
pub mod features;
pub mod labels;
pub mod split;
pub mod validation;

#[cfg(test)]
pub(crate) fn init_test_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("purged_cv=debug"))
        .with_test_writer()
        .try_init();
}

// Re-export commonly used types
pub use config::{
    AlignmentConfig, ConfigError, EngineConfig, LabelConfig, SplitConfig, WindowConfig,
};
pub use data::{
    Bar, DataError, FeatureFrame, Frame, LabelFrame, OhlcvTable, Series, TemporalIndex, TimeSeries,
};
pub use features::FeatureTransformer;
pub use labels::{binary_labels, forward_returns, meta_labels, LabelGenerator};
pub use split::{Fold, FoldPlan, Folds, PurgedKFold};
pub use validation::{validate_alignment, AlignmentReport, AlignmentValidator, CheckResult};
