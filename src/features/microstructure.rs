//! Leakage-safe microstructure features from OHLCV bars.

use std::collections::BTreeSet;

use tracing::debug;

use super::rolling::{div, pct_change, rolling_mean, rolling_std, shift, sub};
use crate::config::{ConfigError, WindowConfig};
use crate::data::{FeatureFrame, Frame, OhlcvTable, REQUIRED_COLUMNS};

/// Raw input columns exposed unshifted. Every other column is derived.
pub const RAW_COLUMNS: &[&str] = &["open", "high", "low", "close", "volume"];

/// Builds causally lagged feature columns.
///
/// Each derived column is computed from rows `<= t` and then shifted one
/// additional row, so row `t` only reflects what was known before the bar
/// at `t` closed. `vol_rel` carries one more lag on top of that.
#[derive(Debug, Clone)]
pub struct FeatureTransformer {
    windows: WindowConfig,
}

impl FeatureTransformer {
    pub fn new(windows: WindowConfig) -> Result<Self, ConfigError> {
        windows.validate()?;
        Ok(Self { windows })
    }

    pub fn windows(&self) -> &WindowConfig {
        &self.windows
    }

    /// Compute the feature frame.
    ///
    /// Output columns: the raw columns (lower-cased, unshifted), any extra
    /// input columns (shifted), then `ret_1`, `oo_gap`, `hl_range`,
    /// `rv_<vol_lookback>`, `mom_<mom_short>`, `mom_<mom_long>`, `vol_rel`
    /// when volume is present, and `spread_proxy`.
    pub fn build(&self, ohlcv: &OhlcvTable) -> Result<FeatureFrame, ConfigError> {
        let mut df = normalize(ohlcv)?;
        let w = &self.windows;

        let col = |df: &Frame, name: &str| -> Vec<Option<f64>> {
            df.column(name).map(<[_]>::to_vec).unwrap_or_default()
        };
        let open = col(&df, "open");
        let high = col(&df, "high");
        let low = col(&df, "low");
        let close = col(&df, "close");

        let ret_1 = pct_change(&close, 1);
        let hl = sub(&high, &low);
        let prev_close = shift(&close, 1);

        df.insert("ret_1", ret_1.clone())?;
        df.insert("oo_gap", pct_change(&open, 1))?;
        df.insert("hl_range", div(&hl, &prev_close))?;
        df.insert(format!("rv_{}", w.vol_lookback), rolling_std(&ret_1, w.vol_lookback))?;
        df.insert(format!("mom_{}", w.mom_short), pct_change(&close, w.mom_short))?;
        df.insert(format!("mom_{}", w.mom_long), pct_change(&close, w.mom_long))?;

        if df.has_column("volume") {
            let volume = col(&df, "volume");
            let mean = rolling_mean(&volume, w.volume_mean_window());
            df.insert("vol_rel", shift(&div(&volume, &mean), 1))?;
        }

        df.insert("spread_proxy", div(&hl, &prev_close))?;

        let features = lag_derived(&df)?;
        debug!(
            rows = features.height(),
            columns = features.width(),
            missing = ?features.missing_counts(),
            "built microstructure features"
        );
        Ok(features)
    }
}

/// Lower-case column names and check the required OHLC columns.
fn normalize(ohlcv: &OhlcvTable) -> Result<Frame, ConfigError> {
    let present: BTreeSet<String> = ohlcv.columns().iter().map(|c| c.to_lowercase()).collect();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !present.contains(**c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ConfigError::MissingColumns(missing));
    }

    let mut df = Frame::new(ohlcv.index().clone());
    for (name, values) in ohlcv.frame().iter_columns() {
        let lower = name.to_lowercase();
        if df.has_column(&lower) {
            return Err(ConfigError::DuplicateColumn(lower));
        }
        df.insert(lower, values.to_vec())?;
    }
    Ok(df)
}

/// Shift every non-raw column by one row.
fn lag_derived(df: &Frame) -> Result<Frame, ConfigError> {
    let mut out = Frame::new(df.index().clone());
    for (name, values) in df.iter_columns() {
        if RAW_COLUMNS.contains(&name) {
            out.insert(name, values.to_vec())?;
        } else {
            out.insert(name, shift(values, 1))?;
        }
    }
    Ok(out)
}
