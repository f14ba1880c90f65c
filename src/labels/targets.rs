//! Forward return, binary and meta labels.

use std::collections::BTreeSet;

use tracing::debug;

use crate::config::{ConfigError, LabelConfig};
use crate::data::{LabelFrame, Series, TimeSeries};
use crate::features::rolling::safe_div;

/// Column name of the forward return at horizon `h`.
pub fn return_column(h: usize) -> String {
    format!("fret_{h}")
}

/// Forward returns for every horizon, with the trailing `embargo_days` rows
/// forced to missing.
///
/// `fret_h[t] = price[t + h] / price[t] - 1`, missing wherever `t + h` is
/// past the end of the series. Columns are ordered by ascending horizon and
/// duplicate horizons collapse into one column.
pub fn forward_returns(
    prices: &TimeSeries,
    horizons: &[usize],
    embargo_days: usize,
) -> Result<LabelFrame, ConfigError> {
    let horizons = normalize_horizons(horizons)?;
    let n = prices.len();
    let max_h = horizons.iter().copied().max().unwrap_or(0);
    if max_h >= n {
        return Err(ConfigError::InsufficientHistory {
            len: n,
            required: max_h.saturating_add(1),
        });
    }

    let values = prices.values();
    let embargo_start = n.saturating_sub(embargo_days);
    let mut labels = LabelFrame::new(prices.index().clone());

    for &h in &horizons {
        let column: Vec<Option<f64>> = (0..n)
            .map(|t| {
                if t >= embargo_start || h >= n - t {
                    return None;
                }
                safe_div(Some(values[t + h]), Some(values[t])).map(|r| r - 1.0)
            })
            .collect();
        labels.insert(return_column(h), column)?;
    }

    debug!(
        rows = n,
        horizons = ?horizons,
        embargo_days,
        missing = ?labels.missing_counts(),
        "built forward return labels"
    );
    Ok(labels)
}

/// `1` above `threshold`, `0` at or below it, missing where the source is.
pub fn binary_labels(
    labels: &LabelFrame,
    column: &str,
    threshold: f64,
) -> Result<Series<Option<bool>>, ConfigError> {
    let source = labels
        .column(column)
        .ok_or_else(|| ConfigError::UnknownColumn(column.to_string()))?;
    let values = source.iter().map(|v| v.map(|x| x > threshold)).collect();
    Ok(Series::new(labels.index().clone(), values)?)
}

/// Meta-labels over the primary signal's timestamps.
///
/// Defined only where the primary signal fired: `1` if the forward return at
/// that timestamp exceeds `threshold`, else `0`. Missing where the signal is
/// off, or the forward return is missing or absent from its index.
pub fn meta_labels(
    primary_signal: &Series<bool>,
    forward_return: &Series<Option<f64>>,
    threshold: f64,
) -> Series<Option<bool>> {
    primary_signal.map(|ts, &on| {
        if !on {
            return None;
        }
        forward_return
            .get(ts)
            .copied()
            .flatten()
            .map(|r| r > threshold)
    })
}

fn normalize_horizons(horizons: &[usize]) -> Result<Vec<usize>, ConfigError> {
    if horizons.is_empty() {
        return Err(ConfigError::NoHorizons);
    }
    if horizons.contains(&0) {
        return Err(ConfigError::InvalidHorizon(0));
    }
    let unique: BTreeSet<usize> = horizons.iter().copied().collect();
    Ok(unique.into_iter().collect())
}

/// Label construction bound to one [`LabelConfig`].
#[derive(Debug, Clone)]
pub struct LabelGenerator {
    config: LabelConfig,
}

impl LabelGenerator {
    pub fn new(config: LabelConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LabelConfig {
        &self.config
    }

    pub fn forward_returns(&self, prices: &TimeSeries) -> Result<LabelFrame, ConfigError> {
        forward_returns(prices, &self.config.horizons, self.config.embargo_days)
    }

    pub fn binary_labels(
        &self,
        labels: &LabelFrame,
        column: &str,
    ) -> Result<Series<Option<bool>>, ConfigError> {
        binary_labels(labels, column, self.config.threshold)
    }

    pub fn meta_labels(
        &self,
        primary_signal: &Series<bool>,
        forward_return: &Series<Option<f64>>,
    ) -> Series<Option<bool>> {
        meta_labels(primary_signal, forward_return, self.config.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TemporalIndex;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn linear_prices(n: usize, start: f64, end: f64) -> TimeSeries {
        let index = TemporalIndex::business_days(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), n);
        let step = (end - start) / (n - 1) as f64;
        let values = (0..n).map(|i| start + step * i as f64).collect();
        Series::new(index, values).unwrap()
    }

    #[test]
    fn test_forward_returns_with_embargo() {
        let prices = linear_prices(30, 100.0, 130.0);
        let y = forward_returns(&prices, &[1, 5], 3).unwrap();
        assert_eq!(y.columns(), vec!["fret_1", "fret_5"]);

        let p = prices.values();
        let fret_1 = y.column("fret_1").unwrap();
        let fret_5 = y.column("fret_5").unwrap();
        for t in 27..30 {
            assert_eq!(fret_1[t], None);
            assert_eq!(fret_5[t], None);
        }
        for t in 0..27 {
            assert_relative_eq!(fret_1[t].unwrap(), p[t + 1] / p[t] - 1.0, epsilon = 1e-12);
        }
        for t in 0..25 {
            assert_relative_eq!(fret_5[t].unwrap(), p[t + 5] / p[t] - 1.0, epsilon = 1e-12);
        }
        assert_eq!(fret_5[25], None);
        assert_eq!(fret_5[26], None);
    }

    #[test]
    fn test_embargo_overrides_defined_values() {
        let prices = linear_prices(10, 100.0, 109.0);
        let y = forward_returns(&prices, &[1], 4).unwrap();
        let fret_1 = y.column("fret_1").unwrap();
        // Row 8 would be defined without the embargo.
        assert!(fret_1[..6].iter().all(Option::is_some));
        assert!(fret_1[6..].iter().all(Option::is_none));
    }

    #[test]
    fn test_embargo_longer_than_series() {
        let prices = linear_prices(6, 100.0, 105.0);
        let y = forward_returns(&prices, &[1], 50).unwrap();
        assert!(y.column("fret_1").unwrap().iter().all(Option::is_none));
    }

    #[test]
    fn test_insufficient_history() {
        let prices = linear_prices(5, 100.0, 104.0);
        let err = forward_returns(&prices, &[1, 5], 0).unwrap_err();
        assert_eq!(err, ConfigError::InsufficientHistory { len: 5, required: 6 });
        // Exactly max(h) + 1 rows is enough.
        let y = forward_returns(&prices, &[4], 0).unwrap();
        assert!(y.column("fret_4").unwrap()[0].is_some());
    }

    #[test]
    fn test_horizon_at_usize_max_is_insufficient_history() {
        let prices = linear_prices(5, 100.0, 104.0);
        let err = forward_returns(&prices, &[1, usize::MAX], 0).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InsufficientHistory {
                len: 5,
                required: usize::MAX
            }
        );
    }

    #[test]
    fn test_invalid_horizons() {
        let prices = linear_prices(5, 100.0, 104.0);
        assert_eq!(forward_returns(&prices, &[], 0).unwrap_err(), ConfigError::NoHorizons);
        assert_eq!(
            forward_returns(&prices, &[0, 1], 0).unwrap_err(),
            ConfigError::InvalidHorizon(0)
        );
    }

    #[test]
    fn test_horizons_sorted_and_deduplicated() {
        let prices = linear_prices(20, 100.0, 120.0);
        let y = forward_returns(&prices, &[5, 1, 5], 0).unwrap();
        assert_eq!(y.columns(), vec!["fret_1", "fret_5"]);
    }

    #[test]
    fn test_binary_labels() {
        let prices = linear_prices(10, 100.0, 109.0);
        let fwd = forward_returns(&prices, &[1], 0).unwrap();
        let yb = binary_labels(&fwd, "fret_1", 0.0).unwrap();
        assert_eq!(yb.len(), 10);
        assert!(yb.values()[..9].iter().all(|v| *v == Some(true)));
        assert_eq!(yb.values()[9], None);

        let strict = binary_labels(&fwd, "fret_1", 1.0).unwrap();
        assert!(strict.values()[..9].iter().all(|v| *v == Some(false)));
    }

    #[test]
    fn test_binary_labels_at_threshold_is_zero() {
        let index = TemporalIndex::business_days(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 3);
        let frame = LabelFrame::new(index)
            .with_column("fret_1", vec![Some(0.01), Some(0.0), Some(-0.01)])
            .unwrap();
        let yb = binary_labels(&frame, "fret_1", 0.0).unwrap();
        assert_eq!(yb.values(), &[Some(true), Some(false), Some(false)]);
        assert_eq!(
            binary_labels(&frame, "fret_9", 0.0).unwrap_err(),
            ConfigError::UnknownColumn("fret_9".to_string())
        );
    }

    #[test]
    fn test_meta_labels_only_where_signal_fires() {
        let prices = linear_prices(10, 100.0, 109.0);
        let fwd = forward_returns(&prices, &[1], 0).unwrap();
        let fret_1 = fwd.series("fret_1").unwrap();

        let signal: Vec<bool> = (0..10).map(|i| (2..7).contains(&i)).collect();
        let primary = Series::new(prices.index().clone(), signal).unwrap();
        let meta = meta_labels(&primary, &fret_1, 0.0);

        for i in [0, 1, 7, 8, 9] {
            assert_eq!(meta.values()[i], None);
        }
        for i in 2..7 {
            assert_eq!(meta.values()[i], Some(true));
        }
    }

    #[test]
    fn test_meta_labels_missing_forward_return() {
        let prices = linear_prices(6, 100.0, 95.0);
        let fwd = forward_returns(&prices, &[1], 2).unwrap();
        let fret_1 = fwd.series("fret_1").unwrap();
        let primary = Series::new(prices.index().clone(), vec![true; 6]).unwrap();
        let meta = meta_labels(&primary, &fret_1, 0.0);
        // Falling prices: defined rows are 0, embargoed rows are missing.
        assert_eq!(
            meta.values(),
            &[Some(false), Some(false), Some(false), Some(false), None, None]
        );
    }

    #[test]
    fn test_meta_labels_join_by_timestamp() {
        let prices = linear_prices(8, 100.0, 107.0);
        let fwd = forward_returns(&prices, &[1], 0).unwrap();
        let fret_1 = fwd.series("fret_1").unwrap();

        // Primary index starts later and runs past the label index.
        let index = TemporalIndex::business_days(prices.index().get(5).unwrap(), 5);
        let primary = Series::new(index, vec![true; 5]).unwrap();
        let meta = meta_labels(&primary, &fret_1, 0.0);
        assert_eq!(meta.values(), &[Some(true), Some(true), None, None, None]);
    }

    #[test]
    fn test_generator_uses_config() {
        let generator = LabelGenerator::new(LabelConfig {
            horizons: vec![2],
            embargo_days: 1,
            threshold: 0.015,
        })
        .unwrap();
        let prices = linear_prices(10, 100.0, 109.0);
        let y = generator.forward_returns(&prices).unwrap();
        assert_eq!(y.columns(), vec!["fret_2"]);
        let yb = generator.binary_labels(&y, "fret_2").unwrap();
        // 2-day return from 100 is 2%, above the 1.5% threshold.
        assert_eq!(yb.values()[0], Some(true));
        assert_eq!(yb.values()[9], None);
    }

    #[test]
    fn test_idempotent() {
        let prices = linear_prices(30, 100.0, 130.0);
        assert_eq!(
            forward_returns(&prices, &[1, 5], 3).unwrap(),
            forward_returns(&prices, &[1, 5], 3).unwrap()
        );
    }
}
