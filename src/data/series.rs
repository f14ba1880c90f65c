//! Single-column time series.

use chrono::NaiveDate;

use super::index::TemporalIndex;
use super::types::{DataError, DataResult};

/// Values aligned one-to-one with a [`TemporalIndex`].
#[derive(Debug, Clone, PartialEq)]
pub struct Series<T> {
    index: TemporalIndex,
    values: Vec<T>,
}

/// Price or other fully-defined numeric series.
pub type TimeSeries = Series<f64>;

impl<T> Series<T> {
    pub fn new(index: TemporalIndex, values: Vec<T>) -> DataResult<Self> {
        if index.len() != values.len() {
            return Err(DataError::LengthMismatch {
                name: "series".to_string(),
                expected: index.len(),
                actual: values.len(),
            });
        }
        Ok(Self { index, values })
    }

    /// Build from `(timestamp, value)` pairs, which must already be time-ordered.
    pub fn from_pairs(pairs: Vec<(NaiveDate, T)>) -> DataResult<Self> {
        let (stamps, values): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
        let index = TemporalIndex::new(stamps)?;
        Ok(Self { index, values })
    }

    pub fn index(&self) -> &TemporalIndex {
        &self.index
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at a timestamp, if the timestamp is indexed.
    pub fn get(&self, ts: NaiveDate) -> Option<&T> {
        self.index.position(ts).map(|pos| &self.values[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &T)> + '_ {
        self.index.iter().zip(self.values.iter())
    }

    /// Transform values, keeping the index.
    pub fn map<U, F>(&self, mut f: F) -> Series<U>
    where
        F: FnMut(NaiveDate, &T) -> U,
    {
        let values = self.iter().map(|(ts, v)| f(ts, v)).collect();
        Series {
            index: self.index.clone(),
            values,
        }
    }

    pub fn into_parts(self) -> (TemporalIndex, Vec<T>) {
        (self.index, self.values)
    }
}

impl<T> Series<Option<T>> {
    /// Number of missing entries.
    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let index = TemporalIndex::business_days(start, 3);
        let err = Series::new(index, vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            DataError::LengthMismatch {
                expected: 3,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_lookup_by_timestamp() {
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let series = Series::from_pairs(vec![(d1, Some(1.5)), (d2, None)]).unwrap();
        assert_eq!(series.get(d1), Some(&Some(1.5)));
        assert_eq!(series.get(d2), Some(&None));
        assert_eq!(series.get(NaiveDate::from_ymd_opt(2024, 1, 4).unwrap()), None);
        assert_eq!(series.missing_count(), 1);
    }

    #[test]
    fn test_from_pairs_rejects_unordered() {
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert!(Series::from_pairs(vec![(d1, 1.0), (d2, 2.0)]).is_err());
    }
}
