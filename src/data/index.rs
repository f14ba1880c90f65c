//! Strictly increasing timestamp index.

use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use super::types::{DataError, DataResult};

/// Ordered, strictly increasing sequence of timestamps.
///
/// Immutable once built. Clones share the same backing storage, so frames
/// and series derived from one source carry the index without copying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporalIndex {
    stamps: Arc<[NaiveDate]>,
}

impl TemporalIndex {
    /// Build an index, rejecting duplicate or out-of-order timestamps.
    pub fn new(stamps: Vec<NaiveDate>) -> DataResult<Self> {
        for (position, pair) in stamps.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(DataError::UnorderedIndex {
                    position: position + 1,
                    previous: pair[0],
                    current: pair[1],
                });
            }
        }
        Ok(Self {
            stamps: stamps.into(),
        })
    }

    /// `n` consecutive weekdays starting at `start` (rolled forward off a weekend).
    pub fn business_days(start: NaiveDate, n: usize) -> Self {
        let mut stamps = Vec::with_capacity(n);
        let mut current = if is_weekend(start) {
            next_trading_day(start)
        } else {
            start
        };
        for _ in 0..n {
            stamps.push(current);
            current = next_trading_day(current);
        }
        Self {
            stamps: stamps.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<NaiveDate> {
        self.stamps.get(position).copied()
    }

    pub fn first(&self) -> Option<NaiveDate> {
        self.stamps.first().copied()
    }

    pub fn last(&self) -> Option<NaiveDate> {
        self.stamps.last().copied()
    }

    /// Row position of a timestamp.
    pub fn position(&self, ts: NaiveDate) -> Option<usize> {
        self.stamps.binary_search(&ts).ok()
    }

    pub fn contains(&self, ts: NaiveDate) -> bool {
        self.position(ts).is_some()
    }

    pub fn as_slice(&self) -> &[NaiveDate] {
        &self.stamps
    }

    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.stamps.iter().copied()
    }

    /// Whether every timestamp is later than the one before it.
    pub fn is_strictly_increasing(&self) -> bool {
        self.stamps.windows(2).all(|w| w[0] < w[1])
    }

    /// Timestamps present in both indexes, in time order.
    pub fn intersection(&self, other: &TemporalIndex) -> Vec<NaiveDate> {
        let (a, b) = (self.as_slice(), other.as_slice());
        let mut common = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            if a[i] == b[j] {
                common.push(a[i]);
                i += 1;
                j += 1;
            } else if a[i] < b[j] {
                i += 1;
            } else {
                j += 1;
            }
        }
        common
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Get the next expected trading day (skip weekends).
fn next_trading_day(date: NaiveDate) -> NaiveDate {
    let mut next = date + Duration::days(1);
    while is_weekend(next) {
        next += Duration::days(1);
    }
    next
}
