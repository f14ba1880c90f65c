//! Core data types shared by the index, series and frames.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("Timestamps must be strictly increasing: {previous} followed by {current} at position {position}")]
    UnorderedIndex {
        position: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("Length mismatch for {name}: expected {expected}, got {actual}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Unknown column: {0}")]
    UnknownColumn(String),
}

pub type DataResult<T> = Result<T, DataError>;

/// Daily OHLCV bar for an underlying.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    /// Absent for instruments without reported volume.
    pub volume: Option<i64>,
}

impl Bar {
    /// Price fields as `f64`; `None` when a decimal does not fit.
    pub fn prices(&self) -> [Option<f64>; 4] {
        [
            self.open.to_f64(),
            self.high.to_f64(),
            self.low.to_f64(),
            self.close.to_f64(),
        ]
    }
}
