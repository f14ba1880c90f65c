//! Raw OHLCV input table.

use super::frame::Frame;
use super::index::TemporalIndex;
use super::types::{Bar, DataResult};

/// Columns every OHLCV table must carry (matched case-insensitively).
pub const REQUIRED_COLUMNS: &[&str] = &["open", "high", "low", "close"];

/// Raw columns that pass through unshifted when present.
pub const OPTIONAL_COLUMNS: &[&str] = &["volume"];

/// Raw OHLCV rows keyed by timestamp.
///
/// Column names are kept exactly as supplied; normalization to lower case
/// and the required-column check happen in the feature transformer.
#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvTable {
    frame: Frame,
}

impl OhlcvTable {
    pub fn new(index: TemporalIndex) -> Self {
        Self {
            frame: Frame::new(index),
        }
    }

    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Option<f64>>) -> DataResult<Self> {
        self.frame.insert(name, values)?;
        Ok(self)
    }

    /// Build from daily bars. The `volume` column is added only when at
    /// least one bar reports volume.
    pub fn from_bars(bars: &[Bar]) -> DataResult<Self> {
        let index = TemporalIndex::new(bars.iter().map(|b| b.date).collect())?;
        let mut frame = Frame::new(index);

        let prices: Vec<[Option<f64>; 4]> = bars.iter().map(Bar::prices).collect();
        for (i, name) in REQUIRED_COLUMNS.iter().enumerate() {
            frame.insert(*name, prices.iter().map(|p| p[i]).collect())?;
        }

        if bars.iter().any(|b| b.volume.is_some()) {
            frame.insert(
                "volume",
                bars.iter().map(|b| b.volume.map(|v| v as f64)).collect(),
            )?;
        }

        Ok(Self { frame })
    }

    pub fn index(&self) -> &TemporalIndex {
        self.frame.index()
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn columns(&self) -> Vec<&str> {
        self.frame.columns()
    }
}

impl From<Frame> for OhlcvTable {
    fn from(frame: Frame) -> Self {
        Self { frame }
    }
}
