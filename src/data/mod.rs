//! Tabular time-series primitives.
//!
//! Every frame and series is keyed by a strictly increasing
//! [`TemporalIndex`]; timestamps are the join key across frames.

pub mod frame;
pub mod index;
pub mod ohlcv;
pub mod series;
pub mod types;

pub use frame::{FeatureFrame, Frame, LabelFrame};
pub use index::TemporalIndex;
pub use ohlcv::{OhlcvTable, OPTIONAL_COLUMNS, REQUIRED_COLUMNS};
pub use series::{Series, TimeSeries};
pub use types::{Bar, DataError, DataResult};
