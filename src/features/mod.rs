//! Causal feature construction from OHLCV bars.
//!
//! Every derived column is computed from rows at or before `t` and then
//! lag-shifted one more step before it is exposed.

pub mod microstructure;
pub mod rolling;

pub use microstructure::{FeatureTransformer, RAW_COLUMNS};
