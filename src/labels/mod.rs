//! Forward-looking targets.
//!
//! - Forward returns per horizon with a trailing embargo
//! - Binary labels against a threshold
//! - Meta-labels scoring only the rows a primary signal flagged

pub mod targets;

pub use targets::{binary_labels, forward_returns, meta_labels, return_column, LabelGenerator};
