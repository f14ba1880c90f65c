//! Purged k-fold cross-validation.
//!
//! Splits ordered observations into contiguous test blocks:
//! - Train: everything before the block, plus everything after the embargo
//! - Test: the block itself
//! - Embargo: the positions right after the block, excluded from both

pub mod purged;

pub use purged::{Fold, FoldPlan, Folds, PurgedKFold};
