//! Purged k-fold splitter with a post-test embargo.

use std::ops::Range;

use chrono::NaiveDate;
use tracing::debug;

use crate::config::{ConfigError, SplitConfig};
use crate::data::TemporalIndex;

/// One train/test partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    /// Fold number (0-indexed).
    pub fold_num: usize,
    /// Training positions, ascending: `[0, start) ∪ [stop + embargo, n)`.
    pub train: Vec<usize>,
    /// Test positions `[start, stop)`.
    pub test: Range<usize>,
    /// Positions excluded from training after the test block.
    pub embargo: Range<usize>,
}

impl Fold {
    pub fn test_indices(&self) -> Vec<usize> {
        self.test.clone().collect()
    }

    pub fn test_len(&self) -> usize {
        self.test.len()
    }

    pub fn train_len(&self) -> usize {
        self.train.len()
    }

    /// First and last test timestamps.
    pub fn test_bounds(&self, index: &TemporalIndex) -> Option<(NaiveDate, NaiveDate)> {
        let first = index.get(self.test.start)?;
        let last = index.get(self.test.end.checked_sub(1)?)?;
        Some((first, last))
    }
}

/// Purged k-fold splitter.
///
/// Test blocks are contiguous and time-ordered; the first `n % n_splits`
/// blocks get one extra element. Training never includes positions after a
/// test block that fall within `embargo` of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgedKFold {
    n_splits: usize,
    embargo: usize,
}

impl PurgedKFold {
    /// `n_splits` must be at least 2. Negative embargoes clamp to 0.
    pub fn new(n_splits: usize, embargo: i64) -> Result<Self, ConfigError> {
        if n_splits < 2 {
            return Err(ConfigError::InvalidSplits(n_splits));
        }
        Ok(Self {
            n_splits,
            embargo: usize::try_from(embargo.max(0)).unwrap_or(usize::MAX),
        })
    }

    pub fn from_config(config: &SplitConfig) -> Result<Self, ConfigError> {
        Self::new(config.n_splits, config.embargo)
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    pub fn embargo(&self) -> usize {
        self.embargo
    }

    /// Folds over positions `[0, n_samples)`.
    ///
    /// Fails immediately if there are fewer samples than splits; the returned
    /// iterator itself never fails.
    pub fn split(&self, n_samples: usize) -> Result<Folds, ConfigError> {
        if n_samples < self.n_splits {
            return Err(ConfigError::InsufficientSamples {
                n_samples,
                n_splits: self.n_splits,
            });
        }
        Ok(Folds {
            n_samples,
            n_splits: self.n_splits,
            embargo: self.embargo,
            next_fold: 0,
            current: 0,
        })
    }

    /// Folds over every position of a timestamp index.
    pub fn split_index(&self, index: &TemporalIndex) -> Result<Folds, ConfigError> {
        self.split(index.len())
    }

    /// Collect all folds.
    pub fn plan(&self, n_samples: usize) -> Result<FoldPlan, ConfigError> {
        Ok(FoldPlan {
            n_samples,
            folds: self.split(n_samples)?.collect(),
        })
    }
}

/// Lazy, single-pass sequence of exactly `n_splits` folds.
#[derive(Debug, Clone)]
pub struct Folds {
    n_samples: usize,
    n_splits: usize,
    embargo: usize,
    next_fold: usize,
    current: usize,
}

impl Folds {
    fn fold_size(&self, fold: usize) -> usize {
        let base = self.n_samples / self.n_splits;
        if fold < self.n_samples % self.n_splits {
            base + 1
        } else {
            base
        }
    }
}

impl Iterator for Folds {
    type Item = Fold;

    fn next(&mut self) -> Option<Fold> {
        if self.next_fold >= self.n_splits {
            return None;
        }

        let n = self.n_samples;
        let start = self.current;
        let stop = start + self.fold_size(self.next_fold);
        let right_start = stop.saturating_add(self.embargo).min(n);

        let train: Vec<usize> = (0..start).chain(right_start..n).collect();
        let fold = Fold {
            fold_num: self.next_fold,
            train,
            test: start..stop,
            embargo: stop..right_start,
        };

        debug!(
            fold = fold.fold_num,
            test_start = start,
            test_stop = stop,
            train = fold.train.len(),
            embargoed = fold.embargo.len(),
            "purged k-fold split"
        );

        self.current = stop;
        self.next_fold += 1;
        Some(fold)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.n_splits - self.next_fold;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Folds {}

impl std::iter::FusedIterator for Folds {}

/// All folds of one split, in time order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldPlan {
    n_samples: usize,
    folds: Vec<Fold>,
}

impl FoldPlan {
    pub fn folds(&self) -> &[Fold] {
        &self.folds
    }

    pub fn len(&self) -> usize {
        self.folds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folds.is_empty()
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Whether the test blocks tile `[0, n_samples)` in order, each train
    /// set is disjoint from its test block, and no train position falls in
    /// the fold's embargo.
    pub fn check_partition(&self) -> bool {
        let mut expected_start = 0;
        for fold in &self.folds {
            if fold.test.start != expected_start {
                return false;
            }
            let leaked = fold
                .train
                .iter()
                .any(|p| fold.test.contains(p) || fold.embargo.contains(p));
            if leaked {
                return false;
            }
            expected_start = fold.test.end;
        }
        expected_start == self.n_samples
    }
}

impl IntoIterator for FoldPlan {
    type Item = Fold;
    type IntoIter = std::vec::IntoIter<Fold>;

    fn into_iter(self) -> Self::IntoIter {
        self.folds.into_iter()
    }
}
