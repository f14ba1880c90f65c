//! Feature/label alignment check for look-ahead leakage.
//!
//! Checks:
//! - Both frames are time-ordered and share at least one timestamp
//! - No feature column is (near-)perfectly correlated with a same-timestamp
//!   label column, which usually means a missing lag
//!
//! Best-effort heuristic, not a proof: short or degenerate series can
//! produce false positives and false negatives.

use statrs::statistics::Statistics;
use tracing::{debug, warn};

use crate::config::{AlignmentConfig, ConfigError};
use crate::data::Frame;

/// Message returned when every check passes.
pub const OK_MESSAGE: &str = "ok";

/// Message returned when the frames share no timestamps.
pub const NO_COMMON_INDEX: &str = "no common index";

/// Result of a single validation check.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub details: Option<String>,
}

impl CheckResult {
    pub fn pass(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            message: message.to_string(),
            details: None,
        }
    }

    pub fn fail(name: &str, message: &str, details: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            message: message.to_string(),
            details,
        }
    }
}

/// Every check run for one feature/label pair of frames, in order.
#[derive(Debug, Clone)]
pub struct AlignmentReport {
    /// Timestamps common to both frames.
    pub overlap: usize,
    pub checks: Vec<CheckResult>,
}

impl AlignmentReport {
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn failed_checks(&self) -> Vec<&CheckResult> {
        self.checks.iter().filter(|c| !c.passed).collect()
    }

    /// `(true, "ok")`, or `false` with the first failing check's message.
    pub fn outcome(&self) -> (bool, String) {
        match self.checks.iter().find(|c| !c.passed) {
            Some(failed) => (false, failed.message.clone()),
            None => (true, OK_MESSAGE.to_string()),
        }
    }

    pub fn summary(&self) -> String {
        let passed = self.checks.iter().filter(|c| c.passed).count();
        format!(
            "{} common rows: {}/{} checks passed",
            self.overlap,
            passed,
            self.checks.len()
        )
    }
}

/// Heuristic look-ahead detector for feature and label frames.
#[derive(Debug, Clone, Default)]
pub struct AlignmentValidator {
    config: AlignmentConfig,
}

impl AlignmentValidator {
    pub fn new(config: AlignmentConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AlignmentConfig {
        &self.config
    }

    /// `(ok, message)`; the message names the offending column on failure.
    pub fn validate(&self, features: &Frame, labels: &Frame) -> (bool, String) {
        self.report(features, labels).outcome()
    }

    pub fn report(&self, features: &Frame, labels: &Frame) -> AlignmentReport {
        let ordered =
            features.index().is_strictly_increasing() && labels.index().is_strictly_increasing();
        let common = features.index().intersection(labels.index());

        if !ordered || common.is_empty() {
            warn!(
                feature_rows = features.height(),
                label_rows = labels.height(),
                "feature and label frames share no timestamps"
            );
            return AlignmentReport {
                overlap: 0,
                checks: vec![CheckResult::fail("common_index", NO_COMMON_INDEX, None)],
            };
        }

        // Row positions of each common timestamp in both frames.
        let rows: Vec<(usize, usize)> = common
            .iter()
            .filter_map(|&ts| Some((features.index().position(ts)?, labels.index().position(ts)?)))
            .collect();

        let mut checks = vec![CheckResult::pass(
            "common_index",
            &format!("{} common timestamps", rows.len()),
        )];
        for (feature, fvalues) in features.iter_columns() {
            checks.push(self.check_feature(feature, fvalues, labels, &rows));
        }

        let report = AlignmentReport {
            overlap: rows.len(),
            checks,
        };
        debug!(summary = %report.summary(), "alignment report");
        report
    }

    fn check_feature(
        &self,
        feature: &str,
        fvalues: &[Option<f64>],
        labels: &Frame,
        rows: &[(usize, usize)],
    ) -> CheckResult {
        let name = format!("lookahead_{feature}");
        let mut skipped = 0;

        for (label, lvalues) in labels.iter_columns() {
            let (xs, ys): (Vec<f64>, Vec<f64>) = rows
                .iter()
                .filter_map(|&(fp, lp)| Some((fvalues[fp]?, lvalues[lp]?)))
                .unzip();

            if xs.len() < self.config.min_overlap {
                skipped += 1;
                continue;
            }
            let Some(corr) = pearson(&xs, &ys) else {
                skipped += 1;
                continue;
            };

            if corr.abs() > self.config.max_abs_corr {
                warn!(feature, label, corr, "feature correlates with same-timestamp label");
                return CheckResult::fail(
                    &name,
                    &format!(
                        "feature '{feature}' is near-perfectly correlated with label '{label}' (corr={corr:.6}); missing shift?"
                    ),
                    Some(format!("{} jointly defined rows", xs.len())),
                );
            }
        }

        let details = (skipped > 0).then(|| format!("{skipped} label columns skipped"));
        CheckResult {
            details,
            ..CheckResult::pass(&name, &format!("'{feature}' shows no same-timestamp leakage"))
        }
    }
}

/// Validate with the default thresholds.
pub fn validate_alignment(features: &Frame, labels: &Frame) -> (bool, String) {
    AlignmentValidator::default().validate(features, labels)
}

/// Pearson correlation; `None` when either side has no variance.
fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let sx = xs.std_dev();
    let sy = ys.std_dev();
    if !(sx > 0.0 && sy > 0.0) {
        return None;
    }
    let corr = xs.covariance(ys) / (sx * sy);
    corr.is_finite().then_some(corr)
}
