//! Leakage diagnostics for feature and label frames.
//!
//! The checks here are non-fatal: callers decide whether a failed
//! alignment aborts training.

pub mod alignment;

pub use alignment::{
    validate_alignment, AlignmentReport, AlignmentValidator, CheckResult, NO_COMMON_INDEX,
    OK_MESSAGE,
};
