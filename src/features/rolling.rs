//! Vector primitives over optional values.
//!
//! All functions look backwards only. A result that cannot be computed, or
//! that is not finite, is `None`.

use statrs::statistics::Statistics;

/// Division that yields `None` for missing inputs, zero denominators and
/// non-finite results.
pub fn safe_div(numer: Option<f64>, denom: Option<f64>) -> Option<f64> {
    match (numer, denom) {
        (Some(n), Some(d)) if d != 0.0 => finite(n / d),
        _ => None,
    }
}

pub fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

/// Lag by `periods` rows; the first `periods` rows become missing.
pub fn shift(values: &[Option<f64>], periods: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut out = vec![None; n];
    for i in periods..n {
        out[i] = values[i - periods];
    }
    out
}

/// `x[t] / x[t - periods] - 1`.
pub fn pct_change(values: &[Option<f64>], periods: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if periods == 0 {
        return out;
    }
    for i in periods..values.len() {
        out[i] = safe_div(values[i], values[i - periods]).map(|r| r - 1.0);
    }
    out
}

/// `a[t] - b[t]`, missing if either side is.
pub fn sub(a: &[Option<f64>], b: &[Option<f64>]) -> Vec<Option<f64>> {
    a.iter()
        .zip(b)
        .map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => finite(x - y),
            _ => None,
        })
        .collect()
}

/// Element-wise [`safe_div`].
pub fn div(numer: &[Option<f64>], denom: &[Option<f64>]) -> Vec<Option<f64>> {
    numer
        .iter()
        .zip(denom)
        .map(|(n, d)| safe_div(*n, *d))
        .collect()
}

/// Trailing windows of exactly `window` present values ending at each row.
fn rolling_apply<F>(values: &[Option<f64>], window: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    let mut out = vec![None; values.len()];
    if window == 0 {
        return out;
    }
    let mut buf = Vec::with_capacity(window);
    for i in (window - 1)..values.len() {
        buf.clear();
        buf.extend(values[i + 1 - window..=i].iter().flatten().copied());
        // Any missing value in the window leaves it short.
        if buf.len() == window {
            out[i] = finite(f(&buf));
        }
    }
    out
}

/// Trailing mean over a full window.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling_apply(values, window, |w| w.mean())
}

/// Trailing sample standard deviation (ddof = 1) over a full window.
/// A window of one has no defined deviation.
pub fn rolling_std(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling_apply(values, window, |w| w.std_dev())
}
