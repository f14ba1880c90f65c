//! Named columns of optional values over a shared index.

use chrono::NaiveDate;

use super::index::TemporalIndex;
use super::series::Series;
use super::types::{DataError, DataResult};

/// Column-oriented table keyed by timestamp.
///
/// `None` is the missing marker: it is never a numeric placeholder and is
/// never produced by arithmetic on present values.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    index: TemporalIndex,
    columns: Vec<(String, Vec<Option<f64>>)>,
}

/// Causally lagged features.
pub type FeatureFrame = Frame;

/// Forward-looking labels.
pub type LabelFrame = Frame;

impl Frame {
    pub fn new(index: TemporalIndex) -> Self {
        Self {
            index,
            columns: Vec::new(),
        }
    }

    /// Add a column, replacing any column with the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<Option<f64>>) -> DataResult<()> {
        let name = name.into();
        if values.len() != self.index.len() {
            return Err(DataError::LengthMismatch {
                name,
                expected: self.index.len(),
                actual: values.len(),
            });
        }
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = values,
            None => self.columns.push((name, values)),
        }
        Ok(())
    }

    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Option<f64>>) -> DataResult<Self> {
        self.insert(name, values)?;
        Ok(self)
    }

    pub fn index(&self) -> &TemporalIndex {
        &self.index
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.index.len()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    /// Iterate `(name, values)` in column order.
    pub fn iter_columns(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> + '_ {
        self.columns.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    /// Copy one column out as a series sharing this frame's index.
    pub fn series(&self, name: &str) -> DataResult<Series<Option<f64>>> {
        let values = self
            .column(name)
            .ok_or_else(|| DataError::UnknownColumn(name.to_string()))?;
        Series::new(self.index.clone(), values.to_vec())
    }

    /// All column values at one timestamp.
    pub fn row(&self, ts: NaiveDate) -> Option<Vec<(&str, Option<f64>)>> {
        let pos = self.index.position(ts)?;
        Some(
            self.columns
                .iter()
                .map(|(n, v)| (n.as_str(), v[pos]))
                .collect(),
        )
    }

    /// New frame holding only the named columns, in the requested order.
    pub fn select(&self, names: &[&str]) -> DataResult<Frame> {
        let mut out = Frame::new(self.index.clone());
        for name in names {
            let values = self
                .column(name)
                .ok_or_else(|| DataError::UnknownColumn(name.to_string()))?;
            out.insert(*name, values.to_vec())?;
        }
        Ok(out)
    }

    /// Missing entries per column.
    pub fn missing_counts(&self) -> Vec<(&str, usize)> {
        self.columns
            .iter()
            .map(|(n, v)| (n.as_str(), v.iter().filter(|x| x.is_none()).count()))
            .collect()
    }
}

impl From<Series<Option<f64>>> for Frame {
    /// Single-column frame named `value`.
    fn from(series: Series<Option<f64>>) -> Self {
        let (index, values) = series.into_parts();
        Frame {
            index,
            columns: vec![("value".to_string(), values)],
        }
    }
}
