use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

/// Output of one indicator: named columns aligned index-for-index with the
/// bar series they were computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedSeries {
    pub name: String,
    pub time: Vec<DateTime<Utc>>,
    pub fields: IndexMap<String, Vec<f64>>,
}

impl DerivedSeries {
    pub fn new(name: impl Into<String>, time: Vec<DateTime<Utc>>) -> Self {
        Self {
            name: name.into(),
            time,
            fields: IndexMap::new(),
        }
    }

    /// A zero-length series that still advertises its field names, so a sink
    /// can clear the matching lines.
    pub fn empty<I, S>(name: impl Into<String>, field_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut series = Self::new(name, Vec::new());
        for field in field_names {
            series.fields.insert(field.into(), Vec::new());
        }
        series
    }

    /// Appends a column. Columns keep insertion order.
    pub fn with_field(mut self, field: impl Into<String>, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), self.time.len(), "column length must match the bar series");
        self.fields.insert(field.into(), values);
        self
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&[f64]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn value(&self, field: &str, index: usize) -> Option<f64> {
        self.fields.get(field).and_then(|column| column.get(index).copied())
    }
}
