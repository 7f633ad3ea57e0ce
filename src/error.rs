use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

/// Problems with the shape of a bar series handed to the engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SeriesError {
    #[error("bar {index} at {time} is not after the previous bar at {previous}")]
    NonMonotonicTime {
        index: usize,
        time: DateTime<Utc>,
        previous: DateTime<Utc>,
    },
}

/// Invalid indicator parameters, caught when the indicator is built.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("{indicator}: {reason}")]
    InvalidParameter {
        indicator: &'static str,
        reason: String,
    },
}

/// Failures while loading a bar series from an upstream source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no cached bar file named {file_name} under {data_dir}")]
    NotCached { data_dir: PathBuf, file_name: String },

    #[error("data directory {0} does not exist")]
    MissingDataDir(PathBuf),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: cannot parse {column} value '{value}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("invalid bar series: {0}")]
    Series(#[from] SeriesError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures while handing overlays to a chart sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to encode overlays: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
