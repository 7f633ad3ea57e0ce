//! Read-only loader for cached bar files named `{SYMBOL}_{end_date}.csv`.
//!
//! Files are the ones the chart's downloader leaves behind: an optional
//! unnamed index column followed by `time, open, high, low, close, volume`
//! (yfinance's capitalised `Date, Open, ...` headers are accepted too).

use crate::cache::{BarRequest, BarSource};
use crate::error::SourceError;
use crate::models::{Bar, BarSeries};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

const TIME_HEADERS: &[&str] = &["time", "date", "datetime"];

#[derive(Debug, Clone)]
pub struct CsvBarCache {
    data_dir: PathBuf,
}

impl CsvBarCache {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Case-insensitive search for `file_name` anywhere under the data directory.
    pub fn find(&self, file_name: &str) -> Result<Option<PathBuf>, SourceError> {
        if !self.data_dir.is_dir() {
            return Err(SourceError::MissingDataDir(self.data_dir.clone()));
        }
        find_file(&self.data_dir, file_name)
    }
}

impl BarSource for CsvBarCache {
    #[instrument(skip(self), fields(symbol = %request.symbol))]
    fn load(&self, request: &BarRequest) -> Result<BarSeries, SourceError> {
        let file_name = request.cache_file_name();
        let path = self.find(&file_name)?.ok_or_else(|| SourceError::NotCached {
            data_dir: self.data_dir.clone(),
            file_name: file_name.clone(),
        })?;

        info!("Get data for \"{}\" from {}", request.symbol, path.display());
        let bars = read_bars(fs::File::open(&path)?)?;
        let total = bars.len();

        let bars: Vec<Bar> = bars
            .into_iter()
            .filter(|bar| request.covers(bar.time))
            .collect();
        debug!("Kept {} of {} bars inside the requested range", bars.len(), total);

        Ok(BarSeries::new(bars)?)
    }
}

fn find_file(dir: &Path, file_name: &str) -> Result<Option<PathBuf>, SourceError> {
    let mut subdirs = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
        } else if entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.eq_ignore_ascii_case(file_name))
        {
            return Ok(Some(path));
        }
    }

    for subdir in subdirs {
        if let Some(found) = find_file(&subdir, file_name)? {
            return Ok(Some(found));
        }
    }

    Ok(None)
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    time: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self, SourceError> {
        Ok(Self {
            time: position(headers, TIME_HEADERS, "time")?,
            open: position(headers, &["open"], "open")?,
            high: position(headers, &["high"], "high")?,
            low: position(headers, &["low"], "low")?,
            close: position(headers, &["close"], "close")?,
            volume: position(headers, &["volume"], "volume")?,
        })
    }
}

fn position(
    headers: &csv::StringRecord,
    names: &[&str],
    column: &'static str,
) -> Result<usize, SourceError> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
        .ok_or(SourceError::MissingColumn(column))
}

/// Parses bar rows from CSV text. Rows keep file order.
pub fn read_bars<R: Read>(reader: R) -> Result<Vec<Bar>, SourceError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let columns = Columns::locate(reader.headers()?)?;

    let mut bars = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let field = |index: usize| record.get(index).unwrap_or("");
        let number = |index: usize, column: &'static str| {
            field(index).parse::<f64>().map_err(|_| SourceError::InvalidValue {
                row: row + 1,
                column,
                value: field(index).to_string(),
            })
        };

        let time = parse_time(field(columns.time)).ok_or_else(|| SourceError::InvalidValue {
            row: row + 1,
            column: "time",
            value: field(columns.time).to_string(),
        })?;

        bars.push(Bar::new(
            time,
            number(columns.open, "open")?,
            number(columns.high, "high")?,
            number(columns.low, "low")?,
            number(columns.close, "close")?,
            number(columns.volume, "volume")?,
        ));
    }

    Ok(bars)
}

/// Accepts RFC 3339, `2024-06-10 00:00:00-04:00`, `2024-06-10 00:00:00`
/// and plain dates (taken as midnight UTC).
pub fn parse_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(t) = DateTime::parse_from_rfc3339(value) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(t.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc())
}
