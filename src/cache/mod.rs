pub mod bar_cache;

pub use self::bar_cache::CsvBarCache;

use crate::error::SourceError;
use crate::models::BarSeries;
use chrono::{DateTime, NaiveDate, Utc};

/// Interval whose cache files carry no interval tag.
pub const DAILY_INTERVAL: &str = "1d";

/// What the chart asks its data source for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarRequest {
    pub symbol: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: NaiveDate,
    pub interval: String,
}

impl BarRequest {
    /// Normalises the symbol (trimmed, upper-case) and the interval
    /// (trimmed, lower-case).
    pub fn new(symbol: &str, start_date: Option<NaiveDate>, end_date: NaiveDate, interval: &str) -> Self {
        Self {
            symbol: symbol.trim().to_uppercase(),
            start_date,
            end_date,
            interval: interval.trim().to_lowercase(),
        }
    }

    /// `{SYMBOL}_{end_date}.csv` for daily bars, `{SYMBOL}_{interval}_{end_date}.csv`
    /// for any other interval.
    pub fn cache_file_name(&self) -> String {
        let end_date = self.end_date.format("%Y-%m-%d");
        if self.interval.is_empty() || self.interval == DAILY_INTERVAL {
            format!("{}_{}.csv", self.symbol, end_date)
        } else {
            format!("{}_{}_{}.csv", self.symbol, self.interval, end_date)
        }
    }

    /// Whether a bar at `time` falls inside the requested dates (inclusive).
    pub fn covers(&self, time: DateTime<Utc>) -> bool {
        let date = time.date_naive();
        self.start_date.map_or(true, |start| date >= start) && date <= self.end_date
    }
}

/// Anything that can hand the engine a bar series for a request.
pub trait BarSource {
    fn load(&self, request: &BarRequest) -> Result<BarSeries, SourceError>;
}
