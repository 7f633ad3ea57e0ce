//! OHLCV bars and the validated, time-ordered series the indicators read.

use crate::error::SeriesError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A single OHLCV sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(time: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// True when the prices are finite and consistent (high >= open/close >= low)
    /// and the volume is non-negative.
    pub fn is_well_formed(&self) -> bool {
        let prices = [self.open, self.high, self.low, self.close];
        prices.iter().all(|p| p.is_finite())
            && self.high >= self.low
            && self.high >= self.open.max(self.close)
            && self.low <= self.open.min(self.close)
            && self.volume >= 0.0
    }
}

/// Bars for one instrument, strictly ascending by time.
///
/// The series is read-only once built; indicators borrow it and never write
/// helper columns back into it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BarSeries {
    bars: Vec<Bar>,
    anomalies: usize,
}

impl BarSeries {
    /// Validates time ordering and counts malformed bars.
    ///
    /// Out-of-order or duplicate timestamps are rejected. Malformed prices are
    /// only reported: one bad bar must not take the whole chart down.
    pub fn new(bars: Vec<Bar>) -> Result<Self, SeriesError> {
        for (index, pair) in bars.windows(2).enumerate() {
            if pair[1].time <= pair[0].time {
                return Err(SeriesError::NonMonotonicTime {
                    index: index + 1,
                    time: pair[1].time,
                    previous: pair[0].time,
                });
            }
        }

        let anomalies = bars.iter().filter(|bar| !bar.is_well_formed()).count();
        if anomalies > 0 {
            warn!("{} of {} bars have inconsistent prices or volume", anomalies, bars.len());
        }

        Ok(Self { bars, anomalies })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Number of bars that failed [`Bar::is_well_formed`].
    pub fn anomalies(&self) -> usize {
        self.anomalies
    }

    pub fn times(&self) -> Vec<DateTime<Utc>> {
        self.bars.iter().map(|b| b.time).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.column(|b| b.high)
    }

    pub fn lows(&self) -> Vec<f64> {
        self.column(|b| b.low)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.column(|b| b.close)
    }

    fn column<F: Fn(&Bar) -> f64>(&self, f: F) -> Vec<f64> {
        self.bars.iter().map(f).collect()
    }
}

impl TryFrom<Vec<Bar>> for BarSeries {
    type Error = SeriesError;

    fn try_from(bars: Vec<Bar>) -> Result<Self, Self::Error> {
        Self::new(bars)
    }
}
