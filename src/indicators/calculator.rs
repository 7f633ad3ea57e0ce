use crate::error::IndicatorError;
use crate::indicators::oscillators::OscillatorCalculator;
use crate::indicators::overlaps::OverlapCalculator;
use crate::indicators::ta::Period;
use crate::models::{BarSeries, DerivedSeries};
use serde::Serialize;
use std::fmt;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_RSI_PERIOD: usize = 14;
pub const DEFAULT_STOCHASTIC_PERIOD: usize = 14;
pub const DEFAULT_NUM_STD_DEV: f64 = 2.0;

/// Where an indicator is drawn: on the price scale or in an oscillator pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorType {
    Oscillator,
    Overlap,
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Oscillator => write!(f, "oscillator"),
            IndicatorType::Overlap => write!(f, "overlap"),
        }
    }
}

/// One configured indicator. Parameters are validated when the value is
/// built and never change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Indicator {
    Sma { period: Period },
    Rsi { period: Period, offset: f64 },
    Stochastic { period: Period, offset: f64 },
    BollingerBands { period: Period, num_std_dev: f64 },
    DonchianChannels { period: Period },
}

fn finite(indicator: &'static str, what: &str, value: f64) -> Result<f64, IndicatorError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(IndicatorError::InvalidParameter {
            indicator,
            reason: format!("{} must be finite, got {}", what, value),
        })
    }
}

impl Indicator {
    pub fn sma(period: usize) -> Result<Self, IndicatorError> {
        Ok(Self::Sma {
            period: Period::new("SMA", period)?,
        })
    }

    /// `offset` is subtracted from the RSI and its threshold lines.
    pub fn rsi(period: usize, offset: f64) -> Result<Self, IndicatorError> {
        Ok(Self::Rsi {
            period: Period::new("RSI", period)?,
            offset: finite("RSI", "offset", offset)?,
        })
    }

    /// `offset` is subtracted from %K, %D and the threshold lines.
    pub fn stochastic(period: usize, offset: f64) -> Result<Self, IndicatorError> {
        Ok(Self::Stochastic {
            period: Period::new("Stochastic Oscillator", period)?,
            offset: finite("Stochastic Oscillator", "offset", offset)?,
        })
    }

    /// Bands around the rolling mean of the close, `num_std_dev` sample
    /// deviations wide.
    ///
    /// A one-bar window has no sample deviation, so with `period == 1` the
    /// upper and lower bands stay at the fill value while the mean tracks the
    /// close. The `upper >= mean >= lower` ordering only holds for `period >= 2`.
    pub fn bollinger_bands(period: usize, num_std_dev: f64) -> Result<Self, IndicatorError> {
        let num_std_dev = finite("Bollinger bands", "deviation multiplier", num_std_dev)?;
        if num_std_dev < 0.0 {
            return Err(IndicatorError::InvalidParameter {
                indicator: "Bollinger bands",
                reason: format!("deviation multiplier must not be negative, got {}", num_std_dev),
            });
        }
        Ok(Self::BollingerBands {
            period: Period::new("Bollinger bands", period)?,
            num_std_dev,
        })
    }

    pub fn donchian_channels(period: usize) -> Result<Self, IndicatorError> {
        Ok(Self::DonchianChannels {
            period: Period::new("Donchian channels", period)?,
        })
    }

    pub fn name(&self) -> String {
        match self {
            Indicator::Sma { period } => format!("SMA {}", period),
            Indicator::Rsi { .. } => "RSI".to_string(),
            Indicator::Stochastic { .. } => "Stochastic Oscillator".to_string(),
            Indicator::BollingerBands { period, .. } => format!("Bollinger bands {}", period),
            Indicator::DonchianChannels { period } => format!("Donchian channels {}", period),
        }
    }

    pub fn indicator_type(&self) -> IndicatorType {
        match self {
            Indicator::Rsi { .. } | Indicator::Stochastic { .. } => IndicatorType::Oscillator,
            Indicator::Sma { .. }
            | Indicator::BollingerBands { .. }
            | Indicator::DonchianChannels { .. } => IndicatorType::Overlap,
        }
    }

    /// Output column names, in the order they appear in the derived series.
    pub fn field_names(&self) -> Vec<String> {
        match self {
            Indicator::Sma { period } => vec![format!("SMA {}", period)],
            Indicator::Rsi { .. } => {
                vec!["RSI".to_string(), "RSI 30%".to_string(), "RSI 70%".to_string()]
            }
            Indicator::Stochastic { .. } => vec![
                "%K".to_string(),
                "%D".to_string(),
                "Stochastic 20%".to_string(),
                "Stochastic 80%".to_string(),
            ],
            Indicator::BollingerBands { period, .. } => band_fields("Bollinger", *period),
            Indicator::DonchianChannels { period } => band_fields("Donchian", *period),
        }
    }

    /// Computes the indicator over the whole series. The series is only read.
    pub fn compute(&self, series: &BarSeries) -> DerivedSeries {
        let columns = match *self {
            Indicator::Sma { period } => vec![OverlapCalculator::calculate_sma(series, period)],
            Indicator::Rsi { period, offset } => {
                let cols = OscillatorCalculator::calculate_rsi(series, period, offset);
                vec![cols.rsi, cols.line_30, cols.line_70]
            }
            Indicator::Stochastic { period, offset } => {
                let cols = OscillatorCalculator::calculate_stochastic(series, period, offset);
                vec![cols.k, cols.d, cols.line_20, cols.line_80]
            }
            Indicator::BollingerBands {
                period,
                num_std_dev,
            } => {
                let cols = OverlapCalculator::calculate_bollinger_bands(series, period, num_std_dev);
                vec![cols.upper, cols.mean, cols.lower]
            }
            Indicator::DonchianChannels { period } => {
                let cols = OverlapCalculator::calculate_donchian_channels(series, period);
                vec![cols.upper, cols.mean, cols.lower]
            }
        };

        self.field_names()
            .into_iter()
            .zip(columns)
            .fold(DerivedSeries::new(self.name(), series.times()), |out, (field, column)| {
                out.with_field(field, column)
            })
    }

    /// Zero-length output carrying this indicator's name and fields.
    pub fn empty_output(&self) -> DerivedSeries {
        DerivedSeries::empty(self.name(), self.field_names())
    }
}

fn band_fields(family: &str, period: Period) -> Vec<String> {
    ["Upper", "Mean", "Lower"]
        .iter()
        .map(|line| format!("{} {} {}", line, family, period))
        .collect()
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.indicator_type())
    }
}
