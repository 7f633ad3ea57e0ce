// Oscillators bounded to 0..100, optionally translated down by a display
// offset so their pane can share the price axis. The offset only touches
// defined values and the threshold lines; warm-up slots stay at the fill value.

use crate::indicators::ta::{self, Next, Period, SimpleMovingAverage};
use crate::models::BarSeries;
use tracing::debug;

/// RSI line and its two constant threshold lines.
#[derive(Debug, Clone, PartialEq)]
pub struct RsiColumns {
    pub rsi: Vec<f64>,
    pub line_30: Vec<f64>,
    pub line_70: Vec<f64>,
}

/// %K, %D and the two constant threshold lines.
#[derive(Debug, Clone, PartialEq)]
pub struct StochasticColumns {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
    pub line_20: Vec<f64>,
    pub line_80: Vec<f64>,
}

pub struct OscillatorCalculator;

impl OscillatorCalculator {
    /// RSI from simple rolling means of gains and losses.
    ///
    /// The first delta is taken as 0, so the first value lands at index
    /// `period - 1`. A window with no losses reads 100, a window with no
    /// movement at all reads 50.
    pub fn calculate_rsi(series: &BarSeries, period: Period, offset: f64) -> RsiColumns {
        let closes = series.closes();

        // A delta touching a non-finite close is undefined
        let deltas: Vec<Option<f64>> = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| match i {
                0 => close.is_finite().then_some(0.0),
                _ => Some(close - closes[i - 1]).filter(|d| d.is_finite()),
            })
            .collect();

        let gains = deltas.iter().map(|d| d.map(|x| x.max(0.0)));
        let losses = deltas.iter().map(|d| d.map(|x| (-x).max(0.0)));

        let avg_gain = ta::roll(SimpleMovingAverage::new(period), gains);
        let avg_loss = ta::roll(SimpleMovingAverage::new(period), losses);

        let rsi: Vec<Option<f64>> = avg_gain
            .iter()
            .zip(&avg_loss)
            .map(|(g, l)| Some(rsi_from_averages((*g)?, (*l)?)))
            .collect();

        debug!(period = period.get(), offset, bars = closes.len(), "rsi");

        RsiColumns {
            rsi: ta::fill_shifted(&rsi, offset),
            line_30: vec![70.0 - offset; closes.len()],
            line_70: vec![30.0 - offset; closes.len()],
        }
    }

    /// Stochastic oscillator with a 3-bar %D.
    ///
    /// A window whose high equals its low has no %K; that slot and every %D
    /// window containing it are written as the fill value.
    pub fn calculate_stochastic(series: &BarSeries, period: Period, offset: f64) -> StochasticColumns {
        let lowest = ta::rolling_min(&series.lows(), period);
        let highest = ta::rolling_max(&series.highs(), period);

        let k: Vec<Option<f64>> = series
            .bars()
            .iter()
            .zip(lowest.iter().zip(&highest))
            .map(|(bar, (lo, hi))| {
                let (lo, hi) = ((*lo)?, (*hi)?);
                if !bar.close.is_finite() {
                    return None;
                }
                let range = hi - lo;
                (range != 0.0).then(|| 100.0 * (bar.close - lo) / range)
            })
            .collect();

        let mut smoother = SimpleMovingAverage::new(Period::THREE);
        let d: Vec<Option<f64>> = k.iter().map(|&value| smoother.next(value)).collect();

        debug!(period = period.get(), offset, bars = series.len(), "stochastic");

        StochasticColumns {
            k: ta::fill_shifted(&k, offset),
            d: ta::fill_shifted(&d, offset),
            line_20: vec![80.0 - offset; series.len()],
            line_80: vec![20.0 - offset; series.len()],
        }
    }
}

// Convert average gain / average loss into an RSI value in [0, 100]
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    }
}
