use crate::indicators::ta::{self, Period};
use crate::models::BarSeries;
use tracing::debug;

/// Upper, middle and lower lines of a band or channel indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct BandColumns {
    pub upper: Vec<f64>,
    pub mean: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Indicators drawn on the price scale itself.
pub struct OverlapCalculator;

impl OverlapCalculator {
    // Calculate SMA (Simple Moving Average) of the close
    pub fn calculate_sma(series: &BarSeries, period: Period) -> Vec<f64> {
        let closes = series.closes();
        ta::fill(&ta::rolling_mean(&closes, period))
    }

    // Calculate Bollinger Bands: mean of the close +/- sample std * multiplier
    pub fn calculate_bollinger_bands(
        series: &BarSeries,
        period: Period,
        num_std_dev: f64,
    ) -> BandColumns {
        let closes = series.closes();
        let mean = ta::rolling_mean(&closes, period);
        let std = ta::rolling_std(&closes, period);

        let band = |sign: f64| -> Vec<Option<f64>> {
            mean.iter()
                .zip(&std)
                .map(|(m, s)| Some((*m)? + sign * (*s)? * num_std_dev))
                .collect()
        };
        let upper = band(1.0);
        let lower = band(-1.0);

        debug!(period = period.get(), num_std_dev, bars = closes.len(), "bollinger bands");

        BandColumns {
            upper: ta::fill(&upper),
            mean: ta::fill(&mean),
            lower: ta::fill(&lower),
        }
    }

    // Calculate Donchian Channels: highest high, lowest low and their midpoint
    pub fn calculate_donchian_channels(series: &BarSeries, period: Period) -> BandColumns {
        let upper = ta::rolling_max(&series.highs(), period);
        let lower = ta::rolling_min(&series.lows(), period);

        let mean: Vec<Option<f64>> = upper
            .iter()
            .zip(&lower)
            .map(|(u, l)| Some(((*u)? + (*l)?) / 2.0))
            .collect();

        debug!(period = period.get(), bars = series.len(), "donchian channels");

        BandColumns {
            upper: ta::fill(&upper),
            mean: ta::fill(&mean),
            lower: ta::fill(&lower),
        }
    }
}
