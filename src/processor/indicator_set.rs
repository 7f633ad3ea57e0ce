use crate::config::OscillatorOffsets;
use crate::error::IndicatorError;
use crate::indicators::calculator::{
    Indicator, DEFAULT_NUM_STD_DEV, DEFAULT_PERIOD, DEFAULT_RSI_PERIOD, DEFAULT_STOCHASTIC_PERIOD,
};
use crate::models::{BarSeries, DerivedSeries};
use crate::utils::{format_span, measure_time};
use rayon::prelude::*;
use serde::Serialize;
use std::fmt::Display;
use tracing::{info, instrument, warn};

/// Result of one plot cycle: one derived series per indicator, in set order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotCycle {
    pub outputs: Vec<DerivedSeries>,
    /// Why the outputs are empty, when the upstream series could not be used.
    pub diagnostic: Option<String>,
    pub bars: usize,
    pub anomalies: usize,
}

impl PlotCycle {
    pub fn is_usable(&self) -> bool {
        self.diagnostic.is_none()
    }
}

/// Fixed collection of indicators applied to one bar series per cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    indicators: Vec<Indicator>,
}

impl IndicatorSet {
    pub fn new(indicators: Vec<Indicator>) -> Self {
        Self { indicators }
    }

    /// The chart's standard overlays: SMA 9 and 4, RSI 14, Stochastic 14,
    /// Bollinger 20/2 and Donchian 20.
    pub fn standard(offsets: &OscillatorOffsets) -> Result<Self, IndicatorError> {
        Ok(Self::new(vec![
            Indicator::sma(9)?,
            Indicator::sma(4)?,
            Indicator::rsi(DEFAULT_RSI_PERIOD, offsets.rsi)?,
            Indicator::stochastic(DEFAULT_STOCHASTIC_PERIOD, offsets.stochastic)?,
            Indicator::bollinger_bands(DEFAULT_PERIOD, DEFAULT_NUM_STD_DEV)?,
            Indicator::donchian_channels(DEFAULT_PERIOD)?,
        ]))
    }

    pub fn indicators(&self) -> &[Indicator] {
        &self.indicators
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    /// Computes every indicator from scratch, in parallel. Output order
    /// matches the set order.
    #[instrument(skip_all, fields(bars = series.len(), indicators = self.indicators.len()))]
    pub fn compute(&self, series: &BarSeries) -> Vec<DerivedSeries> {
        self.indicators
            .par_iter()
            .map(|indicator| measure_time(&indicator.name(), || indicator.compute(series)))
            .collect()
    }

    /// Runs a full cycle over whatever the upstream source produced. A failed
    /// source yields empty outputs plus a diagnostic instead of an error.
    pub fn compute_cycle<E: Display>(&self, source: Result<BarSeries, E>) -> PlotCycle {
        match source {
            Ok(series) => {
                info!(
                    "Computing {} indicators over {} bars ({})",
                    self.indicators.len(),
                    series.len(),
                    format_span(&series.times())
                );
                PlotCycle {
                    outputs: self.compute(&series),
                    diagnostic: None,
                    bars: series.len(),
                    anomalies: series.anomalies(),
                }
            }
            Err(e) => {
                let diagnostic = format!("bar series unavailable: {}", e);
                warn!("{}", diagnostic);
                PlotCycle {
                    outputs: self.indicators.iter().map(Indicator::empty_output).collect(),
                    diagnostic: Some(diagnostic),
                    bars: 0,
                    anomalies: 0,
                }
            }
        }
    }
}
