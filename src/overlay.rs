//! Plain-data overlays for a chart renderer.
//!
//! The engine never talks to a charting library. It turns each derived
//! series into styled lines and hands them to an [`OverlaySink`].

use crate::config::EngineConfig;
use crate::error::SinkError;
use crate::indicators::{Indicator, IndicatorType};
use crate::models::DerivedSeries;
use crate::processor::PlotCycle;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayPoint {
    pub time: DateTime<Utc>,
    pub value: f64,
}

/// One drawable line: a single field of a derived series plus its style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayLine {
    pub indicator: String,
    pub indicator_type: IndicatorType,
    pub name: String,
    pub color: String,
    pub width: u32,
    pub points: Vec<OverlayPoint>,
}

/// Everything a renderer needs for one symbol and one plot cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartOverlay {
    pub symbol: String,
    pub bars: usize,
    pub anomalies: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
    pub lines: Vec<OverlayLine>,
}

impl ChartOverlay {
    /// Pairs each output of `cycle` with the indicator that produced it.
    pub fn from_cycle(
        symbol: &str,
        indicators: &[Indicator],
        cycle: &PlotCycle,
        config: &EngineConfig,
    ) -> Self {
        let lines = indicators
            .iter()
            .zip(&cycle.outputs)
            .flat_map(|(indicator, series)| lines_for(indicator.indicator_type(), series, config))
            .collect();

        Self {
            symbol: symbol.to_string(),
            bars: cycle.bars,
            anomalies: cycle.anomalies,
            diagnostic: cycle.diagnostic.clone(),
            lines,
        }
    }
}

/// One line per field of `series`, in field order.
pub fn lines_for(
    indicator_type: IndicatorType,
    series: &DerivedSeries,
    config: &EngineConfig,
) -> Vec<OverlayLine> {
    series
        .fields
        .iter()
        .map(|(field, values)| OverlayLine {
            indicator: series.name.clone(),
            indicator_type,
            name: field.clone(),
            color: config.color_for(field),
            width: config.line_width,
            points: series
                .time
                .iter()
                .zip(values)
                .map(|(&time, &value)| OverlayPoint { time, value })
                .collect(),
        })
        .collect()
}

/// Consumer of finished overlays, e.g. a chart widget bridge.
pub trait OverlaySink {
    fn publish(&mut self, overlay: &ChartOverlay) -> Result<(), SinkError>;
}

/// Writes overlays as pretty-printed JSON.
pub struct JsonOverlaySink<W: Write> {
    writer: W,
}

impl<W: Write> JsonOverlaySink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OverlaySink for JsonOverlaySink<W> {
    fn publish(&mut self, overlay: &ChartOverlay) -> Result<(), SinkError> {
        serde_json::to_writer_pretty(&mut self.writer, overlay)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
