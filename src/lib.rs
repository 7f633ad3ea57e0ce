//! Technical indicator engine for OHLCV bar series.
//!
//! Bars come in through a [`cache::BarSource`], every indicator in an
//! [`processor::IndicatorSet`] turns the series into a [`models::DerivedSeries`],
//! and [`overlay`] shapes the results into plain data for a chart renderer.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod indicators;
pub mod models;
pub mod overlay;
pub mod processor;
pub mod utils;

pub use crate::error::{IndicatorError, SeriesError, SinkError, SourceError};
pub use crate::indicators::{Indicator, IndicatorType};
pub use crate::models::{Bar, BarSeries, DerivedSeries};
pub use crate::processor::{IndicatorSet, PlotCycle};
