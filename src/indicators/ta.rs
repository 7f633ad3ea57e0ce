// Rolling-window building blocks shared by every indicator.
//
// Each window is fed one value at a time through `Next` and answers `None`
// until it holds `period` values. A window holding an undefined value stays
// undefined until that value rolls out.

use crate::error::IndicatorError;
use std::collections::VecDeque;
use std::fmt;

/// Value written wherever an indicator has no meaningful output yet.
pub const FILL_VALUE: f64 = 0.0;

/// The `Next` trait is used for windows fed one value at a time
pub trait Next<T> {
    type Output;
    fn next(&mut self, input: T) -> Self::Output;
}

/// Lookback length, always at least one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period(usize);

impl Period {
    /// Window used to smooth stochastic %K into %D.
    pub const THREE: Period = Period(3);

    pub fn new(indicator: &'static str, period: usize) -> Result<Self, IndicatorError> {
        if period == 0 {
            return Err(IndicatorError::InvalidParameter {
                indicator,
                reason: "period must be greater than 0".to_string(),
            });
        }
        Ok(Self(period))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Window {
    period: usize,
    values: VecDeque<Option<f64>>,
}

impl Window {
    fn new(period: Period) -> Self {
        Self {
            period: period.get(),
            values: VecDeque::with_capacity(period.get()),
        }
    }

    fn push(&mut self, input: Option<f64>) {
        if self.values.len() == self.period {
            self.values.pop_front();
        }
        // NaN and infinities count as missing, like an empty cell in the source data
        self.values.push_back(input.filter(|v| v.is_finite()));
    }

    fn is_complete(&self) -> bool {
        self.values.len() == self.period && self.values.iter().all(Option::is_some)
    }

    fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().flatten().copied()
    }

    fn mean(&self) -> f64 {
        self.iter().sum::<f64>() / self.period as f64
    }
}

macro_rules! next_from_f64 {
    ($ty:ty) => {
        impl Next<f64> for $ty {
            type Output = Option<f64>;

            fn next(&mut self, input: f64) -> Self::Output {
                <$ty as Next<Option<f64>>>::next(self, Some(input))
            }
        }
    };
}

/// Simple moving average
#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
    window: Window,
}

impl SimpleMovingAverage {
    pub fn new(period: Period) -> Self {
        Self {
            window: Window::new(period),
        }
    }
}

impl Next<Option<f64>> for SimpleMovingAverage {
    type Output = Option<f64>;

    fn next(&mut self, input: Option<f64>) -> Self::Output {
        self.window.push(input);
        self.window.is_complete().then(|| self.window.mean())
    }
}

next_from_f64!(SimpleMovingAverage);

/// Sample standard deviation (ddof = 1). A one-bar window has none.
#[derive(Debug, Clone)]
pub struct StandardDeviation {
    window: Window,
}

impl StandardDeviation {
    pub fn new(period: Period) -> Self {
        Self {
            window: Window::new(period),
        }
    }
}

impl Next<Option<f64>> for StandardDeviation {
    type Output = Option<f64>;

    fn next(&mut self, input: Option<f64>) -> Self::Output {
        self.window.push(input);
        if !self.window.is_complete() || self.window.period < 2 {
            return None;
        }

        let mean = self.window.mean();
        let variance = self.window.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
            / (self.window.period - 1) as f64;

        Some(variance.sqrt())
    }
}

next_from_f64!(StandardDeviation);

/// Lowest value over the window
#[derive(Debug, Clone)]
pub struct Minimum {
    window: Window,
}

impl Minimum {
    pub fn new(period: Period) -> Self {
        Self {
            window: Window::new(period),
        }
    }
}

impl Next<Option<f64>> for Minimum {
    type Output = Option<f64>;

    fn next(&mut self, input: Option<f64>) -> Self::Output {
        self.window.push(input);
        self.window
            .is_complete()
            .then(|| self.window.iter().fold(f64::INFINITY, f64::min))
    }
}

next_from_f64!(Minimum);

/// Highest value over the window
#[derive(Debug, Clone)]
pub struct Maximum {
    window: Window,
}

impl Maximum {
    pub fn new(period: Period) -> Self {
        Self {
            window: Window::new(period),
        }
    }
}

impl Next<Option<f64>> for Maximum {
    type Output = Option<f64>;

    fn next(&mut self, input: Option<f64>) -> Self::Output {
        self.window.push(input);
        self.window
            .is_complete()
            .then(|| self.window.iter().fold(f64::NEG_INFINITY, f64::max))
    }
}

next_from_f64!(Maximum);

/// Runs a window over a whole column, keeping undefined slots as `None`.
pub fn roll<W, I>(mut window: W, values: I) -> Vec<Option<f64>>
where
    W: Next<Option<f64>, Output = Option<f64>>,
    I: IntoIterator<Item = Option<f64>>,
{
    values.into_iter().map(|v| window.next(v)).collect()
}

pub fn rolling_mean(values: &[f64], period: Period) -> Vec<Option<f64>> {
    roll(SimpleMovingAverage::new(period), values.iter().copied().map(Some))
}

pub fn rolling_std(values: &[f64], period: Period) -> Vec<Option<f64>> {
    roll(StandardDeviation::new(period), values.iter().copied().map(Some))
}

pub fn rolling_min(values: &[f64], period: Period) -> Vec<Option<f64>> {
    roll(Minimum::new(period), values.iter().copied().map(Some))
}

pub fn rolling_max(values: &[f64], period: Period) -> Vec<Option<f64>> {
    roll(Maximum::new(period), values.iter().copied().map(Some))
}

/// Replaces undefined slots with [`FILL_VALUE`].
pub fn fill(values: &[Option<f64>]) -> Vec<f64> {
    values.iter().map(|v| v.unwrap_or(FILL_VALUE)).collect()
}

/// Shifts defined slots down by `offset`, then fills the rest.
pub fn fill_shifted(values: &[Option<f64>], offset: f64) -> Vec<f64> {
    values
        .iter()
        .map(|v| v.map_or(FILL_VALUE, |x| x - offset))
        .collect()
}
