pub mod calculator;
pub mod oscillators;
pub mod overlaps;
pub mod ta;

pub use self::calculator::{Indicator, IndicatorType};
pub use self::oscillators::OscillatorCalculator;
pub use self::overlaps::OverlapCalculator;
pub use self::ta::Period;
