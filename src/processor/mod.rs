pub mod indicator_set;

pub use self::indicator_set::{IndicatorSet, PlotCycle};
