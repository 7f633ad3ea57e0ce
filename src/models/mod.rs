pub mod bar;
pub mod derived;

pub use self::bar::{Bar, BarSeries};
pub use self::derived::DerivedSeries;
