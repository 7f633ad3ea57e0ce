pub mod log_utils;
#[allow(clippy::module_inception)]
pub mod utils;

pub use self::utils::{format_span, format_time, measure_time};
