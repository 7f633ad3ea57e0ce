use chrono::{DateTime, Utc};
use std::time::Instant;
use tracing::debug;

// Run a synchronous operation and log how long it took
pub fn measure_time<F, T>(operation_name: &str, f: F) -> T
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed();

    debug!("{} completed in {:.2?}", operation_name, elapsed);

    result
}

// Format a timestamp for logging
pub fn format_time(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// First and last timestamp of a run of times, formatted for a log line.
pub fn format_span(times: &[DateTime<Utc>]) -> String {
    match (times.first(), times.last()) {
        (Some(first), Some(last)) => format!("{} .. {}", format_time(first), format_time(last)),
        _ => "empty".to_string(),
    }
}
