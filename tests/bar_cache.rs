use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use stock_chart_indicators::cache::{BarRequest, BarSource, CsvBarCache};
use stock_chart_indicators::config::OscillatorOffsets;
use stock_chart_indicators::{IndicatorSet, SourceError};
use tempfile::TempDir;

const BARS: &str = ",time,open,high,low,close,volume
0,2024-07-22,10.0,11.0,9.5,10.5,1000
1,2024-07-23,10.5,11.5,10.0,11.0,1100
2,2024-07-24,11.0,12.0,10.5,11.5,900
3,2024-07-25,11.5,12.5,11.0,12.0,1300
4,2024-07-26,12.0,13.0,11.5,12.5,1250
";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn write(dir: &Path, name: &str, contents: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(name), contents).unwrap();
}

fn request(symbol: &str, start: Option<NaiveDate>) -> BarRequest {
    BarRequest::new(symbol, start, date(2024, 7, 26), "1d")
}

#[test]
fn loads_file_regardless_of_case() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "aapl_2024-07-26.csv", BARS);

    let series = CsvBarCache::new(tmp.path()).load(&request("AAPL", None)).unwrap();
    assert_eq!(series.len(), 5);
    assert_eq!(series.closes()[4], 12.5);
}

#[test]
fn finds_files_in_nested_directories() {
    let tmp = TempDir::new().unwrap();
    write(&tmp.path().join("daily").join("2024"), "MSFT_2024-07-26.csv", BARS);

    let cache = CsvBarCache::new(tmp.path());
    assert!(cache.find("msft_2024-07-26.csv").unwrap().is_some());
    assert_eq!(cache.load(&request("msft", None)).unwrap().len(), 5);
}

#[test]
fn interval_selects_its_own_cache_file() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "AAPL_2024-07-26.csv", BARS);
    let hourly = "time,open,high,low,close,volume
2024-07-26 14:00:00,12.0,12.2,11.9,12.1,300
2024-07-26 15:00:00,12.1,12.4,12.0,12.3,280
";
    write(tmp.path(), "AAPL_1h_2024-07-26.csv", hourly);

    let cache = CsvBarCache::new(tmp.path());
    let daily = cache.load(&request("AAPL", None)).unwrap();
    let intraday = cache
        .load(&BarRequest::new("AAPL", None, date(2024, 7, 26), "1h"))
        .unwrap();

    assert_eq!(daily.len(), 5);
    assert_eq!(intraday.closes(), vec![12.1, 12.3]);
}

#[test]
fn start_date_trims_the_series() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "TSLA_2024-07-26.csv", BARS);

    let series = CsvBarCache::new(tmp.path())
        .load(&request("TSLA", Some(date(2024, 7, 24))))
        .unwrap();
    assert_eq!(series.len(), 3);
    assert_eq!(series.closes(), vec![11.5, 12.0, 12.5]);
}

#[test]
fn missing_file_is_not_cached() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "AAPL_2024-07-25.csv", BARS);

    let err = CsvBarCache::new(tmp.path()).load(&request("AAPL", None)).unwrap_err();
    match err {
        SourceError::NotCached { file_name, .. } => assert_eq!(file_name, "AAPL_2024-07-26.csv"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_data_dir_is_reported() {
    let tmp = TempDir::new().unwrap();
    let cache = CsvBarCache::new(tmp.path().join("nope"));
    assert!(matches!(
        cache.load(&request("AAPL", None)),
        Err(SourceError::MissingDataDir(_))
    ));
}

#[test]
fn out_of_order_rows_are_rejected() {
    let tmp = TempDir::new().unwrap();
    let shuffled = "time,open,high,low,close,volume
2024-07-23,10,11,9,10,100
2024-07-22,10,11,9,10,100
";
    write(tmp.path(), "IBM_2024-07-26.csv", shuffled);

    let err = CsvBarCache::new(tmp.path()).load(&request("IBM", None)).unwrap_err();
    assert!(matches!(err, SourceError::Series(_)));
}

#[test]
fn failed_load_becomes_a_diagnostic_cycle() {
    let tmp = TempDir::new().unwrap();
    let set = IndicatorSet::standard(&OscillatorOffsets::default()).unwrap();

    let cycle = set.compute_cycle(CsvBarCache::new(tmp.path()).load(&request("NVDA", None)));
    assert!(!cycle.is_usable());
    assert!(cycle.diagnostic.unwrap().contains("NVDA_2024-07-26.csv"));
    assert!(cycle.outputs.iter().all(|out| out.is_empty()));
}

#[test]
fn cached_bars_feed_the_standard_set() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "AAPL_2024-07-26.csv", BARS);
    let set = IndicatorSet::standard(&OscillatorOffsets::default()).unwrap();

    let cycle = set.compute_cycle(CsvBarCache::new(tmp.path()).load(&request("AAPL", None)));
    assert!(cycle.is_usable());
    assert_eq!(cycle.bars, 5);

    // SMA 4 is defined from the fourth bar: (10.5 + 11 + 11.5 + 12) / 4
    assert_eq!(cycle.outputs[1].value("SMA 4", 3), Some(11.25));
    assert_eq!(cycle.outputs[1].value("SMA 4", 2), Some(0.0));
}
