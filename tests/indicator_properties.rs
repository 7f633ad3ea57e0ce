use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use stock_chart_indicators::config::OscillatorOffsets;
use stock_chart_indicators::models::{Bar, BarSeries};
use stock_chart_indicators::{Indicator, IndicatorSet};

fn series_from(rows: &[(f64, f64, f64)]) -> BarSeries {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let bars = rows
        .iter()
        .enumerate()
        .map(|(i, &(close, up, down))| {
            Bar::new(
                start + Duration::days(i as i64),
                close,
                close + up,
                close - down,
                close,
                1_000.0,
            )
        })
        .collect();
    BarSeries::new(bars).unwrap()
}

fn bar_rows() -> impl Strategy<Value = Vec<(f64, f64, f64)>> {
    prop::collection::vec((1.0f64..500.0, 0.0f64..10.0, 0.0f64..10.0), 0..80)
}

// Mostly ordinary closes, with the odd NaN or infinite one the series keeps as an anomaly
fn close_with_gaps() -> impl Strategy<Value = f64> {
    prop_oneof![
        16 => 1.0f64..500.0,
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
        1 => Just(f64::NEG_INFINITY),
    ]
}

fn bar_rows_with_gaps() -> impl Strategy<Value = Vec<(f64, f64, f64)>> {
    prop::collection::vec((close_with_gaps(), 0.0f64..10.0, 0.0f64..10.0), 0..80)
}

proptest! {
    #[test]
    fn every_field_matches_series_length(rows in bar_rows_with_gaps(), period in 1usize..30) {
        let series = series_from(&rows);
        let indicators = [
            Indicator::sma(period).unwrap(),
            Indicator::rsi(period, 100.0).unwrap(),
            Indicator::stochastic(period, 200.0).unwrap(),
            Indicator::bollinger_bands(period, 2.0).unwrap(),
            Indicator::donchian_channels(period).unwrap(),
        ];
        for indicator in &indicators {
            let out = indicator.compute(&series);
            prop_assert_eq!(out.len(), series.len());
            prop_assert_eq!(&out.time, &series.times());
            for (field, column) in &out.fields {
                prop_assert_eq!(column.len(), series.len());
                prop_assert!(column.iter().all(|v| v.is_finite()), "{} has a non-finite value", field);
            }
        }
    }

    #[test]
    fn bands_are_ordered_once_defined(rows in bar_rows(), period in 1usize..25) {
        let series = series_from(&rows);
        let bollinger = Indicator::bollinger_bands(period, 2.0).unwrap().compute(&series);
        let donchian = Indicator::donchian_channels(period).unwrap().compute(&series);
        let b = |f: &str| bollinger.field(&format!("{} Bollinger {}", f, period)).unwrap().to_vec();
        let d = |f: &str| donchian.field(&format!("{} Donchian {}", f, period)).unwrap().to_vec();

        for i in (period - 1)..series.len() {
            if period > 1 {
                prop_assert!(b("Upper")[i] + 1e-9 >= b("Mean")[i]);
                prop_assert!(b("Mean")[i] + 1e-9 >= b("Lower")[i]);
            }
            prop_assert!(d("Upper")[i] >= d("Mean")[i]);
            prop_assert!(d("Mean")[i] >= d("Lower")[i]);
        }
    }

    #[test]
    fn oscillators_stay_in_range(rows in bar_rows_with_gaps(), period in 1usize..20) {
        let series = series_from(&rows);
        let rsi = Indicator::rsi(period, 0.0).unwrap().compute(&series);
        let stoch = Indicator::stochastic(period, 0.0).unwrap().compute(&series);

        for v in rsi.field("RSI").unwrap() {
            prop_assert!((0.0..=100.0).contains(v));
        }
        for name in ["%K", "%D"] {
            for v in stoch.field(name).unwrap() {
                prop_assert!((-1e-9..=100.0 + 1e-9).contains(v));
            }
        }
    }

    #[test]
    fn recomputing_gives_identical_output(rows in bar_rows()) {
        let series = series_from(&rows);
        let set = IndicatorSet::standard(&OscillatorOffsets { rsi: 100.0, stochastic: 200.0 }).unwrap();
        prop_assert_eq!(set.compute(&series), set.compute(&series));
    }

    #[test]
    fn sma_of_constant_closes_is_the_constant(price in 1.0f64..1_000.0, n in 1usize..60, period in 1usize..20) {
        let series = series_from(&vec![(price, 0.0, 0.0); n]);
        let out = Indicator::sma(period).unwrap().compute(&series);
        let column = out.field(&format!("SMA {}", period)).unwrap();
        for (i, v) in column.iter().enumerate() {
            if i + 1 >= period {
                prop_assert!((v - price).abs() < 1e-9 * price.max(1.0));
            } else {
                prop_assert_eq!(*v, 0.0);
            }
        }
    }
}

#[test]
fn strictly_rising_closes_pin_rsi_at_100() {
    let rows: Vec<_> = (1..=40).map(|c| (f64::from(c), 1.0, 1.0)).collect();
    let out = Indicator::rsi(14, 0.0).unwrap().compute(&series_from(&rows));
    let rsi = out.field("RSI").unwrap();
    assert!(rsi[13..].iter().all(|&v| v == 100.0));
}

#[test]
fn non_finite_closes_never_reach_the_output() {
    let rows = [
        (1.0, 1.0, 1.0),
        (2.0, 1.0, 1.0),
        (f64::NAN, 1.0, 1.0),
        (4.0, 1.0, 1.0),
        (f64::INFINITY, 1.0, 1.0),
        (5.0, 1.0, 1.0),
        (f64::NEG_INFINITY, 1.0, 1.0),
        (6.0, 1.0, 1.0),
        (7.0, 1.0, 1.0),
    ];
    let series = series_from(&rows);
    assert_eq!(series.anomalies(), 3);

    for period in 1..=3 {
        let indicators = [
            Indicator::sma(period).unwrap(),
            Indicator::rsi(period, 100.0).unwrap(),
            Indicator::stochastic(period, 200.0).unwrap(),
            Indicator::bollinger_bands(period, 2.0).unwrap(),
            Indicator::donchian_channels(period).unwrap(),
        ];
        for indicator in &indicators {
            let out = indicator.compute(&series);
            for (field, column) in &out.fields {
                assert!(column.iter().all(|v| v.is_finite()), "{} / {}: {:?}", indicator, field, column);
            }
        }
    }

    // windows holding a gap are filled, clean windows after it are defined
    let sma = Indicator::sma(2).unwrap().compute(&series);
    assert_eq!(sma.field("SMA 2").unwrap(), &[0.0, 1.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 6.5]);
}

#[test]
fn twenty_identical_bars() {
    let series = series_from(&vec![(10.0, 0.0, 0.0); 20]);
    let set = IndicatorSet::standard(&OscillatorOffsets::default()).unwrap();
    let outputs = set.compute(&series);

    let bollinger = &outputs[4];
    for field in ["Upper Bollinger 20", "Mean Bollinger 20", "Lower Bollinger 20"] {
        assert_eq!(bollinger.value(field, 19), Some(10.0));
    }
    let donchian = &outputs[5];
    assert_eq!(donchian.value("Mean Donchian 20", 19), Some(10.0));

    // no movement: neutral RSI, undefined stochastic filled with 0
    assert_eq!(outputs[2].value("RSI", 19), Some(50.0));
    assert_eq!(outputs[3].value("%K", 19), Some(0.0));
    assert_eq!(outputs[3].value("%D", 19), Some(0.0));
}

#[test]
fn empty_series_yields_empty_outputs() {
    let set = IndicatorSet::standard(&OscillatorOffsets::default()).unwrap();
    let outputs = set.compute(&BarSeries::empty());
    assert_eq!(outputs.len(), 6);
    for out in outputs {
        assert!(out.is_empty());
        assert!(out.fields.values().all(Vec::is_empty));
    }
}

#[test]
fn offsets_shift_oscillator_lines() {
    let rows: Vec<_> = (1..=20).map(|c| (f64::from(c), 2.0, 2.0)).collect();
    let series = series_from(&rows);
    let set = IndicatorSet::standard(&OscillatorOffsets { rsi: 100.0, stochastic: 200.0 }).unwrap();
    let outputs = set.compute(&series);

    assert_eq!(outputs[2].value("RSI", 19), Some(0.0));
    assert_eq!(outputs[2].value("RSI 30%", 0), Some(-30.0));
    assert_eq!(outputs[2].value("RSI 70%", 0), Some(-70.0));
    assert_eq!(outputs[3].value("Stochastic 20%", 0), Some(-120.0));
    assert_eq!(outputs[3].value("Stochastic 80%", 0), Some(-180.0));
}
