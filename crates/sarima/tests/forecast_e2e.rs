//! End-to-end tests for the sarima crate.
//!
//! Exercises the public pipeline the way the dashboard does: a two-year
//! monthly posting series in, a dated forecast out.

use chrono::{Months, NaiveDate};
use sarima::{forecast_monthly, ForecastConfig, SarimaError, SearchGrid};

fn month(year: i32, m: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, m, 1).unwrap()
}

/// 24 months of positive posting counts with a mild trend and yearly swing.
fn two_year_series() -> Vec<(NaiveDate, f64)> {
    let counts = [
        100.0, 110.0, 90.0, 130.0, 125.0, 140.0, 150.0, 135.0, 120.0, 145.0, 160.0, 155.0,
        150.0, 165.0, 140.0, 175.0, 170.0, 185.0, 190.0, 180.0, 170.0, 195.0, 205.0, 200.0,
    ];
    counts
        .iter()
        .enumerate()
        .map(|(i, &count)| (month(2022, 1) + Months::new(i as u32), count))
        .collect()
}

#[test]
fn e2e_six_month_forecast_from_two_years() {
    let series = two_year_series();
    let config = ForecastConfig {
        horizon: 6,
        seasonal_d: 0,
        period: 12,
        grid: SearchGrid::default(),
    };

    let report = forecast_monthly(&series, &config).unwrap();

    assert_eq!(report.points.len(), 6);
    assert!(report.aic.is_finite());

    // Timestamps are the six consecutive months after Dec 2023.
    let expected: Vec<NaiveDate> = (1..=6)
        .map(|offset| month(2023, 12) + Months::new(offset))
        .collect();
    let actual: Vec<NaiveDate> = report.points.iter().map(|p| p.month).collect();
    assert_eq!(actual, expected);

    for point in &report.points {
        assert!(point.value > 0.0, "forecast for {} was {}", point.month, point.value);
    }
}

#[test]
fn e2e_forecast_months_strictly_increase() {
    let series = two_year_series();
    let config = ForecastConfig {
        horizon: 12,
        seasonal_d: 0,
        ..ForecastConfig::default()
    };
    let report = forecast_monthly(&series, &config).unwrap();
    for pair in report.points.windows(2) {
        assert!(pair[1].month > pair[0].month);
    }
}

#[test]
fn e2e_exhausted_grid_surfaces_error() {
    // Five points cannot satisfy any candidate's minimum length.
    let series: Vec<(NaiveDate, f64)> = (0..5)
        .map(|i| (month(2023, 1) + Months::new(i), 100.0 + i as f64))
        .collect();
    let config = ForecastConfig {
        horizon: 6,
        seasonal_d: 1,
        ..ForecastConfig::default()
    };
    let result = forecast_monthly(&series, &config);
    assert!(matches!(result, Err(SarimaError::SearchExhausted)));
}

#[test]
fn e2e_export_matches_forecast() {
    let series = two_year_series();
    let config = ForecastConfig {
        horizon: 3,
        seasonal_d: 0,
        ..ForecastConfig::default()
    };
    let report = forecast_monthly(&series, &config).unwrap();
    let csv = sarima::export::to_csv_string(&report.points).unwrap();

    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "date,forecast");
    assert!(lines[1].starts_with("2024-01-01,"));
    assert!(lines[3].starts_with("2024-03-01,"));
}
