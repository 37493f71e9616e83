//! Monthly forecast pipeline.
//!
//! Transform → grid search → forecast → inverse transform: counts are
//! log-transformed to stabilize variance, the best candidate order is chosen
//! by AIC, and the forecast is exponentiated back and paired with the months
//! that follow the last observation.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SarimaError};
use crate::model::{SarimaOrder, SeasonalOrder};
use crate::search::{select_best, SearchGrid};

/// Longest supported forecast horizon in months.
pub const MAX_HORIZON: usize = 24;

/// Pipeline parameters. `seasonal_d` and `period` are fixed here rather than
/// searched; the grid covers the remaining orders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Months ahead to forecast, 1..=24.
    pub horizon: usize,
    /// Seasonal differencing order, 0 or 1.
    pub seasonal_d: usize,
    /// Season length in months, typically 12.
    pub period: usize,
    /// Candidate grid bounds.
    pub grid: SearchGrid,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: 12,
            seasonal_d: 1,
            period: 12,
            grid: SearchGrid::default(),
        }
    }
}

/// One forecasted month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub month: NaiveDate,
    pub value: f64,
}

/// Outcome of a pipeline run: the chosen orders and the forecast itself.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastReport {
    pub order: SarimaOrder,
    pub seasonal: SeasonalOrder,
    pub aic: f64,
    pub points: Vec<ForecastPoint>,
}

/// Run the full pipeline on a strictly ordered, strictly positive monthly
/// count series.
pub fn forecast_monthly(
    series: &[(NaiveDate, f64)],
    config: &ForecastConfig,
) -> Result<ForecastReport> {
    if config.horizon == 0 || config.horizon > MAX_HORIZON {
        return Err(SarimaError::InvalidParameter {
            name: "horizon".to_string(),
            reason: format!("must be between 1 and {MAX_HORIZON}"),
        });
    }
    if series.is_empty() {
        return Err(SarimaError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }
    for pair in series.windows(2) {
        if pair[1].0 <= pair[0].0 {
            return Err(SarimaError::InvalidParameter {
                name: "series".to_string(),
                reason: "months must be strictly increasing".to_string(),
            });
        }
    }

    let counts: Vec<f64> = series.iter().map(|(_, count)| *count).collect();
    let logged = log_series(&counts)?;

    let outcome = select_best(&logged, &config.grid, config.seasonal_d, config.period)?;
    let predicted = outcome.model.predict(config.horizon)?;

    let last_month = series.last().expect("non-empty series").0;
    let points = future_months(last_month, config.horizon)
        .into_iter()
        .zip(exp_series(&predicted))
        .map(|(month, value)| ForecastPoint { month, value })
        .collect();

    Ok(ForecastReport {
        order: outcome.order,
        seasonal: outcome.seasonal,
        aic: outcome.aic,
        points,
    })
}

/// Natural log of every value; fails on the first non-positive entry.
pub fn log_series(values: &[f64]) -> Result<Vec<f64>> {
    for (index, &value) in values.iter().enumerate() {
        if !(value > 0.0) {
            return Err(SarimaError::NonPositiveCount { index, value });
        }
    }
    Ok(values.iter().map(|v| v.ln()).collect())
}

/// Inverse of [`log_series`].
pub fn exp_series(values: &[f64]) -> Vec<f64> {
    values.iter().map(|v| v.exp()).collect()
}

/// The `count` consecutive months immediately after `last`.
pub fn future_months(last: NaiveDate, count: usize) -> Vec<NaiveDate> {
    (1..=count as u32)
        .map(|offset| last + Months::new(offset))
        .collect()
}
