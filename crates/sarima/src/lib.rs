//! # sarima
//!
//! Seasonal-ARIMA forecasting for monthly count series: the model itself,
//! an AIC-minimizing grid search over candidate orders, and the log/exp
//! pipeline that turns a posting series into a dated forecast.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use sarima::{forecast_monthly, ForecastConfig};
//!
//! let series: Vec<(NaiveDate, f64)> = (0..36)
//!     .map(|i| {
//!         let month = NaiveDate::from_ymd_opt(2021 + i / 12, 1 + (i % 12) as u32, 1).unwrap();
//!         (month, 400.0 + i as f64 * 5.0 + ((i * 31) % 17) as f64)
//!     })
//!     .collect();
//!
//! let config = ForecastConfig { horizon: 6, seasonal_d: 0, ..Default::default() };
//! let report = forecast_monthly(&series, &config).unwrap();
//! assert_eq!(report.points.len(), 6);
//! ```

mod error;
pub mod export;
mod model;
mod pipeline;
mod search;

pub use error::{Result, SarimaError};
pub use model::{Sarima, SarimaOrder, SeasonalOrder};
pub use pipeline::{
    forecast_monthly, exp_series, log_series, ForecastConfig, ForecastPoint, ForecastReport,
    MAX_HORIZON,
};
pub use search::{select_best, SearchGrid, SearchOutcome};
