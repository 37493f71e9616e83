//! Seasonal-ARIMA model.
//!
//! The model combines the usual ARIMA components with their seasonal
//! counterparts at a fixed period:
//!
//! - **AR / seasonal AR**: past values at lags `1..=p` and `s, 2s, ..`
//! - **I / seasonal I**: regular and seasonal differencing to stationarity
//! - **MA / seasonal MA**: past one-step errors at the same lag structure
//!
//! Estimation is conditional least squares: AR terms come from the normal
//! equations over the fully differenced series, MA terms from the residual
//! autocorrelation. The fit exposes an AIC so that candidate orders can be
//! compared by the grid search.
//!
//! ## Example
//!
//! ```rust
//! use sarima::{Sarima, SarimaOrder, SeasonalOrder};
//!
//! let data: Vec<f64> = (1..=60).map(|x| x as f64 + (x as f64 * 0.5).sin()).collect();
//! let mut model = Sarima::new(
//!     SarimaOrder { p: 1, d: 1, q: 0 },
//!     SeasonalOrder { p: 0, d: 0, q: 0, period: 12 },
//! ).unwrap();
//! model.fit(&data).unwrap();
//! assert_eq!(model.predict(3).unwrap().len(), 3);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SarimaError};

/// Non-seasonal order (p, d, q).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SarimaOrder {
    /// AR order.
    pub p: usize,
    /// Differencing order.
    pub d: usize,
    /// MA order.
    pub q: usize,
}

impl fmt::Display for SarimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.p, self.d, self.q)
    }
}

/// Seasonal order (P, D, Q, s).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalOrder {
    /// Seasonal AR order.
    pub p: usize,
    /// Seasonal differencing order.
    pub d: usize,
    /// Seasonal MA order.
    pub q: usize,
    /// Season length in observations, 12 for monthly data.
    pub period: usize,
}

impl fmt::Display for SeasonalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{},{})", self.p, self.d, self.q, self.period)
    }
}

/// Seasonal-ARIMA model with conditional least-squares estimation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sarima {
    order: SarimaOrder,
    seasonal: SeasonalOrder,
    /// Combined AR lag structure: {1..=p} ∪ {s, .., P·s}, sorted, distinct.
    ar_lags: Vec<usize>,
    /// Combined MA lag structure: {1..=q} ∪ {s, .., Q·s}, sorted, distinct.
    ma_lags: Vec<usize>,
    ar_coeffs: Vec<f64>,
    ma_coeffs: Vec<f64>,
    constant: f64,
    /// Differencing stages: stage 0 is the original series, stage d the
    /// regularly differenced one. Needed to invert forecasts.
    diff_stages: Vec<Vec<f64>>,
    /// Seasonal stages on top of the regular ones; the last stage is the
    /// working series the coefficients are estimated on.
    seasonal_stages: Vec<Vec<f64>>,
    residuals: Vec<f64>,
    sigma2: f64,
    aic: f64,
    fitted: bool,
}

impl Sarima {
    /// Create an unfitted model with validated orders.
    pub fn new(order: SarimaOrder, seasonal: SeasonalOrder) -> Result<Self> {
        if order.p > 5 {
            return Err(invalid("p", "AR order must be <= 5"));
        }
        if order.d > 2 {
            return Err(invalid("d", "differencing order must be <= 2"));
        }
        if order.q > 5 {
            return Err(invalid("q", "MA order must be <= 5"));
        }
        if seasonal.p > 3 {
            return Err(invalid("P", "seasonal AR order must be <= 3"));
        }
        if seasonal.d > 1 {
            return Err(invalid("D", "seasonal differencing order must be <= 1"));
        }
        if seasonal.q > 3 {
            return Err(invalid("Q", "seasonal MA order must be <= 3"));
        }
        if seasonal.period == 0 {
            return Err(invalid("s", "seasonal period must be >= 1"));
        }

        let ar_lags = lag_structure(order.p, seasonal.p, seasonal.period);
        let ma_lags = lag_structure(order.q, seasonal.q, seasonal.period);

        Ok(Self {
            order,
            seasonal,
            ar_coeffs: vec![0.0; ar_lags.len()],
            ma_coeffs: vec![0.0; ma_lags.len()],
            ar_lags,
            ma_lags,
            constant: 0.0,
            diff_stages: Vec::new(),
            seasonal_stages: Vec::new(),
            residuals: Vec::new(),
            sigma2: 0.0,
            aic: f64::NAN,
            fitted: false,
        })
    }

    /// Fit on an observed series.
    pub fn fit(&mut self, data: &[f64]) -> Result<()> {
        let max_ar = self.ar_lags.last().copied().unwrap_or(0);
        let max_ma = self.ma_lags.last().copied().unwrap_or(0);
        let min_required =
            self.order.d + self.seasonal.d * self.seasonal.period + max_ar.max(max_ma) + 10;
        if data.len() < min_required {
            return Err(SarimaError::InsufficientData {
                required: min_required,
                actual: data.len(),
            });
        }
        if data.iter().any(|x| !x.is_finite()) {
            return Err(SarimaError::FitFailed(
                "data contains NaN or infinite values".to_string(),
            ));
        }

        // Regular differencing stages, then seasonal on top.
        self.diff_stages = difference_stages(data, self.order.d, 1);
        let after_regular = self.diff_stages.last().cloned().unwrap_or_default();
        self.seasonal_stages =
            difference_stages(&after_regular, self.seasonal.d, self.seasonal.period);

        let work = self.seasonal_stages.last().cloned().unwrap_or_default();
        let n = work.len();
        if n <= max_ar + self.ar_lags.len() + 1 {
            return Err(SarimaError::InsufficientData {
                required: min_required,
                actual: data.len(),
            });
        }

        // AR terms and intercept via the normal equations.
        let (constant, ar_coeffs) = estimate_ar(&work, &self.ar_lags)?;
        self.constant = constant;
        self.ar_coeffs = ar_coeffs;

        // One-step residuals of the AR part.
        self.residuals = vec![0.0; n];
        for t in max_ar..n {
            let mut prediction = self.constant;
            for (lag, phi) in self.ar_lags.iter().zip(&self.ar_coeffs) {
                prediction += phi * work[t - lag];
            }
            self.residuals[t] = work[t] - prediction;
        }

        // MA terms from residual autocorrelation, bounded for stability.
        self.ma_coeffs = estimate_ma(&self.residuals[max_ar..], &self.ma_lags);

        let m = n - max_ar;
        let ssr: f64 = self.residuals[max_ar..].iter().map(|e| e * e).sum();
        self.sigma2 = ssr / m as f64;
        if !self.sigma2.is_finite() || self.sigma2 < 1e-12 {
            return Err(SarimaError::FitFailed(
                "degenerate residual variance".to_string(),
            ));
        }

        let k = self.ar_lags.len() + self.ma_lags.len() + 1;
        self.aic = m as f64 * self.sigma2.ln() + 2.0 * (k + 1) as f64;
        if !self.aic.is_finite() {
            return Err(SarimaError::FitFailed("non-finite AIC".to_string()));
        }

        self.fitted = true;
        Ok(())
    }

    /// Forecast `steps` points on the original scale.
    pub fn predict(&self, steps: usize) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(SarimaError::NotFitted);
        }
        if steps == 0 {
            return Ok(Vec::new());
        }

        let work = self.seasonal_stages.last().cloned().unwrap_or_default();
        let n = work.len();
        let mut extended = work;
        let mut extended_residuals = self.residuals.clone();

        for _ in 0..steps {
            let mut forecast = self.constant;
            for (lag, phi) in self.ar_lags.iter().zip(&self.ar_coeffs) {
                forecast += phi * extended[extended.len() - lag];
            }
            for (lag, theta) in self.ma_lags.iter().zip(&self.ma_coeffs) {
                if extended_residuals.len() >= *lag {
                    forecast += theta * extended_residuals[extended_residuals.len() - lag];
                }
            }
            extended.push(forecast);
            // Future shocks are their expectation, zero.
            extended_residuals.push(0.0);
        }

        let differenced = extended[n..].to_vec();
        let seasonal_undone = self.invert_seasonal(&differenced);
        Ok(self.invert_regular(&seasonal_undone))
    }

    /// Akaike Information Criterion of the last fit; NaN before fitting.
    pub fn aic(&self) -> f64 {
        self.aic
    }

    /// Residual variance of the last fit.
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    pub fn order(&self) -> SarimaOrder {
        self.order
    }

    pub fn seasonal_order(&self) -> SeasonalOrder {
        self.seasonal
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coeffs
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coeffs
    }

    /// Undo seasonal differencing using the tail of each earlier stage.
    fn invert_seasonal(&self, forecasts: &[f64]) -> Vec<f64> {
        let s = self.seasonal.period;
        let mut result = forecasts.to_vec();
        for stage in (0..self.seasonal.d).rev() {
            let base = &self.seasonal_stages[stage];
            let mut undone: Vec<f64> = Vec::with_capacity(result.len());
            for (i, &f) in result.iter().enumerate() {
                let prev = if i < s {
                    base[base.len() - s + i]
                } else {
                    undone[i - s]
                };
                undone.push(f + prev);
            }
            result = undone;
        }
        result
    }

    /// Undo regular differencing by cumulative summation from each stage tail.
    fn invert_regular(&self, forecasts: &[f64]) -> Vec<f64> {
        let mut result = forecasts.to_vec();
        for stage in (0..self.order.d).rev() {
            let base = &self.diff_stages[stage];
            let mut acc = base[base.len() - 1];
            for value in result.iter_mut() {
                acc += *value;
                *value = acc;
            }
        }
        result
    }
}

fn invalid(name: &str, reason: &str) -> SarimaError {
    SarimaError::InvalidParameter {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

/// Lags {1..=base} ∪ {period, .., seasonal·period}, sorted and distinct.
fn lag_structure(base: usize, seasonal: usize, period: usize) -> Vec<usize> {
    let mut lags: Vec<usize> = (1..=base).collect();
    lags.extend((1..=seasonal).map(|i| i * period));
    lags.sort_unstable();
    lags.dedup();
    lags
}

/// Successive differencing stages at the given lag. Stage 0 is the input;
/// `order` further stages follow.
fn difference_stages(data: &[f64], order: usize, lag: usize) -> Vec<Vec<f64>> {
    let mut stages = vec![data.to_vec()];
    for _ in 0..order {
        let current = stages.last().expect("at least the input stage");
        let next: Vec<f64> = current
            .iter()
            .skip(lag)
            .zip(current.iter())
            .map(|(curr, prev)| curr - prev)
            .collect();
        stages.push(next);
    }
    stages
}

/// Least-squares AR fit: regress work[t] on an intercept and the lagged
/// values. Returns (intercept, coefficients in lag order).
fn estimate_ar(work: &[f64], lags: &[usize]) -> Result<(f64, Vec<f64>)> {
    let max_lag = lags.last().copied().unwrap_or(0);
    let n = work.len();
    let rows = n - max_lag;
    let cols = lags.len() + 1;

    // Normal equations X'X beta = X'y, built without materializing X.
    let mut xtx = vec![vec![0.0; cols]; cols];
    let mut xty = vec![0.0; cols];
    for t in max_lag..n {
        let mut predictors = Vec::with_capacity(cols);
        predictors.push(1.0);
        for lag in lags {
            predictors.push(work[t - lag]);
        }
        for i in 0..cols {
            for j in 0..cols {
                xtx[i][j] += predictors[i] * predictors[j];
            }
            xty[i] += predictors[i] * work[t];
        }
    }
    debug_assert!(rows >= cols);

    let beta = solve_linear(xtx, xty)?;
    let (constant, coeffs) = beta.split_first().expect("intercept column");
    Ok((*constant, coeffs.to_vec()))
}

/// Gaussian elimination with partial pivoting. A vanishing pivot means the
/// lagged predictors are collinear and the candidate cannot be fitted.
fn solve_linear(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&i, &j| {
                a[i][col]
                    .abs()
                    .partial_cmp(&a[j][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .expect("non-empty system");
        if a[pivot_row][col].abs() < 1e-10 {
            return Err(SarimaError::FitFailed(
                "singular normal equations".to_string(),
            ));
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut sum = b[row];
        for col in (row + 1)..n {
            sum -= a[row][col] * x[col];
        }
        x[row] = sum / a[row][row];
    }
    Ok(x)
}

/// MA terms from the autocorrelation of the AR residuals: each coefficient
/// is the lag autocovariance over the variance, clamped for stability.
fn estimate_ma(residuals: &[f64], lags: &[usize]) -> Vec<f64> {
    if lags.is_empty() || residuals.is_empty() {
        return vec![0.0; lags.len()];
    }

    let n = residuals.len();
    let mean: f64 = residuals.iter().sum::<f64>() / n as f64;
    let centered: Vec<f64> = residuals.iter().map(|e| e - mean).collect();
    let var: f64 = centered.iter().map(|e| e * e).sum::<f64>() / n as f64;

    let mut coeffs = vec![0.0; lags.len()];
    if var.abs() > 1e-10 {
        for (slot, &lag) in coeffs.iter_mut().zip(lags) {
            if lag >= n {
                continue;
            }
            let mut sum = 0.0;
            for i in lag..n {
                sum += centered[i] * centered[i - lag];
            }
            *slot = ((sum / n as f64) / var).clamp(-0.99, 0.99);
        }
    }
    coeffs
}
