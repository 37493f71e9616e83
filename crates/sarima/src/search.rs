//! AIC grid search over candidate orders.
//!
//! Candidates that fail to fit are skipped; the best candidate is the one
//! with the strictly lowest AIC, ties keeping the earlier candidate in
//! enumeration order. Selection is a fold over the candidate list, so there
//! is no mutable best-so-far state threaded through the loop.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SarimaError};
use crate::model::{Sarima, SarimaOrder, SeasonalOrder};

/// Bounds of the candidate grid. Seasonal differencing and period are not
/// searched; the caller fixes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchGrid {
    pub max_p: usize,
    pub max_d: usize,
    pub max_q: usize,
    pub max_seasonal_p: usize,
    pub max_seasonal_q: usize,
}

impl Default for SearchGrid {
    fn default() -> Self {
        Self {
            max_p: 2,
            max_d: 1,
            max_q: 2,
            max_seasonal_p: 1,
            max_seasonal_q: 1,
        }
    }
}

impl SearchGrid {
    /// Candidate orders in enumeration order: p, then d, q, seasonal P,
    /// seasonal Q, innermost last.
    pub fn candidates(
        &self,
        seasonal_d: usize,
        period: usize,
    ) -> Vec<(SarimaOrder, SeasonalOrder)> {
        let mut out = Vec::new();
        for p in 0..=self.max_p {
            for d in 0..=self.max_d {
                for q in 0..=self.max_q {
                    for seasonal_p in 0..=self.max_seasonal_p {
                        for seasonal_q in 0..=self.max_seasonal_q {
                            out.push((
                                SarimaOrder { p, d, q },
                                SeasonalOrder {
                                    p: seasonal_p,
                                    d: seasonal_d,
                                    q: seasonal_q,
                                    period,
                                },
                            ));
                        }
                    }
                }
            }
        }
        out
    }
}

/// The winning candidate of a search run.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub order: SarimaOrder,
    pub seasonal: SeasonalOrder,
    pub aic: f64,
    /// The fitted model, ready for `predict`.
    pub model: Sarima,
}

/// Fit every candidate and keep the one with the lowest AIC.
///
/// Per-candidate failures (insufficient data for high orders, singular
/// normal equations, degenerate variance) are skipped. If nothing fits,
/// `SearchExhausted` is returned rather than a default order.
pub fn select_best(
    data: &[f64],
    grid: &SearchGrid,
    seasonal_d: usize,
    period: usize,
) -> Result<SearchOutcome> {
    grid.candidates(seasonal_d, period)
        .into_iter()
        .filter_map(|(order, seasonal)| {
            let mut model = Sarima::new(order, seasonal).ok()?;
            model.fit(data).ok()?;
            let aic = model.aic();
            aic.is_finite().then_some(SearchOutcome {
                order,
                seasonal,
                aic,
                model,
            })
        })
        .fold(None::<SearchOutcome>, |best, candidate| match best {
            Some(current) if current.aic <= candidate.aic => Some(current),
            _ => Some(candidate),
        })
        .ok_or(SarimaError::SearchExhausted)
}
