//! Forecasting error types.

use thiserror::Error;

/// Errors that can occur while fitting or forecasting.
#[derive(Debug, Clone, Error)]
pub enum SarimaError {
    /// Invalid order or pipeline parameter.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Not enough observations for the requested orders.
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// The log transform is undefined for counts at or below zero.
    #[error("Series must be strictly positive for the log transform: found {value} at index {index}")]
    NonPositiveCount { index: usize, value: f64 },

    /// A single candidate failed to fit.
    #[error("Model fitting failed: {0}")]
    FitFailed(String),

    /// Prediction requested before a successful fit.
    #[error("Model has not been fitted")]
    NotFitted,

    /// Every candidate in the search grid failed to fit.
    #[error("No candidate in the search grid could be fitted")]
    SearchExhausted,

    /// Forecast CSV rendering failed.
    #[error("Export failed: {0}")]
    ExportFailed(String),
}

/// Result type for forecasting operations.
pub type Result<T> = std::result::Result<T, SarimaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_error() {
        let error = SarimaError::InsufficientData {
            required: 30,
            actual: 12,
        };
        assert_eq!(
            error.to_string(),
            "Insufficient data: need at least 30 points, got 12"
        );
    }

    #[test]
    fn test_non_positive_count_error() {
        let error = SarimaError::NonPositiveCount {
            index: 3,
            value: 0.0,
        };
        assert!(error.to_string().contains("index 3"));
        assert!(error.to_string().contains("strictly positive"));
    }

    #[test]
    fn test_search_exhausted_error() {
        let error = SarimaError::SearchExhausted;
        assert_eq!(
            error.to_string(),
            "No candidate in the search grid could be fitted"
        );
    }

    #[test]
    fn test_error_is_std_error() {
        fn assert_std_error<E: std::error::Error>() {}
        assert_std_error::<SarimaError>();
    }
}
