//! Geocoding error types.

use thiserror::Error;

/// Errors from the lookup service. An empty result is not an error; the
/// resolver returns `Ok(None)` for places the service does not know.
#[derive(Debug, Clone, Error)]
pub enum GeocodeError {
    /// Transport-level failure: connection refused, DNS, HTTP status.
    #[error("Lookup unavailable: {0}")]
    Unavailable(String),

    /// The request exceeded the configured timeout.
    #[error("Lookup timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The service answered with something other than the expected JSON.
    #[error("Malformed lookup response: {0}")]
    MalformedResponse(String),
}

/// Result type for geocoding operations.
pub type Result<T> = std::result::Result<T, GeocodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_error() {
        let error = GeocodeError::Unavailable("connection refused".to_string());
        assert_eq!(error.to_string(), "Lookup unavailable: connection refused");
    }

    #[test]
    fn test_timeout_error() {
        let error = GeocodeError::Timeout { seconds: 10 };
        assert_eq!(error.to_string(), "Lookup timed out after 10s");
    }

    #[test]
    fn test_error_is_std_error() {
        fn assert_std_error<E: std::error::Error>() {}
        assert_std_error::<GeocodeError>();
    }
}
