//! Nominatim place lookup client.
//!
//! Free-text search against the public Nominatim endpoint: no
//! authentication, best effort, and subject to the service's usage policy —
//! callers must throttle batches (see [`crate::resolve_all`]).

use std::time::Duration;

use serde::Deserialize;

use crate::error::{GeocodeError, Result};
use crate::resolver::{Coordinates, PlaceResolver};

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/search";
const USER_AGENT: &str = concat!("jobtrends/", env!("CARGO_PKG_VERSION"));
const TIMEOUT_SECONDS: u64 = 10;

/// A single hit in a Nominatim search response. The service encodes
/// coordinates as strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

/// Nominatim client with a fixed user agent and request timeout.
#[derive(Debug, Clone)]
pub struct Nominatim {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl Nominatim {
    /// Create a client against the public endpoint.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a custom endpoint (tests, self-hosted mirrors).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(TIMEOUT_SECONDS))
            .build()
            .map_err(|e| GeocodeError::Unavailable(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// Parse a search response body. An empty hit list is `Ok(None)`.
    fn parse_response(body: &str) -> Result<Option<Coordinates>> {
        let hits: Vec<SearchHit> = serde_json::from_str(body)
            .map_err(|e| GeocodeError::MalformedResponse(e.to_string()))?;
        let Some(hit) = hits.first() else {
            return Ok(None);
        };
        let latitude: f64 = hit
            .lat
            .parse()
            .map_err(|_| GeocodeError::MalformedResponse(format!("bad latitude '{}'", hit.lat)))?;
        let longitude: f64 = hit
            .lon
            .parse()
            .map_err(|_| GeocodeError::MalformedResponse(format!("bad longitude '{}'", hit.lon)))?;
        Ok(Some(Coordinates {
            latitude,
            longitude,
        }))
    }

    fn transport_error(e: reqwest::Error) -> GeocodeError {
        if e.is_timeout() {
            GeocodeError::Timeout {
                seconds: TIMEOUT_SECONDS,
            }
        } else {
            GeocodeError::Unavailable(e.to_string())
        }
    }
}

impl PlaceResolver for Nominatim {
    fn name(&self) -> &str {
        "nominatim"
    }

    fn resolve(&self, place: &str) -> Result<Option<Coordinates>> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", place), ("format", "json"), ("limit", "1")])
            .send()
            .map_err(Self::transport_error)?;

        if !response.status().is_success() {
            return Err(GeocodeError::Unavailable(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let body = response.text().map_err(Self::transport_error)?;
        Self::parse_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response_with_hit() {
        let body = r#"[{"lat":"30.2672","lon":"-97.7431","display_name":"Travis County, Texas"}]"#;
        let coords = Nominatim::parse_response(body).unwrap().unwrap();
        assert!((coords.latitude - 30.2672).abs() < 1e-9);
        assert!((coords.longitude + 97.7431).abs() < 1e-9);
    }

    #[test]
    fn test_parse_response_empty_is_none() {
        assert!(Nominatim::parse_response("[]").unwrap().is_none());
    }

    #[test]
    fn test_parse_response_bad_json() {
        let result = Nominatim::parse_response("<html>rate limited</html>");
        assert!(matches!(result, Err(GeocodeError::MalformedResponse(_))));
    }

    #[test]
    fn test_parse_response_bad_coordinate() {
        let body = r#"[{"lat":"north-ish","lon":"-97.7"}]"#;
        let result = Nominatim::parse_response(body);
        assert!(matches!(result, Err(GeocodeError::MalformedResponse(_))));
    }

    #[test]
    fn test_client_construction() {
        let client = Nominatim::new().unwrap();
        assert_eq!(client.name(), "nominatim");
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }
}
