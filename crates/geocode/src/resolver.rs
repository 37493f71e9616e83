//! Place resolution trait definition.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Trait for services that turn a free-text place name into coordinates.
///
/// Implementations are injected wherever the map layer is built, so tests
/// can supply a scripted resolver instead of a network client.
pub trait PlaceResolver: Send + Sync {
    /// Resolver name, for logs.
    fn name(&self) -> &str;

    /// Resolve a place synchronously. `Ok(None)` means the service answered
    /// but knows no such place.
    fn resolve(&self, place: &str) -> Result<Option<Coordinates>>;
}
