//! Throttled batch resolution.

use std::thread;
use std::time::Duration;

use serde::Serialize;

use crate::resolver::{Coordinates, PlaceResolver};

/// A place that resolved to coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocatedPlace {
    pub place: String,
    pub coordinates: Coordinates,
}

/// Result of resolving a batch of places: the located ones and the names
/// the service could not place.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchOutcome {
    pub located: Vec<LocatedPlace>,
    pub missing: Vec<String>,
}

/// Resolve every place with a fixed delay between requests.
///
/// A failed or empty lookup records the place in `missing` and moves on;
/// one bad county never aborts the rest of the map.
pub fn resolve_all(
    resolver: &dyn PlaceResolver,
    places: &[String],
    delay: Duration,
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    for (i, place) in places.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            thread::sleep(delay);
        }
        match resolver.resolve(place) {
            Ok(Some(coordinates)) => outcome.located.push(LocatedPlace {
                place: place.clone(),
                coordinates,
            }),
            Ok(None) => {
                tracing::debug!(resolver = resolver.name(), place, "place not found");
                outcome.missing.push(place.clone());
            }
            Err(error) => {
                tracing::warn!(resolver = resolver.name(), place, %error, "lookup failed");
                outcome.missing.push(place.clone());
            }
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GeocodeError, Result};

    /// Scripted resolver: answers per place name.
    struct ScriptedResolver;

    impl PlaceResolver for ScriptedResolver {
        fn name(&self) -> &str {
            "scripted"
        }

        fn resolve(&self, place: &str) -> Result<Option<Coordinates>> {
            match place {
                "Travis County, TX" => Ok(Some(Coordinates {
                    latitude: 30.3,
                    longitude: -97.7,
                })),
                "Ghost County, ZZ" => Ok(None),
                _ => Err(GeocodeError::Unavailable("boom".to_string())),
            }
        }
    }

    #[test]
    fn test_batch_records_hits_and_misses() {
        let places = vec![
            "Travis County, TX".to_string(),
            "Ghost County, ZZ".to_string(),
            "Broken County, XX".to_string(),
        ];
        let outcome = resolve_all(&ScriptedResolver, &places, Duration::ZERO);

        assert_eq!(outcome.located.len(), 1);
        assert_eq!(outcome.located[0].place, "Travis County, TX");
        assert_eq!(
            outcome.missing,
            vec!["Ghost County, ZZ".to_string(), "Broken County, XX".to_string()]
        );
    }

    #[test]
    fn test_batch_empty_input() {
        let outcome = resolve_all(&ScriptedResolver, &[], Duration::ZERO);
        assert!(outcome.located.is_empty());
        assert!(outcome.missing.is_empty());
    }

    #[test]
    fn test_batch_continues_after_error() {
        let places = vec![
            "Broken County, XX".to_string(),
            "Travis County, TX".to_string(),
        ];
        let outcome = resolve_all(&ScriptedResolver, &places, Duration::ZERO);
        assert_eq!(outcome.located.len(), 1);
        assert_eq!(outcome.missing.len(), 1);
    }
}
