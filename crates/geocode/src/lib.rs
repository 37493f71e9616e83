//! # geocode
//!
//! Place-name resolution for the location dashboard. The capability is a
//! trait so the map layer can be built against a stub in tests and the real
//! Nominatim client in production; lookups are best effort and a place that
//! cannot be resolved is recorded, never fatal.

mod batch;
mod error;
mod nominatim;
mod resolver;

pub use batch::{resolve_all, BatchOutcome, LocatedPlace};
pub use error::{GeocodeError, Result};
pub use nominatim::Nominatim;
pub use resolver::{Coordinates, PlaceResolver};
