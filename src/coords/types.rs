//! The validated coordinate type.

use serde::Serialize;
use std::fmt;

/// A latitude/longitude pair that is always within geographic bounds.
///
/// The only way to build one is [`Coordinate::new`], so every parse and
/// geocode path goes through the same range gate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    /// Returns `None` when `lat` is outside [-90, 90] or `lon` outside [-180, 180].
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        is_valid_coordinate(lat, lon).then_some(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_coords(self.lat, self.lon))
    }
}

/// Range check shared by the parser and the geocoding resolver.
/// NaN and infinities are rejected.
pub fn is_valid_coordinate(lat: f64, lon: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
}

/// Fixed six-decimal rendering, used as a label when a location has no text.
pub fn format_coords(lat: f64, lon: f64) -> String {
    format!("{:.6}, {:.6}", lat, lon)
}
