//! Text → location: parse first, geocode only when parsing finds nothing.

use serde::Serialize;
use tracing::debug;

use crate::coords::parse_coordinates_with_format;
use crate::geocode::{GeocodingResolver, ProviderFailure, Resolution};

/// How a location was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    /// The text itself was a coordinate pair.
    Coordinates,
    /// The text was geocoded by a provider.
    Address,
}

/// A location ready to hand to a map view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    /// Label to show: provider display name for addresses, the input otherwise.
    pub text: String,
    #[serde(rename = "type")]
    pub kind: LocationKind,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocateError {
    #[error("No location text given.")]
    EmptyInput,

    #[error("Could not find location. Please try a different address or coordinates.")]
    NotFound(String),

    #[error("An error occurred while searching. Please try again.")]
    Unavailable(Vec<ProviderFailure>),
}

/// Resolve selected or typed text to a location.
pub async fn locate(resolver: &GeocodingResolver, text: &str) -> Result<Location, LocateError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(LocateError::EmptyInput);
    }

    if let Some((format, coord)) = parse_coordinates_with_format(text) {
        debug!("Parsed {:?} as {:?}", text, format);
        return Ok(Location {
            lat: coord.lat(),
            lon: coord.lon(),
            text: text.to_string(),
            kind: LocationKind::Coordinates,
        });
    }

    match resolver.resolve_detailed(text).await {
        Resolution::Found(result) => Ok(Location {
            lat: result.lat(),
            lon: result.lon(),
            text: result.display_name,
            kind: LocationKind::Address,
        }),
        Resolution::NotFound => Err(LocateError::NotFound(text.to_string())),
        Resolution::Unavailable(failures) => Err(LocateError::Unavailable(failures)),
    }
}
