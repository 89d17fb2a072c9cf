//! Core types for the geocoding subsystem.

use serde::Serialize;
use std::fmt;

use crate::coords::Coordinate;

/// A coordinate resolved by a geocoding provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodeResult {
    pub coordinate: Coordinate,
    /// Best label the provider had, or the normalized query text.
    pub display_name: String,
    /// Name of the provider that answered (e.g. "Nominatim").
    pub provider: String,
}

impl GeocodeResult {
    pub fn lat(&self) -> f64 {
        self.coordinate.lat()
    }

    pub fn lon(&self) -> f64 {
        self.coordinate.lon()
    }
}

/// An unvalidated first hit extracted from a provider body.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderHit {
    pub lat: f64,
    pub lon: f64,
    pub label: Option<String>,
}

/// Why a single provider attempt failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    /// Connection, DNS, TLS or I/O failure before a status was received.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("expected JSON but got '{content_type}': {body}")]
    ContentType { content_type: String, body: String },

    /// The body was JSON but not in the shape the provider promises.
    #[error("malformed response: {0}")]
    Shape(String),
}

/// Outcome of querying one provider.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderOutcome {
    Found(GeocodeResult),
    /// The provider answered but had no (in-range) result.
    Empty,
    Failed(ProviderError),
}

/// A provider failure recorded during a resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderFailure {
    pub provider: String,
    pub error: ProviderError,
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.provider, self.error)
    }
}

/// Overall result of running the provider chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found(GeocodeResult),
    /// At least one provider answered, none had a valid result.
    NotFound,
    /// Every provider failed.
    Unavailable(Vec<ProviderFailure>),
}

impl Resolution {
    pub fn into_option(self) -> Option<GeocodeResult> {
        match self {
            Self::Found(result) => Some(result),
            Self::NotFound | Self::Unavailable(_) => None,
        }
    }
}
