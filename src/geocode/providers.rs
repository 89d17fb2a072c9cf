//! Geocoding providers: Nominatim (primary) and Photon (fallback).
//!
//! A provider only knows how to phrase a request and how to read its own
//! response shape. Range checks, status handling and fallback order live in
//! the resolver.

use serde::Deserialize;

use super::query::GeocodeQuery;
use super::transport::ProviderRequest;
use super::types::{ProviderError, ProviderHit};

pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const PHOTON_URL: &str = "https://photon.komoot.io";

/// A geocoding service the resolver can fall back through.
pub trait GeocodeProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Request for `query.normalized`, asking for a single result.
    fn build_request(&self, query: &GeocodeQuery) -> ProviderRequest;

    /// Extract the first hit from a JSON body. `Ok(None)` means the provider
    /// answered with zero results.
    fn parse_response(&self, body: &str) -> Result<Option<ProviderHit>, ProviderError>;
}

fn non_empty(label: Option<String>) -> Option<String> {
    label
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

// ─── Nominatim ──────────────────────────────────────────────────

#[derive(Deserialize, Debug, Clone)]
struct NominatimResult {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// OpenStreetMap Nominatim free-text search.
#[derive(Debug, Clone)]
pub struct NominatimProvider {
    base_url: String,
}

impl NominatimProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for NominatimProvider {
    fn default() -> Self {
        Self::new(NOMINATIM_URL)
    }
}

impl GeocodeProvider for NominatimProvider {
    fn name(&self) -> &'static str {
        "Nominatim"
    }

    // No User-Agent here: some embedding environments reject requests that
    // try to set one.
    fn build_request(&self, query: &GeocodeQuery) -> ProviderRequest {
        ProviderRequest::get(format!("{}/search", self.base_url.trim_end_matches('/')))
            .param("q", query.normalized.as_str())
            .param("format", "json")
            .param("limit", "1")
            .header("Accept", "application/json")
    }

    fn parse_response(&self, body: &str) -> Result<Option<ProviderHit>, ProviderError> {
        let results: Vec<NominatimResult> =
            serde_json::from_str(body).map_err(|e| ProviderError::Shape(e.to_string()))?;

        let Some(first) = results.into_iter().next() else {
            return Ok(None);
        };

        let lat = parse_degrees("lat", &first.lat)?;
        let lon = parse_degrees("lon", &first.lon)?;
        Ok(Some(ProviderHit {
            lat,
            lon,
            label: non_empty(first.display_name),
        }))
    }
}

fn parse_degrees(field: &str, value: &str) -> Result<f64, ProviderError> {
    value
        .trim()
        .parse()
        .map_err(|_| ProviderError::Shape(format!("{} is not a number: '{}'", field, value)))
}

// ─── Photon ─────────────────────────────────────────────────────

#[derive(Deserialize, Debug)]
struct PhotonResponse {
    #[serde(default)]
    features: Option<Vec<PhotonFeature>>,
}

#[derive(Deserialize, Debug)]
struct PhotonFeature {
    geometry: PhotonGeometry,
    /// Photon sends `null` for features without tags.
    #[serde(default)]
    properties: Option<PhotonProperties>,
}

#[derive(Deserialize, Debug)]
struct PhotonGeometry {
    /// GeoJSON order: `[lon, lat]`.
    coordinates: Vec<f64>,
}

#[derive(Deserialize, Debug, Default)]
struct PhotonProperties {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    street: Option<String>,
}

/// Komoot Photon search, returning a GeoJSON feature collection.
#[derive(Debug, Clone)]
pub struct PhotonProvider {
    base_url: String,
}

impl PhotonProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for PhotonProvider {
    fn default() -> Self {
        Self::new(PHOTON_URL)
    }
}

impl GeocodeProvider for PhotonProvider {
    fn name(&self) -> &'static str {
        "Photon"
    }

    fn build_request(&self, query: &GeocodeQuery) -> ProviderRequest {
        ProviderRequest::get(format!("{}/api/", self.base_url.trim_end_matches('/')))
            .param("q", query.normalized.as_str())
            .param("limit", "1")
            .header("Accept", "application/json")
    }

    fn parse_response(&self, body: &str) -> Result<Option<ProviderHit>, ProviderError> {
        let response: PhotonResponse =
            serde_json::from_str(body).map_err(|e| ProviderError::Shape(e.to_string()))?;

        let Some(feature) = response.features.unwrap_or_default().into_iter().next() else {
            return Ok(None);
        };

        let coords = &feature.geometry.coordinates;
        if coords.len() < 2 {
            return Err(ProviderError::Shape(format!(
                "expected [lon, lat], got {} values",
                coords.len()
            )));
        }

        let props = feature.properties.unwrap_or_default();
        Ok(Some(ProviderHit {
            lat: coords[1],
            lon: coords[0],
            label: non_empty(props.name).or_else(|| non_empty(props.street)),
        }))
    }
}
