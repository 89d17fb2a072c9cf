//! Networked geocoding with an ordered provider fallback chain.
//!
//! Used only when the local coordinate parser finds no explicit pair.

pub mod providers;
pub mod query;
pub mod resolver;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use providers::{GeocodeProvider, NominatimProvider, PhotonProvider};
pub use query::{normalize_query, GeocodeQuery};
pub use resolver::GeocodingResolver;
pub use transport::{HttpResponse, HttpTransport, ProviderRequest, UreqTransport};
pub use types::{
    GeocodeResult, ProviderError, ProviderFailure, ProviderHit, ProviderOutcome, Resolution,
};
