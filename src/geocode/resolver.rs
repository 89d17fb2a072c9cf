//! Geocoding resolver: runs the provider fallback chain.
//!
//! Flow:  normalize → Nominatim → Photon → not found
//!
//! Providers are tried one at a time; the next request is only issued once
//! the previous provider has failed or come back empty. Provider failures,
//! panics inside a provider or the transport included, never escape
//! `resolve`.

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::providers::{GeocodeProvider, NominatimProvider, PhotonProvider};
use super::query::GeocodeQuery;
use super::transport::{snippet, HttpTransport, UreqTransport};
use super::types::{GeocodeResult, ProviderError, ProviderFailure, ProviderOutcome, Resolution};
use crate::config::Config;
use crate::coords::Coordinate;

/// Ordered provider chain over a shared transport. Immutable once built.
pub struct GeocodingResolver {
    providers: Vec<Arc<dyn GeocodeProvider>>,
    transport: Arc<dyn HttpTransport>,
}

impl GeocodingResolver {
    /// Providers are tried in the order given.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        providers: Vec<Arc<dyn GeocodeProvider>>,
    ) -> Self {
        Self {
            providers,
            transport,
        }
    }

    /// Nominatim then Photon over a ureq transport, endpoints from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(UreqTransport::new(config.timeout())),
            vec![
                Arc::new(NominatimProvider::new(config.nominatim_url.clone())),
                Arc::new(PhotonProvider::new(config.photon_url.clone())),
            ],
        )
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Resolve free text to a coordinate, or `None` when no provider has one.
    pub async fn resolve(&self, text: &str) -> Option<GeocodeResult> {
        self.resolve_detailed(text).await.into_option()
    }

    /// Alias of [`resolve`](Self::resolve) under the collaborator-facing name.
    pub async fn geocode_address(&self, text: &str) -> Option<GeocodeResult> {
        self.resolve(text).await
    }

    /// Resolve and keep the distinction between "not found" and "every
    /// provider failed".
    pub async fn resolve_detailed(&self, text: &str) -> Resolution {
        let query = GeocodeQuery::new(text);
        if query.is_empty() {
            debug!("Empty query after normalization, skipping providers");
            return Resolution::NotFound;
        }
        debug!(raw = %query.raw.escape_debug(), normalized = %query.normalized, "Geocoding");

        let mut failures = Vec::new();
        let last = self.providers.len().saturating_sub(1);

        for (rank, provider) in self.providers.iter().enumerate() {
            match self.attempt(provider.as_ref(), &query).await {
                ProviderOutcome::Found(result) => {
                    info!(
                        "{} resolved '{}' to {}",
                        provider.name(),
                        query.normalized,
                        result.coordinate
                    );
                    return Resolution::Found(result);
                }
                ProviderOutcome::Empty => {
                    info!("{} returned no result for '{}'", provider.name(), query.normalized);
                }
                ProviderOutcome::Failed(err) => {
                    if rank == last {
                        error!("{} failed for '{}': {}", provider.name(), query.normalized, err);
                    } else {
                        warn!(
                            "{} failed for '{}', trying next provider: {}",
                            provider.name(),
                            query.normalized,
                            err
                        );
                    }
                    failures.push(ProviderFailure {
                        provider: provider.name().to_string(),
                        error: err,
                    });
                }
            }
        }

        if !self.providers.is_empty() && failures.len() == self.providers.len() {
            Resolution::Unavailable(failures)
        } else {
            Resolution::NotFound
        }
    }

    /// Run [`query_provider`](Self::query_provider), turning a panic into a
    /// transport failure so the chain can move on.
    async fn attempt(
        &self,
        provider: &dyn GeocodeProvider,
        query: &GeocodeQuery,
    ) -> ProviderOutcome {
        AssertUnwindSafe(self.query_provider(provider, query))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| {
                ProviderOutcome::Failed(ProviderError::Transport(format!(
                    "{} panicked: {}",
                    provider.name(),
                    panic_message(payload.as_ref())
                )))
            })
    }

    /// One attempt against one provider, with no retry.
    async fn query_provider(
        &self,
        provider: &dyn GeocodeProvider,
        query: &GeocodeQuery,
    ) -> ProviderOutcome {
        let request = provider.build_request(query);
        debug!("Querying {} at {}", provider.name(), request.url);

        let response = match self.transport.get(&request).await {
            Ok(response) => response,
            Err(err) => return ProviderOutcome::Failed(err),
        };

        if !response.is_success() {
            return ProviderOutcome::Failed(ProviderError::Status {
                status: response.status,
                body: snippet(&response.body),
            });
        }

        if !response.is_json() {
            return ProviderOutcome::Failed(ProviderError::ContentType {
                content_type: response.content_type.unwrap_or_default(),
                body: snippet(&response.body),
            });
        }

        let hit = match provider.parse_response(&response.body) {
            Ok(Some(hit)) => hit,
            Ok(None) => return ProviderOutcome::Empty,
            Err(err) => return ProviderOutcome::Failed(err),
        };

        let Some(coordinate) = Coordinate::new(hit.lat, hit.lon) else {
            debug!(
                "{} returned out-of-range coordinate ({}, {}), discarding",
                provider.name(),
                hit.lat,
                hit.lon
            );
            return ProviderOutcome::Empty;
        };

        ProviderOutcome::Found(GeocodeResult {
            coordinate,
            display_name: hit.label.unwrap_or_else(|| query.normalized.clone()),
            provider: provider.name().to_string(),
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "unknown panic"
    }
}
