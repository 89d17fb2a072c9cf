//! Scripted transport for resolver, lookup and server tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::providers::{NominatimProvider, PhotonProvider};
use super::resolver::GeocodingResolver;
use super::transport::{HttpResponse, HttpTransport, ProviderRequest};
use super::types::ProviderError;
use std::sync::Arc;

pub const NOMINATIM: &str = "http://nominatim.test";
pub const PHOTON: &str = "http://photon.test";

/// Answers by URL and records every request it sees.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: HashMap<String, Result<HttpResponse, ProviderError>>,
    pub seen: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &str, status: u16, content_type: &str, body: &str) -> Self {
        self.routes.insert(
            url.to_string(),
            Ok(HttpResponse {
                status,
                content_type: Some(content_type.to_string()),
                body: body.to_string(),
            }),
        );
        self
    }

    pub fn json(self, url: &str, body: &str) -> Self {
        self.respond(url, 200, "application/json; charset=utf-8", body)
    }

    pub fn fail(mut self, url: &str, error: ProviderError) -> Self {
        self.routes.insert(url.to_string(), Err(error));
        self
    }

    pub fn urls_seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().iter().map(|r| r.url.clone()).collect()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, request: &ProviderRequest) -> Result<HttpResponse, ProviderError> {
        self.seen.lock().unwrap().push(request.clone());
        self.routes
            .get(&request.url)
            .cloned()
            .unwrap_or_else(|| {
                Err(ProviderError::Transport(format!("no route for {}", request.url)))
            })
    }
}

pub fn nominatim_search() -> String {
    format!("{}/search", NOMINATIM)
}

pub fn photon_api() -> String {
    format!("{}/api/", PHOTON)
}

/// The standard two-provider chain pointed at the scripted hosts.
pub fn resolver_with(transport: ScriptedTransport) -> (GeocodingResolver, Arc<ScriptedTransport>) {
    let transport = Arc::new(transport);
    let resolver = GeocodingResolver::new(
        transport.clone(),
        vec![
            Arc::new(NominatimProvider::new(NOMINATIM)),
            Arc::new(PhotonProvider::new(PHOTON)),
        ],
    );
    (resolver, transport)
}
