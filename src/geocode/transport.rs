//! HTTP transport used by the resolver.
//!
//! Providers only describe requests; the transport executes them. The ureq
//! implementation runs each blocking call on tokio's blocking pool.

use async_trait::async_trait;
use std::time::Duration;

use super::types::ProviderError;

/// Longest body excerpt kept in diagnostics.
pub const SNIPPET_CHARS: usize = 200;

/// An outbound GET request built by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    pub url: String,
    pub query: Vec<(&'static str, String)>,
    pub headers: Vec<(&'static str, &'static str)>,
}

impl ProviderRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
        }
    }

    pub fn param(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    pub fn header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.push((name, value));
        self
    }

    /// Value of a query parameter, if set.
    pub fn param_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A response with any status; status handling is the resolver's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True for `application/json` and `*/*+json`, ignoring parameters.
    pub fn is_json(&self) -> bool {
        let Some(content_type) = self.content_type.as_deref() else {
            return false;
        };
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        mime == "application/json" || mime.ends_with("+json")
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Execute a GET. Non-2xx statuses are returned as `Ok`; only failures
    /// that produce no response at all are `Err`.
    async fn get(&self, request: &ProviderRequest) -> Result<HttpResponse, ProviderError>;
}

/// Blocking ureq agent driven from async code.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// `timeout` is the whole-request deadline applied by the agent.
    pub fn new(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }
}

#[async_trait]
impl HttpTransport for UreqTransport {
    async fn get(&self, request: &ProviderRequest) -> Result<HttpResponse, ProviderError> {
        let agent = self.agent.clone();
        let request = request.clone();
        run_blocking(move || blocking_get(&agent, &request)).await
    }
}

/// Run `call` on the blocking pool. A panicked or cancelled task becomes a
/// transport error.
async fn run_blocking<F>(call: F) -> Result<HttpResponse, ProviderError>
where
    F: FnOnce() -> Result<HttpResponse, ProviderError> + Send + 'static,
{
    tokio::task::spawn_blocking(call)
        .await
        .map_err(|e| ProviderError::Transport(format!("request task failed: {}", e)))?
}

fn blocking_get(
    agent: &ureq::Agent,
    request: &ProviderRequest,
) -> Result<HttpResponse, ProviderError> {
    let mut call = agent.get(&request.url);
    for (name, value) in &request.headers {
        call = call.set(name, value);
    }
    for (key, value) in &request.query {
        call = call.query(key, value);
    }

    match call.call() {
        Ok(response) | Err(ureq::Error::Status(_, response)) => read_response(response),
        Err(ureq::Error::Transport(e)) => Err(ProviderError::Transport(e.to_string())),
    }
}

fn read_response(response: ureq::Response) -> Result<HttpResponse, ProviderError> {
    let status = response.status();
    let content_type = response.header("Content-Type").map(str::to_string);
    let body = response
        .into_string()
        .map_err(|e| ProviderError::Transport(format!("reading body: {}", e)))?;
    Ok(HttpResponse {
        status,
        content_type,
        body,
    })
}

/// First [`SNIPPET_CHARS`] characters of a body, cut on a char boundary.
pub fn snippet(body: &str) -> String {
    let mut chars = body.chars();
    let head: String = chars.by_ref().take(SNIPPET_CHARS).collect();
    if chars.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}
