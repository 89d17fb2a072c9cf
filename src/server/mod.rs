//! HTTP API exposing the parser and resolver to non-Rust front ends.

mod handlers;
mod state;

use axum::routing::get;
use axum::Router;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::geocode::GeocodingResolver;

pub fn build_router(resolver: GeocodingResolver) -> Router {
    let state = Arc::new(AppState { resolver });

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/parse", get(handlers::parse))
        .route("/api/geocode", get(handlers::geocode))
        .route("/api/locate", get(handlers::locate))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start(host: &str, port: u16, resolver: GeocodingResolver) -> std::io::Result<()> {
    let app = build_router(resolver);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("OpenMapIt server listening on http://{}", addr);
    axum::serve(listener, app).await
}
