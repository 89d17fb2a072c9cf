use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::coords::parse_coordinates;
use crate::geocode::Resolution;
use crate::lookup::{self, LocateError, Location};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

impl From<LocateError> for ApiError {
    fn from(e: LocateError) -> Self {
        let status = match e {
            LocateError::EmptyInput => StatusCode::BAD_REQUEST,
            LocateError::NotFound(_) => StatusCode::NOT_FOUND,
            LocateError::Unavailable(_) => StatusCode::BAD_GATEWAY,
        };
        api_error(status, e.to_string())
    }
}

#[derive(Deserialize)]
pub struct TextQuery {
    pub text: Option<String>,
}

impl TextQuery {
    fn required(&self) -> Result<&str, ApiError> {
        match self.text.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => Ok(t),
            _ => Err(api_error(StatusCode::BAD_REQUEST, "Missing 'text' parameter")),
        }
    }
}

// ─── GET /health ─────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    providers: Vec<&'static str>,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        providers: state.resolver.provider_names(),
    })
}

// ─── GET /api/parse ──────────────────────────────────────────────

#[derive(Serialize)]
pub struct CoordinateResponse {
    pub lat: f64,
    pub lon: f64,
}

pub async fn parse(Query(params): Query<TextQuery>) -> Result<Json<CoordinateResponse>, ApiError> {
    let text = params.required()?;
    let coord = parse_coordinates(text)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "No coordinate pair recognized"))?;
    Ok(Json(CoordinateResponse {
        lat: coord.lat(),
        lon: coord.lon(),
    }))
}

// ─── GET /api/geocode ────────────────────────────────────────────

#[derive(Serialize)]
pub struct GeocodeResponse {
    pub lat: f64,
    pub lon: f64,
    pub display_name: String,
    pub provider: String,
}

pub async fn geocode(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TextQuery>,
) -> Result<Json<GeocodeResponse>, ApiError> {
    let text = params.required()?;
    match state.resolver.resolve_detailed(text).await {
        Resolution::Found(result) => Ok(Json(GeocodeResponse {
            lat: result.lat(),
            lon: result.lon(),
            display_name: result.display_name,
            provider: result.provider,
        })),
        Resolution::NotFound => Err(LocateError::NotFound(text.to_string()).into()),
        Resolution::Unavailable(failures) => Err(LocateError::Unavailable(failures).into()),
    }
}

// ─── GET /api/locate ─────────────────────────────────────────────

pub async fn locate(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TextQuery>,
) -> Result<Json<Location>, ApiError> {
    let text = params.required()?;
    Ok(Json(lookup::locate(&state.resolver, text).await?))
}

#[cfg(test)]
mod tests {
    use super::super::build_router;
    use crate::geocode::testing::{
        nominatim_search, photon_api, resolver_with, ScriptedTransport,
    };
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn get_json(transport: ScriptedTransport, uri: &str) -> (StatusCode, serde_json::Value) {
        let (resolver, _) = resolver_with(transport);
        let response = build_router(resolver)
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(ScriptedTransport::new(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["providers"], serde_json::json!(["Nominatim", "Photon"]));
    }

    #[tokio::test]
    async fn test_parse_ok_and_miss() {
        let uri = "/api/parse?text=10%20N%2C%2020%20W";
        let (status, body) = get_json(ScriptedTransport::new(), uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["lat"], 10.0);
        assert_eq!(body["lon"], -20.0);

        let (status, body) = get_json(ScriptedTransport::new(), "/api/parse?text=Main%20St").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 404);
    }

    #[tokio::test]
    async fn test_missing_text() {
        let (status, body) = get_json(ScriptedTransport::new(), "/api/locate").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing 'text' parameter");
    }

    #[tokio::test]
    async fn test_geocode_fallback() {
        let transport = ScriptedTransport::new()
            .respond(&nominatim_search(), 503, "text/plain", "down")
            .json(
                &photon_api(),
                r#"{"features": [{"geometry": {"coordinates": [-89.65, 39.78]},
                    "properties": {"name": "Springfield"}}]}"#,
            );
        let (status, body) = get_json(transport, "/api/geocode?text=Springfield").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["lat"], 39.78);
        assert_eq!(body["provider"], "Photon");
        assert_eq!(body["display_name"], "Springfield");
    }

    #[tokio::test]
    async fn test_geocode_unlabelled_hit_keeps_display_name() {
        let transport = ScriptedTransport::new()
            .json(&nominatim_search(), r#"[{"lat": "39.78", "lon": "-89.65"}]"#);
        let (status, body) = get_json(transport, "/api/geocode?text=Springfield%20IL").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["provider"], "Nominatim");
        assert_eq!(body["display_name"], "Springfield IL");
    }

    #[tokio::test]
    async fn test_locate_status_mapping() {
        let empty = ScriptedTransport::new()
            .json(&nominatim_search(), "[]")
            .json(&photon_api(), r#"{"features": []}"#);
        let (status, _) = get_json(empty, "/api/locate?text=Nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get_json(ScriptedTransport::new(), "/api/locate?text=Nowhere").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);

        let uri = "/api/locate?text=lat%3A1%20lon%3A2";
        let (status, body) = get_json(ScriptedTransport::new(), uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "coordinates");
    }
}
