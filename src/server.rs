//! MediFind HTTP API.
//!
//! Serves the search pipeline as JSON over HTTP. The dataset snapshot is
//! built once before the server starts and shared read-only with every
//! handler through Axum's `State` extractor.
//!
//! # Endpoints
//!
//! | Method | Path | Query | Description |
//! |--------|------|-------|-------------|
//! | `GET` | `/api/health` | | Liveness check |
//! | `GET` | `/api/pharmacies` | `location?` | Pharmacies, optionally filtered by location |
//! | `GET` | `/api/medicines/search` | `q`, `location?` | Priced search results, cheapest first |
//! | `GET` | `/api/ai/alternatives` | `name` | Up to three substitute suggestions |
//!
//! # Error Contract
//!
//! ```json
//! { "error": "Missing query parameter q" }
//! ```
//!
//! Missing required parameters are `400`. A dataset integrity failure
//! (an inventory row pointing at an unknown id) is `500`. Unknown query
//! parameters are ignored, and a repeated parameter uses its first value.
//!
//! # CORS
//!
//! The allowed origin comes from `[server].cors_origin`; `"*"` permits any
//! origin. Requests are logged through `tower-http`'s `TraceLayer`.

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, info, Level};

use medifind_core::alternatives::suggest_alternatives;
use medifind_core::models::{AlternativeSuggestion, Pharmacy, SearchResultRow};
use medifind_core::pharmacy::find_pharmacies;
use medifind_core::search::{search_medicines, SearchRequest};
use medifind_core::{Dataset, MediFindError};

use crate::config::{Config, ServerConfig};

/// Name reported by `GET /api/health`.
pub const SERVICE_NAME: &str = "MediFind Backend";

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    /// Immutable dataset snapshot (wrapped in `Arc` for cheap cloning across handlers).
    dataset: Arc<Dataset>,
}

/// Starts the HTTP server and runs until Ctrl-C.
///
/// Binds to `[server].bind` and serves the routes built by [`router`].
pub async fn run_server(config: &Config, dataset: Dataset) -> Result<()> {
    let addr = config.server.socket_addr()?;
    let app = router(Arc::new(dataset), &config.server)?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("MediFind backend running on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

/// Builds the API router with CORS and request tracing applied.
pub fn router(dataset: Arc<Dataset>, server: &ServerConfig) -> Result<Router> {
    let state = AppState { dataset };

    Ok(Router::new()
        .route("/api/health", get(handle_health))
        .route("/api/pharmacies", get(handle_pharmacies))
        .route("/api/medicines/search", get(handle_search))
        .route("/api/ai/alternatives", get(handle_alternatives))
        .layer(cors_layer(server)?)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state))
}

fn cors_layer(server: &ServerConfig) -> Result<CorsLayer> {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if server.allows_any_origin() {
        return Ok(cors.allow_origin(Any));
    }
    let origin = HeaderValue::from_str(server.cors_origin.trim())
        .with_context(|| format!("Invalid CORS origin: {}", server.cors_origin))?;
    Ok(cors.allow_origin(origin))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

// ============ Error response ============

/// JSON error body: `{ "error": "<message>" }`.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<MediFindError> for AppError {
    fn from(err: MediFindError) -> Self {
        if err.is_client_error() {
            AppError {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            }
        } else {
            error!("dataset integrity error: {}", err);
            AppError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: err.to_string(),
            }
        }
    }
}

// ============ GET /api/health ============

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        service: SERVICE_NAME,
    })
}

// ============ Query parameters ============

/// Query string as ordered pairs. Repeated keys are accepted and the first
/// value wins; unknown keys are ignored.
#[derive(Deserialize)]
#[serde(transparent)]
struct QueryPairs(Vec<(String, String)>);

impl QueryPairs {
    fn first(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

// ============ GET /api/pharmacies ============

async fn handle_pharmacies(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
) -> Json<Vec<Pharmacy>> {
    let found = find_pharmacies(&state.dataset, params.first("location"));
    Json(found.into_iter().cloned().collect())
}

// ============ GET /api/medicines/search ============

async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
) -> Result<Json<Vec<SearchResultRow>>, AppError> {
    let req = SearchRequest {
        query: params.first("q"),
        location: params.first("location"),
    };
    let rows = search_medicines(&state.dataset, &req)?;
    Ok(Json(rows))
}

// ============ GET /api/ai/alternatives ============

async fn handle_alternatives(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
) -> Result<Json<Vec<AlternativeSuggestion>>, AppError> {
    let suggestions = alternatives(&state.dataset, params.first("name"))?;
    Ok(Json(suggestions))
}

// Kept synchronous so the thread-local RNG never lives inside the handler future.
fn alternatives(
    dataset: &Dataset,
    name: Option<&str>,
) -> Result<Vec<AlternativeSuggestion>, MediFindError> {
    suggest_alternatives(dataset, name, &mut rand::thread_rng())
}
