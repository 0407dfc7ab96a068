//! HTTP server for the photo proxy endpoints
//!
//! Provides /, /health, and /random/{theme}.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use photo_cache::{CacheError, PhotoCacheService};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::types::{ErrorResponse, HealthResponse};

const USAGE_TEXT: &str = "Please use /random/nature or any other theme to access content.";

pub type SharedState = Arc<PhotoCacheService>;

/// Create the HTTP router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/random/{theme}", get(get_random_photo))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(state: SharedState, port: u16) -> std::io::Result<()> {
    let router = create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await
}

/// Usage hint
async fn index() -> &'static str {
    USAGE_TEXT
}

/// Health check endpoint
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        cache_duration: state.ttl_secs(),
        cache: state.stats().await,
    })
}

/// Serve a cached or freshly fetched photo for a theme
async fn get_random_photo(
    State(state): State<SharedState>,
    Path(theme): Path<String>,
) -> Response {
    match state.get_or_fetch(&theme).await {
        Ok((entry, status)) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, entry.content_type.clone())
            .header("X-Cache", status.as_str())
            .body(Body::from(entry.data))
            .unwrap(),
        Err(CacheError::InvalidKey(_)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Invalid theme".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            warn!(theme = %theme, error = %e, "Failed to serve photo");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch photo".to_string(),
                }),
            )
                .into_response()
        }
    }
}
