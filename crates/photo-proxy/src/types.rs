//! Wire types for the proxy endpoints and the Unsplash API

use photo_cache::CacheStats;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub cache_duration: u64,
    pub cache: CacheStats,
}

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Unsplash `/photos/random` response, narrowed to the fields the proxy uses
#[derive(Debug, Deserialize)]
pub struct RandomPhotoResponse {
    pub urls: PhotoUrls,
}

#[derive(Debug, Deserialize)]
pub struct PhotoUrls {
    pub full: String,
}
