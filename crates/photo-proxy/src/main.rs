//! Theme-keyed photo caching proxy
//!
//! Serves random Unsplash photos by theme, caching each result in memory
//! with a TTL so repeated requests do not burn upstream rate limit.

mod config;
mod error;
mod fetcher;
mod server;
mod types;

use std::sync::Arc;

use photo_cache::PhotoCacheService;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::load_config;
use crate::error::Result;
use crate::fetcher::UnsplashFetcher;
use crate::server::start_server;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter = EnvFilter::from_default_env().add_directive("photo_proxy=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    info!("Starting photo proxy...");

    // Load configuration from environment
    let config = load_config()?;
    let cache_config = config.cache_config();
    info!("Port: {}", config.port);
    info!("Cache mode: {:?}", config.mode);
    info!("Cache TTL: {} seconds", cache_config.effective_ttl_secs());

    // Create fetcher and cache service
    let fetcher = Arc::new(UnsplashFetcher::new(config.unsplash_access_key.as_str()));
    let service = Arc::new(PhotoCacheService::new(fetcher, cache_config));

    // Start HTTP server (blocking)
    start_server(service, config.port).await?;

    Ok(())
}
