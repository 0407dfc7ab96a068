//! Environment-driven configuration

use photo_cache::{CacheConfig, CacheMode};

use crate::error::{ProxyError, Result};

/// Configuration for the photo proxy
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub port: u16,
    pub mode: CacheMode,
    pub ttl_secs: u64,
    /// Override for the per-mode TTL floor
    pub min_ttl_secs: Option<u64>,
    pub follower_wait_secs: u64,
    pub unsplash_access_key: String,
}

impl ProxyConfig {
    /// The cache configuration this proxy runs with
    pub fn cache_config(&self) -> CacheConfig {
        let mut config = CacheConfig::new(self.mode, self.ttl_secs)
            .with_follower_wait_secs(self.follower_wait_secs);
        if let Some(min_ttl_secs) = self.min_ttl_secs {
            config = config.with_min_ttl_secs(min_ttl_secs);
        }
        config
    }
}

/// Load configuration from the environment
pub fn load_config() -> Result<ProxyConfig> {
    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(5000);

    let mode = match std::env::var("CACHE_MODE") {
        Ok(s) => s
            .parse::<CacheMode>()
            .map_err(ProxyError::Config)?,
        Err(_) => CacheMode::Keyed,
    };

    let ttl_secs = std::env::var("CACHE_DURATION_SECONDS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(600);

    let min_ttl_secs = std::env::var("MIN_CACHE_DURATION_SECONDS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok());

    let follower_wait_secs = std::env::var("FOLLOWER_WAIT_SECONDS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(30);

    let unsplash_access_key = std::env::var("UNSPLASH_ACCESS_KEY")
        .map_err(|_| ProxyError::Config("UNSPLASH_ACCESS_KEY is not set".to_string()))?;

    Ok(ProxyConfig {
        port,
        mode,
        ttl_secs,
        min_ttl_secs,
        follower_wait_secs,
        unsplash_access_key,
    })
}
