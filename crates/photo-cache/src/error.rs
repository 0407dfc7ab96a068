use std::fmt;

/// Errors surfaced by the cache core
///
/// `Clone` so a single fetch outcome can fan out to every coalesced waiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The upstream fetch returned an error or a non-success status.
    FetchFailed(String),
    /// A coalesced waiter gave up before the in-flight fetch resolved.
    Timeout,
    /// The theme key was rejected before any cache or fetch activity.
    InvalidKey(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FetchFailed(msg) => write!(f, "Fetch failed: {msg}"),
            Self::Timeout => write!(f, "Timed out waiting for in-flight fetch"),
            Self::InvalidKey(msg) => write!(f, "Invalid key: {msg}"),
        }
    }
}

impl std::error::Error for CacheError {}

pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failed_display() {
        let err = CacheError::FetchFailed("upstream returned status 503".to_string());
        assert_eq!(format!("{}", err), "Fetch failed: upstream returned status 503");
    }

    #[test]
    fn test_timeout_display() {
        assert!(format!("{}", CacheError::Timeout).contains("in-flight fetch"));
    }

    #[test]
    fn test_invalid_key_display() {
        let err = CacheError::InvalidKey("empty theme".to_string());
        assert_eq!(format!("{}", err), "Invalid key: empty theme");
    }
}
