//! Startup-time error types for the photo proxy

use std::fmt;

#[derive(Debug)]
pub enum ProxyError {
    Config(String),
    Io(Box<std::io::Error>),
}

impl fmt::Display for ProxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ProxyError::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for ProxyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProxyError::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ProxyError {
    fn from(err: std::io::Error) -> Self {
        ProxyError::Io(Box::new(err))
    }
}

impl From<tracing_subscriber::filter::ParseError> for ProxyError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        ProxyError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ProxyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ProxyError::Config("missing UNSPLASH_ACCESS_KEY".to_string());
        assert_eq!(
            format!("{}", err),
            "Configuration error: missing UNSPLASH_ACCESS_KEY"
        );
    }

    #[test]
    fn test_io_error_display() {
        let err = ProxyError::from(std::io::Error::other("bind failed"));
        assert!(format!("{}", err).contains("bind failed"));
    }
}
