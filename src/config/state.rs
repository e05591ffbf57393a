// Application state module
// Read-only state shared by every connection task

use config::ConfigError;
use hyper::header::HeaderValue;
use std::path::PathBuf;
use std::sync::atomic::AtomicUsize;

use super::types::{Config, PerformanceConfig};
use crate::http::cors::CorsHeaders;

/// Application state, with header values parsed once at startup
pub struct AppState {
    pub payload_path: PathBuf,
    /// Base name of the payload file (e.g. `stroke.json`)
    pub payload_name: String,
    pub content_type: HeaderValue,
    pub cors: CorsHeaders,
    pub access_log: bool,
    pub access_log_format: String,
    pub performance: PerformanceConfig,
    pub active_connections: AtomicUsize,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            payload_path: PathBuf::from(&config.payload.path),
            payload_name: config.payload_name(),
            content_type: config.payload_content_type()?,
            cors: config.cors_headers()?,
            access_log: config.logging.access_log,
            access_log_format: config.logging.access_log_format.clone(),
            performance: config.performance.clone(),
            active_connections: AtomicUsize::new(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_rejects_invalid_origin() {
        let mut cfg = Config::load_from("does-not-exist/stroke-server-test").unwrap();
        cfg.cors.allow_origin = "https://a.example\r\nSet-Cookie: x=1".to_string();
        assert!(AppState::new(&cfg).is_err());
    }

    #[test]
    fn test_state_parses_configured_values() {
        let mut cfg = Config::load_from("does-not-exist/stroke-server-test").unwrap();
        cfg.cors.allow_origin = "https://canvas.example".to_string();
        let state = AppState::new(&cfg).unwrap();
        assert_eq!(state.cors.allow_origin, "https://canvas.example");
        assert_eq!(state.content_type, "application/json");
        assert_eq!(state.payload_name, "stroke.json");
    }
}
