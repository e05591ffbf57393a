// Configuration module entry point
// Loads layered configuration and holds the per-server runtime state

mod state;
mod types;

use config::ConfigError;
use hyper::header::HeaderValue;
use std::net::SocketAddr;
use std::path::Path;

use crate::http::cors::CorsHeaders;
pub use state::AppState;
pub use types::Config;

/// Default configuration file base name (resolves to `config.toml`)
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// Sources, lowest priority first: built-in defaults, the optional file,
    /// `STROKE_*` environment variables (`__` separates sections, e.g.
    /// `STROKE_SERVER__PORT=9000`).
    ///
    /// The result is validated, so a bad value aborts startup instead of
    /// failing later in the runtime builder or on every response.
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("payload.path", "payload/stroke.json")?
            .set_default("payload.content_type", "application/json")?
            .set_default("cors.allow_origin", "*")?
            .set_default("cors.allow_methods", "GET, OPTIONS")?
            .set_default("cors.allow_headers", "Content-Type")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.connection_timeout", 30)?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("STROKE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values that deserialize fine but cannot be used
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.workers == Some(0) {
            return Err(ConfigError::Message(
                "server.workers must be at least 1".to_string(),
            ));
        }
        if self.performance.connection_timeout == 0 {
            return Err(ConfigError::Message(
                "performance.connection_timeout must be at least 1 second".to_string(),
            ));
        }
        self.payload_content_type()?;
        self.cors_headers()?;
        Ok(())
    }

    /// `payload.content_type` as a header value
    pub fn payload_content_type(&self) -> Result<HeaderValue, ConfigError> {
        parse_header_value("payload.content_type", &self.payload.content_type)
    }

    /// The `cors` section as header values
    pub fn cors_headers(&self) -> Result<CorsHeaders, ConfigError> {
        Ok(CorsHeaders {
            allow_origin: parse_header_value("cors.allow_origin", &self.cors.allow_origin)?,
            allow_methods: parse_header_value("cors.allow_methods", &self.cors.allow_methods)?,
            allow_headers: parse_header_value("cors.allow_headers", &self.cors.allow_headers)?,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Base name of the payload file, used in banners and 404 reasons
    pub fn payload_name(&self) -> String {
        Path::new(&self.payload.path)
            .file_name()
            .map_or_else(
                || self.payload.path.clone(),
                |name| name.to_string_lossy().into_owned(),
            )
    }

    /// URL announced in the startup banner
    pub fn banner_url(&self, port: u16) -> String {
        format!("http://localhost:{port}/{}", self.payload_name())
    }
}

fn parse_header_value(key: &str, value: &str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value)
        .map_err(|e| ConfigError::Message(format!("{key} is not a valid header value ({value:?}): {e}")))
}
