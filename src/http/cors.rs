//! CORS header module
//!
//! Attaches the configured `Access-Control-*` headers to a response builder.

use hyper::header::HeaderValue;
use hyper::http::response::Builder;

pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";

/// CORS header values, parsed once when the configuration is loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsHeaders {
    pub allow_origin: HeaderValue,
    pub allow_methods: HeaderValue,
    pub allow_headers: HeaderValue,
}

impl Default for CorsHeaders {
    fn default() -> Self {
        Self {
            allow_origin: HeaderValue::from_static("*"),
            allow_methods: HeaderValue::from_static("GET, OPTIONS"),
            allow_headers: HeaderValue::from_static("Content-Type"),
        }
    }
}

/// Add the three CORS headers to `builder`
pub fn with_cors(builder: Builder, cors: &CorsHeaders) -> Builder {
    builder
        .header(ALLOW_ORIGIN, cors.allow_origin.clone())
        .header(ALLOW_METHODS, cors.allow_methods.clone())
        .header(ALLOW_HEADERS, cors.allow_headers.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::Response;

    #[test]
    fn test_default_headers() {
        let resp = with_cors(Response::builder(), &CorsHeaders::default())
            .body(())
            .unwrap();
        assert_eq!(resp.headers()[ALLOW_ORIGIN], "*");
        assert_eq!(resp.headers()[ALLOW_METHODS], "GET, OPTIONS");
        assert_eq!(resp.headers()[ALLOW_HEADERS], "Content-Type");
    }

    #[test]
    fn test_custom_origin() {
        let cors = CorsHeaders {
            allow_origin: HeaderValue::from_static("https://canvas.example"),
            ..CorsHeaders::default()
        };
        let resp = with_cors(Response::builder(), &cors).body(()).unwrap();
        assert_eq!(resp.headers()[ALLOW_ORIGIN], "https://canvas.example");
    }
}
