//! HTTP response building module
//!
//! Builders for every response the payload server sends. All of them carry
//! the CORS headers.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::HeaderValue;
use hyper::{Response, StatusCode};

use super::cors::{with_cors, CorsHeaders};

/// Build 200 response carrying the payload bytes verbatim
pub fn build_payload_response(
    data: Vec<u8>,
    content_type: &HeaderValue,
    cors: &CorsHeaders,
) -> Response<Full<Bytes>> {
    with_cors(Response::builder().status(StatusCode::OK), cors)
        .header("Content-Type", content_type.clone())
        .body(Full::new(Bytes::from(data)))
        .unwrap_or_else(|e| fallback_response(StatusCode::OK, &e))
}

/// Build 200 response for a CORS preflight, empty body
pub fn build_preflight_response(
    content_type: &HeaderValue,
    cors: &CorsHeaders,
) -> Response<Full<Bytes>> {
    with_cors(Response::builder().status(StatusCode::OK), cors)
        .header("Content-Type", content_type.clone())
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| fallback_response(StatusCode::OK, &e))
}

/// Build 404 Not Found response with a plain-text reason
pub fn build_404_response(reason: &str, cors: &CorsHeaders) -> Response<Full<Bytes>> {
    build_text_response(StatusCode::NOT_FOUND, reason.to_string(), cors)
}

/// Build 500 Internal Server Error response with a plain-text reason
pub fn build_500_response(reason: &str, cors: &CorsHeaders) -> Response<Full<Bytes>> {
    build_text_response(StatusCode::INTERNAL_SERVER_ERROR, reason.to_string(), cors)
}

/// Build 501 Not Implemented response for methods the server does not handle
pub fn build_501_response(method: &str, cors: &CorsHeaders) -> Response<Full<Bytes>> {
    build_text_response(
        StatusCode::NOT_IMPLEMENTED,
        format!("Unsupported method ('{method}')"),
        cors,
    )
}

fn build_text_response(
    status: StatusCode,
    reason: String,
    cors: &CorsHeaders,
) -> Response<Full<Bytes>> {
    with_cors(Response::builder().status(status), cors)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(reason)))
        .unwrap_or_else(|e| fallback_response(status, &e))
}

/// Log a response build error and answer with a bare response of the intended status
fn fallback_response(status: StatusCode, error: &hyper::http::Error) -> Response<Full<Bytes>> {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
    let mut resp = Response::new(Full::new(Bytes::new()));
    *resp.status_mut() = status;
    resp
}
