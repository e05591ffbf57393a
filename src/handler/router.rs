//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method dispatch, the single root
//! route, and access logging.

use crate::config::AppState;
use crate::handler::payload::{self, PayloadError};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{HeaderMap, Method, Request, Response, Uri, Version};
use std::borrow::Cow;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// The only target that serves the payload
const ROOT_TARGET: &str = "/";

/// Main entry point for HTTP request handling
///
/// The request body is dropped unread.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (parts, body) = req.into_parts();
    drop(body);

    let response = route(&parts.method, &request_target(&parts.uri), &state).await;

    if state.access_log {
        let mut entry = AccessLogEntry::new(
            remote_addr.to_string(),
            parts.method.to_string(),
            parts.uri.path().to_string(),
        );
        entry.query = parts.uri.query().map(ToString::to_string);
        entry.http_version = version_label(parts.version).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.referer = header_string(&parts.headers, "referer");
        entry.user_agent = header_string(&parts.headers, "user-agent");
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.access_log_format);
    }

    Ok(response)
}

/// Dispatch on method, then on request target
pub async fn route(method: &Method, target: &str, state: &AppState) -> Response<Full<Bytes>> {
    match method {
        &Method::OPTIONS => http::build_preflight_response(&state.content_type, &state.cors),
        &Method::GET | &Method::POST => serve_root(target, state).await,
        _ => http::build_501_response(method.as_str(), &state.cors),
    }
}

/// Serve the payload for `/`, 404 for every other target
async fn serve_root(target: &str, state: &AppState) -> Response<Full<Bytes>> {
    if target != ROOT_TARGET {
        return http::build_404_response("File not found", &state.cors);
    }

    match payload::load_payload(&state.payload_path).await {
        Ok(data) => http::build_payload_response(data, &state.content_type, &state.cors),
        Err(PayloadError::NotFound) => {
            http::build_404_response(&format!("{} not found", state.payload_name), &state.cors)
        }
        Err(err) => {
            logger::log_error(&format!(
                "Failed to read '{}': {err}",
                state.payload_path.display()
            ));
            http::build_500_response(
                &format!("Failed to read {}", state.payload_name),
                &state.cors,
            )
        }
    }
}

/// The request target exactly as matched against [`ROOT_TARGET`]
///
/// Origin-form targets give path plus query. Absolute-form targets
/// (`GET http://host/`) are compared whole, so they never match.
fn request_target(uri: &Uri) -> Cow<'_, str> {
    if uri.authority().is_some() {
        return Cow::Owned(uri.to_string());
    }
    Cow::Borrowed(uri.path_and_query().map_or(ROOT_TARGET, |pq| pq.as_str()))
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
