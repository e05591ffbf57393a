// Server module entry point
// Owns the listener and shared state, and runs the accept loop

pub mod connection;
pub mod listener;

// `loop` is a keyword, so the file is mounted as server_loop
#[path = "loop.rs"]
pub mod server_loop;

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::{AppState, Config};
pub use listener::create_reusable_listener;
pub use server_loop::start_server_loop;

/// The payload server: one listener plus the read-only state every request sees
pub struct PayloadServer {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl PayloadServer {
    /// Bind the configured address. Must be called inside a tokio runtime.
    pub fn bind(config: &Config) -> Result<Self, Box<dyn std::error::Error>> {
        let addr = config.socket_addr()?;
        let listener = create_reusable_listener(addr)?;
        let state = Arc::new(AppState::new(config)?);
        Ok(Self { listener, state })
    }

    /// Actual bound address (resolves port 0)
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve until the process exits
    pub async fn run(self) {
        start_server_loop(self.listener, self.state).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    const STROKE: &str = r#"{"points":[[0,0],[1,1]]}"#;

    /// Start a server on an ephemeral loopback port serving `payload_dir/stroke.json`
    async fn start(payload_dir: &std::path::Path, tweak: impl FnOnce(&mut Config)) -> SocketAddr {
        let mut cfg = Config::load_from("does-not-exist/stroke-server-test").unwrap();
        cfg.server.host = "127.0.0.1".to_string();
        cfg.server.port = 0;
        cfg.payload.path = payload_dir.join("stroke.json").to_string_lossy().into_owned();
        cfg.logging.access_log = false;
        tweak(&mut cfg);

        let server = PayloadServer::bind(&cfg).unwrap();
        let addr = server.local_addr().unwrap();
        tokio::spawn(server.run());
        addr
    }

    fn payload_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("stroke-server-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Send one raw HTTP/1.1 request and return the full response text
    async fn send(addr: SocketAddr, method: &str, target: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!(
            "{method} {target} HTTP/1.1\r\nHost: localhost\r\nOrigin: https://canvas.example\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
        );
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    fn status_line(response: &str) -> &str {
        response.lines().next().unwrap_or_default()
    }

    fn body(response: &str) -> &str {
        response.split_once("\r\n\r\n").map_or("", |(_, b)| b)
    }

    fn has_header(response: &str, name: &str, value: &str) -> bool {
        let (head, _) = response.split_once("\r\n\r\n").unwrap_or((response, ""));
        head.lines().skip(1).any(|line| {
            line.split_once(':').is_some_and(|(n, v)| {
                n.trim().eq_ignore_ascii_case(name) && v.trim() == value
            })
        })
    }

    #[tokio::test]
    async fn test_serves_payload_over_tcp() {
        let dir = payload_dir("get");
        std::fs::write(dir.join("stroke.json"), STROKE).unwrap();
        let addr = start(&dir, |_| {}).await;

        for method in ["GET", "POST"] {
            let response = send(addr, method, "/").await;
            assert_eq!(status_line(&response), "HTTP/1.1 200 OK");
            assert!(has_header(&response, "content-type", "application/json"));
            assert!(has_header(&response, "access-control-allow-origin", "*"));
            assert_eq!(body(&response), STROKE);
        }

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_not_found_cases_over_tcp() {
        let dir = payload_dir("missing");
        let addr = start(&dir, |_| {}).await;

        let response = send(addr, "GET", "/").await;
        assert_eq!(status_line(&response), "HTTP/1.1 404 Not Found");
        assert!(has_header(&response, "access-control-allow-origin", "*"));
        assert_eq!(body(&response), "stroke.json not found");

        let response = send(addr, "GET", "/other").await;
        assert_eq!(status_line(&response), "HTTP/1.1 404 Not Found");
        assert_eq!(body(&response), "File not found");

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_preflight_over_tcp() {
        let dir = payload_dir("options");
        let addr = start(&dir, |_| {}).await;

        let response = send(addr, "OPTIONS", "/anything").await;
        assert_eq!(status_line(&response), "HTTP/1.1 200 OK");
        assert!(has_header(&response, "access-control-allow-origin", "*"));
        assert!(has_header(&response, "access-control-allow-methods", "GET, OPTIONS"));
        assert!(has_header(&response, "access-control-allow-headers", "Content-Type"));
        assert!(has_header(&response, "content-length", "0"));
        assert_eq!(body(&response), "");

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_unsupported_method_over_tcp() {
        let dir = payload_dir("delete");
        let addr = start(&dir, |_| {}).await;

        let response = send(addr, "DELETE", "/").await;
        assert_eq!(status_line(&response), "HTTP/1.1 501 Not Implemented");
        assert_eq!(body(&response), "Unsupported method ('DELETE')");

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_clients() {
        let dir = payload_dir("concurrent");
        std::fs::write(dir.join("stroke.json"), STROKE).unwrap();
        let addr = start(&dir, |_| {}).await;

        let clients: Vec<_> = (0..8)
            .map(|_| tokio::spawn(send(addr, "GET", "/")))
            .collect();
        for client in clients {
            let response = client.await.unwrap();
            assert_eq!(status_line(&response), "HTTP/1.1 200 OK");
            assert_eq!(body(&response), STROKE);
        }

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_configured_origin_over_tcp() {
        let dir = payload_dir("origin");
        std::fs::write(dir.join("stroke.json"), STROKE).unwrap();
        let addr = start(&dir, |cfg| {
            cfg.cors.allow_origin = "https://canvas.example".to_string();
        })
        .await;

        let response = send(addr, "GET", "/").await;
        assert!(has_header(
            &response,
            "access-control-allow-origin",
            "https://canvas.example"
        ));

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_connection_limit_closes_excess() {
        let dir = payload_dir("limit");
        let addr = start(&dir, |cfg| cfg.performance.max_connections = Some(0)).await;

        let mut stream = TcpStream::connect(addr).await.unwrap();
        let mut buf = [0u8; 64];
        let read = stream.read(&mut buf).await;
        assert!(matches!(read, Ok(0) | Err(_)));

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_bind_rejects_bad_host() {
        let mut cfg = Config::load_from("does-not-exist/stroke-server-test").unwrap();
        cfg.server.host = "not-an-ip".to_string();
        assert!(PayloadServer::bind(&cfg).is_err());
    }
}
