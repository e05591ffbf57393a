//! Logger module
//!
//! Logging utilities for the payload server:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

/// The one-line startup banner, e.g.
/// `Serving stroke.json on http://localhost:8000/stroke.json with CORS enabled`
pub fn banner(addr: &SocketAddr, config: &Config) -> String {
    format!(
        "Serving {} on {} with CORS enabled",
        config.payload_name(),
        config.banner_url(addr.port())
    )
}

/// Print the startup banner
///
/// The first line always goes to stdout, whatever the log targets are.
pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    println!("{}", banner(addr, config));
    write_info(&format!("[Server] Listening on: http://{addr}"));
    write_info(&format!("[Server] Payload file: {}", config.payload.path));
    if let Some(workers) = config.server.workers {
        write_info(&format!("[Server] Worker threads: {workers}"));
    }
    if let Some(max) = config.performance.max_connections {
        write_info(&format!("[Server] Max connections: {max}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("[Server] Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("[Server] Error log: {path}"));
    }
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}
