//! Request handler module
//!
//! Routes requests and loads the payload file.

pub mod payload;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
