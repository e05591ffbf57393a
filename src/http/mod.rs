//! HTTP protocol layer module
//!
//! Response builders and CORS headers, decoupled from request routing.

pub mod cors;
pub mod response;

pub use response::{
    build_404_response, build_500_response, build_501_response, build_payload_response,
    build_preflight_response,
};
