//! Payload file loading module
//!
//! Reads the payload file from disk on every request. Nothing is cached, so
//! external updates to the file are visible immediately.

use std::fmt;
use std::io;
use std::path::Path;
use tokio::fs;

/// Failure reading the payload file
#[derive(Debug)]
pub enum PayloadError {
    /// The file does not exist (404)
    NotFound,
    /// Any other I/O failure: permissions, path is a directory, ... (500)
    Io(io::Error),
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "payload file not found"),
            Self::Io(e) => write!(f, "failed to read payload file: {e}"),
        }
    }
}

impl std::error::Error for PayloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound => None,
            Self::Io(e) => Some(e),
        }
    }
}

impl From<io::Error> for PayloadError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::NotFound {
            Self::NotFound
        } else {
            Self::Io(e)
        }
    }
}

/// Read the whole payload file in binary mode
pub async fn load_payload(path: &Path) -> Result<Vec<u8>, PayloadError> {
    Ok(fs::read(path).await?)
}
