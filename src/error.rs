//! Error taxonomy for the capture layer.
//!
//! Capture failures are terminal for a camera session and end up as a hint on
//! the camera panel. Cache failures are recovered by falling back to stored
//! responses or swallowed outright; none of them should leave the page unusable.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CaptureError {
    /// Camera access was denied or no camera is available.
    #[error("camera permission denied or unavailable: {0}")]
    PermissionDenied(String),

    /// The platform has no barcode detection capability.
    #[error("barcode detection is not supported on this platform")]
    Unsupported,

    /// A single frame could not be analysed. Retried on the next frame.
    #[error("barcode detection failed: {0}")]
    Detection(String),

    /// A capture session is already live.
    #[error("a camera session is already active")]
    AlreadyActive,
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("network fetch failed: {0}")]
    Network(String),

    #[error("cache storage failed: {0}")]
    Storage(String),

    #[error("invalid request url '{url}': {reason}")]
    InvalidRequest { url: String, reason: String },
}

impl CacheError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }
}

impl From<anyhow::Error> for CacheError {
    fn from(err: anyhow::Error) -> Self {
        Self::Storage(format!("{err:#}"))
    }
}
