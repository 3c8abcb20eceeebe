use async_trait::async_trait;

use crate::error::CacheError;

use super::http::{Request, Response};

/// Live network access, implemented by the host.
#[async_trait]
pub trait Network: Send + Sync {
    /// Resolves with any HTTP response, including error statuses. Fails only
    /// when no response arrived at all (offline, DNS, aborted).
    async fn fetch(&self, request: &Request) -> Result<Response, CacheError>;
}
