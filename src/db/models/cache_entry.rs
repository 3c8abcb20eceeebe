//! A stored response row.

use chrono::{DateTime, Utc};

use crate::cache::http::Response;

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub cache_name: String,
    /// Request URL without fragment.
    pub url: String,
    pub response: Response,
    pub stored_at: DateTime<Utc>,
}
