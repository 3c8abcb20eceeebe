use async_trait::async_trait;

use crate::{db::Database, error::CacheError};

use super::http::{Request, Response};

/// Named response caches, keyed by request URL.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Cache names in creation order.
    async fn keys(&self) -> Result<Vec<String>, CacheError>;

    /// Returns whether the cache existed.
    async fn delete(&self, cache_name: &str) -> Result<bool, CacheError>;

    async fn put(&self, cache_name: &str, request: &Request, response: &Response)
        -> Result<(), CacheError>;

    /// Store all pairs or none.
    async fn put_all(
        &self,
        cache_name: &str,
        entries: Vec<(Request, Response)>,
    ) -> Result<(), CacheError>;

    /// Look `request` up across every cache, oldest first.
    async fn match_request(&self, request: &Request) -> Result<Option<Response>, CacheError>;
}

/// `CacheStorage` persisted in SQLite.
#[derive(Clone)]
pub struct SqliteCacheStorage {
    db: Database,
}

impl SqliteCacheStorage {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl CacheStorage for SqliteCacheStorage {
    async fn keys(&self) -> Result<Vec<String>, CacheError> {
        Ok(self.db.list_caches().await?)
    }

    async fn delete(&self, cache_name: &str) -> Result<bool, CacheError> {
        Ok(self.db.delete_cache(cache_name).await?)
    }

    async fn put(
        &self,
        cache_name: &str,
        request: &Request,
        response: &Response,
    ) -> Result<(), CacheError> {
        Ok(self
            .db
            .put_entry(cache_name, &request.cache_key(), response)
            .await?)
    }

    async fn put_all(
        &self,
        cache_name: &str,
        entries: Vec<(Request, Response)>,
    ) -> Result<(), CacheError> {
        let entries = entries
            .into_iter()
            .map(|(request, response)| (request.cache_key(), response))
            .collect();
        Ok(self.db.put_entries(cache_name, entries).await?)
    }

    async fn match_request(&self, request: &Request) -> Result<Option<Response>, CacheError> {
        let entry = self.db.find_entry(&request.cache_key()).await?;
        Ok(entry.map(|entry| entry.response))
    }
}
