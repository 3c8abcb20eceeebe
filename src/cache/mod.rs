//! Offline cache for the app shell: network first, stored copy when offline.

pub mod config;
pub mod http;
pub mod network;
pub mod storage;
pub mod worker;

pub use config::CacheConfig;
pub use http::{Request, Response, ResponseType};
pub use network::Network;
pub use storage::{CacheStorage, SqliteCacheStorage};
pub use worker::{FetchOutcome, OfflineCache, WorkerHost, WorkerState};
