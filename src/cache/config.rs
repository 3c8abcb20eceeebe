use serde::{Deserialize, Serialize};

/// The app shell and the name of the generation that caches it.
///
/// Bump `generation` whenever the shell changes; activation purges every
/// other generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CacheConfig {
    pub generation: String,
    pub app_shell: Vec<String>,
    /// Served when offline and nothing matches the request.
    pub root_path: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            generation: "cdx-web-scan-v7".to_string(),
            app_shell: vec![
                "/".to_string(),
                "/static/styles.css".to_string(),
                "/static/app.js".to_string(),
                "/manifest.webmanifest".to_string(),
                "/static/icon.svg".to_string(),
            ],
            root_path: "/".to_string(),
        }
    }
}
