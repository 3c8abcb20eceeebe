//! The slice of HTTP the asset cache deals in.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::CacheError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub url: Url,
}

impl Request {
    pub fn get(url: Url) -> Self {
        Self {
            method: "GET".to_string(),
            url,
        }
    }

    pub fn parse(method: &str, url: &str) -> Result<Self, CacheError> {
        let url = Url::parse(url).map_err(|err| CacheError::InvalidRequest {
            url: url.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Self {
            method: method.to_ascii_uppercase(),
            url,
        })
    }

    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }

    /// Cache lookup key: the URL without its fragment.
    pub fn cache_key(&self) -> String {
        let mut url = self.url.clone();
        url.set_fragment(None);
        url.into()
    }
}

/// Fetch response type; only `Basic` (same-origin, non-opaque) responses are stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    Basic,
    Cors,
    Default,
    Error,
    Opaque,
    #[serde(rename = "opaqueredirect")]
    OpaqueRedirect,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::Basic => "basic",
            ResponseType::Cors => "cors",
            ResponseType::Default => "default",
            ResponseType::Error => "error",
            ResponseType::Opaque => "opaque",
            ResponseType::OpaqueRedirect => "opaqueredirect",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "basic" => Some(ResponseType::Basic),
            "cors" => Some(ResponseType::Cors),
            "default" => Some(ResponseType::Default),
            "error" => Some(ResponseType::Error),
            "opaque" => Some(ResponseType::Opaque),
            "opaqueredirect" => Some(ResponseType::OpaqueRedirect),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub response_type: ResponseType,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn basic(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            response_type: ResponseType::Basic,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// 2xx status.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_cacheable(&self) -> bool {
        self.ok() && self.response_type == ResponseType::Basic
    }
}
