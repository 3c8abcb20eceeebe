use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};

use crate::cache::http::ResponseType;

pub fn to_status(value: i64) -> Result<u16> {
    u16::try_from(value).map_err(|_| anyhow!("status contains out of range value {value}"))
}

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn parse_response_type(value: &str) -> Result<ResponseType> {
    ResponseType::parse(value).ok_or_else(|| anyhow!("unknown response type {value}"))
}
