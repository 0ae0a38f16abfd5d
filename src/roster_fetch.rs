use anyhow::{Context, Result};
use serde::Deserialize;

use crate::http_client::{api_base, get_json, http_client};

#[derive(Debug, Deserialize)]
struct TitledResponse {
    #[serde(default)]
    players: Vec<String>,
}

/// Fetches the usernames of every titled Grandmaster, in the order the
/// API ranks them.
pub fn fetch_grandmasters() -> Result<Vec<String>> {
    let client = http_client()?;
    let url = format!("{}/pub/titled/GM", api_base());
    let body = get_json(client, &url)?;
    parse_titled_json(&body)
}

/// A payload without a `players` field is an empty roster, not an error.
pub fn parse_titled_json(raw: &str) -> Result<Vec<String>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let response: TitledResponse =
        serde_json::from_str(trimmed).context("invalid titled roster json")?;
    Ok(response.players)
}
