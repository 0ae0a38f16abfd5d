use anyhow::{Context, Result};

use crate::http_client::{api_base, get_json, http_client};
use crate::state::{CountryInfo, PlayerProfile};

pub fn fetch_player_profile(username: &str) -> Result<PlayerProfile> {
    let client = http_client()?;
    let url = format!("{}/pub/player/{username}", api_base());
    let body = get_json(client, &url)?;
    parse_player_profile_json(&body)
}

pub fn fetch_country_info(code: &str) -> Result<CountryInfo> {
    let client = http_client()?;
    let url = format!("{}/pub/country/{code}", api_base());
    let body = get_json(client, &url)?;
    parse_country_info_json(&body)
}

pub fn parse_player_profile_json(raw: &str) -> Result<PlayerProfile> {
    serde_json::from_str(raw.trim()).context("invalid player profile json")
}

pub fn parse_country_info_json(raw: &str) -> Result<CountryInfo> {
    serde_json::from_str(raw.trim()).context("invalid country json")
}

/// The profile's `country` field is a reference path; the country code is
/// its final `/`-delimited segment.
pub fn country_code_from_path(path: &str) -> Option<String> {
    let code = path.rsplit('/').next().map(str::trim).unwrap_or_default();
    if code.is_empty() {
        None
    } else {
        Some(code.to_string())
    }
}
