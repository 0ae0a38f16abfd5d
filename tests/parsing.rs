use std::fs;
use std::path::PathBuf;

use gm_terminal::player_fetch::{
    country_code_from_path, parse_country_info_json, parse_player_profile_json,
};
use gm_terminal::roster_fetch::parse_titled_json;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_titled_roster_fixture_preserving_order() {
    let raw = read_fixture("titled_gm.json");
    let players = parse_titled_json(&raw).expect("fixture should parse");
    assert_eq!(players.len(), 3);
    assert_eq!(players[0], "Hikaru");
    assert_eq!(players[1], "MagnusCarlsen");
    assert_eq!(players[2], "FabianoCaruana");
}

#[test]
fn titled_roster_without_players_field_is_empty() {
    let players = parse_titled_json("{}").expect("payload should parse");
    assert!(players.is_empty());
}

#[test]
fn titled_roster_null_or_blank_is_empty() {
    assert!(parse_titled_json("null").expect("null should parse").is_empty());
    assert!(parse_titled_json("  ").expect("blank should parse").is_empty());
}

#[test]
fn titled_roster_rejects_malformed_payload() {
    assert!(parse_titled_json("{\"players\": 3}").is_err());
}

#[test]
fn parses_full_player_profile_fixture() {
    let raw = read_fixture("player_profile.json");
    let profile = parse_player_profile_json(&raw).expect("fixture should parse");
    assert_eq!(profile.player_id, 15448422);
    assert_eq!(profile.username, "hikaru");
    assert_eq!(profile.followers, 1181430);
    assert_eq!(profile.country, "https://api.chess.com/pub/country/US");
    assert_eq!(profile.last_online, 1704067200);
    assert_eq!(profile.status, "premium");
    assert_eq!(profile.name.as_deref(), Some("Hikaru Nakamura"));
    assert_eq!(profile.league.as_deref(), Some("Legend"));
    assert_eq!(profile.is_streamer, Some(true));
    assert_eq!(profile.verified, Some(true));
    assert_eq!(profile.fide, Some(2802));
    assert_eq!(profile.streaming_platforms.len(), 1);
}

#[test]
fn minimal_profile_leaves_optionals_absent() {
    let raw = read_fixture("player_profile_minimal.json");
    let profile = parse_player_profile_json(&raw).expect("fixture should parse");
    assert_eq!(profile.username, "quietgm");
    assert!(profile.name.is_none());
    assert!(profile.avatar.is_none());
    assert!(profile.location.is_none());
    assert!(profile.league.is_none());
    assert!(profile.is_streamer.is_none());
    assert!(profile.verified.is_none());
    assert!(profile.fide.is_none());
    assert!(profile.streaming_platforms.is_empty());
}

#[test]
fn profile_without_required_fields_is_an_error() {
    assert!(parse_player_profile_json("{\"username\": \"x\"}").is_err());
}

#[test]
fn parses_country_fixture() {
    let raw = read_fixture("country.json");
    let country = parse_country_info_json(&raw).expect("fixture should parse");
    assert_eq!(country.code, "US");
    assert_eq!(country.name, "United States");
    assert_eq!(country.api_id, "https://api.chess.com/pub/country/US");
}

#[test]
fn country_code_is_last_path_segment() {
    assert_eq!(
        country_code_from_path("https://api.chess.com/pub/country/US").as_deref(),
        Some("US")
    );
    assert_eq!(country_code_from_path("XX").as_deref(), Some("XX"));
    assert!(country_code_from_path("https://api.chess.com/pub/country/").is_none());
    assert!(country_code_from_path("").is_none());
}
