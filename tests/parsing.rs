use std::fs;
use std::path::PathBuf;

use stint_terminal::lineup_fetch::parse_wide_lineups_json;
use stint_terminal::schedule_fetch::parse_past_games_json;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_wide_lineups_fixture() {
    let raw = read_fixture("lineups_wide.json");
    let rows = parse_wide_lineups_json(&raw).expect("fixture should parse");

    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].period, 1);
    assert_eq!(rows[0].team_id, 7);
    // Numeric and string clock values both come through verbatim.
    assert_eq!(rows[0].time_in, "720");
    assert_eq!(rows[0].time_out, "600");
    assert_eq!(rows[1].time_out, "600");
    assert_eq!(rows[0].players[0].id, Some(701));
    assert_eq!(rows[0].players[0].name, "D. Okafor");
    // Null position falls back to the unknown marker.
    assert_eq!(rows[0].players[4].position, "-");
    // String-typed player ids still parse.
    assert_eq!(rows[1].players[0].id, Some(901));
}

#[test]
fn lineups_keep_unparseable_clock_strings_verbatim() {
    let raw = read_fixture("lineups_wide.json");
    let rows = parse_wide_lineups_json(&raw).expect("fixture should parse");
    assert_eq!(rows[2].time_in, "N/A");
}

#[test]
fn lineups_null_is_empty() {
    assert!(parse_wide_lineups_json("null").unwrap().is_empty());
    assert!(parse_wide_lineups_json("").unwrap().is_empty());
    assert!(parse_wide_lineups_json("{\"lineups\": null}").unwrap().is_empty());
    assert!(parse_wide_lineups_json("{}").unwrap().is_empty());
}

#[test]
fn lineups_reject_invalid_json() {
    assert!(parse_wide_lineups_json("{not json").is_err());
}

#[test]
fn lineup_rows_missing_required_fields_are_skipped() {
    let raw = r#"{"lineups": [
        {"team_id": 7, "time_in": "720", "time_out": "600"},
        {"period": 1, "time_in": "720", "time_out": "600"},
        {"period": 1, "team_id": 7, "time_out": "600"},
        {"period": 1, "team_id": 7, "time_in": "720", "time_out": "600"}
    ]}"#;
    let rows = parse_wide_lineups_json(raw).expect("should parse");
    assert_eq!(rows.len(), 1);
    // All five player slots exist even when the feed omits the columns.
    assert_eq!(rows[0].players.len(), 5);
    assert!(rows[0].players.iter().all(|p| p.id.is_none()));
}

#[test]
fn parses_past_games_fixture() {
    let raw = read_fixture("past_games.json");
    let games = parse_past_games_json(&raw).expect("fixture should parse");

    // Entries without an id or a team name are skipped.
    assert_eq!(games.len(), 2);
    assert_eq!(games[0].game_id, 301);
    assert_eq!(games[0].home_name, "Harbor City Comets");
    assert_eq!(games[0].home_score, 101);
    assert_eq!(games[0].game_date, "Fri, 01 Mar 2024 00:00:00 GMT");
    // String-typed ids and scores still parse.
    assert_eq!(games[1].game_id, 302);
    assert_eq!(games[1].home_id, 12);
    assert_eq!(games[1].home_score, 88);
}

#[test]
fn past_games_null_is_empty() {
    assert!(parse_past_games_json("null").unwrap().is_empty());
    assert!(parse_past_games_json("").unwrap().is_empty());
    assert!(parse_past_games_json("{\"games\": []}").unwrap().is_empty());
}
