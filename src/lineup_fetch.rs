use anyhow::{Context, Result};
use serde_json::Value;

use crate::http_client::{fetch_json, http_client};
use crate::stints::{LineupRow, RawPlayer, UNKNOWN_POSITION};

/// Fixed column names for the five player slots of a wide lineup row. The
/// feed pivots players into numbered columns; indexing a constant table keeps
/// the slot order stable without building field names at runtime.
const PLAYER_COLUMNS: [(&str, &str, &str); 5] = [
    ("player1_id", "player1_name", "player1_position"),
    ("player2_id", "player2_name", "player2_position"),
    ("player3_id", "player3_name", "player3_position"),
    ("player4_id", "player4_name", "player4_position"),
    ("player5_id", "player5_name", "player5_position"),
];

pub fn fetch_wide_lineups(
    base: &str,
    game_id: u32,
    team_id: Option<u32>,
    player_id: Option<u32>,
) -> Result<Vec<LineupRow>> {
    let client = http_client()?;

    let mut url = format!("{base}/lineups/wide?game_id={game_id}");
    if let Some(team_id) = team_id {
        url.push_str(&format!("&team_id={team_id}"));
    }
    if let Some(player_id) = player_id {
        url.push_str(&format!("&player_id={player_id}"));
    }

    let body = fetch_json(client, &url).context("lineups request failed")?;
    parse_wide_lineups_json(&body)
}

/// Parses a `/lineups/wide` response body. A missing, `null`, or non-array
/// `lineups` field yields an empty row list so the UI renders its uniform
/// "no data" state; malformed individual rows are skipped.
pub fn parse_wide_lineups_json(raw: &str) -> Result<Vec<LineupRow>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }

    let root: Value = serde_json::from_str(trimmed).context("invalid lineups json")?;
    let Some(list) = root.get("lineups").and_then(|v| v.as_array()) else {
        return Ok(Vec::new());
    };

    let mut rows = Vec::new();
    for entry in list {
        if let Some(row) = parse_lineup_row(entry) {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn parse_lineup_row(value: &Value) -> Option<LineupRow> {
    let period = pick_u32(value, &["period"])?;
    let team_id = pick_u32(value, &["team_id"])?;
    // Clock values stay verbatim; the aggregator owns the numeric parse and
    // drops rows it cannot read.
    let time_in = raw_clock_string(value.get("time_in"))?;
    let time_out = raw_clock_string(value.get("time_out"))?;

    let players = PLAYER_COLUMNS.map(|(id_key, name_key, position_key)| RawPlayer {
        id: pick_u32(value, &[id_key]),
        name: pick_string(value, &[name_key]).unwrap_or_default(),
        position: pick_string(value, &[position_key])
            .unwrap_or_else(|| UNKNOWN_POSITION.to_string()),
    });

    Some(LineupRow {
        period,
        team_id,
        time_in,
        time_out,
        players,
    })
}

fn raw_clock_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn pick_string(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        match value.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.trim().to_string()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

fn pick_u32(value: &Value, keys: &[&str]) -> Option<u32> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            if let Some(num) = v.as_u64() {
                return Some(num as u32);
            }
            if let Some(s) = v.as_str()
                && let Ok(num) = s.trim().parse::<u32>()
            {
                return Some(num);
            }
        }
    }
    None
}
