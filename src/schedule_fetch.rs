use anyhow::{Context, Result};
use serde_json::Value;

use crate::http_client::{fetch_json, http_client};

/// One completed game from the schedule endpoint. `game_date` stays a raw
/// string; display formatting happens at the render layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRow {
    pub game_id: u32,
    pub game_date: String,
    pub home_id: u32,
    pub away_id: u32,
    pub home_name: String,
    pub away_name: String,
    pub home_score: i32,
    pub away_score: i32,
}

pub fn fetch_past_games(base: &str, team_id: u32, year: i32) -> Result<Vec<GameRow>> {
    let client = http_client()?;
    let url = format!("{base}/schedule/past-games/{team_id}/{year}");
    let body = fetch_json(client, &url).context("schedule request failed")?;
    parse_past_games_json(&body)
}

/// Parses the past-games response: a JSON array of game objects. A null or
/// non-array body yields an empty list; entries missing an id or a team name
/// are skipped.
pub fn parse_past_games_json(raw: &str) -> Result<Vec<GameRow>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }

    let root: Value = serde_json::from_str(trimmed).context("invalid schedule json")?;
    let Some(list) = root.as_array() else {
        return Ok(Vec::new());
    };

    let mut games = Vec::new();
    for entry in list {
        if let Some(game) = parse_game_row(entry) {
            games.push(game);
        }
    }
    Ok(games)
}

fn parse_game_row(value: &Value) -> Option<GameRow> {
    let game_id = pick_u32(value, "game_id")?;
    let home_name = pick_string(value, "home_name")?;
    let away_name = pick_string(value, "away_name")?;

    Some(GameRow {
        game_id,
        game_date: pick_string(value, "game_date").unwrap_or_default(),
        home_id: pick_u32(value, "home_id").unwrap_or(0),
        away_id: pick_u32(value, "away_id").unwrap_or(0),
        home_name,
        away_name,
        home_score: pick_i32(value, "home_score").unwrap_or(0),
        away_score: pick_i32(value, "away_score").unwrap_or(0),
    })
}

fn pick_string(value: &Value, key: &str) -> Option<String> {
    match value.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn pick_u32(value: &Value, key: &str) -> Option<u32> {
    let v = value.get(key)?;
    if let Some(num) = v.as_u64() {
        return Some(num as u32);
    }
    v.as_str().and_then(|s| s.trim().parse::<u32>().ok())
}

fn pick_i32(value: &Value, key: &str) -> Option<i32> {
    let v = value.get(key)?;
    if let Some(num) = v.as_i64() {
        return Some(num as i32);
    }
    v.as_str().and_then(|s| s.trim().parse::<i32>().ok())
}
