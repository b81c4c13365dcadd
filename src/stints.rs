//! Stint reconstruction.
//!
//! The lineup feed delivers one row per five-player unit per team per time
//! window, in no particular order, with the clock counted down from the start
//! of each period. A stint is the maximal interval during which both
//! ten-player units are constant, so both teams' rows for the same stint share
//! the same `(period, time_in, time_out)` boundaries. Everything here is a
//! pure transformation over an already-fetched row slice.

use std::collections::{BTreeMap, HashMap, HashSet};

/// Regulation period length in seconds. Overtime periods are modeled with the
/// same length; grouping itself never bounds the period number.
pub const PERIOD_SECS: f64 = 720.0;

/// Marker used when the feed has no position for a player slot.
pub const UNKNOWN_POSITION: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPlayer {
    pub id: Option<u32>,
    pub name: String,
    pub position: String,
}

/// One raw interval record for a single team's five-player unit.
/// `time_in`/`time_out` are kept verbatim (the feed serves numeric strings)
/// and parsed defensively during aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineupRow {
    pub period: u32,
    pub team_id: u32,
    pub time_in: String,
    pub time_out: String,
    pub players: [RawPlayer; 5],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
    /// The home-team identifier was not available at classification time.
    /// Rows are still placed (on the home side) rather than dropped, and the
    /// caller re-aggregates once the identifier resolves.
    Unresolved,
}

pub fn classify_side(team_id: u32, home_team_id: Option<u32>) -> Side {
    match home_team_id {
        Some(home) if team_id == home => Side::Home,
        Some(_) => Side::Away,
        None => Side::Unresolved,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stint {
    /// Positional ordinal assigned after sorting; unique within one
    /// aggregation run only.
    pub id: usize,
    pub period: u32,
    /// Elapsed seconds since period start, in `[0, PERIOD_SECS]`.
    pub start_secs: f64,
    pub end_secs: f64,
    /// Empty until that side's row has been seen.
    pub home_players: Vec<RawPlayer>,
    pub away_players: Vec<RawPlayer>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StintBook {
    pub by_period: BTreeMap<u32, Vec<Stint>>,
    /// Flattened view across all periods, in global id order.
    pub all: Vec<Stint>,
}

impl StintBook {
    pub fn stints_for(&self, period: u32) -> &[Stint] {
        self.by_period.get(&period).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn max_period(&self) -> u32 {
        self.by_period.keys().next_back().copied().unwrap_or(0)
    }
}

/// Converts a countdown clock value to elapsed seconds since period start.
/// Returns `None` for unparseable or non-finite input; the caller drops the
/// row and continues.
fn parse_countdown(raw: &str) -> Option<f64> {
    let value = raw.trim().parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some((PERIOD_SECS - value).clamp(0.0, PERIOD_SECS))
}

/// Merges raw lineup rows into a period-grouped stint timeline.
///
/// Rows sharing a `(period, start, end)` boundary are two sides of the same
/// stint; the first sighting creates it, a repeat sighting fills in the
/// classified side. A second row for an already-populated side overwrites
/// that roster (last write wins). Ids are assigned after sorting by period
/// then start time.
pub fn aggregate_stints(rows: &[LineupRow], home_team_id: Option<u32>) -> StintBook {
    let mut merged: HashMap<(u32, u64, u64), Stint> = HashMap::new();

    for row in rows {
        let Some(start_secs) = parse_countdown(&row.time_in) else {
            continue;
        };
        let Some(end_secs) = parse_countdown(&row.time_out) else {
            continue;
        };

        let key = (row.period, start_secs.to_bits(), end_secs.to_bits());
        let stint = merged.entry(key).or_insert_with(|| Stint {
            id: 0,
            period: row.period,
            start_secs,
            end_secs,
            home_players: Vec::new(),
            away_players: Vec::new(),
        });

        let roster = row.players.to_vec();
        match classify_side(row.team_id, home_team_id) {
            Side::Home | Side::Unresolved => stint.home_players = roster,
            Side::Away => stint.away_players = roster,
        }
    }

    let mut all: Vec<Stint> = merged.into_values().collect();
    all.sort_by(|a, b| {
        a.period
            .cmp(&b.period)
            .then(
                a.start_secs
                    .partial_cmp(&b.start_secs)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
            .then(
                a.end_secs
                    .partial_cmp(&b.end_secs)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
    });
    for (idx, stint) in all.iter_mut().enumerate() {
        stint.id = idx;
    }

    let mut by_period: BTreeMap<u32, Vec<Stint>> = BTreeMap::new();
    for stint in &all {
        by_period.entry(stint.period).or_default().push(stint.clone());
    }

    StintBook { by_period, all }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterPlayer {
    pub id: u32,
    pub name: String,
    pub position: String,
}

/// Deduplicates the players appearing across a game's rows, in first-seen
/// order. Slots missing an id, name, or position are skipped; they cannot be
/// selected on the player screen anyway.
pub fn roster_from_rows(rows: &[LineupRow]) -> Vec<RosterPlayer> {
    let mut seen: HashSet<u32> = HashSet::new();
    let mut roster = Vec::new();

    for row in rows {
        for player in &row.players {
            let Some(id) = player.id else {
                continue;
            };
            if player.name.is_empty()
                || player.position.is_empty()
                || player.position == UNKNOWN_POSITION
            {
                continue;
            }
            if seen.insert(id) {
                roster.push(RosterPlayer {
                    id,
                    name: player.name.clone(),
                    position: player.position.clone(),
                });
            }
        }
    }

    roster
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerInterval {
    pub period: u32,
    pub start_secs: f64,
    pub end_secs: f64,
}

/// Normalizes a player-filtered row feed into elapsed-time intervals, one per
/// row, ordered by period then start. Rows with unparseable times are dropped.
pub fn player_timeline(rows: &[LineupRow]) -> Vec<PlayerInterval> {
    let mut intervals: Vec<PlayerInterval> = rows
        .iter()
        .filter_map(|row| {
            let start_secs = parse_countdown(&row.time_in)?;
            let end_secs = parse_countdown(&row.time_out)?;
            Some(PlayerInterval {
                period: row.period,
                start_secs,
                end_secs,
            })
        })
        .collect();

    intervals.sort_by(|a, b| {
        a.period.cmp(&b.period).then(
            a.start_secs
                .partial_cmp(&b.start_secs)
                .unwrap_or(std::cmp::Ordering::Equal),
        )
    });
    intervals
}

/// Formats elapsed seconds as `MM:SS` for the time-range controls.
pub fn format_clock(secs: f64) -> String {
    let total = secs.max(0.0).round() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_flips_direction() {
        assert_eq!(parse_countdown("720"), Some(0.0));
        assert_eq!(parse_countdown("600"), Some(120.0));
        assert_eq!(parse_countdown("0"), Some(720.0));
        assert_eq!(parse_countdown(" 360.5 "), Some(359.5));
    }

    #[test]
    fn countdown_rejects_garbage() {
        assert_eq!(parse_countdown("N/A"), None);
        assert_eq!(parse_countdown(""), None);
        assert_eq!(parse_countdown("NaN"), None);
    }

    #[test]
    fn countdown_clamps_out_of_range() {
        assert_eq!(parse_countdown("800"), Some(0.0));
        assert_eq!(parse_countdown("-5"), Some(720.0));
    }

    #[test]
    fn classify_requires_resolved_home_id() {
        assert_eq!(classify_side(7, Some(7)), Side::Home);
        assert_eq!(classify_side(9, Some(7)), Side::Away);
        assert_eq!(classify_side(7, None), Side::Unresolved);
    }

    #[test]
    fn clock_format_pads_both_fields() {
        assert_eq!(format_clock(0.0), "00:00");
        assert_eq!(format_clock(120.0), "02:00");
        assert_eq!(format_clock(719.4), "11:59");
        assert_eq!(format_clock(-3.0), "00:00");
    }
}
