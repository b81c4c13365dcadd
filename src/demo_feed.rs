use std::collections::HashMap;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use rand::Rng;
use rand::rngs::ThreadRng;

use crate::export;
use crate::schedule_fetch::GameRow;
use crate::state::{Delta, FetchKey, ProviderCommand};
use crate::stints::{LineupRow, RawPlayer, aggregate_stints, roster_from_rows};

pub const DEMO_TEAM_ID: u32 = 7;
const DEMO_TEAM_NAME: &str = "Harbor City Comets";

const OPPONENTS: [(u32, &str); 4] = [
    (9, "Bayside Pelicans"),
    (12, "Northgate Lynx"),
    (15, "Summit Ridge Miners"),
    (21, "Old Town Mariners"),
];

const POSITIONS: [&str; 5] = ["PG", "SG", "SF", "PF", "C"];

const HOME_NAMES: [&str; 8] = [
    "D. Okafor", "J. Marsh", "T. Reyes", "L. Whitfield", "M. Calloway", "A. Brandt", "K. Osei",
    "R. Thibodeaux",
];

const AWAY_NAMES: [&str; 8] = [
    "C. Vance", "E. Okonkwo", "S. Prewitt", "N. Delgado", "B. Ashford", "F. Moreau", "G. Halloran",
    "P. Stanek",
];

/// Offline stand-in for the lineup backend: serves a small synthetic season
/// so the dashboard is usable without the API. Generated rows follow the real
/// feed's shape, including shared substitution boundaries for both teams and
/// the occasional missing away row.
pub fn spawn_demo_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let mut rng = rand::thread_rng();
        let games = demo_games();
        let mut lineups: HashMap<u32, Vec<LineupRow>> = HashMap::new();

        let _ = tx.send(Delta::SetHomeTeam(DEMO_TEAM_ID));
        let _ = tx.send(Delta::Log("[INFO] Demo feed active (HOOPS_DEMO)".to_string()));

        loop {
            thread::sleep(Duration::from_millis(150));

            while let Ok(cmd) = cmd_rx.try_recv() {
                match cmd {
                    ProviderCommand::FetchSchedule => {
                        let _ = tx.send(Delta::SetGames(games.clone()));
                    }
                    ProviderCommand::FetchGameLineups { game_id } => {
                        let rows = game_rows(&mut lineups, &games, game_id, &mut rng).to_vec();
                        let _ = tx.send(Delta::SetGameLineups {
                            key: FetchKey::game(game_id),
                            rows,
                        });
                    }
                    ProviderCommand::FetchGameRoster { game_id } => {
                        let rows: Vec<LineupRow> =
                            game_rows(&mut lineups, &games, game_id, &mut rng)
                                .iter()
                                .filter(|row| row.team_id == DEMO_TEAM_ID)
                                .cloned()
                                .collect();
                        let key = FetchKey {
                            game_id,
                            team_id: Some(DEMO_TEAM_ID),
                            player_id: None,
                        };
                        let _ = tx.send(Delta::SetRosterLineups { key, rows });
                    }
                    ProviderCommand::FetchPlayerStints { game_id, player_id } => {
                        send_player_rows(&tx, &mut lineups, &games, game_id, player_id, &mut rng);
                    }
                    ProviderCommand::PrefetchPlayerStints {
                        game_id,
                        player_ids,
                    } => {
                        for player_id in player_ids {
                            send_player_rows(
                                &tx,
                                &mut lineups,
                                &games,
                                game_id,
                                player_id,
                                &mut rng,
                            );
                        }
                    }
                    ProviderCommand::ExportStints { game_id } => {
                        let rows = game_rows(&mut lineups, &games, game_id, &mut rng);
                        let book = aggregate_stints(rows, Some(DEMO_TEAM_ID));
                        let roster = roster_from_rows(rows);
                        let path = format!("stints_game_{game_id}.xlsx");
                        match export::export_stints(std::path::Path::new(&path), &book, &roster) {
                            Ok(report) => {
                                let _ = tx.send(Delta::ExportFinished {
                                    path,
                                    stints: report.stints,
                                    errors: 0,
                                });
                            }
                            Err(err) => {
                                let _ = tx.send(Delta::Log(format!("[WARN] Export failed: {err}")));
                            }
                        }
                    }
                }
            }
        }
    });
}

fn send_player_rows(
    tx: &Sender<Delta>,
    lineups: &mut HashMap<u32, Vec<LineupRow>>,
    games: &[GameRow],
    game_id: u32,
    player_id: u32,
    rng: &mut ThreadRng,
) {
    let rows: Vec<LineupRow> = game_rows(lineups, games, game_id, rng)
        .iter()
        .filter(|row| row.players.iter().any(|p| p.id == Some(player_id)))
        .cloned()
        .collect();
    let key = FetchKey {
        game_id,
        team_id: Some(DEMO_TEAM_ID),
        player_id: Some(player_id),
    };
    let _ = tx.send(Delta::SetPlayerLineups { key, rows });
}

fn demo_games() -> Vec<GameRow> {
    let today = Utc::now().date_naive();
    OPPONENTS
        .iter()
        .enumerate()
        .flat_map(|(idx, (opp_id, opp_name))| {
            // Home and road leg against each opponent.
            let home_leg = GameRow {
                game_id: 100 + idx as u32 * 2,
                game_date: (today - ChronoDuration::days(7 * (idx as i64 * 2 + 1)))
                    .format("%Y-%m-%d")
                    .to_string(),
                home_id: DEMO_TEAM_ID,
                away_id: *opp_id,
                home_name: DEMO_TEAM_NAME.to_string(),
                away_name: opp_name.to_string(),
                home_score: 98 + idx as i32 * 3,
                away_score: 94 + idx as i32,
            };
            let road_leg = GameRow {
                game_id: 101 + idx as u32 * 2,
                game_date: (today - ChronoDuration::days(7 * (idx as i64 * 2 + 2)))
                    .format("%Y-%m-%d")
                    .to_string(),
                home_id: *opp_id,
                away_id: DEMO_TEAM_ID,
                home_name: opp_name.to_string(),
                away_name: DEMO_TEAM_NAME.to_string(),
                home_score: 101 - idx as i32,
                away_score: 99 + idx as i32,
            };
            [home_leg, road_leg]
        })
        .collect()
}

fn game_rows<'a>(
    lineups: &'a mut HashMap<u32, Vec<LineupRow>>,
    games: &[GameRow],
    game_id: u32,
    rng: &mut ThreadRng,
) -> &'a Vec<LineupRow> {
    lineups.entry(game_id).or_insert_with(|| {
        let opponent_id = games
            .iter()
            .find(|g| g.game_id == game_id)
            .map(|g| {
                if g.home_id == DEMO_TEAM_ID {
                    g.away_id
                } else {
                    g.home_id
                }
            })
            .unwrap_or(OPPONENTS[0].0);
        generate_game(opponent_id, rng)
    })
}

/// Builds rows for a full game: shared substitution boundaries per period,
/// one row per team per segment, five-man units rotating through an
/// eight-man roster.
fn generate_game(opponent_id: u32, rng: &mut ThreadRng) -> Vec<LineupRow> {
    let home_roster = build_roster(DEMO_TEAM_ID, &HOME_NAMES);
    let away_roster = build_roster(opponent_id, &AWAY_NAMES);
    let mut rows = Vec::new();

    for period in 1..=4u32 {
        let boundaries = period_boundaries(rng);
        for (segment, window) in boundaries.windows(2).enumerate() {
            let time_in = window[0].to_string();
            let time_out = window[1].to_string();

            rows.push(LineupRow {
                period,
                team_id: DEMO_TEAM_ID,
                time_in: time_in.clone(),
                time_out: time_out.clone(),
                players: unit_for(&home_roster, period, segment),
            });

            // A sliver of missing opposition data keeps the "no data" path
            // visible in the demo.
            if rng.gen_bool(0.06) {
                continue;
            }
            rows.push(LineupRow {
                period,
                team_id: opponent_id,
                time_in,
                time_out,
                players: unit_for(&away_roster, period, segment),
            });
        }
    }

    rows
}

fn build_roster(team_id: u32, names: &[&str; 8]) -> Vec<RawPlayer> {
    names
        .iter()
        .enumerate()
        .map(|(idx, name)| RawPlayer {
            id: Some(team_id * 100 + idx as u32 + 1),
            name: (*name).to_string(),
            position: POSITIONS[idx % POSITIONS.len()].to_string(),
        })
        .collect()
}

fn unit_for(roster: &[RawPlayer], period: u32, segment: usize) -> [RawPlayer; 5] {
    let offset = (period as usize + segment * 2) % roster.len();
    std::array::from_fn(|slot| roster[(offset + slot) % roster.len()].clone())
}

/// Countdown cut points for one period, descending from 720 to 0.
fn period_boundaries(rng: &mut ThreadRng) -> Vec<u32> {
    let cuts = rng.gen_range(2..=4);
    let mut points: Vec<u32> = (0..cuts).map(|_| rng.gen_range(60..660)).collect();
    points.push(720);
    points.push(0);
    points.sort_unstable_by(|a, b| b.cmp(a));
    points.dedup();
    points
}
