use std::collections::HashSet;
use std::env;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use rayon::prelude::*;

use crate::export;
use crate::lineup_fetch::fetch_wide_lineups;
use crate::schedule_fetch::fetch_past_games;
use crate::state::{Delta, FetchKey, ProviderCommand};
use crate::stints::{aggregate_stints, roster_from_rows};

const DEFAULT_API_BASE: &str = "http://localhost:5000";

/// Spawns the network provider thread. Commands arrive from the UI over
/// `cmd_rx`; results flow back as deltas. Fetch failures are logged and leave
/// prior UI state in place; overlapping responses for the same view resolve
/// last-response-wins on the UI side.
pub fn spawn_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let base = api_base();
        let team_id = env_u32("HOOPS_TEAM_ID");
        let season_year = env_i32("HOOPS_SEASON_YEAR");
        let pool = build_fetch_pool();
        let inflight: Arc<Mutex<HashSet<FetchKey>>> = Arc::new(Mutex::new(HashSet::new()));

        if let Some(team_id) = team_id {
            let _ = tx.send(Delta::SetHomeTeam(team_id));
        } else {
            let _ = tx.send(Delta::Log(
                "[WARN] HOOPS_TEAM_ID not set; team sides stay unresolved until it is known"
                    .to_string(),
            ));
        }

        loop {
            let Ok(cmd) = cmd_rx.recv() else {
                return;
            };
            match cmd {
                ProviderCommand::FetchSchedule => {
                    let Some(team_id) = team_id else {
                        let _ = tx.send(Delta::Log(
                            "[WARN] Cannot fetch schedule without HOOPS_TEAM_ID".to_string(),
                        ));
                        continue;
                    };
                    let year = season_year.unwrap_or_else(current_year);
                    match fetch_past_games(&base, team_id, year) {
                        Ok(games) => {
                            let _ = tx.send(Delta::Log(format!(
                                "[INFO] Schedule loaded: {} games ({year})",
                                games.len()
                            )));
                            let _ = tx.send(Delta::SetGames(games));
                        }
                        Err(err) => {
                            let _ = tx.send(Delta::Log(format!("[WARN] Schedule fetch: {err}")));
                        }
                    }
                }
                ProviderCommand::FetchGameLineups { game_id } => {
                    let key = FetchKey::game(game_id);
                    spawn_lineup_job(&tx, &inflight, key, base.clone(), |key, rows| {
                        Delta::SetGameLineups { key, rows }
                    });
                }
                ProviderCommand::FetchGameRoster { game_id } => {
                    let key = FetchKey {
                        game_id,
                        team_id,
                        player_id: None,
                    };
                    spawn_lineup_job(&tx, &inflight, key, base.clone(), |key, rows| {
                        Delta::SetRosterLineups { key, rows }
                    });
                }
                ProviderCommand::FetchPlayerStints { game_id, player_id } => {
                    let key = FetchKey {
                        game_id,
                        team_id,
                        player_id: Some(player_id),
                    };
                    spawn_lineup_job(&tx, &inflight, key, base.clone(), |key, rows| {
                        Delta::SetPlayerLineups { key, rows }
                    });
                }
                ProviderCommand::PrefetchPlayerStints {
                    game_id,
                    player_ids,
                } => {
                    let tx = tx.clone();
                    let base = base.clone();
                    let pool_ref = &pool;
                    with_fetch_pool(pool_ref, || {
                        let errors = Mutex::new(Vec::<String>::new());
                        player_ids.par_iter().for_each(|player_id| {
                            let key = FetchKey {
                                game_id,
                                team_id,
                                player_id: Some(*player_id),
                            };
                            match fetch_wide_lineups(&base, game_id, team_id, Some(*player_id)) {
                                Ok(rows) => {
                                    let _ = tx.send(Delta::SetPlayerLineups { key, rows });
                                }
                                Err(err) => {
                                    let mut guard =
                                        errors.lock().expect("prefetch error list lock poisoned");
                                    guard.push(format!("player {player_id}: {err}"));
                                }
                            }
                        });
                        let errors = errors.into_inner().unwrap_or_default();
                        if !errors.is_empty() {
                            let _ = tx.send(Delta::Log(format!(
                                "[WARN] Stint prefetch: {} errors",
                                errors.len()
                            )));
                        }
                    });
                }
                ProviderCommand::ExportStints { game_id } => {
                    let tx = tx.clone();
                    let base = base.clone();
                    thread::spawn(move || {
                        let path = format!("stints_game_{game_id}.xlsx");
                        let result = fetch_wide_lineups(&base, game_id, None, None)
                            .and_then(|rows| {
                                let book = aggregate_stints(&rows, team_id);
                                let roster = roster_from_rows(&rows);
                                export::export_stints(std::path::Path::new(&path), &book, &roster)
                            });
                        match result {
                            Ok(report) => {
                                let _ = tx.send(Delta::ExportFinished {
                                    path,
                                    stints: report.stints,
                                    errors: 0,
                                });
                            }
                            Err(err) => {
                                let _ = tx.send(Delta::Log(format!("[WARN] Export failed: {err}")));
                                let _ = tx.send(Delta::ExportFinished {
                                    path,
                                    stints: 0,
                                    errors: 1,
                                });
                            }
                        }
                    });
                }
            }
        }
    });
}

fn spawn_lineup_job(
    tx: &Sender<Delta>,
    inflight: &Arc<Mutex<HashSet<FetchKey>>>,
    key: FetchKey,
    base: String,
    make_delta: impl Fn(FetchKey, Vec<crate::stints::LineupRow>) -> Delta + Send + 'static,
) {
    {
        let mut guard = inflight.lock().expect("inflight lineup lock poisoned");
        if !guard.insert(key) {
            return;
        }
    }

    let tx = tx.clone();
    let inflight = inflight.clone();
    thread::spawn(move || {
        match fetch_wide_lineups(&base, key.game_id, key.team_id, key.player_id) {
            Ok(rows) => {
                let _ = tx.send(make_delta(key, rows));
            }
            Err(err) => {
                let _ = tx.send(Delta::Log(format!(
                    "[WARN] Lineup fetch (game {}): {err}",
                    key.game_id
                )));
            }
        }
        let mut guard = inflight.lock().expect("inflight lineup lock poisoned");
        guard.remove(&key);
    });
}

pub fn api_base() -> String {
    let raw = env::var("HOOPS_API_BASE").unwrap_or_default();
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_API_BASE.to_string()
    } else {
        trimmed.to_string()
    }
}

fn env_u32(key: &str) -> Option<u32> {
    env::var(key).ok().and_then(|val| val.trim().parse().ok())
}

fn env_i32(key: &str) -> Option<i32> {
    env::var(key).ok().and_then(|val| val.trim().parse().ok())
}

fn current_year() -> i32 {
    use chrono::Datelike;
    chrono::Utc::now().year()
}

fn build_fetch_pool() -> Option<rayon::ThreadPool> {
    let threads = env::var("FETCH_PARALLELISM")
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(6)
        .clamp(2, 32);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .ok()
}

fn with_fetch_pool<T>(pool: &Option<rayon::ThreadPool>, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    if let Some(pool) = pool.as_ref() {
        pool.install(action)
    } else {
        action()
    }
}
