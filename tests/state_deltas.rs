use stint_terminal::schedule_fetch::GameRow;
use stint_terminal::state::{AppState, Delta, FetchKey, MIN_PERIODS, Screen, apply_delta};
use stint_terminal::stints::{LineupRow, RawPlayer};

fn unit(team_id: u32, tag: &str) -> [RawPlayer; 5] {
    std::array::from_fn(|slot| RawPlayer {
        id: Some(team_id * 100 + slot as u32 + 1),
        name: format!("{tag} {}", slot + 1),
        position: ["PG", "SG", "SF", "PF", "C"][slot].to_string(),
    })
}

fn row(team_id: u32, period: u32, time_in: &str, time_out: &str, tag: &str) -> LineupRow {
    LineupRow {
        period,
        team_id,
        time_in: time_in.to_string(),
        time_out: time_out.to_string(),
        players: unit(team_id, tag),
    }
}

fn game(game_id: u32) -> GameRow {
    GameRow {
        game_id,
        game_date: "2024-03-01".to_string(),
        home_id: 7,
        away_id: 9,
        home_name: "Harbor City Comets".to_string(),
        away_name: "Bayside Pelicans".to_string(),
        home_score: 101,
        away_score: 96,
    }
}

fn fresh_state() -> AppState {
    let mut state = AppState::new();
    state.home_team_id = Some(7);
    state
}

#[test]
fn set_games_clamps_selection() {
    let mut state = fresh_state();
    state.selected_game = 5;
    apply_delta(&mut state, Delta::SetGames(vec![game(301), game(302)]));
    assert_eq!(state.games.len(), 2);
    assert_eq!(state.selected_game, 1);
}

#[test]
fn game_lineups_build_the_stint_book() {
    let mut state = fresh_state();
    state.open_game_stints(301);

    let rows = vec![
        row(7, 1, "720", "600", "home A"),
        row(9, 1, "720", "600", "away A"),
    ];
    apply_delta(
        &mut state,
        Delta::SetGameLineups {
            key: FetchKey::game(301),
            rows,
        },
    );

    let book = state.current_book().expect("book should be cached");
    assert_eq!(book.all.len(), 1);
    assert_eq!(book.all[0].home_players[0].name, "home A 1");
    assert_eq!(state.selected_stint, None);
}

#[test]
fn later_lineup_response_wins() {
    let mut state = fresh_state();
    state.open_game_stints(301);

    apply_delta(
        &mut state,
        Delta::SetGameLineups {
            key: FetchKey::game(301),
            rows: vec![row(7, 1, "720", "600", "stale")],
        },
    );
    apply_delta(
        &mut state,
        Delta::SetGameLineups {
            key: FetchKey::game(301),
            rows: vec![row(7, 1, "720", "300", "fresh")],
        },
    );

    let book = state.current_book().expect("book should be cached");
    assert_eq!(book.all.len(), 1);
    assert_eq!(book.all[0].home_players[0].name, "fresh 1");
    assert_eq!(book.all[0].end_secs, 420.0);
}

#[test]
fn resolving_home_team_reaggregates_cached_games() {
    let mut state = AppState::new();
    state.home_team_id = None;
    state.open_game_stints(301);

    apply_delta(
        &mut state,
        Delta::SetGameLineups {
            key: FetchKey::game(301),
            rows: vec![
                row(7, 1, "720", "600", "home A"),
                row(9, 1, "720", "600", "away A"),
            ],
        },
    );
    // Unresolved: everything lands on the home side.
    assert!(state.current_book().unwrap().all[0].away_players.is_empty());

    apply_delta(&mut state, Delta::SetHomeTeam(7));
    let book = state.current_book().expect("book should be rebuilt");
    assert_eq!(book.all[0].home_players[0].name, "home A 1");
    assert_eq!(book.all[0].away_players[0].name, "away A 1");
}

#[test]
fn opening_a_game_evicts_other_games() {
    let mut state = fresh_state();
    state.open_game_stints(301);
    apply_delta(
        &mut state,
        Delta::SetGameLineups {
            key: FetchKey::game(301),
            rows: vec![row(7, 1, "720", "600", "home A")],
        },
    );
    assert!(state.book_cache.contains_key(&301));

    state.open_game_stints(302);
    assert!(state.book_cache.is_empty());
    assert!(state.lineup_cache.is_empty());
}

#[test]
fn player_lineups_fill_the_interval_cache() {
    let mut state = fresh_state();
    state.open_player_stints(301);

    let key = FetchKey {
        game_id: 301,
        team_id: Some(7),
        player_id: Some(701),
    };
    apply_delta(
        &mut state,
        Delta::SetPlayerLineups {
            key,
            rows: vec![row(7, 1, "720", "480", "home A")],
        },
    );

    let intervals = state.interval_cache.get(&(301, 701)).expect("cached");
    assert_eq!(intervals.len(), 1);
    assert_eq!(intervals[0].start_secs, 0.0);
    assert_eq!(intervals[0].end_secs, 240.0);
}

#[test]
fn roster_lineups_build_roster_and_clamp_selection() {
    let mut state = fresh_state();
    state.open_player_stints(301);
    state.roster_selected = 10;

    let key = FetchKey {
        game_id: 301,
        team_id: Some(7),
        player_id: None,
    };
    apply_delta(
        &mut state,
        Delta::SetRosterLineups {
            key,
            rows: vec![row(7, 1, "720", "600", "home A")],
        },
    );

    let roster = state.current_roster().expect("roster cached");
    assert_eq!(roster.len(), 5);
    assert_eq!(state.roster_selected, 4);
}

#[test]
fn display_periods_cover_regulation_and_overtime() {
    let mut state = fresh_state();
    state.open_game_stints(301);
    assert_eq!(state.display_periods(), vec![1, 2, 3, 4]);
    assert_eq!(MIN_PERIODS, 4);

    apply_delta(
        &mut state,
        Delta::SetGameLineups {
            key: FetchKey::game(301),
            rows: vec![row(7, 6, "720", "600", "double OT")],
        },
    );
    assert_eq!(state.display_periods(), vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn export_outcome_lands_in_the_log() {
    let mut state = fresh_state();
    apply_delta(
        &mut state,
        Delta::ExportFinished {
            path: "stints_game_301.xlsx".to_string(),
            stints: 12,
            errors: 0,
        },
    );
    assert!(state.logs.back().unwrap().contains("Exported 12 stints"));

    apply_delta(
        &mut state,
        Delta::ExportFinished {
            path: "stints_game_301.xlsx".to_string(),
            stints: 0,
            errors: 1,
        },
    );
    assert!(state.logs.back().unwrap().starts_with("[WARN]"));
}

#[test]
fn screen_navigation_resets_view_state() {
    let mut state = fresh_state();
    state.active_period = 3;
    state.selected_stint = Some(2);

    state.open_game_stints(301);
    assert_eq!(state.screen, Screen::GameStints { game_id: 301 });
    assert_eq!(state.active_period, 1);
    assert_eq!(state.selected_stint, None);

    state.roster_selected = 3;
    state.open_player_stints(301);
    assert_eq!(state.screen, Screen::PlayerStints { game_id: 301 });
    assert_eq!(state.roster_selected, 0);
}
