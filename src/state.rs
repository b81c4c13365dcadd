use std::collections::{HashMap, VecDeque};
use std::env;

use chrono::{Datelike, Utc};

use crate::schedule_fetch::GameRow;
use crate::stints::{
    LineupRow, PlayerInterval, RosterPlayer, StintBook, aggregate_stints, player_timeline,
    roster_from_rows,
};

/// The period selector always offers at least regulation's four periods;
/// overtime extends it. Display affordance only, the aggregation itself never
/// bounds period numbers.
pub const MIN_PERIODS: u32 = 4;

const MAX_LOG_LINES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Schedule,
    GameStints { game_id: u32 },
    PlayerStints { game_id: u32 },
}

/// Identity of one lineup request. Replaces the original product's
/// string-concatenated cache keys with a typed composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchKey {
    pub game_id: u32,
    pub team_id: Option<u32>,
    pub player_id: Option<u32>,
}

impl FetchKey {
    pub fn game(game_id: u32) -> Self {
        Self {
            game_id,
            team_id: None,
            player_id: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetGames(Vec<GameRow>),
    /// Full-game rows (both teams); feeds the stint book.
    SetGameLineups { key: FetchKey, rows: Vec<LineupRow> },
    /// Team-filtered rows; feeds the roster list.
    SetRosterLineups { key: FetchKey, rows: Vec<LineupRow> },
    /// Player-filtered rows; feeds the per-player timeline.
    SetPlayerLineups { key: FetchKey, rows: Vec<LineupRow> },
    /// The primary-team identifier became known; cached games re-aggregate.
    SetHomeTeam(u32),
    ExportFinished {
        path: String,
        stints: usize,
        errors: usize,
    },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    FetchSchedule,
    FetchGameLineups { game_id: u32 },
    FetchGameRoster { game_id: u32 },
    FetchPlayerStints { game_id: u32, player_id: u32 },
    PrefetchPlayerStints { game_id: u32, player_ids: Vec<u32> },
    ExportStints { game_id: u32 },
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub home_team_id: Option<u32>,
    pub season_year: i32,

    pub games: Vec<GameRow>,
    pub selected_game: usize,

    // Per-view memoization, evicted when the user opens a different game.
    pub lineup_cache: HashMap<FetchKey, Vec<LineupRow>>,
    pub book_cache: HashMap<u32, StintBook>,
    pub roster_cache: HashMap<u32, Vec<RosterPlayer>>,
    pub interval_cache: HashMap<(u32, u32), Vec<PlayerInterval>>,

    pub active_period: u32,
    pub selected_stint: Option<usize>,
    pub roster_selected: usize,

    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        let home_team_id = env::var("HOOPS_TEAM_ID")
            .ok()
            .and_then(|val| val.trim().parse::<u32>().ok());
        let season_year = env::var("HOOPS_SEASON_YEAR")
            .ok()
            .and_then(|val| val.trim().parse::<i32>().ok())
            .unwrap_or_else(|| Utc::now().year());

        Self {
            screen: Screen::Schedule,
            home_team_id,
            season_year,
            games: Vec::new(),
            selected_game: 0,
            lineup_cache: HashMap::with_capacity(8),
            book_cache: HashMap::with_capacity(4),
            roster_cache: HashMap::with_capacity(4),
            interval_cache: HashMap::with_capacity(16),
            active_period: 1,
            selected_stint: None,
            roster_selected: 0,
            logs: VecDeque::with_capacity(MAX_LOG_LINES),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, line: impl Into<String>) {
        if self.logs.len() >= MAX_LOG_LINES {
            self.logs.pop_front();
        }
        self.logs.push_back(line.into());
    }

    pub fn selected_game(&self) -> Option<&GameRow> {
        self.games.get(self.selected_game)
    }

    pub fn screen_game_id(&self) -> Option<u32> {
        match self.screen {
            Screen::Schedule => None,
            Screen::GameStints { game_id } | Screen::PlayerStints { game_id } => Some(game_id),
        }
    }

    pub fn current_book(&self) -> Option<&StintBook> {
        self.screen_game_id()
            .and_then(|game_id| self.book_cache.get(&game_id))
    }

    pub fn current_roster(&self) -> Option<&[RosterPlayer]> {
        self.screen_game_id()
            .and_then(|game_id| self.roster_cache.get(&game_id))
            .map(Vec::as_slice)
    }

    pub fn selected_roster_player(&self) -> Option<&RosterPlayer> {
        self.current_roster()
            .and_then(|roster| roster.get(self.roster_selected))
    }

    pub fn current_player_intervals(&self) -> Option<&[PlayerInterval]> {
        let game_id = self.screen_game_id()?;
        let player_id = self.selected_roster_player()?.id;
        self.interval_cache
            .get(&(game_id, player_id))
            .map(Vec::as_slice)
    }

    /// Periods offered by the selector: at least 1..=MIN_PERIODS, extended by
    /// whatever overtime periods the current book contains.
    pub fn display_periods(&self) -> Vec<u32> {
        let max = self
            .current_book()
            .map(|book| book.max_period())
            .unwrap_or(0)
            .max(MIN_PERIODS);
        (1..=max).collect()
    }

    pub fn open_game_stints(&mut self, game_id: u32) {
        self.screen = Screen::GameStints { game_id };
        self.active_period = 1;
        self.selected_stint = None;
        self.evict_other_games(game_id);
    }

    pub fn open_player_stints(&mut self, game_id: u32) {
        self.screen = Screen::PlayerStints { game_id };
        self.roster_selected = 0;
        self.evict_other_games(game_id);
    }

    /// Cache lifetime is tied to the game currently in view; anything cached
    /// for other games is dropped on navigation.
    fn evict_other_games(&mut self, game_id: u32) {
        self.lineup_cache.retain(|key, _| key.game_id == game_id);
        self.book_cache.retain(|id, _| *id == game_id);
        self.roster_cache.retain(|id, _| *id == game_id);
        self.interval_cache.retain(|(id, _), _| *id == game_id);
    }

    /// Stores the resolved primary-team id and re-runs classification over
    /// every cached full-game row set. Aggregation is pure, so re-running it
    /// with the resolved id corrects sides placed while unresolved.
    pub fn resolve_home_team(&mut self, team_id: u32) {
        if self.home_team_id == Some(team_id) {
            return;
        }
        self.home_team_id = Some(team_id);
        let mut rebuilt = Vec::new();
        for (key, rows) in &self.lineup_cache {
            if key.team_id.is_none() && key.player_id.is_none() {
                rebuilt.push((key.game_id, aggregate_stints(rows, Some(team_id))));
            }
        }
        for (game_id, book) in rebuilt {
            self.book_cache.insert(game_id, book);
        }
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetGames(games) => {
            state.games = games;
            if state.selected_game >= state.games.len() {
                state.selected_game = state.games.len().saturating_sub(1);
            }
        }
        Delta::SetGameLineups { key, rows } => {
            let book = aggregate_stints(&rows, state.home_team_id);
            state.book_cache.insert(key.game_id, book);
            state.lineup_cache.insert(key, rows);
            state.selected_stint = None;
        }
        Delta::SetRosterLineups { key, rows } => {
            let roster = roster_from_rows(&rows);
            if state.roster_selected >= roster.len() {
                state.roster_selected = roster.len().saturating_sub(1);
            }
            state.roster_cache.insert(key.game_id, roster);
            state.lineup_cache.insert(key, rows);
        }
        Delta::SetPlayerLineups { key, rows } => {
            let Some(player_id) = key.player_id else {
                return;
            };
            state
                .interval_cache
                .insert((key.game_id, player_id), player_timeline(&rows));
            state.lineup_cache.insert(key, rows);
        }
        Delta::SetHomeTeam(team_id) => {
            state.resolve_home_team(team_id);
        }
        Delta::ExportFinished {
            path,
            stints,
            errors,
        } => {
            if errors == 0 {
                state.push_log(format!("[INFO] Exported {stints} stints to {path}"));
            } else {
                state.push_log(format!(
                    "[WARN] Export to {path} finished with {errors} errors"
                ));
            }
        }
        Delta::Log(line) => state.push_log(line),
    }
}
