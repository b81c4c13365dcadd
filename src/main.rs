use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use stint_terminal::state::{self, AppState, Screen, apply_delta};
use stint_terminal::stints::{PERIOD_SECS, RawPlayer, Stint, format_clock};
use stint_terminal::{demo_feed, provider};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<state::ProviderCommand>>,
    schedule_refresh: Duration,
    last_schedule_refresh: Instant,
}

impl App {
    fn new(cmd_tx: Option<mpsc::Sender<state::ProviderCommand>>) -> Self {
        let schedule_refresh = std::env::var("SCHEDULE_POLL_SECS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(300)
            .max(30);
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
            schedule_refresh: Duration::from_secs(schedule_refresh),
            last_schedule_refresh: Instant::now(),
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('?') => {
                self.state.help_overlay = !self.state.help_overlay;
                return;
            }
            _ => {}
        }

        match self.state.screen {
            Screen::Schedule => self.on_schedule_key(key),
            Screen::GameStints { game_id } => self.on_game_stints_key(key, game_id),
            Screen::PlayerStints { game_id } => self.on_player_stints_key(key, game_id),
        }
    }

    fn on_schedule_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.state.selected_game + 1 < self.state.games.len() {
                    self.state.selected_game += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.state.selected_game = self.state.selected_game.saturating_sub(1);
            }
            KeyCode::Char('d') | KeyCode::Enter => {
                if let Some(game) = self.state.selected_game() {
                    let game_id = game.game_id;
                    self.state.open_game_stints(game_id);
                    self.request_game_lineups(game_id);
                }
            }
            KeyCode::Char('p') => {
                if let Some(game) = self.state.selected_game() {
                    let game_id = game.game_id;
                    self.state.open_player_stints(game_id);
                    self.request_roster(game_id);
                }
            }
            KeyCode::Char('r') => self.request_schedule(true),
            _ => {}
        }
    }

    fn on_game_stints_key(&mut self, key: KeyEvent, game_id: u32) {
        match key.code {
            KeyCode::Char('b') | KeyCode::Esc | KeyCode::Char('1') => {
                self.state.screen = Screen::Schedule;
            }
            KeyCode::Char('h') | KeyCode::Left => self.shift_period(-1),
            KeyCode::Char('l') | KeyCode::Right => self.shift_period(1),
            KeyCode::Char('j') | KeyCode::Down => self.shift_stint(1),
            KeyCode::Char('k') | KeyCode::Up => self.shift_stint(-1),
            KeyCode::Char('p') => {
                self.state.open_player_stints(game_id);
                self.request_roster(game_id);
            }
            KeyCode::Char('r') => {
                self.send_command(
                    state::ProviderCommand::FetchGameLineups { game_id },
                    "Lineup refetch requested",
                );
            }
            KeyCode::Char('x') => {
                self.send_command(
                    state::ProviderCommand::ExportStints { game_id },
                    "Stint export started",
                );
            }
            _ => {}
        }
    }

    fn on_player_stints_key(&mut self, key: KeyEvent, game_id: u32) {
        match key.code {
            KeyCode::Char('b') | KeyCode::Esc | KeyCode::Char('1') => {
                self.state.screen = Screen::Schedule;
            }
            KeyCode::Char('g') => {
                self.state.open_game_stints(game_id);
                self.request_game_lineups(game_id);
            }
            KeyCode::Char('j') | KeyCode::Down => self.shift_roster(1, game_id),
            KeyCode::Char('k') | KeyCode::Up => self.shift_roster(-1, game_id),
            KeyCode::Char('a') => {
                let player_ids: Vec<u32> = self
                    .state
                    .current_roster()
                    .unwrap_or(&[])
                    .iter()
                    .map(|p| p.id)
                    .collect();
                if !player_ids.is_empty() {
                    self.send_command(
                        state::ProviderCommand::PrefetchPlayerStints {
                            game_id,
                            player_ids,
                        },
                        "Prefetching player stints",
                    );
                }
            }
            KeyCode::Char('r') => {
                self.send_command(
                    state::ProviderCommand::FetchGameRoster { game_id },
                    "Roster refetch requested",
                );
            }
            _ => {}
        }
    }

    fn shift_period(&mut self, dir: i32) {
        let periods = self.state.display_periods();
        let Some(pos) = periods.iter().position(|p| *p == self.state.active_period) else {
            self.state.active_period = 1;
            return;
        };
        let next = pos as i32 + dir;
        if next >= 0 && (next as usize) < periods.len() {
            self.state.active_period = periods[next as usize];
            self.state.selected_stint = None;
        }
    }

    fn shift_stint(&mut self, dir: i32) {
        let count = self
            .state
            .current_book()
            .map(|book| book.stints_for(self.state.active_period).len())
            .unwrap_or(0);
        if count == 0 {
            self.state.selected_stint = None;
            return;
        }
        let current = self.state.selected_stint.unwrap_or(0) as i32;
        let next = (current + dir).clamp(0, count as i32 - 1);
        self.state.selected_stint = Some(next as usize);
    }

    fn shift_roster(&mut self, dir: i32, game_id: u32) {
        let count = self.state.current_roster().map(<[_]>::len).unwrap_or(0);
        if count == 0 {
            return;
        }
        let current = self.state.roster_selected as i32;
        let next = (current + dir).clamp(0, count as i32 - 1) as usize;
        self.state.roster_selected = next;
        if let Some(player) = self.state.selected_roster_player() {
            let player_id = player.id;
            if !self
                .state
                .interval_cache
                .contains_key(&(game_id, player_id))
            {
                self.send_command(
                    state::ProviderCommand::FetchPlayerStints { game_id, player_id },
                    "",
                );
            }
        }
    }

    fn request_schedule(&mut self, announce: bool) {
        let Some(tx) = &self.cmd_tx else {
            return;
        };
        if tx.send(state::ProviderCommand::FetchSchedule).is_err() {
            self.state.push_log("[WARN] Schedule request failed");
        } else {
            if announce {
                self.state.push_log("[INFO] Schedule request sent");
            }
            self.last_schedule_refresh = Instant::now();
        }
    }

    fn request_game_lineups(&mut self, game_id: u32) {
        if self.state.book_cache.contains_key(&game_id) {
            return;
        }
        self.send_command(state::ProviderCommand::FetchGameLineups { game_id }, "");
    }

    fn request_roster(&mut self, game_id: u32) {
        if self.state.roster_cache.contains_key(&game_id) {
            return;
        }
        self.send_command(state::ProviderCommand::FetchGameRoster { game_id }, "");
    }

    fn send_command(&mut self, cmd: state::ProviderCommand, announce: &str) {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[WARN] Provider unavailable");
            return;
        };
        if tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Provider request failed");
        } else if !announce.is_empty() {
            self.state.push_log(format!("[INFO] {announce}"));
        }
    }

    fn maybe_refresh_schedule(&mut self) {
        if !matches!(self.state.screen, Screen::Schedule) {
            return;
        }
        if self.last_schedule_refresh.elapsed() >= self.schedule_refresh {
            self.request_schedule(false);
        }
    }
}

fn demo_mode() -> bool {
    std::env::var("HOOPS_DEMO")
        .map(|val| {
            let trimmed = val.trim();
            !trimmed.is_empty() && trimmed != "0"
        })
        .unwrap_or(false)
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    if demo_mode() {
        demo_feed::spawn_demo_provider(tx, cmd_rx);
    } else {
        provider::spawn_provider(tx, cmd_rx);
    }

    let mut app = App::new(Some(cmd_tx));
    app.request_schedule(false);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<state::Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        app.maybe_refresh_schedule();

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Schedule => render_schedule(frame, chunks[1], &app.state),
        Screen::GameStints { .. } => render_game_stints(frame, chunks[1], &app.state),
        Screen::PlayerStints { .. } => render_player_stints(frame, chunks[1], &app.state),
    }

    let footer =
        Paragraph::new(footer_text(&app.state)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let title = match state.screen {
        Screen::Schedule => format!("HOOPS STINTS | SCHEDULE {}", state.season_year),
        Screen::GameStints { game_id } => {
            format!("HOOPS STINTS | GAME {game_id} | {}", matchup_label(state))
        }
        Screen::PlayerStints { game_id } => {
            format!("HOOPS STINTS | PLAYERS | GAME {game_id}")
        }
    };
    format!("  .-.  {title}\n (   )\n  `-'")
}

fn matchup_label(state: &AppState) -> String {
    let Some(game_id) = state.screen_game_id() else {
        return String::new();
    };
    state
        .games
        .iter()
        .find(|g| g.game_id == game_id)
        .map(|g| format!("{} vs {}", g.home_name, g.away_name))
        .unwrap_or_default()
}

fn footer_text(state: &AppState) -> &'static str {
    match state.screen {
        Screen::Schedule => {
            "j/k Move | Enter/d Game Stints | p Player Stints | r Refresh | ? Help | q Quit"
        }
        Screen::GameStints { .. } => {
            "h/l Period | j/k Stint | p Players | x Export | r Refetch | b/Esc Back | ? Help | q Quit"
        }
        Screen::PlayerStints { .. } => {
            "j/k Player | a Prefetch All | g Game Stints | r Refetch | b/Esc Back | ? Help | q Quit"
        }
    }
}

fn render_schedule(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = schedule_columns();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(sections[0]);
    let style = Style::default().add_modifier(Modifier::BOLD);
    render_cell_text(frame, cols[0], "Date", style);
    render_cell_text(frame, cols[1], "Matchup", style);
    render_cell_text(frame, cols[2], "Score", style);

    let list_area = sections[1];
    if state.games.is_empty() {
        let empty =
            Paragraph::new("No past games loaded").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }
    if list_area.height == 0 {
        return;
    }

    let visible = list_area.height as usize;
    let (start, end) = visible_range(state.selected_game, state.games.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };

        let selected = idx == state.selected_game;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        let game = &state.games[idx];
        let matchup = format!("{} vs {}", game.home_name, game.away_name);
        let score = format!("{}-{}", game.home_score, game.away_score);
        render_cell_text(frame, cols[0], &format_game_date(&game.game_date), row_style);
        render_cell_text(frame, cols[1], &matchup, row_style);
        render_cell_text(frame, cols[2], &score, row_style);
    }
}

fn schedule_columns() -> [Constraint; 3] {
    [
        Constraint::Length(12),
        Constraint::Min(30),
        Constraint::Length(9),
    ]
}

fn render_game_stints(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(13),
            Constraint::Min(3),
            Constraint::Length(4),
        ])
        .split(area);

    frame.render_widget(Paragraph::new(period_line(state)), sections[0]);

    let court = Paragraph::new(court_text(active_stint(state)))
        .block(Block::default().title("Court").borders(Borders::ALL));
    frame.render_widget(court, sections[1]);

    render_stint_ranges(frame, sections[2], state);

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, sections[3]);
}

fn period_line(state: &AppState) -> Line<'static> {
    let mut spans = vec![Span::raw("Period: ")];
    for period in state.display_periods() {
        let label = format!(" {period} ");
        if period == state.active_period {
            spans.push(Span::styled(
                label,
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(label, Style::default().fg(Color::Yellow)));
        }
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn active_stint(state: &AppState) -> Option<&Stint> {
    let book = state.current_book()?;
    let stints = book.stints_for(state.active_period);
    match state.selected_stint {
        Some(idx) => stints.get(idx),
        None => stints.first(),
    }
}

const COURT_WIDTH: usize = 61;
const COURT_HEIGHT: usize = 11;

// Five display slots per half court: guards high, bigs near the baseline.
const HOME_SLOTS: [(usize, usize); 5] = [(4, 8), (18, 8), (11, 5), (4, 2), (18, 2)];
const AWAY_SLOTS: [(usize, usize); 5] = [(34, 2), (48, 2), (41, 5), (34, 8), (48, 8)];

fn court_text(stint: Option<&Stint>) -> String {
    let mut grid = vec![vec![' '; COURT_WIDTH]; COURT_HEIGHT];

    for x in 0..COURT_WIDTH {
        grid[0][x] = '-';
        grid[COURT_HEIGHT - 1][x] = '-';
    }
    for row in grid.iter_mut() {
        row[0] = '|';
        row[COURT_WIDTH / 2] = '|';
        row[COURT_WIDTH - 1] = '|';
    }
    grid[0][0] = '+';
    grid[0][COURT_WIDTH - 1] = '+';
    grid[COURT_HEIGHT - 1][0] = '+';
    grid[COURT_HEIGHT - 1][COURT_WIDTH - 1] = '+';
    // Hoops.
    grid[COURT_HEIGHT / 2][2] = 'o';
    grid[COURT_HEIGHT / 2][COURT_WIDTH - 3] = 'o';

    match stint {
        Some(stint) => {
            place_unit(&mut grid, &stint.home_players, &HOME_SLOTS, 1);
            place_unit(
                &mut grid,
                &stint.away_players,
                &AWAY_SLOTS,
                COURT_WIDTH / 2 + 1,
            );
        }
        None => {
            place_label(
                &mut grid,
                COURT_WIDTH / 2 - 8,
                COURT_HEIGHT / 2,
                "no stint selected",
            );
        }
    }

    grid.into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn place_unit(
    grid: &mut [Vec<char>],
    players: &[RawPlayer],
    slots: &[(usize, usize); 5],
    half_start: usize,
) {
    if players.is_empty() {
        place_label(grid, half_start + 10, COURT_HEIGHT / 2, "no data");
        return;
    }
    for (player, (x, y)) in players.iter().zip(slots.iter()) {
        place_label(grid, *x, *y, &short_name(&player.name));
    }
}

fn place_label(grid: &mut [Vec<char>], x: usize, y: usize, text: &str) {
    let Some(row) = grid.get_mut(y) else {
        return;
    };
    for (offset, ch) in text.chars().enumerate() {
        let col = x + offset;
        if col >= COURT_WIDTH - 1 {
            break;
        }
        row[col] = ch;
    }
}

fn short_name(name: &str) -> String {
    let trimmed = name.trim();
    let last = trimmed.split_whitespace().last().unwrap_or(trimmed);
    last.chars().take(10).collect()
}

fn render_stint_ranges(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Stints").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let Some(book) = state.current_book() else {
        frame.render_widget(Paragraph::new("No lineup data yet"), inner);
        return;
    };
    let stints = book.stints_for(state.active_period);
    if stints.is_empty() {
        let empty = Paragraph::new(format!(
            "No stints recorded for period {}",
            state.active_period
        ));
        frame.render_widget(empty, inner);
        return;
    }

    let active = state.selected_stint.unwrap_or(0);
    let visible = inner.height as usize;
    let (start, end) = visible_range(active, stints.len(), visible);

    let mut lines = Vec::new();
    for idx in start..end {
        let stint = &stints[idx];
        let marker = if idx == active { "> " } else { "  " };
        let missing = if stint.home_players.is_empty() || stint.away_players.is_empty() {
            "  (one side missing)"
        } else {
            ""
        };
        lines.push(format!(
            "{marker}{} - {}{missing}",
            format_clock(stint.start_secs),
            format_clock(stint.end_secs)
        ));
    }
    frame.render_widget(Paragraph::new(lines.join("\n")), inner);
}

fn render_player_stints(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(30)])
        .split(area);

    let roster_block = Block::default().title("Roster").borders(Borders::ALL);
    let roster_inner = roster_block.inner(columns[0]);
    frame.render_widget(roster_block, columns[0]);
    frame.render_widget(Paragraph::new(roster_text(state)), roster_inner);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(4)])
        .split(columns[1]);

    let timeline_block = Block::default().title("Court Time").borders(Borders::ALL);
    let timeline_inner = timeline_block.inner(rows[0]);
    frame.render_widget(timeline_block, rows[0]);
    render_player_timeline(frame, timeline_inner, state);

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, rows[1]);
}

fn roster_text(state: &AppState) -> String {
    let Some(roster) = state.current_roster() else {
        return "No roster yet".to_string();
    };
    if roster.is_empty() {
        return "No roster data".to_string();
    }

    let mut lines = Vec::new();
    for (idx, player) in roster.iter().enumerate() {
        let prefix = if idx == state.roster_selected {
            "> "
        } else {
            "  "
        };
        lines.push(format!("{prefix}{} ({})", player.name, player.position));
    }
    lines.join("\n")
}

fn render_player_timeline(frame: &mut Frame, area: Rect, state: &AppState) {
    if area.height == 0 || area.width == 0 {
        return;
    }

    let Some(player) = state.selected_roster_player() else {
        frame.render_widget(Paragraph::new("Select a player"), area);
        return;
    };
    let header = format!("{} ({})", player.name, player.position);

    let Some(intervals) = state.current_player_intervals() else {
        let text = format!("{header}\n\nFetching stints...");
        frame.render_widget(Paragraph::new(text), area);
        return;
    };
    if intervals.is_empty() {
        let text = format!("{header}\n\nNo stints data available for this player.");
        frame.render_widget(Paragraph::new(text), area);
        return;
    }

    let bar_width = (area.width as usize).saturating_sub(12).max(10);
    let max_period = intervals
        .iter()
        .map(|iv| iv.period)
        .max()
        .unwrap_or(0)
        .max(state::MIN_PERIODS);

    let mut lines = vec![header, String::new()];
    for period in 1..=max_period {
        let mut bar = vec!['░'; bar_width];
        for interval in intervals.iter().filter(|iv| iv.period == period) {
            let from = ((interval.start_secs / PERIOD_SECS) * bar_width as f64) as usize;
            let to = ((interval.end_secs / PERIOD_SECS) * bar_width as f64).ceil() as usize;
            for cell in bar
                .iter_mut()
                .take(to.min(bar_width))
                .skip(from.min(bar_width))
            {
                *cell = '█';
            }
        }
        lines.push(format!(
            "P{period:<2} |{}|",
            bar.into_iter().collect::<String>()
        ));
    }
    frame.render_widget(Paragraph::new(lines.join("\n")), area);
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    let mut recent: Vec<&str> = state.logs.iter().rev().take(2).map(String::as_str).collect();
    recent.reverse();
    recent.join("\n")
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    frame.render_widget(Paragraph::new(text).style(style), area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn format_game_date(raw: &str) -> String {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return "-".to_string();
    }
    if let Some(date) = parse_game_date(cleaned) {
        return date.format("%Y-%m-%d").to_string();
    }
    cleaned.chars().take(12).collect()
}

fn parse_game_date(raw: &str) -> Option<NaiveDate> {
    // Flask's jsonify renders dates in RFC 1123; allow ISO shapes too.
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%a, %d %b %Y %H:%M:%S GMT",
    ];

    for fmt in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date);
        }
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    None
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Hoops Stints - Help",
        "",
        "Schedule:",
        "  j/k or arrows  Move",
        "  Enter / d      Open game stints",
        "  p              Open player stints",
        "  r              Refresh schedule",
        "",
        "Game stints:",
        "  h/l or arrows  Change period",
        "  j/k            Select stint",
        "  x              Export stints to xlsx",
        "",
        "Player stints:",
        "  j/k            Select player",
        "  a              Prefetch all player stints",
        "",
        "Global:",
        "  b / Esc        Back",
        "  ?              Toggle help",
        "  q              Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
