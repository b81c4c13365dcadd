use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use stint_terminal::lineup_fetch::parse_wide_lineups_json;
use stint_terminal::schedule_fetch::parse_past_games_json;
use stint_terminal::stints::{LineupRow, RawPlayer, aggregate_stints, player_timeline};

fn synthetic_rows() -> Vec<LineupRow> {
    let mut rows = Vec::new();
    for period in 1..=4u32 {
        for segment in 0..30u32 {
            let time_in = 720 - segment * 24;
            let time_out = time_in.saturating_sub(24);
            for team_id in [7u32, 9u32] {
                rows.push(LineupRow {
                    period,
                    team_id,
                    time_in: time_in.to_string(),
                    time_out: time_out.to_string(),
                    players: std::array::from_fn(|slot| RawPlayer {
                        id: Some(team_id * 100 + ((segment + slot as u32) % 9) + 1),
                        name: format!("Player {}", (segment + slot as u32) % 9 + 1),
                        position: ["PG", "SG", "SF", "PF", "C"][slot].to_string(),
                    }),
                });
            }
        }
    }
    rows
}

fn bench_aggregate_stints(c: &mut Criterion) {
    let rows = synthetic_rows();
    c.bench_function("aggregate_stints", |b| {
        b.iter(|| {
            let book = aggregate_stints(black_box(&rows), black_box(Some(7)));
            black_box(book.all.len());
        })
    });
}

fn bench_player_timeline(c: &mut Criterion) {
    let rows = synthetic_rows();
    c.bench_function("player_timeline", |b| {
        b.iter(|| {
            let timeline = player_timeline(black_box(&rows));
            black_box(timeline.len());
        })
    });
}

fn bench_lineups_parse(c: &mut Criterion) {
    c.bench_function("lineups_parse", |b| {
        b.iter(|| {
            let rows = parse_wide_lineups_json(black_box(LINEUPS_JSON)).unwrap();
            black_box(rows.len());
        })
    });
}

fn bench_past_games_parse(c: &mut Criterion) {
    c.bench_function("past_games_parse", |b| {
        b.iter(|| {
            let games = parse_past_games_json(black_box(PAST_GAMES_JSON)).unwrap();
            black_box(games.len());
        })
    });
}

criterion_group!(
    perf,
    bench_aggregate_stints,
    bench_player_timeline,
    bench_lineups_parse,
    bench_past_games_parse
);
criterion_main!(perf);

static LINEUPS_JSON: &str = include_str!("../tests/fixtures/lineups_wide.json");
static PAST_GAMES_JSON: &str = include_str!("../tests/fixtures/past_games.json");
