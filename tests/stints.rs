use stint_terminal::stints::{
    LineupRow, RawPlayer, aggregate_stints, player_timeline, roster_from_rows,
};

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

#[test]
fn pairs_both_teams_on_shared_boundaries() {
    let rows = vec![
        row(9, 1, "720", "600", "away A"),
        row(7, 1, "720", "600", "home A"),
    ];
    let book = aggregate_stints(&rows, Some(7));

    assert_eq!(book.all.len(), 1);
    let stint = &book.all[0];
    assert_eq!(stint.id, 0);
    assert_eq!(stint.start_secs, 0.0);
    assert_eq!(stint.end_secs, 120.0);
    assert_eq!(stint.home_players[0].name, "home A 1");
    assert_eq!(stint.away_players[0].name, "away A 1");
}

#[test]
fn unparseable_clock_drops_only_that_row() {
    let rows = vec![
        row(7, 1, "N/A", "600", "home A"),
        row(7, 1, "600", "300", "home B"),
        row(9, 1, "600", "300", "away B"),
    ];
    let book = aggregate_stints(&rows, Some(7));

    assert_eq!(book.all.len(), 1);
    assert_eq!(book.all[0].home_players[0].name, "home B 1");
    assert_eq!(book.all[0].away_players[0].name, "away B 1");
}

#[test]
fn duplicate_side_overwrites_and_leaves_other_side_empty() {
    let rows = vec![
        row(7, 1, "720", "540", "home first"),
        row(7, 1, "720", "540", "home second"),
    ];
    let book = aggregate_stints(&rows, Some(7));

    assert_eq!(book.all.len(), 1);
    assert_eq!(book.all[0].home_players[0].name, "home second 1");
    assert!(book.all[0].away_players.is_empty());
}

#[test]
fn missing_counterpart_leaves_side_empty() {
    let rows = vec![row(9, 2, "300", "0", "away only")];
    let book = aggregate_stints(&rows, Some(7));

    assert_eq!(book.all.len(), 1);
    assert!(book.all[0].home_players.is_empty());
    assert_eq!(book.all[0].away_players.len(), 5);
}

#[test]
fn orders_by_period_then_start_and_keeps_overtime() {
    let rows = vec![
        row(7, 5, "720", "600", "home OT"),
        row(7, 1, "400", "200", "home late"),
        row(7, 1, "720", "400", "home early"),
        row(7, 2, "720", "0", "home q2"),
    ];
    let book = aggregate_stints(&rows, Some(7));

    assert_eq!(book.all.len(), 4);
    let order: Vec<(u32, f64)> = book.all.iter().map(|s| (s.period, s.start_secs)).collect();
    assert_eq!(
        order,
        vec![(1, 0.0), (1, 320.0), (2, 0.0), (5, 0.0)]
    );
    assert_eq!(book.max_period(), 5);
    assert_eq!(book.stints_for(5).len(), 1);
    assert!(book.stints_for(3).is_empty());

    let ids: Vec<usize> = book.all.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3]);
}

#[test]
fn aggregation_is_idempotent() {
    let rows = vec![
        row(7, 1, "720", "540", "home A"),
        row(9, 1, "720", "540", "away A"),
        row(7, 1, "540", "0", "home B"),
    ];
    let first = aggregate_stints(&rows, Some(7));
    let second = aggregate_stints(&rows, Some(7));
    assert_eq!(first, second);
}

#[test]
fn unresolved_home_id_defaults_rows_to_home_side() {
    let rows = vec![
        row(7, 1, "720", "600", "home A"),
        row(9, 1, "720", "600", "away A"),
    ];

    let unresolved = aggregate_stints(&rows, None);
    assert_eq!(unresolved.all.len(), 1);
    // Both teams land on the home side; the later row wins the slot.
    assert_eq!(unresolved.all[0].home_players[0].name, "away A 1");
    assert!(unresolved.all[0].away_players.is_empty());

    // Re-running with the resolved id corrects the split.
    let resolved = aggregate_stints(&rows, Some(7));
    assert_eq!(resolved.all[0].home_players[0].name, "home A 1");
    assert_eq!(resolved.all[0].away_players[0].name, "away A 1");
}

#[test]
fn roster_dedupes_and_skips_incomplete_slots() {
    let mut rows = vec![
        row(7, 1, "720", "600", "home A"),
        row(7, 1, "600", "300", "home A"),
    ];
    rows[1].players[0].id = None;
    rows[1].players[1].position = "-".to_string();

    let roster = roster_from_rows(&rows);
    assert_eq!(roster.len(), 5);
    assert_eq!(roster[0].id, 701);
    assert_eq!(roster[0].name, "home A 1");
}

#[test]
fn player_timeline_converts_and_sorts() {
    let rows = vec![
        row(7, 2, "720", "480", "home"),
        row(7, 1, "300", "0", "home"),
        row(7, 1, "720", "bad", "home"),
    ];
    let timeline = player_timeline(&rows);

    assert_eq!(timeline.len(), 2);
    assert_eq!(timeline[0].period, 1);
    assert_eq!(timeline[0].start_secs, 420.0);
    assert_eq!(timeline[0].end_secs, 720.0);
    assert_eq!(timeline[1].period, 2);
    assert_eq!(timeline[1].start_secs, 0.0);
    assert_eq!(timeline[1].end_secs, 240.0);
}
