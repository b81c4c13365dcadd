use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::stints::{RawPlayer, RosterPlayer, StintBook, format_clock};

pub struct ExportReport {
    pub stints: usize,
    pub players: usize,
}

/// Writes a game's stint timeline and roster to an .xlsx workbook for staff
/// hand-off. Sides without data export as "no data", matching the UI.
pub fn export_stints(path: &Path, book: &StintBook, roster: &[RosterPlayer]) -> Result<ExportReport> {
    let mut stint_rows = vec![vec![
        "Stint".to_string(),
        "Period".to_string(),
        "Start".to_string(),
        "End".to_string(),
        "Home Unit".to_string(),
        "Away Unit".to_string(),
    ]];
    for stint in &book.all {
        stint_rows.push(vec![
            stint.id.to_string(),
            stint.period.to_string(),
            format_clock(stint.start_secs),
            format_clock(stint.end_secs),
            unit_cell(&stint.home_players),
            unit_cell(&stint.away_players),
        ]);
    }

    let mut roster_rows = vec![vec![
        "Player ID".to_string(),
        "Player".to_string(),
        "Position".to_string(),
    ]];
    for player in roster {
        roster_rows.push(vec![
            player.id.to_string(),
            player.name.clone(),
            player.position.clone(),
        ]);
    }

    let mut workbook = Workbook::new();
    write_sheet(workbook.add_worksheet(), "Stints", &stint_rows)?;
    write_sheet(workbook.add_worksheet(), "Roster", &roster_rows)?;
    workbook.save(path).context("save stint workbook")?;

    Ok(ExportReport {
        stints: book.all.len(),
        players: roster.len(),
    })
}

fn unit_cell(players: &[RawPlayer]) -> String {
    if players.is_empty() {
        return "no data".to_string();
    }
    players
        .iter()
        .map(|p| format!("{} ({})", p.name, p.position))
        .collect::<Vec<_>>()
        .join("; ")
}

fn write_sheet(sheet: &mut Worksheet, name: &str, rows: &[Vec<String>]) -> Result<()> {
    sheet.set_name(name).context("worksheet name")?;
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            sheet
                .write_string(row_idx as u32, col_idx as u16, cell)
                .context("write cell")?;
        }
    }
    Ok(())
}
