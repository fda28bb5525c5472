use std::fmt::Write;

use sweeper_core::{CellDisplay, Coord2, GameStatus, Snapshot};

pub fn face(status: GameStatus) -> &'static str {
    match status {
        GameStatus::Started => ":)",
        GameStatus::Won => "B)",
        GameStatus::Lost => ":(",
    }
}

/// Glyph for one cell, a revealed cell wins over a flag.
pub fn glyph(snapshot: &Snapshot, coords: Coord2) -> char {
    match snapshot.display_at(coords) {
        Some(CellDisplay::Mine) => '*',
        Some(CellDisplay::ExplodedMine) => 'X',
        Some(CellDisplay::Empty) => '.',
        Some(CellDisplay::Count(count)) => char::from(b'0' + count),
        None if snapshot.is_flagged(coords) => 'F',
        None => '#',
    }
}

pub fn render_board(snapshot: &Snapshot) -> String {
    let mut out = String::from("    ");
    for x in 0..snapshot.width {
        out.push(char::from(b'0' + x % 10));
    }
    out.push('\n');

    for y in 0..snapshot.height {
        let _ = write!(out, "{:>3} ", y);
        for x in 0..snapshot.width {
            out.push(glyph(snapshot, (x, y)));
        }
        out.push('\n');
    }

    out
}

pub fn render_status(snapshot: &Snapshot, elapsed_secs: u64) -> String {
    format!(
        "{}  mines: {}  time: {}",
        face(snapshot.status),
        snapshot.flags_left(),
        elapsed_secs
    )
}
