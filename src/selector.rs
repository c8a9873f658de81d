//! Move selection from an evaluated move table.
//!
//! The best move is the one with the highest win percentage; ties go to the
//! higher score difference and then to the lower pit.

use crate::constants::{INVALID_MOVE, PITS_PER_SIDE};
use crate::eval::MoveValue;

/// Pick a move from a table of six values.
///
/// Returns the 1-based pit in the player's own frame, or `None` when no
/// move beats the invalid-move marker.
pub fn select_move(table: &[MoveValue; PITS_PER_SIDE]) -> Option<usize> {
    let mut best_ratio = INVALID_MOVE as f64;
    let mut best_score = INVALID_MOVE;
    let mut best = None;

    for (i, value) in table.iter().enumerate() {
        let ratio = value.win_ratio();
        if ratio > best_ratio || (ratio == best_ratio && value.score_diff > best_score) {
            best_ratio = ratio;
            best_score = value.score_diff;
            best = Some(i + 1);
        }
    }
    best
}

/// Print the win-percentage and score rows of a move table to stderr.
pub fn dump_move_table(table: &[MoveValue; PITS_PER_SIDE]) {
    eprintln!("win %: {}", format_row(table, |v| v.win_ratio() as i64));
    eprintln!("score: {}", format_row(table, |v| v.score_diff));
}

/// Format one row as `|a|b|...|`, with `X` for unplayable moves.
pub fn format_row(table: &[MoveValue; PITS_PER_SIDE], f: impl Fn(&MoveValue) -> i64) -> String {
    let mut row = String::new();
    for value in table {
        if value.is_invalid() {
            row.push_str("|X");
        } else {
            row.push_str(&format!("|{}", f(value)));
        }
    }
    row.push('|');
    row
}
