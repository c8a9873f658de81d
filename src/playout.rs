//! Random play.
//!
//! Random moves are used to reach endgame positions small enough for the
//! exhaustive evaluator, and to drive whole games in tests. Every function
//! takes an explicit `fastrand::Rng` so runs are reproducible from a seed.

use crate::board::{Board, CaptureRule, MoveError};

/// Choose a uniformly random legal pit (0-based, mover's frame) for the side to move.
///
/// Returns `None` when the game is over.
pub fn random_move(rng: &mut fastrand::Rng, board: &Board) -> Option<usize> {
    let moves = board.legal_moves();
    if moves.is_empty() {
        return None;
    }
    Some(moves[rng.usize(..moves.len())])
}

/// Play random moves until the game ends or at most `stop_at` seeds remain
/// in the small pits.
///
/// Returns the final board and the number of moves played.
pub fn random_playout(
    rng: &mut fastrand::Rng,
    board: &Board,
    stop_at: u32,
    capture: CaptureRule,
) -> Result<(Board, usize), MoveError> {
    let mut board = board.clone();
    let mut played = 0;

    while board.seeds_in_play() > stop_at {
        let Some(pit) = random_move(rng, &board) else {
            break;
        };
        board = board.play_with(pit, capture)?;
        played += 1;
    }

    Ok((board, played))
}
