//! Constants for board geometry and engine parameters.
//!
//! The board is a flat array of 14 pits in fixed absolute order:
//!
//! ```text
//!        12 11 10  9  8  7        <- player 2 (plays right to left on this diagram)
//!   [13]                   [6]
//!         0  1  2  3  4  5        <- player 1
//! ```
//!
//! Player 1 owns pits 0-5 and store 6, player 2 owns pits 7-12 and store 13.

// =============================================================================
// Board Geometry
// =============================================================================

/// Total number of positions on the board (12 small pits + 2 stores).
pub const NUM_PITS: usize = 14;

/// Number of small pits on each player's side.
pub const PITS_PER_SIDE: usize = 6;

/// Player 1's store (end zone).
pub const STORE_ONE: usize = 6;

/// Player 2's store (end zone).
pub const STORE_TWO: usize = 13;

/// Sum of a small pit index and the index of the pit directly across from it.
pub const OPPOSITE_SUM: usize = 12;

// =============================================================================
// Seeds
// =============================================================================

/// Seeds placed in every small pit at the start of a game.
pub const SEEDS_PER_PIT: u32 = 3;

/// Seeds on the board for the whole game (3 seeds x 12 small pits).
pub const TOTAL_SEEDS: u32 = SEEDS_PER_PIT * (2 * PITS_PER_SIDE) as u32;

// =============================================================================
// Evaluation
// =============================================================================

/// Marker stored in every slot of a move value when the move has no seeds to sow.
///
/// Callers must check for it before using a value.
pub const INVALID_MOVE: i64 = -9999;
