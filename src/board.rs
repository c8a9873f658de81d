//! Kalah board representation and move execution.
//!
//! This module provides the core game logic:
//! - Board state as a fixed array of 14 seed counts
//! - Sowing, with the opponent's store skipped
//! - The extra-turn and capture rules
//! - Game-over detection and the final sweep into the stores
//!
//! Move execution is a pure function of `(counts, pit, mover)`. Every call
//! works on its own copy of the counts, so callers never observe partial
//! mutation and search branches never share state.

use std::fmt;
use std::str::FromStr;

use crate::constants::*;

/// Seed counts for all 14 pits in absolute board order.
pub type Counts = [u32; NUM_PITS];

/// One of the two players.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// Convert a numeric player id (1 or 2).
    pub fn from_id(id: u8) -> Result<Self, MoveError> {
        match id {
            1 => Ok(Player::One),
            2 => Ok(Player::Two),
            other => Err(MoveError::InvalidPlayer(other)),
        }
    }

    /// Numeric id of the player (1 or 2).
    pub fn id(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Absolute index of this player's store.
    pub fn store(self) -> usize {
        match self {
            Player::One => STORE_ONE,
            Player::Two => STORE_TWO,
        }
    }

    /// Resolve a pit in this player's own frame (0 = leftmost) to an absolute index.
    ///
    /// Player 2's row is mirrored: relative pit 0 is absolute pit 12.
    pub fn pit_index(self, relative: usize) -> Result<usize, MoveError> {
        if relative >= PITS_PER_SIDE {
            return Err(MoveError::PitOutOfRange(relative));
        }
        Ok(match self {
            Player::One => relative,
            Player::Two => OPPOSITE_SUM - relative,
        })
    }

    /// Absolute indices of this player's six small pits, in relative order.
    pub fn pits(self) -> [usize; PITS_PER_SIDE] {
        std::array::from_fn(|i| match self {
            Player::One => i,
            Player::Two => OPPOSITE_SUM - i,
        })
    }

    /// Check whether the absolute index is one of this player's small pits.
    pub fn owns_pit(self, index: usize) -> bool {
        match self {
            Player::One => index < STORE_ONE,
            Player::Two => index > STORE_ONE && index < STORE_TWO,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Kind of board position.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PitKind {
    /// A pit seeds are sown from.
    Small,
    /// An end zone; seeds here are never sown again.
    Store,
}

/// A single board position with its seed count.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pit {
    pub index: usize,
    pub owner: Player,
    pub kind: PitKind,
    pub seeds: u32,
}

/// Rule applied when the last seed lands in an empty pit of the mover.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CaptureRule {
    /// All seeds of the opposite pit plus the capturing seed go to the store.
    #[default]
    Full,
    /// Only one seed is taken from the opposite pit, plus the capturing seed.
    SingleSeed,
}

impl FromStr for CaptureRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(CaptureRule::Full),
            "single" | "single-seed" => Ok(CaptureRule::SingleSeed),
            other => Err(format!("unknown capture rule '{other}' (expected full or single)")),
        }
    }
}

/// Precondition violations when constructing boards or executing moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// Relative pit outside 0..6
    PitOutOfRange(usize),
    /// Player id other than 1 or 2
    InvalidPlayer(u8),
    /// Source pit holds no seeds
    EmptyPit(usize),
    /// Board array does not have 14 entries
    BoardLength(usize),
    /// Move requested on a finished game
    GameOver,
    /// More seeds than a game can hold
    TooManySeeds(u64),
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::PitOutOfRange(pit) => {
                write!(f, "pit {pit} out of range (expected 0..{PITS_PER_SIDE})")
            }
            MoveError::InvalidPlayer(id) => write!(f, "invalid player {id} (expected 1 or 2)"),
            MoveError::EmptyPit(index) => write!(f, "illegal move: pit {index} is empty"),
            MoveError::BoardLength(len) => {
                write!(f, "board must have {NUM_PITS} pits, got {len}")
            }
            MoveError::GameOver => write!(f, "illegal move: game is over"),
            MoveError::TooManySeeds(total) => {
                write!(f, "board holds {total} seeds, at most {TOTAL_SEEDS} allowed")
            }
        }
    }
}

impl std::error::Error for MoveError {}

/// Result of applying one move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    /// Seed counts after sowing, capture and any final sweep.
    pub counts: Counts,
    /// Player to move next, or `None` once the game is over.
    pub next: Option<Player>,
}

/// A Kalah position: seed counts plus the player to move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    /// Seed counts in absolute order (6 and 13 are the stores).
    pub counts: Counts,
    /// Player to move (`None` when the game is over).
    pub turn: Option<Player>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The starting position: 3 seeds in every small pit, empty stores, player 1 to move.
    pub fn new() -> Self {
        let mut counts = [SEEDS_PER_PIT; NUM_PITS];
        counts[STORE_ONE] = 0;
        counts[STORE_TWO] = 0;
        Board {
            counts,
            turn: Some(Player::One),
        }
    }

    /// Build a board from a plain count slice.
    ///
    /// The turn is player 1 unless one side is already empty, in which case the
    /// game is over.
    ///
    /// # Errors
    /// - [`MoveError::BoardLength`] if the slice does not have 14 entries
    /// - [`MoveError::TooManySeeds`] if the counts add up to more than 48
    pub fn from_counts(counts: &[u32]) -> Result<Self, MoveError> {
        let counts: Counts = counts
            .try_into()
            .map_err(|_| MoveError::BoardLength(counts.len()))?;
        check_total(&counts)?;
        let turn = if is_game_over(&counts) {
            None
        } else {
            Some(Player::One)
        };
        Ok(Board { counts, turn })
    }

    /// Same board with a different player to move.
    pub fn with_turn(mut self, turn: Option<Player>) -> Self {
        self.turn = turn;
        self
    }

    /// Semantic record for the pit at an absolute index.
    pub fn pit(&self, index: usize) -> Pit {
        let owner = if index <= STORE_ONE {
            Player::One
        } else {
            Player::Two
        };
        let kind = if index == STORE_ONE || index == STORE_TWO {
            PitKind::Store
        } else {
            PitKind::Small
        };
        Pit {
            index,
            owner,
            kind,
            seeds: self.counts[index],
        }
    }

    pub fn pits(&self) -> impl Iterator<Item = Pit> + '_ {
        (0..NUM_PITS).map(|i| self.pit(i))
    }

    /// Seeds banked in a player's store.
    pub fn store(&self, player: Player) -> u32 {
        self.counts[player.store()]
    }

    /// Total seeds on the board (constant over one game).
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Seeds still in play (all small pits, both stores excluded).
    pub fn seeds_in_play(&self) -> u32 {
        self.pits()
            .filter(|p| p.kind == PitKind::Small)
            .map(|p| p.seeds)
            .sum()
    }

    pub fn is_game_over(&self) -> bool {
        self.turn.is_none()
    }

    /// Relative pits (0-based) the side to move may sow from.
    pub fn legal_moves(&self) -> Vec<usize> {
        match self.turn {
            Some(player) => player
                .pits()
                .iter()
                .enumerate()
                .filter(|&(_, &abs)| self.counts[abs] > 0)
                .map(|(rel, _)| rel)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Play a relative pit for the side to move, using the full capture rule.
    pub fn play(&self, pit: usize) -> Result<Board, MoveError> {
        self.play_with(pit, CaptureRule::Full)
    }

    /// Play a relative pit for the side to move.
    pub fn play_with(&self, pit: usize, capture: CaptureRule) -> Result<Board, MoveError> {
        let mover = self.turn.ok_or(MoveError::GameOver)?;
        let t = apply_move_with(&self.counts, pit, mover, capture)?;
        Ok(Board {
            counts: t.counts,
            turn: t.next,
        })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pits: Vec<Pit> = self.pits().collect();
        let all = pits.as_slice();
        let row = move |owner: Player| {
            all.iter()
                .filter(move |p| p.owner == owner && p.kind == PitKind::Small)
        };

        // Player 2's row is printed right to left, above player 1's
        write!(f, "    ")?;
        for pit in row(Player::Two).rev() {
            write!(f, "{:3}", pit.seeds)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:3} {:18} {:3}",
            pits[STORE_TWO].seeds, "", pits[STORE_ONE].seeds
        )?;
        write!(f, "    ")?;
        for pit in row(Player::One) {
            write!(f, "{:3}", pit.seeds)?;
        }
        writeln!(f)?;
        match self.turn {
            Some(p) => writeln!(f, "to move: player {p}"),
            None => writeln!(f, "game over"),
        }
    }
}

/// Index of the small pit directly across the board.
#[inline]
pub fn opposite(index: usize) -> usize {
    OPPOSITE_SUM - index
}

/// Seeds in all small pits (indices 0-5 and 7-12).
pub fn seeds_in_play(counts: &Counts) -> u32 {
    counts
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != STORE_ONE && i != STORE_TWO)
        .map(|(_, &c)| c)
        .sum()
}

/// Check whether either player's six small pits are all empty.
pub fn is_game_over(counts: &Counts) -> bool {
    let row_empty = |p: Player| p.pits().iter().all(|&i| counts[i] == 0);
    row_empty(Player::One) || row_empty(Player::Two)
}

/// Reject boards holding more seeds than a game starts with.
fn check_total(counts: &Counts) -> Result<(), MoveError> {
    let total: u64 = counts.iter().map(|&c| u64::from(c)).sum();
    if total > u64::from(TOTAL_SEEDS) {
        return Err(MoveError::TooManySeeds(total));
    }
    Ok(())
}

/// Move every seed left in a small pit into its owner's store.
fn sweep(counts: &mut Counts) {
    for player in [Player::One, Player::Two] {
        for i in player.pits() {
            counts[player.store()] += counts[i];
            counts[i] = 0;
        }
    }
}

/// Apply a move with the full capture rule.
///
/// See [`apply_move_with`].
pub fn apply_move(counts: &Counts, pit: usize, mover: Player) -> Result<Transition, MoveError> {
    apply_move_with(counts, pit, mover, CaptureRule::Full)
}

/// Sow the seeds of `pit` (in the mover's own frame) and return the new board.
///
/// Sowing drops one seed per pit counter-clockwise, skipping the opponent's
/// store. If the last seed lands in the mover's store the mover plays again.
/// If it lands in a previously empty pit of the mover and the opposite pit is
/// non-empty, a capture moves seeds into the mover's store. When a row is
/// empty afterwards the remaining seeds are swept to their owners' stores and
/// `next` is `None`.
///
/// # Errors
/// - [`MoveError::PitOutOfRange`] if `pit` is not in 0..6
/// - [`MoveError::TooManySeeds`] if the board holds more than 48 seeds
/// - [`MoveError::GameOver`] if either row is already empty
/// - [`MoveError::EmptyPit`] if the source pit holds no seeds
pub fn apply_move_with(
    counts: &Counts,
    pit: usize,
    mover: Player,
    capture: CaptureRule,
) -> Result<Transition, MoveError> {
    let source = mover.pit_index(pit)?;
    check_total(counts)?;
    if is_game_over(counts) {
        return Err(MoveError::GameOver);
    }
    let mut counts = *counts;

    let seeds = std::mem::take(&mut counts[source]);
    if seeds == 0 {
        return Err(MoveError::EmptyPit(source));
    }

    let skip = mover.opponent().store();
    let mut dest = source + 1;
    let mut last = source;
    for _ in 0..seeds {
        if dest == skip {
            dest += 1;
        }
        if dest >= NUM_PITS {
            dest = 0;
        }
        counts[dest] += 1;
        last = dest;
        dest += 1;
    }

    let mut next = if last == mover.store() {
        // Extra turn
        Some(mover)
    } else {
        if mover.owns_pit(last) && counts[last] == 1 {
            let across = opposite(last);
            if counts[across] > 0 {
                let taken = match capture {
                    CaptureRule::Full => counts[across],
                    CaptureRule::SingleSeed => 1,
                };
                counts[across] -= taken;
                counts[last] = 0;
                counts[mover.store()] += taken + 1;
            }
        }
        Some(mover.opponent())
    };

    if is_game_over(&counts) {
        sweep(&mut counts);
        next = None;
    }

    Ok(Transition { counts, next })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board() {
        let board = Board::new();
        assert_eq!(board.counts, [3, 3, 3, 3, 3, 3, 0, 3, 3, 3, 3, 3, 3, 0]);
        assert_eq!(board.turn, Some(Player::One));
        assert_eq!(board.total(), TOTAL_SEEDS);
    }

    #[test]
    fn test_pit_index_mirrors_player_two() {
        assert_eq!(Player::One.pit_index(0), Ok(0));
        assert_eq!(Player::One.pit_index(5), Ok(5));
        assert_eq!(Player::Two.pit_index(0), Ok(12));
        assert_eq!(Player::Two.pit_index(5), Ok(7));
        assert_eq!(Player::Two.pit_index(6), Err(MoveError::PitOutOfRange(6)));
    }

    #[test]
    fn test_from_id() {
        assert_eq!(Player::from_id(1), Ok(Player::One));
        assert_eq!(Player::from_id(2), Ok(Player::Two));
        assert_eq!(Player::from_id(0), Err(MoveError::InvalidPlayer(0)));
        assert_eq!(Player::from_id(3), Err(MoveError::InvalidPlayer(3)));
    }

    #[test]
    fn test_pit_records() {
        let board = Board::new();
        let store = board.pit(STORE_TWO);
        assert_eq!(store.kind, PitKind::Store);
        assert_eq!(store.owner, Player::Two);
        let pit = board.pit(7);
        assert_eq!(pit.kind, PitKind::Small);
        assert_eq!(pit.owner, Player::Two);
        assert_eq!(pit.seeds, 3);
        assert_eq!(board.pits().filter(|p| p.kind == PitKind::Store).count(), 2);
    }

    #[test]
    fn test_opposite() {
        assert_eq!(opposite(0), 12);
        assert_eq!(opposite(5), 7);
        assert_eq!(opposite(9), 3);
    }

    #[test]
    fn test_simple_sow() {
        let t = apply_move(&Board::new().counts, 2, Player::One).unwrap();
        assert_eq!(t.counts, [3, 3, 0, 4, 4, 4, 0, 3, 3, 3, 3, 3, 3, 0]);
        assert_eq!(t.next, Some(Player::Two));
    }

    #[test]
    fn test_extra_turn() {
        let t = apply_move(&Board::new().counts, 3, Player::One).unwrap();
        assert_eq!(t.counts, [3, 3, 3, 0, 4, 4, 1, 3, 3, 3, 3, 3, 3, 0]);
        assert_eq!(t.next, Some(Player::One));
    }

    #[test]
    fn test_last_seed_past_store() {
        let t = apply_move(&Board::new().counts, 5, Player::One).unwrap();
        assert_eq!(t.counts, [3, 3, 3, 3, 3, 0, 1, 4, 4, 3, 3, 3, 3, 0]);
        assert_eq!(t.next, Some(Player::Two));
    }

    #[test]
    fn test_player_two_wraps() {
        let t = apply_move(&Board::new().counts, 0, Player::Two).unwrap();
        assert_eq!(t.counts, [4, 4, 3, 3, 3, 3, 0, 3, 3, 3, 3, 3, 0, 1]);
        assert_eq!(t.next, Some(Player::One));

        let t = apply_move(&Board::new().counts, 2, Player::Two).unwrap();
        assert_eq!(t.counts[STORE_TWO], 1);
        assert_eq!(t.next, Some(Player::Two));
    }

    #[test]
    fn test_skips_opponent_store() {
        let counts = [0, 0, 2, 0, 0, 10, 0, 3, 3, 3, 3, 3, 3, 0];
        let t = apply_move(&counts, 5, Player::One).unwrap();
        assert_eq!(t.counts, [1, 1, 3, 0, 0, 0, 1, 4, 4, 4, 4, 4, 4, 0]);
        assert_eq!(t.next, Some(Player::Two));
    }

    #[test]
    fn test_full_capture() {
        let counts = [1, 0, 1, 0, 0, 0, 0, 2, 0, 4, 0, 0, 0, 0];
        let t = apply_move(&counts, 2, Player::One).unwrap();
        assert_eq!(t.counts, [1, 0, 0, 0, 0, 0, 5, 2, 0, 0, 0, 0, 0, 0]);
        assert_eq!(t.next, Some(Player::Two));
    }

    #[test]
    fn test_single_seed_capture() {
        let counts = [1, 0, 1, 0, 0, 0, 0, 2, 0, 4, 0, 0, 0, 0];
        let t = apply_move_with(&counts, 2, Player::One, CaptureRule::SingleSeed).unwrap();
        assert_eq!(t.counts, [1, 0, 0, 0, 0, 0, 2, 2, 0, 3, 0, 0, 0, 0]);
        assert_eq!(t.next, Some(Player::Two));
    }

    #[test]
    fn test_no_capture_from_empty_opposite() {
        let counts = [1, 0, 1, 0, 0, 0, 0, 2, 0, 0, 4, 0, 0, 0];
        let t = apply_move(&counts, 2, Player::One).unwrap();
        assert_eq!(t.counts, [1, 0, 0, 1, 0, 0, 0, 2, 0, 0, 4, 0, 0, 0]);
    }

    #[test]
    fn test_no_capture_on_opponent_side() {
        // Last seed lands in player 2's empty pit 8
        let counts = [1, 0, 0, 0, 0, 3, 0, 1, 0, 2, 0, 0, 0, 0];
        let t = apply_move(&counts, 5, Player::One).unwrap();
        assert_eq!(t.counts, [1, 0, 0, 0, 0, 0, 1, 2, 1, 2, 0, 0, 0, 0]);
        assert_eq!(t.next, Some(Player::Two));
    }

    #[test]
    fn test_capture_after_full_lap() {
        let counts = [13, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        let t = apply_move(&counts, 0, Player::One).unwrap();
        assert_eq!(t.counts, [0, 1, 1, 1, 1, 1, 3, 1, 1, 1, 1, 1, 0, 0]);
        assert_eq!(t.next, Some(Player::Two));
    }

    #[test]
    fn test_game_over_sweep() {
        let counts = [0, 0, 0, 0, 0, 1, 20, 1, 2, 3, 0, 0, 0, 21];
        let t = apply_move(&counts, 5, Player::One).unwrap();
        assert_eq!(t.counts, [0, 0, 0, 0, 0, 0, 21, 0, 0, 0, 0, 0, 0, 27]);
        assert_eq!(t.next, None);
        assert_eq!(t.counts.iter().sum::<u32>(), TOTAL_SEEDS);
    }

    #[test]
    fn test_errors() {
        let mut counts = Board::new().counts;
        counts[1] = 0;
        assert_eq!(
            apply_move(&counts, 1, Player::One),
            Err(MoveError::EmptyPit(1))
        );
        assert_eq!(
            apply_move(&counts, 6, Player::One),
            Err(MoveError::PitOutOfRange(6))
        );
        assert_eq!(
            Board::from_counts(&[3; 13]),
            Err(MoveError::BoardLength(13))
        );
    }

    #[test]
    fn test_apply_move_on_finished_board() {
        // Player 2's row is empty, so the game has already ended
        let counts = [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 47];
        assert_eq!(
            apply_move(&counts, 0, Player::One),
            Err(MoveError::GameOver)
        );
        assert_eq!(
            apply_move_with(&counts, 0, Player::One, CaptureRule::SingleSeed),
            Err(MoveError::GameOver)
        );
    }

    #[test]
    fn test_too_many_seeds() {
        let counts = [0, 0, 0, 0, 0, 1, u32::MAX, 0, 0, 0, 0, 0, 1, 0];
        assert_eq!(
            Board::from_counts(&counts),
            Err(MoveError::TooManySeeds(u64::from(u32::MAX) + 2))
        );
        assert_eq!(
            apply_move(&counts, 5, Player::One),
            Err(MoveError::TooManySeeds(u64::from(u32::MAX) + 2))
        );

        let mut counts = Board::new().counts;
        counts[STORE_ONE] = 13;
        assert_eq!(
            Board::from_counts(&counts),
            Err(MoveError::TooManySeeds(49))
        );
        counts[STORE_ONE] = 12;
        assert!(Board::from_counts(&counts).is_ok());
    }

    #[test]
    fn test_display() {
        let text = Board::new().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "      3  3  3  3  3  3");
        assert_eq!(lines[1], format!("  0 {:18}   0", ""));
        assert_eq!(lines[2], "      3  3  3  3  3  3");
        assert_eq!(lines[3], "to move: player 1");

        // Player 2's row reads right to left above player 1's
        let board = Board {
            counts: [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14],
            turn: None,
        };
        let text = board.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "     13 12 11 10  9  8");
        assert_eq!(lines[1], format!(" 14 {:18}   7", ""));
        assert_eq!(lines[2], "      1  2  3  4  5  6");
        assert_eq!(lines[3], "game over");
        assert_eq!(board.seeds_in_play(), 84);
    }

    #[test]
    fn test_play_after_game_over() {
        let board = Board::from_counts(&[0, 0, 0, 0, 0, 0, 24, 0, 0, 0, 0, 0, 0, 24]).unwrap();
        assert!(board.is_game_over());
        assert_eq!(board.play(0), Err(MoveError::GameOver));
        assert!(board.legal_moves().is_empty());
    }

    #[test]
    fn test_legal_moves() {
        let board = Board::from_counts(&[0, 2, 0, 0, 0, 1, 0, 3, 3, 3, 3, 3, 3, 0]).unwrap();
        assert_eq!(board.legal_moves(), vec![1, 5]);
        let board = board.with_turn(Some(Player::Two));
        assert_eq!(board.legal_moves(), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_capture_rule_from_str() {
        assert_eq!("full".parse::<CaptureRule>(), Ok(CaptureRule::Full));
        assert_eq!("Single".parse::<CaptureRule>(), Ok(CaptureRule::SingleSeed));
        assert!("half".parse::<CaptureRule>().is_err());
    }
}
