//! Exhaustive move evaluation.
//!
//! For each candidate first move the evaluator walks every continuation down
//! to a finished game and aggregates a score difference, a win credit and an
//! outcome count. There is no pruning, no transposition table and no depth
//! limit; the only bound is the optional node budget in [`SearchConfig`].
//!
//! The tree is walked with an explicit stack of frames instead of recursion,
//! so long seed-rich lines cannot exhaust the call stack. Each frame owns its
//! own copy of the seed counts.

use std::fmt;
use std::str::FromStr;

use crate::board::{
    apply_move_with, is_game_over, seeds_in_play, Board, CaptureRule, Counts, MoveError, Player,
};
use crate::constants::{INVALID_MOVE, PITS_PER_SIDE};

/// Aggregated statistics for one candidate move.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MoveValue {
    /// Evaluating player's store minus the opponent's, summed over outcomes.
    pub score_diff: i64,
    /// 1 per win, 0.5 per draw.
    pub win_credit: f64,
    /// Number of finished games reached.
    pub outcomes: i64,
}

impl MoveValue {
    /// Value of a move whose source pit is empty.
    pub const INVALID: MoveValue = MoveValue {
        score_diff: INVALID_MOVE,
        win_credit: INVALID_MOVE as f64,
        outcomes: INVALID_MOVE,
    };

    const ZERO: MoveValue = MoveValue {
        score_diff: 0,
        win_credit: 0.0,
        outcomes: 0,
    };

    /// Value of a single finished game, seen from `player`.
    pub fn terminal(counts: &Counts, player: Player) -> Self {
        let own = counts[player.store()] as i64;
        let other = counts[player.opponent().store()] as i64;
        let win_credit = match own.cmp(&other) {
            std::cmp::Ordering::Greater => 1.0,
            std::cmp::Ordering::Equal => 0.5,
            std::cmp::Ordering::Less => 0.0,
        };
        MoveValue {
            score_diff: own - other,
            win_credit,
            outcomes: 1,
        }
    }

    /// True when the outcome slot holds the invalid-move marker.
    pub fn is_invalid(&self) -> bool {
        self.outcomes == INVALID_MOVE
    }

    /// Win percentage, or the invalid-move marker for unplayable moves.
    ///
    /// A value with zero outcomes yields NaN, which never wins a comparison.
    pub fn win_ratio(&self) -> f64 {
        if self.is_invalid() {
            INVALID_MOVE as f64
        } else {
            self.win_credit / self.outcomes as f64 * 100.0
        }
    }
}

/// How child values are folded into their parent.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Aggregation {
    /// Only slots equal to the invalid marker are added; valid children add
    /// nothing, so invalid sub-moves dominate the totals of any interior node.
    /// Kept as the default for compatibility with existing move tables.
    #[default]
    Reference,
    /// Every valid child is added slot by slot and invalid children are skipped.
    Summed,
}

impl Aggregation {
    fn fold(self, acc: &mut MoveValue, child: &MoveValue) {
        match self {
            Aggregation::Reference => {
                if child.score_diff == INVALID_MOVE {
                    acc.score_diff += child.score_diff;
                }
                if child.win_credit == INVALID_MOVE as f64 {
                    acc.win_credit += child.win_credit;
                }
                if child.outcomes == INVALID_MOVE {
                    acc.outcomes += child.outcomes;
                }
            }
            Aggregation::Summed => {
                if !child.is_invalid() {
                    acc.score_diff += child.score_diff;
                    acc.win_credit += child.win_credit;
                    acc.outcomes += child.outcomes;
                }
            }
        }
    }
}

impl FromStr for Aggregation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reference" => Ok(Aggregation::Reference),
            "summed" | "sum" => Ok(Aggregation::Summed),
            other => Err(format!(
                "unknown aggregation '{other}' (expected reference or summed)"
            )),
        }
    }
}

/// Search options.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchConfig {
    pub capture: CaptureRule,
    pub aggregation: Aggregation,
    /// Abort after simulating this many moves (`None` = unbounded).
    pub max_nodes: Option<u64>,
}

/// Errors that stop an evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Invalid pit, player or board
    Move(MoveError),
    /// Node budget exhausted
    NodeLimit(u64),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::Move(e) => write!(f, "{e}"),
            SearchError::NodeLimit(n) => write!(f, "search aborted after {n} nodes"),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SearchError::Move(e) => Some(e),
            SearchError::NodeLimit(_) => None,
        }
    }
}

impl From<MoveError> for SearchError {
    fn from(e: MoveError) -> Self {
        SearchError::Move(e)
    }
}

/// An interior node whose children are still being expanded.
struct Frame {
    counts: Counts,
    mover: Player,
    next_pit: usize,
    acc: MoveValue,
}

/// Either a finished game or a position with a player to move.
enum Expanded {
    Leaf(MoveValue),
    Node(Frame),
}

/// Exhaustive evaluator for one AI player.
pub struct Evaluator {
    /// Player whose perspective all scores are computed from
    player: Player,
    config: SearchConfig,
    /// Moves simulated by the most recent call
    nodes: u64,
}

impl Evaluator {
    pub fn new(player: Player) -> Self {
        Self::with_config(player, SearchConfig::default())
    }

    pub fn with_config(player: Player, config: SearchConfig) -> Self {
        Self {
            player,
            config,
            nodes: 0,
        }
    }

    /// Moves simulated during the last evaluation.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Evaluate all six pits of the evaluating player on `board`.
    pub fn move_table(
        &mut self,
        board: &Board,
    ) -> Result<[MoveValue; PITS_PER_SIDE], SearchError> {
        let mut table = [MoveValue::INVALID; PITS_PER_SIDE];
        let mut total = 0;
        for (pit, slot) in table.iter_mut().enumerate() {
            *slot = self.evaluate_move(pit, self.player, &board.counts)?;
            total += self.nodes;
        }
        self.nodes = total;
        Ok(table)
    }

    /// Evaluate sowing `pit` (in `mover`'s own frame) on `counts`.
    ///
    /// Returns [`MoveValue::INVALID`] when the source pit is empty. Otherwise
    /// every continuation is played out to the end of the game.
    ///
    /// # Errors
    /// - [`SearchError::Move`] if `pit` is out of range or the game is already over
    /// - [`SearchError::NodeLimit`] if the configured node budget runs out
    pub fn evaluate_move(
        &mut self,
        pit: usize,
        mover: Player,
        counts: &Counts,
    ) -> Result<MoveValue, SearchError> {
        self.nodes = 0;
        if is_game_over(counts) {
            return Err(MoveError::GameOver.into());
        }

        let root = match self.expand(pit, mover, counts)? {
            None => return Ok(MoveValue::INVALID),
            Some(Expanded::Leaf(value)) => return Ok(value),
            Some(Expanded::Node(frame)) => frame,
        };

        let aggregation = self.config.aggregation;
        let mut stack = vec![root];

        while let Some(top) = stack.last_mut() {
            if top.next_pit < PITS_PER_SIDE {
                let pit = top.next_pit;
                top.next_pit += 1;
                let (mover, counts) = (top.mover, top.counts);

                match self.expand(pit, mover, &counts)? {
                    None => aggregation.fold(&mut top.acc, &MoveValue::INVALID),
                    Some(Expanded::Leaf(value)) => aggregation.fold(&mut top.acc, &value),
                    Some(Expanded::Node(frame)) => stack.push(frame),
                }
                continue;
            }

            // All children folded, hand the value up
            let done = stack.pop().map(|f| f.acc).unwrap_or(MoveValue::ZERO);
            match stack.last_mut() {
                Some(parent) => aggregation.fold(&mut parent.acc, &done),
                None => return Ok(done),
            }
        }

        Ok(MoveValue::ZERO)
    }

    /// Play one move. `None` means the source pit was empty.
    fn expand(
        &mut self,
        pit: usize,
        mover: Player,
        counts: &Counts,
    ) -> Result<Option<Expanded>, SearchError> {
        let source = mover.pit_index(pit)?;
        if counts[source] == 0 {
            return Ok(None);
        }

        self.nodes += 1;
        if let Some(limit) = self.config.max_nodes {
            if self.nodes > limit {
                return Err(SearchError::NodeLimit(limit));
            }
        }

        let t = apply_move_with(counts, pit, mover, self.config.capture)?;
        let next = match (seeds_in_play(&t.counts), t.next) {
            (0, _) | (_, None) => {
                let value = MoveValue::terminal(&t.counts, self.player);
                return Ok(Some(Expanded::Leaf(value)));
            }
            (_, Some(next)) => next,
        };

        Ok(Some(Expanded::Node(Frame {
            counts: t.counts,
            mover: next,
            next_pit: 0,
            acc: MoveValue::ZERO,
        })))
    }
}
