//! Kalah-Rust: an exhaustive Kalah (Mancala) move evaluator.
//!
//! This crate simulates the board game Kalah and chooses moves for an AI
//! player by playing out every continuation of each candidate move to the
//! end of the game.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry and evaluation markers
//! - [`board`] - Core game logic (sowing, captures, extra turns, game over)
//! - [`eval`] - Exhaustive move evaluation
//! - [`selector`] - Choosing a move from evaluated values
//! - [`playout`] - Random play for reaching endgames
//! - [`protocol`] - Text protocol for GUI or script integration
//!
//! ## Example
//!
//! ```
//! use kalah_rust::board::{Board, Player};
//! use kalah_rust::eval::Evaluator;
//! use kalah_rust::selector::select_move;
//!
//! // A small endgame: player 1 to move
//! let board = Board::from_counts(&[0, 0, 0, 0, 2, 1, 20, 0, 1, 0, 0, 1, 0, 23]).unwrap();
//!
//! let mut evaluator = Evaluator::new(Player::One);
//! let table = evaluator.move_table(&board).unwrap();
//! if let Some(pit) = select_move(&table) {
//!     println!("Best move: {pit}");
//! }
//! ```

pub mod board;
pub mod constants;
pub mod eval;
pub mod playout;
pub mod protocol;
pub mod selector;
