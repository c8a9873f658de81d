//! Line-oriented text protocol for driving the engine.
//!
//! The protocol follows the shape of GTP version 2: an optional numeric id,
//! a command and its arguments on one line; responses start with `=` on
//! success or `?` on failure and end with a blank line.
//!
//! ## Supported Commands
//!
//! - `name` - Return engine name
//! - `version` - Return engine version
//! - `protocol_version` - Return protocol version (2)
//! - `list_commands` - List all supported commands
//! - `known_command <cmd>` - Check if a command is supported
//! - `quit` - Exit the program
//! - `clear_board` - Reset to the starting position
//! - `setboard <c0> .. <c13> [turn]` - Load 14 seed counts, optionally the player to move (1 or 2)
//! - `showboard` - Print the board
//! - `play <1-6>` - Sow a pit for the side to move
//! - `evaluate` - Evaluate all six pits for the side to move
//! - `genmove` - Choose and play a move for the side to move
//!
//! ## Example
//!
//! ```ignore
//! use kalah_rust::protocol::ProtocolEngine;
//! let mut engine = ProtocolEngine::new();
//! engine.run();
//! ```

use std::io::{self, BufRead, Write};

use crate::board::{Board, Player};
use crate::constants::{NUM_PITS, PITS_PER_SIDE};
use crate::eval::{Evaluator, MoveValue, SearchConfig};
use crate::selector::{dump_move_table, format_row, select_move};

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "clear_board",
    "evaluate",
    "genmove",
    "known_command",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "setboard",
    "showboard",
    "version",
];

/// Protocol engine state.
pub struct ProtocolEngine {
    /// Current game position
    board: Board,
    /// Options used for every evaluation
    config: SearchConfig,
    /// Print move tables to stderr
    verbose: bool,
}

impl Default for ProtocolEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtocolEngine {
    /// Create a new engine with default search options.
    pub fn new() -> Self {
        Self::with_config(SearchConfig::default(), false)
    }

    pub fn with_config(config: SearchConfig, verbose: bool) -> Self {
        Self {
            board: Board::new(),
            config,
            verbose,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Run the command loop, reading from stdin and writing to stdout.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        for line in stdin.lock().lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);

            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let args = &parts[1..];

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(stdout, "{prefix}{id_str} {message}\n")?;
            stdout.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command id from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, "kalah-rust".to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "2".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                let known = KNOWN_COMMANDS.contains(&args[0].to_lowercase().as_str());
                (true, if known { "true" } else { "false" }.to_string())
            }

            "quit" => (true, String::new()),

            "clear_board" => {
                self.board = Board::new();
                (true, String::new())
            }

            "setboard" => match parse_board(args) {
                Ok(board) => {
                    self.board = board;
                    (true, String::new())
                }
                Err(msg) => (false, msg),
            },

            "showboard" => (true, format!("\n{}", self.board)),

            "play" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                let pit = match args[0].parse::<usize>() {
                    Ok(n) if (1..=PITS_PER_SIDE).contains(&n) => n - 1,
                    _ => return (false, format!("invalid pit '{}'", args[0])),
                };
                match self.board.play_with(pit, self.config.capture) {
                    Ok(board) => {
                        self.board = board;
                        (true, String::new())
                    }
                    Err(e) => (false, e.to_string()),
                }
            }

            "evaluate" => match self.analyse() {
                Ok(table) => (
                    true,
                    format!(
                        "\nwin %: {}\nscore: {}",
                        format_row(&table, |v| v.win_ratio() as i64),
                        format_row(&table, |v| v.score_diff)
                    ),
                ),
                Err(msg) => (false, msg),
            },

            "genmove" => {
                let table = match self.analyse() {
                    Ok(table) => table,
                    Err(msg) => return (false, msg),
                };
                let Some(mv) = select_move(&table) else {
                    return (true, "pass".to_string());
                };
                match self.board.play_with(mv - 1, self.config.capture) {
                    Ok(board) => {
                        self.board = board;
                        (true, mv.to_string())
                    }
                    Err(e) => (false, e.to_string()),
                }
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }

    /// Evaluate the six pits of the side to move.
    fn analyse(&self) -> Result<[MoveValue; PITS_PER_SIDE], String> {
        let player = self.board.turn.ok_or_else(|| "game is over".to_string())?;
        let mut evaluator = Evaluator::with_config(player, self.config);
        let table = evaluator
            .move_table(&self.board)
            .map_err(|e| e.to_string())?;
        if self.verbose {
            eprintln!("player {player}: {} nodes", evaluator.nodes());
            dump_move_table(&table);
        }
        Ok(table)
    }
}

/// Parse 14 seed counts and an optional player to move.
///
/// Without a turn argument the board defaults to player 1 (or game over when
/// a row is already empty).
pub fn parse_board(args: &[&str]) -> Result<Board, String> {
    if args.len() != NUM_PITS && args.len() != NUM_PITS + 1 {
        return Err(format!(
            "expected {NUM_PITS} seed counts and an optional turn, got {} values",
            args.len()
        ));
    }

    let mut counts = Vec::with_capacity(NUM_PITS);
    for arg in &args[..NUM_PITS] {
        match arg.parse::<i64>() {
            Ok(n) if n < 0 => return Err(format!("negative seed count {n}")),
            Ok(n) => {
                let n = u32::try_from(n).map_err(|_| format!("seed count {n} too large"))?;
                counts.push(n);
            }
            Err(_) => return Err(format!("invalid seed count '{arg}'")),
        }
    }
    let board = Board::from_counts(&counts).map_err(|e| e.to_string())?;

    match args.get(NUM_PITS) {
        None => Ok(board),
        Some(turn) => {
            let id = turn
                .parse::<u8>()
                .map_err(|_| format!("invalid player '{turn}'"))?;
            let player = Player::from_id(id).map_err(|e| e.to_string())?;
            if board.is_game_over() {
                Ok(board)
            } else {
                Ok(board.with_turn(Some(player)))
            }
        }
    }
}
