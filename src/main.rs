//! Kalah-Rust: an exhaustive Kalah move evaluator.
//!
//! ## Usage
//!
//! - `kalah-rust` - Show a demo
//! - `kalah-rust protocol` - Start the text protocol server
//! - `kalah-rust eval <c0> .. <c13> [turn]` - Evaluate one position
//! - `kalah-rust demo` - Play randomly into an endgame and evaluate it

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};

use kalah_rust::board::{Board, CaptureRule};
use kalah_rust::eval::{Aggregation, Evaluator, SearchConfig};
use kalah_rust::playout::random_playout;
use kalah_rust::protocol::{ProtocolEngine, parse_board};
use kalah_rust::selector::{dump_move_table, select_move};

/// Kalah-Rust: an exhaustive Kalah move evaluator
#[derive(Parser)]
#[command(name = "kalah-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    search: SearchArgs,

    /// Print move tables and node counts to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct SearchArgs {
    /// Capture rule: full or single
    #[arg(long, global = true, default_value = "full")]
    capture: CaptureRule,

    /// How child values are summed: reference or summed
    #[arg(long, global = true, default_value = "reference")]
    aggregation: Aggregation,

    /// Abort an evaluation after this many simulated moves
    #[arg(long, global = true)]
    max_nodes: Option<u64>,
}

impl SearchArgs {
    fn config(&self) -> SearchConfig {
        SearchConfig {
            capture: self.capture,
            aggregation: self.aggregation,
            max_nodes: self.max_nodes,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start the text protocol server on stdin/stdout
    Protocol,
    /// Evaluate a position given as 14 seed counts and an optional player to move
    Eval {
        #[arg(num_args = 14..=15, required = true, allow_negative_numbers = true)]
        board: Vec<String>,
    },
    /// Play random moves into an endgame, then evaluate it
    Demo {
        /// Random seed
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Stop random play once this many seeds are left in the small pits
        #[arg(long, default_value_t = 8)]
        endgame: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.search.config();

    match cli.command {
        Some(Commands::Protocol) => {
            let mut engine = ProtocolEngine::with_config(config, cli.verbose);
            engine.run().context("protocol I/O failed")?;
        }
        Some(Commands::Eval { board }) => {
            let args: Vec<&str> = board.iter().map(String::as_str).collect();
            let board = parse_board(&args).map_err(anyhow::Error::msg)?;
            analyse(&board, config)?;
        }
        Some(Commands::Demo { seed, endgame }) => run_demo(seed, endgame, config)?,
        None => run_demo(1, 8, config)?,
    }
    Ok(())
}

fn analyse(board: &Board, config: SearchConfig) -> Result<()> {
    println!("{board}");
    let Some(player) = board.turn else {
        bail!("game is over, nothing to evaluate");
    };

    let mut evaluator = Evaluator::with_config(player, config);
    let table = evaluator
        .move_table(board)
        .with_context(|| format!("evaluating moves for player {player}"))?;
    eprintln!("Evaluated {} nodes", evaluator.nodes());
    dump_move_table(&table);

    match select_move(&table) {
        Some(pit) => println!("Best move: {pit}"),
        None => println!("Best move: none"),
    }
    Ok(())
}

fn run_demo(seed: u64, endgame: u32, config: SearchConfig) -> Result<()> {
    println!("Kalah-Rust: exhaustive Kalah move evaluator\n");

    let mut rng = fastrand::Rng::with_seed(seed);
    println!("Playing random moves until {endgame} seeds remain (seed {seed})...");
    let (board, played) = random_playout(&mut rng, &Board::new(), endgame, config.capture)
        .context("random playout failed")?;
    println!("{played} moves played\n");

    if board.is_game_over() {
        println!("{board}");
        println!("Game finished during random play");
        return Ok(());
    }
    analyse(&board, config)
}
