//! michi-go-engine: a Go board-state engine.
//!
//! ## Usage
//!
//! - `michi-go-engine` / `michi-go-engine demo` - run a short demo playout
//! - `michi-go-engine gtp` - start the GTP shell for GUI integration

use clap::{Parser, Subcommand};

use michi_go_engine::board::Board;
use michi_go_engine::constants::PASS_MOVE;
use michi_go_engine::gtp::GtpEngine;
use michi_go_engine::stone::Color;

/// michi-go-engine: a Go board-state engine
#[derive(Parser)]
#[command(name = "michi-go-engine")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Board side length for the demo subcommand.
    #[arg(long, default_value_t = 9)]
    size: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the GTP (Go Text Protocol) shell for use with GUI applications.
    Gtp,
    /// Run a short random playout and print the resulting board and score.
    Demo,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Gtp) => {
            let mut engine = GtpEngine::with_size(cli.size);
            engine.run()?;
        }
        Some(Commands::Demo) | None => run_demo(cli.size),
    }
    Ok(())
}

fn run_demo(size: usize) {
    println!("michi-go-engine demo: random playout on a {size}x{size} board\n");

    let mut board = Board::new(size, 7.5);
    let mut rng = fastrand::Rng::new();
    let mut color = Color::Black;
    let mut passes_in_a_row = 0;
    let mut moves = 0;

    while passes_in_a_row < 2 && moves < size * size * 3 {
        let pt = board.play_random(color, &mut rng);
        if pt == PASS_MOVE {
            passes_in_a_row += 1;
            log::debug!("{color} passes");
        } else {
            passes_in_a_row = 0;
            log::debug!("{color} plays {}", board.str_coord(pt));
        }
        color = color.opponent();
        moves += 1;
    }

    println!("{board}");
    println!("fast_score:     {:+.1}", board.fast_score());
    println!("official_score: {:+.1}", board.official_score());
}
