//! A Go board-state engine: stone placement, capture, ko, eye shapes, area
//! scoring, and a uniformly random legal-move generator fast enough to drive
//! Monte Carlo playouts.
//!
//! This crate owns the board representation and rules, and nothing else. A
//! GTP shell (`gtp`) drives it from stdin/stdout for interactive use;
//! decision engines (random play, MCTS, pattern-guided search, ...) are
//! callers of this core, not part of it.
//!
//! ## Modules
//!
//! - [`stone`]: absolute four-state stone/color model
//! - [`group`]: group id registry and pseudo-liberty bookkeeping
//! - [`census`]: packed per-point neighbor-color counters
//! - [`constants`]: board geometry constants (pass sentinel, column labels)
//! - [`error`]: the `play` legality error taxonomy
//! - [`board`]: the board facade: `play`, `play_random`, eyes, scoring
//! - [`gtp`]: a minimal GTP (Go Text Protocol) shell over [`board::Board`]
//!
//! ## Example
//!
//! ```
//! use michi_go_engine::board::Board;
//! use michi_go_engine::stone::Color;
//!
//! let mut board = Board::new(9, 7.5);
//! board.play(Color::Black, board.parse_coord("D4")).unwrap();
//! board.play(Color::White, board.parse_coord("F6")).unwrap();
//! println!("{board}");
//! ```

pub mod board;
pub mod census;
pub mod constants;
pub mod error;
pub mod group;
pub mod gtp;
pub mod stone;
