//! A minimal Go Text Protocol (GTP) shell over [`crate::board::Board`].
//!
//! GTP is a text-based protocol for driving a Go program from stdin/stdout,
//! used by GUIs such as Sabaki or GoGui. This module implements only the
//! subset that drives the board engine directly: `boardsize`, `clear_board`,
//! `komi`, `play`, and scoring/showboard queries. `genmove` is a stand-in
//! that calls [`Board::play_random`]; picking a real move is a decision
//! engine's job, not this shell's.
//!
//! The stdin command loop, numeric command-id parsing, and
//! board-print-to-stderr style follow a classic GTP reference shell; no
//! tree-search-backed `genmove` or owner-map display is implemented here.

use std::io::{self, BufRead, Write};

use anyhow::Context;

use crate::board::Board;
use crate::stone::Color;

const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "cputime",
    "final_score",
    "genmove",
    "help",
    "known_command",
    "komi",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "version",
];

/// GTP engine state: a board plus whatever the protocol needs that the
/// board itself has no business tracking (start time for `cputime`).
pub struct GtpEngine {
    board: Board,
    rng: fastrand::Rng,
    start_time: std::time::Instant,
}

impl Default for GtpEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GtpEngine {
    pub fn new() -> Self {
        Self::with_size(9)
    }

    pub fn with_size(size: usize) -> Self {
        log::debug!("starting GTP engine on a {size}x{size} board");
        Self {
            board: Board::new(size, 7.5),
            rng: fastrand::Rng::new(),
            start_time: std::time::Instant::now(),
        }
    }

    fn print_board(&self) {
        eprint!("{}", self.board);
    }

    /// Run the GTP command loop, reading from stdin and writing to stdout.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut stderr = io::stderr();

        for line in stdin.lock().lines() {
            let line = match line {
                Ok(l) => l,
                Err(_) => break,
            };

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

            let response = self.execute(&command, args);
            self.print_board();
            stderr.flush().context("failed to flush GTP board output to stderr")?;

            let (success, message) = response;
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            writeln!(stdout, "{prefix}{id_str} {message}\n")
                .context("failed to write GTP response to stdout")?;
            stdout
                .flush()
                .context("failed to flush GTP response to stdout")?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let mut chars = trimmed.char_indices();
        if let Some((_, c)) = chars.next() {
            if c.is_ascii_digit() {
                let end = chars
                    .find(|(_, c)| !c.is_ascii_digit())
                    .map(|(i, _)| i)
                    .unwrap_or(trimmed.len());
                if let Ok(id) = trimmed[..end].parse::<u32>() {
                    return (Some(id), trimmed[end..].trim());
                }
            }
        }
        (None, trimmed)
    }

    fn parse_color(s: &str) -> Option<Color> {
        match s.to_lowercase().as_str() {
            "b" | "black" => Some(Color::Black),
            "w" | "white" => Some(Color::White),
            _ => None,
        }
    }

    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, "michi-go-engine".to_string()),

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

            "boardsize" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                match args[0].parse::<usize>() {
                    Ok(size) if size >= 2 => {
                        let komi = self.board.komi;
                        let prohibit = self.board.prohibit_suicide;
                        self.board = Board::new(size, komi);
                        self.board.prohibit_suicide = prohibit;
                        (true, String::new())
                    }
                    Ok(size) => (false, format!("unacceptable size: {size}")),
                    Err(_) => (false, "invalid size".to_string()),
                }
            }

            "clear_board" => {
                self.board.clear();
                (true, String::new())
            }

            "komi" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                match args[0].parse::<f32>() {
                    Ok(komi) => {
                        self.board.komi = komi;
                        (true, String::new())
                    }
                    Err(_) => (false, "invalid komi".to_string()),
                }
            }

            "play" => {
                if args.len() < 2 {
                    return (false, "missing arguments".to_string());
                }
                let Some(color) = Self::parse_color(args[0]) else {
                    return (false, "invalid color".to_string());
                };
                let pt = self.board.parse_coord(args[1]);
                match self.board.play(color, pt) {
                    Ok(_) => (true, String::new()),
                    Err(e) => {
                        log::warn!("illegal move {} {}: {e}", args[0], args[1]);
                        (false, e.to_string())
                    }
                }
            }

            "genmove" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                let Some(color) = Self::parse_color(args[0]) else {
                    return (false, "invalid color".to_string());
                };
                let pt = self.board.play_random(color, &mut self.rng);
                (true, self.board.str_coord(pt))
            }

            "final_score" => {
                let score = self.board.official_score();
                (true, Self::format_score(score))
            }

            "showboard" => {
                let rendering = self.board.to_string();
                (true, format!("\n{}", rendering.trim_end()))
            }

            "cputime" => {
                let elapsed = self.start_time.elapsed().as_secs_f64();
                (true, format!("{:.3}", elapsed))
            }

            "help" => (true, KNOWN_COMMANDS.join("\n")),

            _ => (false, format!("unknown command: {command}")),
        }
    }

    fn format_score(score: f32) -> String {
        if score > 0.0 {
            format!("W+{:.1}", score)
        } else if score < 0.0 {
            format!("B+{:.1}", -score)
        } else {
            "0".to_string()
        }
    }
}
