//! Board-level error taxonomy.
//!
//! A small hand-rolled closed enum, rather than a macro-generated error
//! type: the surface is four variants and does not need `thiserror`.

use std::error::Error;
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlayError {
    /// The target point is already occupied.
    Occupied,
    /// The target point is off the playable grid.
    OffBoard,
    /// The target point is the recorded ko point for this color.
    Ko,
    /// The move would remove the player's own group with no compensating
    /// capture, and suicide is prohibited on this board.
    Suicide,
}

impl fmt::Display for PlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayError::Occupied => write!(f, "point is already occupied"),
            PlayError::OffBoard => write!(f, "point is off the board"),
            PlayError::Ko => write!(f, "illegal ko recapture"),
            PlayError::Suicide => write!(f, "suicide is prohibited on this board"),
        }
    }
}

impl Error for PlayError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_are_distinct() {
        let variants = [
            PlayError::Occupied,
            PlayError::OffBoard,
            PlayError::Ko,
            PlayError::Suicide,
        ];
        let messages: Vec<String> = variants.iter().map(|e| e.to_string()).collect();
        for i in 0..messages.len() {
            for j in (i + 1)..messages.len() {
                assert_ne!(messages[i], messages[j]);
            }
        }
    }
}
