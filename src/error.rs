use std::io;

use thiserror::Error;

/// Which way the tape pointer was moving when it ran off the tape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Left => f.write_str("left"),
            Direction::Right => f.write_str("right"),
        }
    }
}

/// Every way a run can fail. All of them are fatal to the run.
///
/// Offsets are absolute byte positions in the top-level script, even when
/// the failure happens inside a nested loop body.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Unmatched '[' in code at byte {offset}.")]
    UnmatchedOpen { offset: usize },

    #[error("Unmatched ']' in code at byte {offset}.")]
    UnmatchedClose { offset: usize },

    #[error("Illegal character: '{}' (int: '{byte}') at byte {offset}.", char::from(*byte).escape_default())]
    IllegalCharacter { byte: u8, offset: usize },

    #[error("Tape pointer moved {direction} off the tape from cell {pointer}.")]
    PointerOutOfRange { pointer: usize, direction: Direction },

    #[error("I/O hook failed: {0}")]
    Io(#[from] io::Error),
}

impl EngineError {
    /// The small non-zero status reported to the caller for this kind of failure.
    pub fn status(&self) -> i32 {
        match self {
            EngineError::UnmatchedOpen { .. } => -2,
            EngineError::UnmatchedClose { .. } => -3,
            EngineError::IllegalCharacter { .. } => -4,
            EngineError::PointerOutOfRange { .. } => -5,
            EngineError::Io(_) => -6,
        }
    }
}
