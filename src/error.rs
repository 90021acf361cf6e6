use thiserror::Error;

use crate::coordinate::Coordinate;

/// Rejected board mutations. None of these leave the grid modified.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("coordinate {coordinate} lies outside the grid")]
    OutOfBounds { coordinate: Coordinate },
    #[error("node at {coordinate} is a start or goal node")]
    SpecialNode { coordinate: Coordinate },
    #[error("node at {coordinate} is not a goal")]
    NotAGoal { coordinate: Coordinate },
    #[error("board text is ragged or has an unknown cell at row {row}")]
    Malformed { row: usize },
}
