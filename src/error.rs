use crate::storage::StorageError;
use thiserror::Error;

/// Which input invariant was violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("handicap must be non-negative, got {0}")]
    NegativeHandicap(i64),
    #[error("hole number must be within 1..=18, got {0}")]
    HoleOutOfRange(i64),
    #[error("stroke index table invalid: {0}")]
    StrokeIndexTable(String),
    #[error("gross score must be at least 1, got {0}")]
    GrossScore(i64),
    #[error("points must be a non-negative multiple of 0.5, got {0}")]
    Points(String),
    #[error("match {match_id} pairs two players from the same team")]
    SameTeam { match_id: i64 },
    #[error("players {a} and {b} are on the same team; a counting match needs one from each")]
    Teammates { a: i64, b: i64 },
    #[error("player {0} cannot take both seats")]
    SameSeat(i64),
    #[error("unknown team: {0}")]
    UnknownTeam(String),
    #[error("unknown player: {0}")]
    UnknownPlayer(String),
}

#[derive(Error, Debug, Clone)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
    #[error("match {match_id} has an unassigned side")]
    IncompleteMatch { match_id: i64 },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(err.to_string())
    }
}
