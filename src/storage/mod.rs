use crate::model::{
    HoleScore, LeagueState, Match, MatchUpdate, NewMatch, NewPlayer, Player, PlayerUpdate,
};
use async_trait::async_trait;
use std::error::Error;
use std::fmt;

pub mod sqlite;

pub use sqlite::SqliteStorage;

#[derive(Debug, Clone)]
pub struct StorageError {
    message: String,
}

impl StorageError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for StorageError {}

impl From<String> for StorageError {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for StorageError {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::new(value.to_string())
    }
}

/// What the scoring side needs from a data store: snapshot reads and
/// record updates. No locking or conflict handling is promised.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_players(&self) -> Result<Vec<Player>, StorageError>;
    async fn get_player(&self, id: i64) -> Result<Option<Player>, StorageError>;
    async fn create_player(&self, player: &NewPlayer) -> Result<Player, StorageError>;
    async fn update_player(&self, id: i64, update: &PlayerUpdate) -> Result<Player, StorageError>;
    /// Matches that seated this player keep their record with the seat emptied.
    async fn delete_player(&self, id: i64) -> Result<(), StorageError>;

    /// Newest first.
    async fn get_matches(&self) -> Result<Vec<Match>, StorageError>;
    async fn get_match(&self, id: i64) -> Result<Option<Match>, StorageError>;
    async fn create_match(&self, new_match: &NewMatch) -> Result<Match, StorageError>;
    async fn update_match(&self, id: i64, update: &MatchUpdate) -> Result<Match, StorageError>;

    /// Ordered by hole.
    async fn get_scores(&self, match_id: i64) -> Result<Vec<HoleScore>, StorageError>;
    /// Insert or replace the record for `(match_id, hole)`.
    async fn upsert_score(&self, score: &HoleScore) -> Result<HoleScore, StorageError>;

    async fn get_league_state(&self) -> Result<Option<LeagueState>, StorageError>;
    async fn update_league_state(&self, state: &LeagueState) -> Result<LeagueState, StorageError>;
}
