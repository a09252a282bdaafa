#![allow(dead_code)]

use rusty_matchplay::model::{Handicap, NewPlayer, Player, Team};
use rusty_matchplay::storage::{SqliteStorage, Storage, StorageError};

pub async fn setup_storage() -> Result<SqliteStorage, StorageError> {
    let storage = SqliteStorage::open_in_memory()?;
    storage.reset().await?;
    Ok(storage)
}

pub async fn add_player(
    storage: &SqliteStorage,
    name: &str,
    team: Team,
    handicap: u32,
) -> Result<Player, StorageError> {
    storage
        .create_player(&NewPlayer {
            name: name.to_string(),
            team,
            handicap: Handicap::from(handicap),
        })
        .await
}
