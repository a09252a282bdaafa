use super::{Storage, StorageError};
use crate::model::{
    HalfPoints, Handicap, HoleScore, LeagueState, Match, MatchUpdate, NewMatch, NewPlayer, Player,
    PlayerUpdate, Team,
};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use std::sync::{Arc, Mutex};

const TABLE_DROP: &str = include_str!("../sql/schema/sqlite/00_table_drop.sql");
const SCHEMA: [&str; 4] = [
    include_str!("../sql/schema/sqlite/01_player.sql"),
    include_str!("../sql/schema/sqlite/02_match.sql"),
    include_str!("../sql/schema/sqlite/03_score.sql"),
    include_str!("../sql/schema/sqlite/04_league_state.sql"),
];

const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const PLAYER_COLUMNS: &str = "id, name, team, handicap, created_at";
const MATCH_COLUMNS: &str = "id, player_a_id, player_b_id, counts, tee_time, notes, created_at";

/// One SQLite connection shared behind a mutex; every call runs on the
/// blocking pool.
#[derive(Clone)]
pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    /// Open (or create) a database file and make sure the schema exists.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or the schema fails to apply.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// # Errors
    /// Returns an error if the schema fails to apply.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(&SCHEMA.join("\n"))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Drop every table and recreate the empty schema.
    ///
    /// # Errors
    /// Returns an error if the statements fail.
    pub async fn reset(&self) -> Result<(), StorageError> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            tx.execute_batch(TABLE_DROP)?;
            tx.execute_batch(&SCHEMA.join("\n"))?;
            tx.commit()?;
            Ok(())
        })
        .await?;
        tracing::info!("sqlite schema reset");
        Ok(())
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StorageError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| StorageError::new("sqlite connection mutex poisoned"))?;
            f(&mut *guard)
        })
        .await
        .map_err(|e| StorageError::new(format!("sqlite task failed: {e}")))?
    }
}

fn conversion_err<E>(idx: usize, ty: Type, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, ty, Box::new(err))
}

fn timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let raw: String = row.get(idx)?;
    NaiveDateTime::parse_from_str(&raw, TS_FORMAT).map_err(|e| conversion_err(idx, Type::Text, e))
}

fn player_from_row(row: &Row<'_>) -> rusqlite::Result<Player> {
    let team: String = row.get(2)?;
    let handicap: i64 = row.get(3)?;
    Ok(Player {
        id: row.get(0)?,
        name: row.get(1)?,
        team: team
            .parse::<Team>()
            .map_err(|e| conversion_err(2, Type::Text, e))?,
        handicap: Handicap::try_from(handicap).map_err(|e| conversion_err(3, Type::Integer, e))?,
        created_at: timestamp(row, 4)?,
    })
}

fn match_from_row(row: &Row<'_>) -> rusqlite::Result<Match> {
    Ok(Match {
        id: row.get(0)?,
        player_a_id: row.get(1)?,
        player_b_id: row.get(2)?,
        counts: row.get(3)?,
        tee_time: row.get(4)?,
        notes: row.get(5)?,
        created_at: timestamp(row, 6)?,
    })
}

fn score_from_row(row: &Row<'_>) -> rusqlite::Result<HoleScore> {
    HoleScore::new(row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)
        .map_err(|e| conversion_err(1, Type::Integer, e))
}

fn half_points(row: &Row<'_>, idx: usize) -> rusqlite::Result<HalfPoints> {
    let raw: i64 = row.get(idx)?;
    u32::try_from(raw)
        .map(HalfPoints::from_halves)
        .map_err(|e| conversion_err(idx, Type::Integer, e))
}

fn select_player(conn: &Connection, id: i64) -> Result<Option<Player>, StorageError> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?1");
    Ok(conn.query_row(&sql, params![id], player_from_row).optional()?)
}

fn select_match(conn: &Connection, id: i64) -> Result<Option<Match>, StorageError> {
    let sql = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = ?1");
    Ok(conn.query_row(&sql, params![id], match_from_row).optional()?)
}

fn select_league_state(conn: &Connection) -> Result<Option<LeagueState>, StorageError> {
    let state = conn
        .query_row(
            "SELECT home_base_half_points, away_base_half_points, updated_at
             FROM league_state WHERE id = 1",
            [],
            |row| {
                Ok(LeagueState {
                    home_base_points: half_points(row, 0)?,
                    away_base_points: half_points(row, 1)?,
                    updated_at: Some(timestamp(row, 2)?),
                })
            },
        )
        .optional()?;
    Ok(state)
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn get_players(&self) -> Result<Vec<Player>, StorageError> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {PLAYER_COLUMNS} FROM players ORDER BY name, id");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], player_from_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
        .await
    }

    async fn get_player(&self, id: i64) -> Result<Option<Player>, StorageError> {
        self.with_conn(move |conn| select_player(conn, id)).await
    }

    async fn create_player(&self, player: &NewPlayer) -> Result<Player, StorageError> {
        let player = player.clone();
        let created = self
            .with_conn(move |conn| {
                let tx = conn.transaction()?;
                tx.execute(
                    "INSERT INTO players (name, team, handicap) VALUES (?1, ?2, ?3)",
                    params![player.name, player.team.as_str(), i64::from(player.handicap)],
                )?;
                let id = tx.last_insert_rowid();
                let created = select_player(&tx, id)?
                    .ok_or_else(|| StorageError::new(format!("player {id} vanished after insert")))?;
                tx.commit()?;
                Ok(created)
            })
            .await?;
        tracing::debug!(player_id = created.id, name = %created.name, "player created");
        Ok(created)
    }

    async fn update_player(&self, id: i64, update: &PlayerUpdate) -> Result<Player, StorageError> {
        let update = update.clone();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            let current = select_player(&tx, id)?
                .ok_or_else(|| StorageError::new(format!("player {id} not found")))?;
            let name = update.name.unwrap_or(current.name);
            let team = update.team.unwrap_or(current.team);
            let handicap = update.handicap.unwrap_or(current.handicap);
            tx.execute(
                "UPDATE players SET name = ?1, team = ?2, handicap = ?3,
                 updated_at = CURRENT_TIMESTAMP WHERE id = ?4",
                params![name, team.as_str(), i64::from(handicap), id],
            )?;
            let updated = select_player(&tx, id)?
                .ok_or_else(|| StorageError::new(format!("player {id} not found")))?;
            tx.commit()?;
            Ok(updated)
        })
        .await
    }

    async fn delete_player(&self, id: i64) -> Result<(), StorageError> {
        let removed = self
            .with_conn(move |conn| Ok(conn.execute("DELETE FROM players WHERE id = ?1", params![id])?))
            .await?;
        if removed == 0 {
            return Err(StorageError::new(format!("player {id} not found")));
        }
        tracing::debug!(player_id = id, "player deleted");
        Ok(())
    }

    async fn get_matches(&self) -> Result<Vec<Match>, StorageError> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {MATCH_COLUMNS} FROM matches ORDER BY created_at DESC, id DESC");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], match_from_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
        .await
    }

    async fn get_match(&self, id: i64) -> Result<Option<Match>, StorageError> {
        self.with_conn(move |conn| select_match(conn, id)).await
    }

    async fn create_match(&self, new_match: &NewMatch) -> Result<Match, StorageError> {
        let m = new_match.clone();
        let created = self
            .with_conn(move |conn| {
                let tx = conn.transaction()?;
                tx.execute(
                    "INSERT INTO matches (player_a_id, player_b_id, counts, tee_time, notes)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![m.player_a_id, m.player_b_id, m.counts, m.tee_time, m.notes],
                )?;
                let id = tx.last_insert_rowid();
                let created = select_match(&tx, id)?
                    .ok_or_else(|| StorageError::new(format!("match {id} vanished after insert")))?;
                tx.commit()?;
                Ok(created)
            })
            .await?;
        tracing::debug!(match_id = created.id, counts = created.counts, "match created");
        Ok(created)
    }

    async fn update_match(&self, id: i64, update: &MatchUpdate) -> Result<Match, StorageError> {
        let update = update.clone();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            let current = select_match(&tx, id)?
                .ok_or_else(|| StorageError::new(format!("match {id} not found")))?;
            let (player_a_id, player_b_id) = update.seats_after(&current);
            tx.execute(
                "UPDATE matches SET player_a_id = ?1, player_b_id = ?2, counts = ?3,
                 tee_time = ?4, notes = ?5, updated_at = CURRENT_TIMESTAMP WHERE id = ?6",
                params![
                    player_a_id,
                    player_b_id,
                    update.counts.unwrap_or(current.counts),
                    update.tee_time.or(current.tee_time),
                    update.notes.or(current.notes),
                    id
                ],
            )?;
            let updated = select_match(&tx, id)?
                .ok_or_else(|| StorageError::new(format!("match {id} not found")))?;
            tx.commit()?;
            Ok(updated)
        })
        .await
    }

    async fn get_scores(&self, match_id: i64) -> Result<Vec<HoleScore>, StorageError> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT match_id, hole, player_a_score, player_b_score
                 FROM scores WHERE match_id = ?1 ORDER BY hole",
            )?;
            let rows = stmt.query_map(params![match_id], score_from_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
        .await
    }

    async fn upsert_score(&self, score: &HoleScore) -> Result<HoleScore, StorageError> {
        let score = score.clone();
        let stored = score.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO scores (match_id, hole, player_a_score, player_b_score)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (match_id, hole) DO UPDATE SET
                    player_a_score = excluded.player_a_score,
                    player_b_score = excluded.player_b_score,
                    updated_at = CURRENT_TIMESTAMP",
                params![
                    score.match_id,
                    i64::from(score.hole),
                    score.gross_a.map(i64::from),
                    score.gross_b.map(i64::from)
                ],
            )?;
            Ok(())
        })
        .await?;
        tracing::debug!(match_id = stored.match_id, hole = %stored.hole, "score stored");
        Ok(stored)
    }

    async fn get_league_state(&self) -> Result<Option<LeagueState>, StorageError> {
        self.with_conn(|conn| select_league_state(conn)).await
    }

    async fn update_league_state(&self, state: &LeagueState) -> Result<LeagueState, StorageError> {
        let home = i64::from(state.home_base_points.halves());
        let away = i64::from(state.away_base_points.halves());
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO league_state (id, home_base_half_points, away_base_half_points)
                 VALUES (1, ?1, ?2)
                 ON CONFLICT (id) DO UPDATE SET
                    home_base_half_points = excluded.home_base_half_points,
                    away_base_half_points = excluded.away_base_half_points,
                    updated_at = CURRENT_TIMESTAMP",
                params![home, away],
            )?;
            select_league_state(conn)?
                .ok_or_else(|| StorageError::new("league state missing after update"))
        })
        .await
    }
}
