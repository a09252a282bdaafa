use crate::error::{CoreError, InvalidInput};
use crate::model::{
    HalfPoints, HoleNumber, HoleScore, LeagueState, Match, MatchUpdate, NewMatch, Player,
    PlayerUpdate, Side, StrokeIndexTable, scores_by_hole, validate_gross,
};
use crate::score::league::{LeagueTotals, MatchSnapshot, SeatTeams, league_totals};
use crate::score::match_result::{MatchCard, MatchStatus, build_match_card};
use crate::storage::Storage;
use ahash::RandomState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Leaderboard {
    pub totals: LeagueTotals,
    pub league: LeagueState,
    /// Counting matches left out because a seat is empty.
    pub excluded_matches: Vec<i64>,
    /// Counting matches left out because both players share a team.
    #[serde(default)]
    pub teammate_matches: Vec<i64>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MatchView {
    pub snapshot: MatchSnapshot,
    pub status: MatchStatus,
    /// `None` while a seat is empty or both players share a team.
    pub seats: Option<SeatTeams>,
    /// `None` while a seat is empty.
    pub card: Option<MatchCard>,
}

/// League state, falling back to the default base points when none is stored.
///
/// # Errors
/// Returns an error if storage fails.
pub async fn load_league_state(storage: &dyn Storage) -> Result<LeagueState, CoreError> {
    Ok(storage.get_league_state().await?.unwrap_or_default())
}

fn snapshot_for(
    record: Match,
    players: &HashMap<i64, Player, RandomState>,
    scores: Vec<HoleScore>,
) -> MatchSnapshot {
    let seat = |side: Side| record.seat(side).and_then(|id| players.get(&id)).cloned();
    let player_a = seat(Side::A);
    let player_b = seat(Side::B);
    MatchSnapshot {
        record,
        player_a,
        player_b,
        scores,
    }
}

async fn players_by_id(
    storage: &dyn Storage,
) -> Result<HashMap<i64, Player, RandomState>, CoreError> {
    Ok(storage
        .get_players()
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect())
}

/// Every match with its seated players and scores, newest first.
///
/// # Errors
/// Returns an error if storage fails.
pub async fn load_snapshots(storage: &dyn Storage) -> Result<Vec<MatchSnapshot>, CoreError> {
    let players = players_by_id(storage).await?;
    let mut snapshots = Vec::new();
    for record in storage.get_matches().await? {
        let scores = storage.get_scores(record.id).await?;
        snapshots.push(snapshot_for(record, &players, scores));
    }
    Ok(snapshots)
}

/// Load everything and compute team totals.
///
/// Counting matches that cannot be attributed to two opposing teams are
/// dropped here before the totals are computed: an empty seat is reported in
/// `excluded_matches`, a pair of teammates (left behind by a roster edit made
/// straight through storage) in `teammate_matches`.
///
/// # Errors
/// Returns an error if storage fails.
pub async fn load_leaderboard(
    storage: &dyn Storage,
    table: &StrokeIndexTable,
) -> Result<Leaderboard, CoreError> {
    let league = load_league_state(storage).await?;
    let mut ready = Vec::new();
    let mut excluded_matches = Vec::new();
    let mut teammate_matches = Vec::new();
    for snapshot in load_snapshots(storage).await? {
        if !snapshot.record.counts {
            ready.push(snapshot);
            continue;
        }
        match (&snapshot.player_a, &snapshot.player_b) {
            (Some(a), Some(b)) if a.team == b.team => teammate_matches.push(snapshot.record.id),
            (Some(_), Some(_)) => ready.push(snapshot),
            _ => excluded_matches.push(snapshot.record.id),
        }
    }

    if !excluded_matches.is_empty() {
        tracing::warn!(
            matches = ?excluded_matches,
            "counting matches with an empty seat left out of the leaderboard"
        );
    }
    if !teammate_matches.is_empty() {
        tracing::warn!(
            matches = ?teammate_matches,
            "counting matches between teammates left out of the leaderboard"
        );
    }

    let totals = league_totals(&ready, table, &league)?;
    tracing::debug!(
        home = %totals.home.total,
        away = %totals.away.total,
        scored = totals.scored_matches,
        "leaderboard computed"
    );
    Ok(Leaderboard {
        totals,
        league,
        excluded_matches,
        teammate_matches,
    })
}

fn view_for(snapshot: MatchSnapshot, table: &StrokeIndexTable) -> MatchView {
    let seats = SeatTeams::resolve(&snapshot).ok();
    let card = match (&snapshot.player_a, &snapshot.player_b) {
        (Some(a), Some(b)) => Some(build_match_card(
            a.handicap,
            b.handicap,
            table,
            &snapshot.scores,
        )),
        _ => None,
    };
    let decided = card.as_ref().map_or(0, |c| c.result.holes_decided());
    MatchView {
        status: MatchStatus::from_progress(snapshot.seats_assigned(), decided),
        seats,
        card,
        snapshot,
    }
}

/// # Errors
/// `NotFound` if the match does not exist, or a storage error.
pub async fn load_match_view(
    storage: &dyn Storage,
    match_id: i64,
    table: &StrokeIndexTable,
) -> Result<MatchView, CoreError> {
    let record = storage
        .get_match(match_id)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("match {match_id}")))?;
    let players = players_by_id(storage).await?;
    let scores = storage.get_scores(match_id).await?;
    Ok(view_for(snapshot_for(record, &players, scores), table))
}

/// # Errors
/// Returns an error if storage fails.
pub async fn load_match_views(
    storage: &dyn Storage,
    table: &StrokeIndexTable,
) -> Result<Vec<MatchView>, CoreError> {
    Ok(load_snapshots(storage)
        .await?
        .into_iter()
        .map(|s| view_for(s, table))
        .collect())
}

/// Enter (or clear, with `None`) one side's gross score on a hole, keeping
/// whatever the other side already has.
///
/// # Errors
/// `InvalidInput` for a bad hole or gross value, `NotFound` for an unknown
/// match, or a storage error.
pub async fn record_gross(
    storage: &dyn Storage,
    match_id: i64,
    hole: i64,
    side: Side,
    gross: Option<i64>,
) -> Result<HoleScore, CoreError> {
    let hole = HoleNumber::try_from(hole)?;
    let gross = gross.map(validate_gross).transpose()?;
    if storage.get_match(match_id).await?.is_none() {
        return Err(CoreError::NotFound(format!("match {match_id}")));
    }

    let existing = storage.get_scores(match_id).await?;
    let mut score = scores_by_hole(&existing)[hole.index()]
        .cloned()
        .unwrap_or(HoleScore {
            match_id,
            hole,
            gross_a: None,
            gross_b: None,
        });
    match side {
        Side::A => score.gross_a = gross,
        Side::B => score.gross_b = gross,
    }
    tracing::info!(match_id, hole = %hole, side = %side, gross = ?gross, "recording gross score");
    Ok(storage.upsert_score(&score).await?)
}

async fn check_seats(
    storage: &dyn Storage,
    player_a_id: Option<i64>,
    player_b_id: Option<i64>,
    counts: bool,
) -> Result<(), CoreError> {
    let mut seated = Vec::with_capacity(2);
    for id in [player_a_id, player_b_id].into_iter().flatten() {
        let player = storage
            .get_player(id)
            .await?
            .ok_or_else(|| InvalidInput::UnknownPlayer(format!("#{id}")))?;
        seated.push(player);
    }
    if let [a, b] = seated.as_slice() {
        if a.id == b.id {
            return Err(InvalidInput::SameSeat(a.id).into());
        }
        if counts && a.team == b.team {
            return Err(InvalidInput::Teammates { a: a.id, b: b.id }.into());
        }
    }
    Ok(())
}

/// Create a match after checking that seated players exist, differ, and (for
/// a counting match) come from opposite teams. Seats may be left empty.
///
/// # Errors
/// `InvalidInput` for a bad pairing, or a storage error.
pub async fn add_match(storage: &dyn Storage, new_match: &NewMatch) -> Result<Match, CoreError> {
    check_seats(
        storage,
        new_match.player_a_id,
        new_match.player_b_id,
        new_match.counts,
    )
    .await?;
    let created = storage.create_match(new_match).await?;
    tracing::info!(match_id = created.id, counts = created.counts, "match created");
    Ok(created)
}

/// Apply an update, validating the seats as they will be afterwards.
///
/// # Errors
/// `NotFound` for an unknown match, `InvalidInput` for a bad pairing, or a
/// storage error.
pub async fn edit_match(
    storage: &dyn Storage,
    match_id: i64,
    update: &MatchUpdate,
) -> Result<Match, CoreError> {
    let current = storage
        .get_match(match_id)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("match {match_id}")))?;
    let (player_a_id, player_b_id) = update.seats_after(&current);
    check_seats(
        storage,
        player_a_id,
        player_b_id,
        update.counts.unwrap_or(current.counts),
    )
    .await?;
    Ok(storage.update_match(match_id, update).await?)
}

/// Apply a roster edit. A team change is refused while the player sits
/// opposite a member of the new team in a counting match.
///
/// # Errors
/// `NotFound` for an unknown player, `InvalidInput::Teammates` for a team
/// change that would pair teammates, or a storage error.
pub async fn edit_player(
    storage: &dyn Storage,
    player_id: i64,
    update: &PlayerUpdate,
) -> Result<Player, CoreError> {
    let current = storage
        .get_player(player_id)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("player {player_id}")))?;
    if let Some(team) = update.team.filter(|t| *t != current.team) {
        for record in storage.get_matches().await?.into_iter().filter(|m| m.counts) {
            let opponent = match (record.player_a_id, record.player_b_id) {
                (Some(a), b) if a == player_id => b,
                (a, Some(b)) if b == player_id => a,
                _ => continue,
            };
            let Some(opponent) = opponent else { continue };
            let teammate = storage
                .get_player(opponent)
                .await?
                .filter(|other| other.team == team);
            if let Some(other) = teammate {
                return Err(InvalidInput::Teammates {
                    a: player_id,
                    b: other.id,
                }
                .into());
            }
        }
    }
    let updated = storage.update_player(player_id, update).await?;
    tracing::info!(player_id, team = ?updated.team, "player updated");
    Ok(updated)
}

/// Flip a match between counting for points and "for sport only".
///
/// # Errors
/// `NotFound` for an unknown match, `InvalidInput::Teammates` when turning on
/// counting for two teammates, or a storage error.
pub async fn toggle_counts(storage: &dyn Storage, match_id: i64) -> Result<Match, CoreError> {
    let current = storage
        .get_match(match_id)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("match {match_id}")))?;
    let update = MatchUpdate {
        counts: Some(!current.counts),
        ..MatchUpdate::default()
    };
    let updated = edit_match(storage, match_id, &update).await?;
    tracing::info!(match_id, counts = updated.counts, "match counts toggled");
    Ok(updated)
}

/// # Errors
/// `InvalidInput::Points` unless both values are non-negative multiples of
/// 0.5, or a storage error.
pub async fn set_base_points(
    storage: &dyn Storage,
    home: f64,
    away: f64,
) -> Result<LeagueState, CoreError> {
    let state = LeagueState {
        home_base_points: HalfPoints::try_from(home)?,
        away_base_points: HalfPoints::try_from(away)?,
        updated_at: None,
    };
    Ok(storage.update_league_state(&state).await?)
}
