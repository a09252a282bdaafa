use crate::error::{CoreError, InvalidInput};
use crate::model::{
    HalfPoints, Handicap, HoleScore, LeagueState, NewMatch, NewPlayer, Player, TeamNames,
};
use crate::storage::Storage;
use ahash::RandomState;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Deserialize, Debug)]
struct PrefillFile {
    league: Option<PrefillLeague>,
    #[serde(default)]
    players: Vec<PrefillPlayer>,
    #[serde(default)]
    matches: Vec<PrefillMatch>,
}

#[derive(Deserialize, Debug)]
struct PrefillLeague {
    home_base_points: HalfPoints,
    away_base_points: HalfPoints,
}

#[derive(Deserialize, Debug)]
struct PrefillPlayer {
    name: String,
    team: String,
    handicap: i64,
}

#[derive(Deserialize, Debug)]
struct PrefillMatch {
    player_a: Option<String>,
    player_b: Option<String>,
    #[serde(default = "counts_by_default")]
    counts: bool,
    tee_time: Option<String>,
    notes: Option<String>,
    #[serde(default)]
    scores: Vec<PrefillScore>,
}

#[derive(Deserialize, Debug)]
struct PrefillScore {
    hole: i64,
    a: Option<i64>,
    b: Option<i64>,
}

fn counts_by_default() -> bool {
    true
}

#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PrefillSummary {
    pub players: usize,
    pub matches: usize,
    pub scores: usize,
    pub league_state: bool,
}

/// format we have is this:
/// { "league": {"home_base_points": 2, "away_base_points": 0},
///   "players": [{"name": "Alex", "team": "Prince", "handicap": 5}, ...],
///   "matches": [{"player_a": "Alex", "player_b": "Liam", "counts": true,
///                "tee_time": "08:10", "notes": null,
///                "scores": [{"hole": 1, "a": 4, "b": 5}, ...]}, ...] }
///
/// Teams may be given as `home`/`away` or by display name. Match seats refer to
/// players by name, either from this file or already stored. The whole file is
/// validated before anything is written.
///
/// # Errors
/// `Parse` for malformed JSON, duplicate names or a bad pairing, `InvalidInput` for bad
/// values or unknown player names, or a storage error.
pub async fn db_prefill(
    json: &Value,
    storage: &dyn Storage,
    names: &TeamNames,
) -> Result<PrefillSummary, CoreError> {
    let file: PrefillFile = serde_json::from_value(json.clone())?;

    let mut new_players = Vec::with_capacity(file.players.len());
    for p in &file.players {
        new_players.push(NewPlayer {
            name: p.name.trim().to_string(),
            team: names.parse(&p.team)?,
            handicap: Handicap::try_from(p.handicap)?,
        });
    }

    let mut by_name: HashMap<String, Player, RandomState> = storage
        .get_players()
        .await?
        .into_iter()
        .map(|p| (p.name.clone(), p))
        .collect();
    let mut seen: HashMap<&str, (), RandomState> = HashMap::default();
    for p in &new_players {
        if seen.insert(p.name.as_str(), ()).is_some() || by_name.contains_key(&p.name) {
            return Err(CoreError::Parse(format!(
                "player {} already exists or is listed twice",
                p.name
            )));
        }
    }

    let team_of = |name: &str| {
        new_players
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.team)
            .or_else(|| by_name.get(name).map(|p| p.team))
            .ok_or_else(|| InvalidInput::UnknownPlayer(name.to_string()))
    };
    for (i, m) in file.matches.iter().enumerate() {
        let a = m.player_a.as_deref().map(str::trim);
        let b = m.player_b.as_deref().map(str::trim);
        let team_a = a.map(team_of).transpose()?;
        let team_b = b.map(team_of).transpose()?;
        if a.is_some() && a == b {
            return Err(CoreError::Parse(format!(
                "match {} seats {} twice",
                i + 1,
                a.unwrap_or_default()
            )));
        }
        if m.counts && team_a.is_some() && team_a == team_b {
            return Err(CoreError::Parse(format!(
                "match {} is counting but pairs two players from one team",
                i + 1
            )));
        }
        for s in &m.scores {
            HoleScore::new(0, s.hole, s.a, s.b)?;
        }
    }

    let mut summary = PrefillSummary::default();
    for p in &new_players {
        let created = storage.create_player(p).await?;
        by_name.insert(created.name.clone(), created);
        summary.players += 1;
    }

    let seat_id = |name: &Option<String>| {
        name.as_ref()
            .and_then(|n| by_name.get(n.trim()))
            .map(|p| p.id)
    };
    for m in &file.matches {
        let created = storage
            .create_match(&NewMatch {
                player_a_id: seat_id(&m.player_a),
                player_b_id: seat_id(&m.player_b),
                counts: m.counts,
                tee_time: m.tee_time.clone(),
                notes: m.notes.clone(),
            })
            .await?;
        summary.matches += 1;
        for s in &m.scores {
            storage
                .upsert_score(&HoleScore::new(created.id, s.hole, s.a, s.b)?)
                .await?;
            summary.scores += 1;
        }
    }

    if let Some(league) = file.league {
        storage
            .update_league_state(&LeagueState {
                home_base_points: league.home_base_points,
                away_base_points: league.away_base_points,
                updated_at: None,
            })
            .await?;
        summary.league_state = true;
    }

    tracing::info!(
        players = summary.players,
        matches = summary.matches,
        scores = summary.scores,
        "prefill loaded"
    );
    Ok(summary)
}
