use crate::error::{CoreError, InvalidInput};
use crate::model::{
    HOLES, HalfPoints, HoleScore, LeagueState, Match, Player, Side, StrokeIndexTable, Team,
};
use crate::score::match_result::{MatchCard, build_match_card};
use ahash::RandomState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A match as the league sees it: the record, whoever sits in each seat, and
/// the scores entered so far.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MatchSnapshot {
    pub record: Match,
    pub player_a: Option<Player>,
    pub player_b: Option<Player>,
    pub scores: Vec<HoleScore>,
}

impl MatchSnapshot {
    #[must_use]
    pub fn player(&self, side: Side) -> Option<&Player> {
        match side {
            Side::A => self.player_a.as_ref(),
            Side::B => self.player_b.as_ref(),
        }
    }

    #[must_use]
    pub fn seats_assigned(&self) -> bool {
        self.player_a.is_some() && self.player_b.is_some()
    }

    /// At least one hole has a gross for either player.
    #[must_use]
    pub fn has_recorded_score(&self) -> bool {
        self.scores
            .iter()
            .any(|s| s.gross_a.is_some() || s.gross_b.is_some())
    }
}

/// Team owning each seat of one match.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeatTeams {
    pub a: Team,
    pub b: Team,
}

impl SeatTeams {
    /// The only place a seat is turned into a team.
    ///
    /// # Errors
    /// `IncompleteMatch` if a seat is empty, `InvalidInput::SameTeam` if both
    /// players are on one team.
    pub fn resolve(snapshot: &MatchSnapshot) -> Result<Self, CoreError> {
        let match_id = snapshot.record.id;
        let (Some(a), Some(b)) = (&snapshot.player_a, &snapshot.player_b) else {
            return Err(CoreError::IncompleteMatch { match_id });
        };
        if a.team == b.team {
            return Err(InvalidInput::SameTeam { match_id }.into());
        }
        Ok(Self {
            a: a.team,
            b: b.team,
        })
    }

    #[must_use]
    pub fn team(&self, side: Side) -> Team {
        match side {
            Side::A => self.a,
            Side::B => self.b,
        }
    }
}

/// Build the card for a match with both seats filled.
///
/// # Errors
/// Same as [`SeatTeams::resolve`].
pub fn score_match(
    snapshot: &MatchSnapshot,
    table: &StrokeIndexTable,
) -> Result<(SeatTeams, MatchCard), CoreError> {
    let seats = SeatTeams::resolve(snapshot)?;
    let (Some(a), Some(b)) = (&snapshot.player_a, &snapshot.player_b) else {
        return Err(CoreError::IncompleteMatch {
            match_id: snapshot.record.id,
        });
    };
    let card = build_match_card(a.handicap, b.handicap, table, &snapshot.scores);
    Ok((seats, card))
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TeamTally {
    pub team: Team,
    pub base_points: HalfPoints,
    pub match_points: HalfPoints,
    pub total: HalfPoints,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct LeagueTotals {
    pub home: TeamTally,
    pub away: TeamTally,
    /// Matches flagged as counting, scored or not.
    pub counting_matches: usize,
    /// Counting matches with at least one recorded gross score.
    pub scored_matches: usize,
    /// Counting matches with all 18 holes decided.
    pub completed_matches: usize,
}

impl LeagueTotals {
    #[must_use]
    pub fn tally(&self, team: Team) -> &TeamTally {
        match team {
            Team::Home => &self.home,
            Team::Away => &self.away,
        }
    }

    /// `None` when level.
    #[must_use]
    pub fn leader(&self) -> Option<Team> {
        match self.home.total.cmp(&self.away.total) {
            std::cmp::Ordering::Greater => Some(Team::Home),
            std::cmp::Ordering::Less => Some(Team::Away),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Sum match points per team over counting matches that have at least one
/// recorded gross score, then add each team's base points.
///
/// A match whose only entries are half-filled holes still qualifies and
/// splits its point, since no hole has been decided yet.
///
/// Every counting match must have both seats filled: an empty seat is
/// rejected with `IncompleteMatch` rather than scored as a forfeit, so
/// callers drop unassigned matches before calling this. Friendly matches
/// (`counts == false`) are ignored whatever their state.
///
/// # Errors
/// `IncompleteMatch` or `InvalidInput::SameTeam` for a bad counting match.
pub fn league_totals(
    matches: &[MatchSnapshot],
    table: &StrokeIndexTable,
    league: &LeagueState,
) -> Result<LeagueTotals, CoreError> {
    let mut match_points: HashMap<Team, HalfPoints, RandomState> = HashMap::default();
    let mut counting_matches = 0;
    let mut scored_matches = 0;
    let mut completed_matches = 0;

    for snapshot in matches.iter().filter(|m| m.record.counts) {
        counting_matches += 1;
        let (seats, card) = score_match(snapshot, table)?;
        if !snapshot.has_recorded_score() {
            continue;
        }
        scored_matches += 1;
        if card.result.holes_decided() as usize == HOLES {
            completed_matches += 1;
        }
        for side in [Side::A, Side::B] {
            *match_points.entry(seats.team(side)).or_default() += card.result.points(side);
        }
    }

    let tally = |team: Team| {
        let base_points = league.base_points(team);
        let from_matches = match_points.get(&team).copied().unwrap_or_default();
        TeamTally {
            team,
            base_points,
            match_points: from_matches,
            total: base_points + from_matches,
        }
    };

    Ok(LeagueTotals {
        home: tally(Team::Home),
        away: tally(Team::Away),
        counting_matches,
        scored_matches,
        completed_matches,
    })
}
