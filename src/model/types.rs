use crate::error::InvalidInput;
use crate::model::HalfPoints;
use crate::model::course::HOLES;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Home,
    Away,
}

impl Team {
    #[must_use]
    pub fn opponent(self) -> Self {
        match self {
            Team::Home => Team::Away,
            Team::Away => Team::Home,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Team::Home => "home",
            Team::Away => "away",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Team {
    type Err = InvalidInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(Team::Home),
            "away" => Ok(Team::Away),
            other => Err(InvalidInput::UnknownTeam(other.to_string())),
        }
    }
}

/// Display names of the two teams.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TeamNames {
    pub home: String,
    pub away: String,
}

impl Default for TeamNames {
    fn default() -> Self {
        Self {
            home: "Prince".to_string(),
            away: "Bowman".to_string(),
        }
    }
}

impl TeamNames {
    #[must_use]
    pub fn name(&self, team: Team) -> &str {
        match team {
            Team::Home => &self.home,
            Team::Away => &self.away,
        }
    }

    /// Accepts `home`/`away` or either display name, ignoring case.
    ///
    /// # Errors
    /// Returns `InvalidInput::UnknownTeam` for anything else.
    pub fn parse(&self, s: &str) -> Result<Team, InvalidInput> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("home") || s.eq_ignore_ascii_case(&self.home) {
            Ok(Team::Home)
        } else if s.eq_ignore_ascii_case("away") || s.eq_ignore_ascii_case(&self.away) {
            Ok(Team::Away)
        } else {
            Err(InvalidInput::UnknownTeam(s.to_string()))
        }
    }
}

/// A seat in a match. Seats are not teams; the team comes from whoever sits there.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    A,
    B,
}

impl Side {
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "i64", into = "i64")]
pub struct Handicap(u32);

impl Handicap {
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for Handicap {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl TryFrom<i64> for Handicap {
    type Error = InvalidInput;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .map(Self)
            .map_err(|_| InvalidInput::NegativeHandicap(value))
    }
}

impl From<Handicap> for i64 {
    fn from(value: Handicap) -> Self {
        i64::from(value.0)
    }
}

impl fmt::Display for Handicap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "i64", into = "i64")]
pub struct HoleNumber(u8);

impl HoleNumber {
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based position, for indexing per-hole arrays.
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0) - 1
    }

    /// Holes 1 through 18 in playing order.
    pub fn all() -> impl Iterator<Item = HoleNumber> {
        (1..=18u8).map(HoleNumber)
    }
}

impl TryFrom<i64> for HoleNumber {
    type Error = InvalidInput;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .filter(|h| (1..=18).contains(h))
            .map(Self)
            .ok_or(InvalidInput::HoleOutOfRange(value))
    }
}

impl From<HoleNumber> for i64 {
    fn from(value: HoleNumber) -> Self {
        i64::from(value.0)
    }
}

impl fmt::Display for HoleNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validate an entered gross score. Zero and negatives are rejected, never
/// read as "not played".
///
/// # Errors
/// Returns `InvalidInput::GrossScore` when the value is below 1.
pub fn validate_gross(value: i64) -> Result<u32, InvalidInput> {
    u32::try_from(value)
        .ok()
        .filter(|g| *g >= 1)
        .ok_or(InvalidInput::GrossScore(value))
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub team: Team,
    pub handicap: Handicap,
    pub created_at: NaiveDateTime,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NewPlayer {
    pub name: String,
    pub team: Team,
    pub handicap: Handicap,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerUpdate {
    pub name: Option<String>,
    pub team: Option<Team>,
    pub handicap: Option<Handicap>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Match {
    pub id: i64,
    pub player_a_id: Option<i64>,
    pub player_b_id: Option<i64>,
    pub counts: bool,
    pub tee_time: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Match {
    #[must_use]
    pub fn seat(&self, side: Side) -> Option<i64> {
        match side {
            Side::A => self.player_a_id,
            Side::B => self.player_b_id,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NewMatch {
    pub player_a_id: Option<i64>,
    pub player_b_id: Option<i64>,
    pub counts: bool,
    pub tee_time: Option<String>,
    pub notes: Option<String>,
}

/// Partial match edit. For seats, `None` keeps the current player and
/// `Some(None)` empties the seat.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_a_id: Option<Option<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_b_id: Option<Option<i64>>,
    pub counts: Option<bool>,
    pub tee_time: Option<String>,
    pub notes: Option<String>,
}

impl MatchUpdate {
    /// Seats `(a, b)` once this update is applied to `current`.
    #[must_use]
    pub fn seats_after(&self, current: &Match) -> (Option<i64>, Option<i64>) {
        (
            self.player_a_id.unwrap_or(current.player_a_id),
            self.player_b_id.unwrap_or(current.player_b_id),
        )
    }
}

/// Gross strokes for one hole of one match. `None` means not entered yet.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HoleScore {
    pub match_id: i64,
    pub hole: HoleNumber,
    pub gross_a: Option<u32>,
    pub gross_b: Option<u32>,
}

impl HoleScore {
    /// # Errors
    /// Returns an error if the hole is outside 1..=18 or a gross score is below 1.
    pub fn new(
        match_id: i64,
        hole: i64,
        gross_a: Option<i64>,
        gross_b: Option<i64>,
    ) -> Result<Self, InvalidInput> {
        Ok(Self {
            match_id,
            hole: HoleNumber::try_from(hole)?,
            gross_a: gross_a.map(validate_gross).transpose()?,
            gross_b: gross_b.map(validate_gross).transpose()?,
        })
    }

    #[must_use]
    pub fn gross(&self, side: Side) -> Option<u32> {
        match side {
            Side::A => self.gross_a,
            Side::B => self.gross_b,
        }
    }
}

/// Index recorded scores by hole, keeping the last record seen for a hole.
#[must_use]
pub fn scores_by_hole(scores: &[HoleScore]) -> [Option<&HoleScore>; HOLES] {
    let mut by_hole = [None; HOLES];
    for s in scores {
        by_hole[s.hole.index()] = Some(s);
    }
    by_hole
}

/// Singleton league record: points each team starts with before matches.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LeagueState {
    pub home_base_points: HalfPoints,
    pub away_base_points: HalfPoints,
    pub updated_at: Option<NaiveDateTime>,
}

impl Default for LeagueState {
    fn default() -> Self {
        Self {
            home_base_points: HalfPoints::from_whole(2),
            away_base_points: HalfPoints::ZERO,
            updated_at: None,
        }
    }
}

impl LeagueState {
    #[must_use]
    pub fn base_points(&self, team: Team) -> HalfPoints {
        match team {
            Team::Home => self.home_base_points,
            Team::Away => self.away_base_points,
        }
    }
}
