use crate::model::Side;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod config;

pub use config::{Config, load_config};

#[derive(Parser, Debug)]
#[command(author, version, about = "Two-team match-play scoring", long_about = None)]
pub struct Cli {
    /// Optional TOML file with `db`, team names and `stroke_index`
    #[arg(long, global = true)]
    pub config_toml: Option<PathBuf>,
    /// SQLite database file
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
    #[arg(long, global = true)]
    pub home_team_name: Option<String>,
    #[arg(long, global = true)]
    pub away_team_name: Option<String>,
    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Team totals: base points plus counting match points
    Leaderboard,
    /// Every match with its status and standing
    Matches,
    /// Hole-by-hole card for one match
    Match { id: i64 },
    Players,
    AddPlayer {
        #[arg(long)]
        name: String,
        /// `home`, `away`, or a team display name
        #[arg(long)]
        team: String,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        handicap: i64,
    },
    UpdatePlayer {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        team: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        handicap: Option<i64>,
    },
    /// Remove a player; their matches keep the record with the seat emptied
    DeletePlayer { id: i64 },
    AddMatch {
        #[arg(long)]
        player_a: Option<i64>,
        #[arg(long)]
        player_b: Option<i64>,
        /// Played for sport only, not for league points
        #[arg(long)]
        for_sport: bool,
        #[arg(long)]
        tee_time: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Change seats, tee time or notes of a match
    UpdateMatch {
        id: i64,
        #[arg(long, conflicts_with = "clear_a")]
        player_a: Option<i64>,
        #[arg(long, conflicts_with = "clear_b")]
        player_b: Option<i64>,
        /// Empty seat A
        #[arg(long)]
        clear_a: bool,
        /// Empty seat B
        #[arg(long)]
        clear_b: bool,
        #[arg(long)]
        tee_time: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    ToggleCounts { id: i64 },
    /// Enter one side's gross on a hole; leave out GROSS to clear it
    Score {
        match_id: i64,
        #[arg(allow_negative_numbers = true)]
        hole: i64,
        #[arg(value_enum)]
        side: SeatArg,
        #[arg(allow_negative_numbers = true)]
        gross: Option<i64>,
    },
    BasePoints {
        #[arg(allow_negative_numbers = true)]
        home: f64,
        #[arg(allow_negative_numbers = true)]
        away: f64,
    },
    /// Load players, matches and scores from a JSON file
    Prefill {
        json: PathBuf,
        /// Drop all existing data first
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeatArg {
    A,
    B,
}

impl From<SeatArg> for Side {
    fn from(value: SeatArg) -> Self {
        match value {
            SeatArg::A => Side::A,
            SeatArg::B => Side::B,
        }
    }
}

/// Turn `--player-x` / `--clear-x` into a seat edit: `None` keeps the seat.
#[must_use]
pub fn seat_change(player: Option<i64>, clear: bool) -> Option<Option<i64>> {
    if clear { Some(None) } else { player.map(Some) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_score_with_clear() {
        let cli = Cli::try_parse_from(["matchplay", "score", "3", "7", "b"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Score {
                match_id: 3,
                hole: 7,
                side: SeatArg::B,
                gross: None
            }
        );
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["matchplay", "leaderboard", "--json", "--db", "x.db"])
            .unwrap();
        assert!(cli.json);
        assert_eq!(cli.db, Some(PathBuf::from("x.db")));
    }

    #[test]
    fn add_match_defaults_to_counting() {
        let cli = Cli::try_parse_from(["matchplay", "add-match", "--player-a", "1"]).unwrap();
        match cli.command {
            Command::AddMatch {
                player_a,
                player_b,
                for_sport,
                ..
            } => {
                assert_eq!(player_a, Some(1));
                assert_eq!(player_b, None);
                assert!(!for_sport);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn update_match_can_clear_a_seat() {
        let cli = Cli::try_parse_from(["matchplay", "update-match", "4", "--clear-b", "--player-a", "2"])
            .unwrap();
        match cli.command {
            Command::UpdateMatch {
                player_a,
                player_b,
                clear_a,
                clear_b,
                ..
            } => {
                assert_eq!(seat_change(player_a, clear_a), Some(Some(2)));
                assert_eq!(seat_change(player_b, clear_b), Some(None));
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(seat_change(None, false), None);
        assert!(
            Cli::try_parse_from(["matchplay", "update-match", "4", "--clear-a", "--player-a", "2"])
                .is_err()
        );
    }
}
