use crate::args::Cli;
use crate::model::{StrokeIndexTable, TeamNames};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

const DEFAULT_DB: &str = "matchplay.db";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    db: Option<PathBuf>,
    home_team_name: Option<String>,
    away_team_name: Option<String>,
    stroke_index: Option<Vec<i64>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub team_names: TeamNames,
    pub stroke_index: StrokeIndexTable,
    pub json: bool,
}

/// Merge CLI flags over the optional TOML file over defaults.
///
/// # Errors
/// Returns an error if the config file is unreadable or invalid, the stroke
/// index table is not a permutation of 1..=18, or the team names are empty or
/// identical.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let file_config = match cli.config_toml.as_ref() {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("read config toml {}", path.display()))?;
            toml::from_str::<FileConfig>(&contents)
                .with_context(|| format!("parse config toml {}", path.display()))?
        }
        None => FileConfig::default(),
    };

    let db_path = cli
        .db
        .clone()
        .or(file_config.db)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB));

    let defaults = TeamNames::default();
    let team_names = TeamNames {
        home: cli
            .home_team_name
            .clone()
            .or(file_config.home_team_name)
            .unwrap_or(defaults.home),
        away: cli
            .away_team_name
            .clone()
            .or(file_config.away_team_name)
            .unwrap_or(defaults.away),
    };
    if team_names.home.trim().is_empty() || team_names.away.trim().is_empty() {
        bail!("team names must not be empty");
    }
    if team_names.home.eq_ignore_ascii_case(&team_names.away) {
        bail!("home and away team names must differ");
    }

    let stroke_index = match file_config.stroke_index {
        Some(indices) => StrokeIndexTable::new(&indices).context("stroke_index in config toml")?,
        None => StrokeIndexTable::default(),
    };

    Ok(Config {
        db_path,
        team_names,
        stroke_index,
        json: cli.json,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn defaults_without_file() {
        let cli = Cli::try_parse_from(["matchplay", "players"]).unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.db_path, PathBuf::from("matchplay.db"));
        assert_eq!(config.team_names, TeamNames::default());
        assert_eq!(config.stroke_index, StrokeIndexTable::default());
        assert!(!config.json);
    }

    #[test]
    fn rejects_identical_team_names() {
        let cli = Cli::try_parse_from([
            "matchplay",
            "players",
            "--home-team-name",
            "Eagles",
            "--away-team-name",
            "eagles",
        ])
        .unwrap();
        assert!(load_config(&cli).is_err());
    }
}
