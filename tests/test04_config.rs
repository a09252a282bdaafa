use clap::Parser;
use rusty_matchplay::args::{Cli, load_config};
use rusty_matchplay::model::{HoleNumber, StrokeIndexTable};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn config_file(contents: &str) -> Result<NamedTempFile, std::io::Error> {
    let mut file = NamedTempFile::new()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}

#[test]
fn test_file_values_apply() -> Result<(), Box<dyn std::error::Error>> {
    let file = config_file(
        r#"
db = "league.db"
home_team_name = "Eagles"
away_team_name = "Hawks"
stroke_index = [7, 3, 15, 1, 11, 13, 5, 17, 9, 8, 4, 16, 2, 12, 14, 6, 18, 10]
"#,
    )?;
    let path = file.path().to_string_lossy().to_string();
    let cli = Cli::try_parse_from(["matchplay", "leaderboard", "--config-toml", path.as_str()])?;
    let config = load_config(&cli)?;

    assert_eq!(config.db_path, PathBuf::from("league.db"));
    assert_eq!(config.team_names.home, "Eagles");
    assert_eq!(config.team_names.away, "Hawks");
    assert_eq!(config.stroke_index.stroke_index(HoleNumber::try_from(4_i64)?), 1);
    assert_ne!(config.stroke_index, StrokeIndexTable::default());
    Ok(())
}

#[test]
fn test_cli_overrides_file() -> Result<(), Box<dyn std::error::Error>> {
    let file = config_file("db = \"league.db\"\naway_team_name = \"Hawks\"\n")?;
    let path = file.path().to_string_lossy().to_string();
    let cli = Cli::try_parse_from([
        "matchplay",
        "players",
        "--config-toml",
        path.as_str(),
        "--db",
        "other.db",
    ])?;
    let config = load_config(&cli)?;

    assert_eq!(config.db_path, PathBuf::from("other.db"));
    assert_eq!(config.team_names.home, "Prince");
    assert_eq!(config.team_names.away, "Hawks");
    Ok(())
}

#[test]
fn test_invalid_files_are_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let short_table = config_file("stroke_index = [1, 2, 3]\n")?;
    let repeated = config_file(
        "stroke_index = [1, 1, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18]\n",
    )?;
    let unknown_key = config_file("colour = \"green\"\n")?;

    for file in [&short_table, &repeated, &unknown_key] {
        let path = file.path().to_string_lossy().to_string();
        let cli = Cli::try_parse_from(["matchplay", "matches", "--config-toml", path.as_str()])?;
        assert!(load_config(&cli).is_err());
    }

    let cli = Cli::try_parse_from(["matchplay", "matches", "--config-toml", "/nonexistent/x.toml"])?;
    assert!(load_config(&cli).is_err());
    Ok(())
}
