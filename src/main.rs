use anyhow::{Context, Result};
use clap::Parser;
use rusty_matchplay::args::{Cli, Command, Config, load_config, seat_change};
use rusty_matchplay::controller::db_prefill::db_prefill;
use rusty_matchplay::model::{Handicap, MatchUpdate, NewMatch, NewPlayer, PlayerUpdate, Side};
use rusty_matchplay::score::{
    add_match, edit_match, edit_player, load_leaderboard, load_match_view, load_match_views,
    record_gross, set_base_points, toggle_counts,
};
use rusty_matchplay::storage::{SqliteStorage, Storage};
use rusty_matchplay::view::leaderboard::render_leaderboard;
use rusty_matchplay::view::match_card::{render_match_card, render_match_list};
use rusty_matchplay::view::players::render_players;
use serde::Serialize;
use std::fs;
use tracing_subscriber::EnvFilter;

fn emit<T: Serialize>(config: &Config, value: &T, text: impl FnOnce(&T) -> String) -> Result<()> {
    if config.json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text(value));
    }
    Ok(())
}

async fn run(command: Command, config: &Config, storage: &SqliteStorage) -> Result<()> {
    let names = &config.team_names;
    let table = &config.stroke_index;
    match command {
        Command::Leaderboard => {
            let board = load_leaderboard(storage, table).await?;
            let now = chrono::Utc::now().naive_utc();
            emit(config, &board, |b| render_leaderboard(b, names, now))
        }
        Command::Matches => {
            let views = load_match_views(storage, table).await?;
            emit(config, &views, |v| render_match_list(v, names))
        }
        Command::Match { id } => {
            let view = load_match_view(storage, id, table).await?;
            emit(config, &view, |v| render_match_card(v, names))
        }
        Command::Players => {
            let players = storage.get_players().await?;
            emit(config, &players, |p| render_players(p, names))
        }
        Command::AddPlayer {
            name,
            team,
            handicap,
        } => {
            let new_player = NewPlayer {
                name,
                team: names.parse(&team)?,
                handicap: Handicap::try_from(handicap)?,
            };
            let player = storage.create_player(&new_player).await?;
            tracing::info!(player_id = player.id, "player added");
            emit(config, &player, |p| {
                format!("Added player #{} {} ({})\n", p.id, p.name, names.name(p.team))
            })
        }
        Command::UpdatePlayer {
            id,
            name,
            team,
            handicap,
        } => {
            let update = PlayerUpdate {
                name,
                team: team.map(|t| names.parse(&t)).transpose()?,
                handicap: handicap.map(Handicap::try_from).transpose()?,
            };
            let player = edit_player(storage, id, &update).await?;
            emit(config, &player, |p| {
                format!(
                    "Player #{} is now {} ({}, hcp {})\n",
                    p.id,
                    p.name,
                    names.name(p.team),
                    p.handicap
                )
            })
        }
        Command::DeletePlayer { id } => {
            storage.delete_player(id).await?;
            tracing::info!(player_id = id, "player deleted");
            emit(config, &id, |id| format!("Deleted player #{id}\n"))
        }
        Command::AddMatch {
            player_a,
            player_b,
            for_sport,
            tee_time,
            notes,
        } => {
            let new_match = NewMatch {
                player_a_id: player_a,
                player_b_id: player_b,
                counts: !for_sport,
                tee_time,
                notes,
            };
            let created = add_match(storage, &new_match).await?;
            emit(config, &created, |m| format!("Added match #{}\n", m.id))
        }
        Command::UpdateMatch {
            id,
            player_a,
            player_b,
            clear_a,
            clear_b,
            tee_time,
            notes,
        } => {
            let update = MatchUpdate {
                player_a_id: seat_change(player_a, clear_a),
                player_b_id: seat_change(player_b, clear_b),
                counts: None,
                tee_time,
                notes,
            };
            let updated = edit_match(storage, id, &update).await?;
            emit(config, &updated, |m| format!("Updated match #{}\n", m.id))
        }
        Command::ToggleCounts { id } => {
            let updated = toggle_counts(storage, id).await?;
            emit(config, &updated, |m| {
                let state = if m.counts {
                    "counts for points"
                } else {
                    "is for sport only"
                };
                format!("Match #{} {state}\n", m.id)
            })
        }
        Command::Score {
            match_id,
            hole,
            side,
            gross,
        } => {
            let side = Side::from(side);
            let score = record_gross(storage, match_id, hole, side, gross).await?;
            emit(config, &score, |s| match s.gross(side) {
                Some(g) => format!("Match #{} hole {}: side {side} {g}\n", s.match_id, s.hole),
                None => format!("Match #{} hole {}: side {side} cleared\n", s.match_id, s.hole),
            })
        }
        Command::BasePoints { home, away } => {
            let state = set_base_points(storage, home, away).await?;
            emit(config, &state, |s| {
                format!(
                    "Base points: {} {}, {} {}\n",
                    names.home, s.home_base_points, names.away, s.away_base_points
                )
            })
        }
        Command::Prefill { json, reset } => {
            let contents = fs::read_to_string(&json)
                .with_context(|| format!("read prefill json {}", json.display()))?;
            let value: serde_json::Value = serde_json::from_str(&contents)
                .with_context(|| format!("parse prefill json {}", json.display()))?;
            if reset {
                storage.reset().await?;
            }
            let summary = db_prefill(&value, storage, names).await?;
            emit(config, &summary, |summary| {
                format!(
                    "Loaded {} players, {} matches, {} scores{}\n",
                    summary.players,
                    summary.matches,
                    summary.scores,
                    if summary.league_state {
                        " and base points"
                    } else {
                        ""
                    }
                )
            })
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let storage = SqliteStorage::open(&config.db_path)
        .with_context(|| format!("open database {}", config.db_path.display()))?;
    tracing::debug!(db = %config.db_path.display(), "database ready");

    run(cli.command, &config, &storage).await
}
