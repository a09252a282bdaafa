use crate::model::{Team, TeamNames, format_time_ago};
use crate::score::Leaderboard;
use chrono::NaiveDateTime;
use std::fmt::Write;

/// Plain-text leaderboard: headline score, per-team breakdown, match counts
/// and when the base points were last touched.
#[must_use]
pub fn render_leaderboard(board: &Leaderboard, names: &TeamNames, now: NaiveDateTime) -> String {
    let totals = &board.totals;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} {} - {} {}",
        names.name(Team::Home),
        totals.home.total,
        totals.away.total,
        names.name(Team::Away)
    );
    let headline = match totals.leader() {
        Some(team) => format!("{} leads", names.name(team)),
        None => "All square".to_string(),
    };
    let _ = writeln!(out, "{headline}");
    out.push('\n');

    let width = names.home.len().max(names.away.len()).max(4);
    let _ = writeln!(out, "{:<width$}  {:>6}  {:>7}  {:>6}", "Team", "Base", "Matches", "Total");
    for team in [Team::Home, Team::Away] {
        let tally = totals.tally(team);
        let _ = writeln!(
            out,
            "{:<width$}  {:>6}  {:>7}  {:>6}",
            names.name(team),
            tally.base_points.to_string(),
            tally.match_points.to_string(),
            tally.total.to_string()
        );
    }
    out.push('\n');

    let _ = writeln!(
        out,
        "Counting matches: {}  With results: {}  Complete: {}",
        totals.counting_matches, totals.scored_matches, totals.completed_matches
    );
    if !board.excluded_matches.is_empty() {
        let ids: Vec<String> = board
            .excluded_matches
            .iter()
            .map(|id| format!("#{id}"))
            .collect();
        let _ = writeln!(out, "Waiting on players: {}", ids.join(", "));
    }
    if !board.teammate_matches.is_empty() {
        let ids: Vec<String> = board
            .teammate_matches
            .iter()
            .map(|id| format!("#{id}"))
            .collect();
        let _ = writeln!(out, "Teammates paired, not counted: {}", ids.join(", "));
    }
    if let Some(updated) = board.league.updated_at {
        let _ = writeln!(
            out,
            "Base points updated {}",
            format_time_ago(now.signed_duration_since(updated))
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HalfPoints, LeagueState};
    use crate::score::{LeagueTotals, TeamTally};

    fn board(home: u32, away: u32) -> Leaderboard {
        let tally = |team, base: u32, matches: u32| TeamTally {
            team,
            base_points: HalfPoints::from_halves(base),
            match_points: HalfPoints::from_halves(matches),
            total: HalfPoints::from_halves(base + matches),
        };
        Leaderboard {
            totals: LeagueTotals {
                home: tally(Team::Home, 4, home),
                away: tally(Team::Away, 0, away),
                counting_matches: 3,
                scored_matches: 2,
                completed_matches: 1,
            },
            league: LeagueState::default(),
            excluded_matches: vec![7],
            teammate_matches: Vec::new(),
        }
    }

    #[test]
    fn headline_and_leader() {
        let now = NaiveDateTime::default();
        let text = render_leaderboard(&board(1, 3), &TeamNames::default(), now);
        assert!(text.starts_with("Prince 2.5 - 1.5 Bowman\nPrince leads\n"));
        assert!(text.contains("Counting matches: 3  With results: 2  Complete: 1"));
        assert!(text.contains("Waiting on players: #7"));
        assert!(!text.contains("updated"));
    }

    #[test]
    fn level_totals_read_all_square() {
        let now = NaiveDateTime::default();
        let text = render_leaderboard(&board(0, 4), &TeamNames::default(), now);
        assert!(text.contains("\nAll square\n"));
    }

    #[test]
    fn lists_teammate_pairings() {
        let mut b = board(1, 3);
        b.teammate_matches = vec![4, 9];
        let text = render_leaderboard(&b, &TeamNames::default(), NaiveDateTime::default());
        assert!(text.contains("Teammates paired, not counted: #4, #9"));
    }
}
