use crate::model::{Player, Team, TeamNames};
use std::fmt::Write;

/// Roster grouped by team, home first.
#[must_use]
pub fn render_players(players: &[Player], names: &TeamNames) -> String {
    let mut out = String::new();
    for team in [Team::Home, Team::Away] {
        let _ = writeln!(out, "{}", names.name(team));
        let mut roster: Vec<&Player> = players.iter().filter(|p| p.team == team).collect();
        roster.sort_by(|a, b| a.name.cmp(&b.name));
        if roster.is_empty() {
            out.push_str("  (no players)\n");
        }
        for p in roster {
            let _ = writeln!(out, "  #{:<4} {:<24} hcp {}", p.id, p.name, p.handicap);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Handicap;
    use chrono::NaiveDateTime;

    #[test]
    fn groups_by_team() {
        let p = |id, name: &str, team| Player {
            id,
            name: name.to_string(),
            team,
            handicap: Handicap::from(7_u32),
            created_at: NaiveDateTime::default(),
        };
        let text = render_players(
            &[p(2, "Zed", Team::Home), p(1, "Amy", Team::Home)],
            &TeamNames::default(),
        );
        let amy = text.find("Amy").unwrap();
        let zed = text.find("Zed").unwrap();
        assert!(amy < zed);
        assert!(text.ends_with("Bowman\n  (no players)\n"));
    }
}
