use crate::model::{Side, TeamNames};
use crate::score::{HoleResult, MatchOutcome, MatchStatus, MatchView};
use std::fmt::Write;

fn seat_label(view: &MatchView, side: Side, names: &TeamNames) -> String {
    match view.snapshot.player(side) {
        Some(p) => format!("{} ({}, hcp {})", p.name, names.name(p.team), p.handicap),
        None => "(unassigned)".to_string(),
    }
}

fn seat_name(view: &MatchView, side: Side) -> String {
    view.snapshot
        .player(side)
        .map_or_else(|| format!("Side {side}"), |p| p.name.clone())
}

fn gross_cell(gross: Option<u32>, stroke: bool) -> String {
    let mark = if stroke { "*" } else { "" };
    gross.map_or_else(|| "-".to_string(), |g| format!("{g}{mark}"))
}

fn result_cell(result: HoleResult) -> &'static str {
    match result {
        HoleResult::A => "A",
        HoleResult::B => "B",
        HoleResult::AllSquare => "AS",
        HoleResult::Pending => "-",
    }
}

fn margin_cell(margin: i32) -> String {
    match margin {
        0 => "AS".to_string(),
        m if m > 0 => format!("A {m} UP"),
        m => format!("B {} UP", m.unsigned_abs()),
    }
}

/// One line per match for the match list.
#[must_use]
pub fn render_match_list(views: &[MatchView], names: &TeamNames) -> String {
    let mut out = String::new();
    if views.is_empty() {
        out.push_str("No matches yet\n");
        return out;
    }
    for view in views {
        let record = &view.snapshot.record;
        let standing = view
            .card
            .as_ref()
            .map_or_else(String::new, |c| format!("  {}", c.standing));
        let counts = if record.counts { "" } else { "  [for sport]" };
        let tee = record
            .tee_time
            .as_ref()
            .map_or_else(String::new, |t| format!("  tee {t}"));
        let _ = writeln!(
            out,
            "#{:<4} {} vs {}  {}{standing}{counts}{tee}",
            record.id,
            seat_label(view, Side::A, names),
            seat_label(view, Side::B, names),
            view.status
        );
    }
    out
}

/// Hole-by-hole card. A `*` marks the gross of the side receiving a stroke.
#[must_use]
pub fn render_match_card(view: &MatchView, names: &TeamNames) -> String {
    let record = &view.snapshot.record;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Match #{}: {} vs {}",
        record.id,
        seat_label(view, Side::A, names),
        seat_label(view, Side::B, names)
    );
    let counts = if record.counts {
        "counts for points"
    } else {
        "for sport only"
    };
    let _ = writeln!(out, "Status: {} ({counts})", view.status);
    if let Some(tee) = &record.tee_time {
        let _ = writeln!(out, "Tee time: {tee}");
    }
    if let Some(notes) = &record.notes {
        let _ = writeln!(out, "Notes: {notes}");
    }

    let Some(card) = &view.card else {
        out.push_str("Both seats must be filled before the match can be scored\n");
        return out;
    };
    if let Some(receiver) = card.allocation.receiver() {
        let _ = writeln!(
            out,
            "{} receives {} stroke(s)",
            seat_name(view, receiver),
            card.allocation.strokes_given()
        );
    }
    out.push('\n');

    let _ = writeln!(
        out,
        "{:>4}  {:>3}  {:>5}  {:>5}  {:>6}  {:>8}",
        "Hole", "SI", "A", "B", "Result", "Match"
    );
    for line in &card.lines {
        let running = if line.result.is_decided() {
            margin_cell(line.margin)
        } else {
            String::new()
        };
        let _ = writeln!(
            out,
            "{:>4}  {:>3}  {:>5}  {:>5}  {:>6}  {:>8}",
            line.hole.to_string(),
            line.stroke_index,
            gross_cell(line.gross_a, line.a_gets_stroke),
            gross_cell(line.gross_b, line.b_gets_stroke),
            result_cell(line.result),
            running
        );
    }
    out.push('\n');

    let _ = writeln!(out, "Standing: {}", card.standing);
    if card.result.holes_decided() > 0 {
        let verdict = match card.result.outcome {
            MatchOutcome::A => format!("{} wins", seat_name(view, Side::A)),
            MatchOutcome::B => format!("{} wins", seat_name(view, Side::B)),
            MatchOutcome::Tie => "Halved".to_string(),
        };
        let label = if view.status == MatchStatus::Complete {
            "Result"
        } else {
            "Provisional"
        };
        let _ = writeln!(
            out,
            "{label}: {verdict} ({} - {})",
            card.result.points_a, card.result.points_b
        );
    }
    out
}
