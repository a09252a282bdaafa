use crate::model::{
    HOLES, HalfPoints, Handicap, HoleNumber, HoleScore, Side, StrokeIndexTable, scores_by_hole,
};
use crate::score::hole::{HoleResult, net_hole_result, net_score};
use crate::score::strokes::{StrokeAllocation, allocate_strokes};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    A,
    B,
    Tie,
}

/// Scalar result of a match. `points_a + points_b` is always one point.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchResult {
    pub points_a: HalfPoints,
    pub points_b: HalfPoints,
    pub outcome: MatchOutcome,
    pub holes_won_a: u32,
    pub holes_won_b: u32,
    pub holes_halved: u32,
}

impl MatchResult {
    #[must_use]
    pub fn points(&self, side: Side) -> HalfPoints {
        match side {
            Side::A => self.points_a,
            Side::B => self.points_b,
        }
    }

    #[must_use]
    pub fn holes_decided(&self) -> u32 {
        self.holes_won_a + self.holes_won_b + self.holes_halved
    }
}

/// Tally decided holes (win = 1, half = 0.5 each) and turn the tally into
/// match points. `Pending` holes are skipped wherever they fall, so an
/// unfinished round yields a provisional result from the holes played.
#[must_use]
pub fn match_result<I>(results: I) -> MatchResult
where
    I: IntoIterator<Item = HoleResult>,
{
    let (mut won_a, mut won_b, mut halved) = (0u32, 0u32, 0u32);
    for r in results {
        match r {
            HoleResult::A => won_a += 1,
            HoleResult::B => won_b += 1,
            HoleResult::AllSquare => halved += 1,
            HoleResult::Pending => {}
        }
    }

    let tally_a = HalfPoints::from_whole(won_a) + HalfPoints::from_halves(halved);
    let tally_b = HalfPoints::from_whole(won_b) + HalfPoints::from_halves(halved);
    let (points_a, points_b, outcome) = match tally_a.cmp(&tally_b) {
        std::cmp::Ordering::Greater => (HalfPoints::ONE, HalfPoints::ZERO, MatchOutcome::A),
        std::cmp::Ordering::Less => (HalfPoints::ZERO, HalfPoints::ONE, MatchOutcome::B),
        std::cmp::Ordering::Equal => (HalfPoints::HALF, HalfPoints::HALF, MatchOutcome::Tie),
    };

    MatchResult {
        points_a,
        points_b,
        outcome,
        holes_won_a: won_a,
        holes_won_b: won_b,
        holes_halved: halved,
    }
}

/// Where a match stands for display: "AS thru 4", "2 UP thru 9".
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchStanding {
    NotStarted,
    AllSquare { thru: u32 },
    Up { leader: Side, holes: u32, thru: u32 },
}

impl fmt::Display for MatchStanding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStanding::NotStarted => write!(f, "Not Started"),
            MatchStanding::AllSquare { thru } => write!(f, "AS thru {thru}"),
            MatchStanding::Up {
                leader,
                holes,
                thru,
            } => write!(f, "{leader} {holes} UP thru {thru}"),
        }
    }
}

/// Advisory lifecycle, read off the current data and never enforced.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchStatus {
    Unscheduled,
    Scheduled,
    InProgress,
    Complete,
}

impl MatchStatus {
    #[must_use]
    pub fn from_progress(seats_assigned: bool, holes_decided: u32) -> Self {
        if !seats_assigned {
            MatchStatus::Unscheduled
        } else if holes_decided == 0 {
            MatchStatus::Scheduled
        } else if holes_decided as usize >= HOLES {
            MatchStatus::Complete
        } else {
            MatchStatus::InProgress
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchStatus::Unscheduled => "Unscheduled",
            MatchStatus::Scheduled => "Not Started",
            MatchStatus::InProgress => "In Progress",
            MatchStatus::Complete => "Complete",
        };
        write!(f, "{s}")
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HoleLine {
    pub hole: HoleNumber,
    pub stroke_index: u8,
    pub gross_a: Option<u32>,
    pub gross_b: Option<u32>,
    pub a_gets_stroke: bool,
    pub b_gets_stroke: bool,
    pub net_a: Option<i64>,
    pub net_b: Option<i64>,
    pub result: HoleResult,
    /// Holes up for side A after this hole; negative when B leads.
    pub margin: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MatchCard {
    pub lines: Vec<HoleLine>,
    pub allocation: StrokeAllocation,
    pub result: MatchResult,
    pub standing: MatchStanding,
}

impl MatchCard {
    #[must_use]
    pub fn results(&self) -> Vec<HoleResult> {
        self.lines.iter().map(|l| l.result).collect()
    }
}

/// Walk holes 1..=18 in order, producing the per-hole line, the running
/// margin and the match result. Holes without a record are `Pending`.
#[must_use]
pub fn build_match_card(
    handicap_a: Handicap,
    handicap_b: Handicap,
    table: &StrokeIndexTable,
    scores: &[HoleScore],
) -> MatchCard {
    let allocation = allocate_strokes(handicap_a, handicap_b, table);
    let by_hole = scores_by_hole(scores);

    let mut margin = 0i32;
    let mut thru = 0u32;
    let mut lines = Vec::with_capacity(HOLES);
    for ch in table.holes() {
        let score = by_hole[ch.hole.index()];
        let gross_a = score.and_then(|s| s.gross_a);
        let gross_b = score.and_then(|s| s.gross_b);
        let a_gets_stroke = allocation.a_gets_stroke(ch.hole);
        let b_gets_stroke = allocation.b_gets_stroke(ch.hole);
        let result = net_hole_result(gross_a, gross_b, a_gets_stroke, b_gets_stroke);
        match result {
            HoleResult::A => margin += 1,
            HoleResult::B => margin -= 1,
            HoleResult::AllSquare | HoleResult::Pending => {}
        }
        if result.is_decided() {
            thru += 1;
        }
        lines.push(HoleLine {
            hole: ch.hole,
            stroke_index: ch.stroke_index,
            gross_a,
            gross_b,
            a_gets_stroke,
            b_gets_stroke,
            net_a: gross_a.map(|g| net_score(g, a_gets_stroke)),
            net_b: gross_b.map(|g| net_score(g, b_gets_stroke)),
            result,
            margin,
        });
    }

    let result = match_result(lines.iter().map(|l| l.result));
    let standing = match (thru, margin) {
        (0, _) => MatchStanding::NotStarted,
        (thru, 0) => MatchStanding::AllSquare { thru },
        (thru, m) => MatchStanding::Up {
            leader: if m > 0 { Side::A } else { Side::B },
            holes: m.unsigned_abs(),
            thru,
        },
    };

    MatchCard {
        lines,
        allocation,
        result,
        standing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repeat(r: HoleResult, n: usize) -> Vec<HoleResult> {
        vec![r; n]
    }

    fn score(hole: i64, a: Option<i64>, b: Option<i64>) -> HoleScore {
        HoleScore::new(7, hole, a, b).unwrap()
    }

    #[test]
    fn all_halves_tie() {
        let r = match_result(repeat(HoleResult::AllSquare, 18));
        assert_eq!((r.points_a, r.points_b), (HalfPoints::HALF, HalfPoints::HALF));
        assert_eq!(r.outcome, MatchOutcome::Tie);
        assert_eq!(r.holes_decided(), 18);
    }

    #[test]
    fn ten_beats_eight() {
        let mut holes = repeat(HoleResult::A, 10);
        holes.extend(repeat(HoleResult::B, 8));
        let r = match_result(holes);
        assert_eq!((r.points_a, r.points_b), (HalfPoints::ONE, HalfPoints::ZERO));
        assert_eq!(r.outcome, MatchOutcome::A);
    }

    #[test]
    fn pending_holes_are_skipped_not_halved() {
        let holes = vec![
            HoleResult::B,
            HoleResult::Pending,
            HoleResult::Pending,
            HoleResult::AllSquare,
        ];
        let r = match_result(holes);
        assert_eq!(r.outcome, MatchOutcome::B);
        assert_eq!(r.holes_halved, 1);
        assert_eq!(r.holes_decided(), 2);
    }

    #[test]
    fn gap_does_not_stop_the_tally() {
        let mut holes = vec![HoleResult::A, HoleResult::Pending];
        holes.extend(repeat(HoleResult::B, 3));
        let r = match_result(holes);
        assert_eq!(r.outcome, MatchOutcome::B);
    }

    #[test]
    fn no_decided_holes_is_a_tie() {
        let r = match_result(repeat(HoleResult::Pending, 18));
        assert_eq!(r.outcome, MatchOutcome::Tie);
        assert_eq!(r.holes_decided(), 0);
    }

    #[test]
    fn points_always_sum_to_one() {
        for results in [
            repeat(HoleResult::A, 3),
            repeat(HoleResult::B, 1),
            repeat(HoleResult::AllSquare, 5),
            Vec::new(),
        ] {
            let r = match_result(results);
            assert_eq!(r.points_a + r.points_b, HalfPoints::ONE);
        }
    }

    #[test]
    fn card_tracks_strokes_and_margin() {
        // B plays off 3 more, so B gets strokes on SI 1..=3 (holes 1..=3 here).
        let scores = vec![
            score(1, Some(4), Some(5)),
            score(2, Some(4), Some(4)),
            score(3, Some(5), Some(6)),
            score(4, Some(3), Some(4)),
            score(5, Some(4), None),
        ];
        let card = build_match_card(
            Handicap::from(5_u32),
            Handicap::from(8_u32),
            &StrokeIndexTable::default(),
            &scores,
        );
        let results = card.results();
        assert_eq!(
            &results[..5],
            &[
                HoleResult::AllSquare,
                HoleResult::B,
                HoleResult::AllSquare,
                HoleResult::A,
                HoleResult::Pending,
            ]
        );
        assert!(results[5..].iter().all(|r| *r == HoleResult::Pending));
        assert!(card.lines[0].b_gets_stroke);
        assert_eq!(card.lines[0].net_b, Some(4));
        assert_eq!(card.lines[1].margin, -1);
        assert_eq!(card.lines[3].margin, 0);
        assert_eq!(card.lines[4].net_b, None);
        assert_eq!(card.standing, MatchStanding::AllSquare { thru: 4 });
        assert_eq!(card.result.outcome, MatchOutcome::Tie);
    }

    #[test]
    fn card_is_stable_across_recomputation() {
        let scores: Vec<HoleScore> = (1..=18_i64)
            .map(|h| score(h, Some(4 + h % 2), Some(4)))
            .collect();
        let table = StrokeIndexTable::default();
        let first = build_match_card(Handicap::from(9_u32), Handicap::from(2_u32), &table, &scores);
        let second = build_match_card(Handicap::from(9_u32), Handicap::from(2_u32), &table, &scores);
        assert_eq!(first, second);
        for line in &first.lines {
            let gross_a = line.gross_a.unwrap();
            assert_eq!(line.net_a, Some(net_score(gross_a, line.a_gets_stroke)));
        }
        assert_eq!(first.standing.to_string(), "B 2 UP thru 18");
    }

    #[test]
    fn status_follows_progress() {
        assert_eq!(MatchStatus::from_progress(false, 3), MatchStatus::Unscheduled);
        assert_eq!(MatchStatus::from_progress(true, 0), MatchStatus::Scheduled);
        assert_eq!(MatchStatus::from_progress(true, 9), MatchStatus::InProgress);
        assert_eq!(MatchStatus::from_progress(true, 18), MatchStatus::Complete);
    }
}
