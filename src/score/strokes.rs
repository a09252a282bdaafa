use crate::model::{HOLES, Handicap, HoleNumber, Side, StrokeIndexTable};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Holes on which the higher-handicap side receives a stroke.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrokeAllocation {
    receiver: Option<Side>,
    holes: [bool; HOLES],
}

impl StrokeAllocation {
    /// The side receiving strokes, `None` when handicaps are equal.
    #[must_use]
    pub fn receiver(&self) -> Option<Side> {
        self.receiver
    }

    #[must_use]
    pub fn gets_stroke(&self, side: Side, hole: HoleNumber) -> bool {
        self.receiver == Some(side) && self.holes[hole.index()]
    }

    #[must_use]
    pub fn a_gets_stroke(&self, hole: HoleNumber) -> bool {
        self.gets_stroke(Side::A, hole)
    }

    #[must_use]
    pub fn b_gets_stroke(&self, hole: HoleNumber) -> bool {
        self.gets_stroke(Side::B, hole)
    }

    pub fn stroke_holes(&self) -> impl Iterator<Item = HoleNumber> + '_ {
        HoleNumber::all().filter(|h| self.holes[h.index()])
    }

    #[must_use]
    pub fn strokes_given(&self) -> usize {
        self.holes.iter().filter(|s| **s).count()
    }
}

/// Give the higher handicap one stroke on every hole whose stroke index is
/// at most the handicap difference. A difference above 18 still caps at one
/// stroke per hole.
#[must_use]
pub fn allocate_strokes(
    handicap_a: Handicap,
    handicap_b: Handicap,
    table: &StrokeIndexTable,
) -> StrokeAllocation {
    let diff = handicap_a.get().abs_diff(handicap_b.get());
    let receiver = match handicap_a.cmp(&handicap_b) {
        Ordering::Greater => Some(Side::A),
        Ordering::Less => Some(Side::B),
        Ordering::Equal => None,
    };

    let mut holes = [false; HOLES];
    if receiver.is_some() {
        for ch in table.holes() {
            holes[ch.hole.index()] = u32::from(ch.stroke_index) <= diff;
        }
    }

    StrokeAllocation { receiver, holes }
}
