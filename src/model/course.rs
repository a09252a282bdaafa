use crate::error::InvalidInput;
use crate::model::HoleNumber;
use serde::{Deserialize, Serialize};

pub const HOLES: usize = 18;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CourseHole {
    pub hole: HoleNumber,
    pub stroke_index: u8,
}

/// Stroke index per hole, in hole order. Always a permutation of 1..=18:
/// index 1 is the first hole to receive a stroke as the handicap gap grows.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub struct StrokeIndexTable([u8; HOLES]);

impl StrokeIndexTable {
    /// Build a table from 18 stroke indices listed in hole order.
    ///
    /// # Errors
    /// Returns `InvalidInput::StrokeIndexTable` unless the values are exactly
    /// the numbers 1 through 18, each once.
    pub fn new(indices: &[i64]) -> Result<Self, InvalidInput> {
        if indices.len() != HOLES {
            return Err(InvalidInput::StrokeIndexTable(format!(
                "expected {HOLES} stroke indices, got {}",
                indices.len()
            )));
        }
        let mut seen = [false; HOLES + 1];
        let mut table = [0u8; HOLES];
        for (slot, &si) in table.iter_mut().zip(indices) {
            let idx = u8::try_from(si)
                .ok()
                .filter(|v| (1..=18).contains(v))
                .ok_or_else(|| {
                    InvalidInput::StrokeIndexTable(format!("stroke index {si} outside 1..=18"))
                })?;
            if seen[usize::from(idx)] {
                return Err(InvalidInput::StrokeIndexTable(format!(
                    "stroke index {idx} appears more than once"
                )));
            }
            seen[usize::from(idx)] = true;
            *slot = idx;
        }
        Ok(Self(table))
    }

    /// Build a table from one entry per hole, in any order.
    ///
    /// # Errors
    /// Returns `InvalidInput::StrokeIndexTable` if a hole is missing or repeated,
    /// or if the stroke indices are not a permutation of 1..=18.
    pub fn from_holes(holes: &[CourseHole]) -> Result<Self, InvalidInput> {
        let mut by_hole: [Option<u8>; HOLES] = [None; HOLES];
        for ch in holes {
            let slot = &mut by_hole[ch.hole.index()];
            if slot.is_some() {
                return Err(InvalidInput::StrokeIndexTable(format!(
                    "hole {} listed more than once",
                    ch.hole
                )));
            }
            *slot = Some(ch.stroke_index);
        }
        let mut indices = Vec::with_capacity(HOLES);
        for (i, si) in by_hole.iter().enumerate() {
            match si {
                Some(si) => indices.push(i64::from(*si)),
                None => {
                    return Err(InvalidInput::StrokeIndexTable(format!(
                        "hole {} has no stroke index",
                        i + 1
                    )));
                }
            }
        }
        Self::new(&indices)
    }

    #[must_use]
    pub fn stroke_index(&self, hole: HoleNumber) -> u8 {
        self.0[hole.index()]
    }

    pub fn holes(&self) -> impl Iterator<Item = CourseHole> + '_ {
        HoleNumber::all().map(|hole| CourseHole {
            hole,
            stroke_index: self.stroke_index(hole),
        })
    }
}

impl Default for StrokeIndexTable {
    fn default() -> Self {
        let mut table = [0u8; HOLES];
        for (i, slot) in (1u8..).zip(table.iter_mut()) {
            *slot = i;
        }
        Self(table)
    }
}

impl TryFrom<Vec<i64>> for StrokeIndexTable {
    type Error = InvalidInput;

    fn try_from(value: Vec<i64>) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<StrokeIndexTable> for Vec<i64> {
    fn from(value: StrokeIndexTable) -> Self {
        value.0.iter().map(|&si| i64::from(si)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_hole_order() {
        let t = StrokeIndexTable::default();
        for ch in t.holes() {
            assert_eq!(ch.hole.get(), ch.stroke_index);
        }
    }

    #[test]
    fn rejects_wrong_length() {
        let err = StrokeIndexTable::new(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, InvalidInput::StrokeIndexTable(_)));
    }

    #[test]
    fn rejects_duplicates_and_out_of_range() {
        let mut v: Vec<i64> = (1..=18).collect();
        v[17] = 1;
        assert!(StrokeIndexTable::new(&v).is_err());
        v[17] = 19;
        assert!(StrokeIndexTable::new(&v).is_err());
        v[17] = -18;
        assert!(StrokeIndexTable::new(&v).is_err());
    }

    #[test]
    fn from_holes_accepts_any_order() {
        let si = [7, 15, 3, 11, 1, 17, 9, 13, 5, 8, 16, 4, 12, 2, 18, 10, 14, 6];
        let mut holes: Vec<CourseHole> = si
            .iter()
            .enumerate()
            .map(|(i, &s)| CourseHole {
                hole: HoleNumber::try_from(i as i64 + 1).unwrap(),
                stroke_index: s,
            })
            .collect();
        holes.reverse();
        let t = StrokeIndexTable::from_holes(&holes).unwrap();
        assert_eq!(t.stroke_index(HoleNumber::try_from(5_i64).unwrap()), 1);
        assert_eq!(t.stroke_index(HoleNumber::try_from(15_i64).unwrap()), 18);
    }

    #[test]
    fn from_holes_rejects_missing_hole() {
        let holes: Vec<CourseHole> = (1..=17_i64)
            .map(|h| CourseHole {
                hole: HoleNumber::try_from(h).unwrap(),
                stroke_index: u8::try_from(h).unwrap(),
            })
            .collect();
        assert!(StrokeIndexTable::from_holes(&holes).is_err());
    }
}
