use crate::error::InvalidInput;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Team points counted in half-point units, so a halved hole or a tied
/// match never goes through floating point.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "f64", into = "f64")]
pub struct HalfPoints(u32);

impl HalfPoints {
    pub const ZERO: Self = Self(0);
    pub const HALF: Self = Self(1);
    pub const ONE: Self = Self(2);
    /// Largest value accepted from outside, one million points.
    pub const MAX: Self = Self(2_000_000);

    #[must_use]
    pub const fn from_halves(halves: u32) -> Self {
        Self(halves)
    }

    #[must_use]
    pub const fn from_whole(points: u32) -> Self {
        Self(points * 2)
    }

    #[must_use]
    pub const fn halves(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 2.0
    }
}

impl TryFrom<f64> for HalfPoints {
    type Error = InvalidInput;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let doubled = value * 2.0;
        if !value.is_finite()
            || value < 0.0
            || doubled.fract() != 0.0
            || doubled > f64::from(Self::MAX.0)
        {
            return Err(InvalidInput::Points(value.to_string()));
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let halves = doubled as u32;
        Ok(Self(halves))
    }
}

impl From<HalfPoints> for f64 {
    fn from(value: HalfPoints) -> Self {
        value.as_f64()
    }
}

impl Add for HalfPoints {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for HalfPoints {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for HalfPoints {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for HalfPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frac = if self.0 % 2 == 1 { 5 } else { 0 };
        write!(f, "{}.{frac}", self.0 / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_one_decimal() {
        assert_eq!(HalfPoints::from_halves(5).to_string(), "2.5");
        assert_eq!(HalfPoints::from_whole(3).to_string(), "3.0");
        assert_eq!(HalfPoints::ZERO.to_string(), "0.0");
    }

    #[test]
    fn rejects_non_half_values() {
        assert!(HalfPoints::try_from(0.25).is_err());
        assert!(HalfPoints::try_from(-1.0).is_err());
        assert!(HalfPoints::try_from(f64::NAN).is_err());
        assert_eq!(HalfPoints::try_from(1.5), Ok(HalfPoints::from_halves(3)));
    }

    #[test]
    fn huge_base_points_are_rejected() {
        assert_eq!(HalfPoints::try_from(1_000_000.0), Ok(HalfPoints::MAX));
        assert!(HalfPoints::try_from(1_000_000.5).is_err());
        assert!(HalfPoints::try_from(2_147_483_647.0).is_err());
    }

    #[test]
    fn sums_never_wrap() {
        let mut total = HalfPoints::from_halves(u32::MAX - 1);
        total += HalfPoints::ONE;
        assert_eq!(total.halves(), u32::MAX);
        let sum: HalfPoints = [HalfPoints::MAX, HalfPoints::HALF, HalfPoints::ONE]
            .into_iter()
            .sum();
        assert_eq!(sum.to_string(), "1000001.5");
    }

    #[test]
    fn json_uses_plain_numbers() {
        let p: HalfPoints = serde_json::from_str("2.5").unwrap();
        assert_eq!(p, HalfPoints::from_halves(5));
        assert_eq!(serde_json::to_string(&HalfPoints::ONE).unwrap(), "1.0");
        assert!(serde_json::from_str::<HalfPoints>("0.3").is_err());
    }
}
