use crate::model::Side;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a single hole. `Pending` (not both scores entered) and
/// `AllSquare` (net tie) are different states and must stay that way.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HoleResult {
    A,
    B,
    #[serde(rename = "AS")]
    AllSquare,
    Pending,
}

impl HoleResult {
    #[must_use]
    pub fn won_by(side: Side) -> Self {
        match side {
            Side::A => HoleResult::A,
            Side::B => HoleResult::B,
        }
    }

    #[must_use]
    pub fn winner(self) -> Option<Side> {
        match self {
            HoleResult::A => Some(Side::A),
            HoleResult::B => Some(Side::B),
            HoleResult::AllSquare | HoleResult::Pending => None,
        }
    }

    #[must_use]
    pub fn is_decided(self) -> bool {
        !matches!(self, HoleResult::Pending)
    }

    /// The same result seen with the seats swapped.
    #[must_use]
    pub fn swapped(self) -> Self {
        match self {
            HoleResult::A => HoleResult::B,
            HoleResult::B => HoleResult::A,
            other => other,
        }
    }
}

impl fmt::Display for HoleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HoleResult::A => "A Win",
            HoleResult::B => "B Win",
            HoleResult::AllSquare => "All Square",
            HoleResult::Pending => "-",
        };
        write!(f, "{s}")
    }
}

#[must_use]
pub fn net_score(gross: u32, gets_stroke: bool) -> i64 {
    i64::from(gross) - i64::from(gets_stroke)
}

#[must_use]
pub fn net_hole_result(
    gross_a: Option<u32>,
    gross_b: Option<u32>,
    a_gets_stroke: bool,
    b_gets_stroke: bool,
) -> HoleResult {
    let (Some(gross_a), Some(gross_b)) = (gross_a, gross_b) else {
        return HoleResult::Pending;
    };
    let net_a = net_score(gross_a, a_gets_stroke);
    let net_b = net_score(gross_b, b_gets_stroke);
    match net_a.cmp(&net_b) {
        std::cmp::Ordering::Less => HoleResult::A,
        std::cmp::Ordering::Greater => HoleResult::B,
        std::cmp::Ordering::Equal => HoleResult::AllSquare,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn lower_net_wins() {
        assert_eq!(net_hole_result(Some(4), Some(5), false, false), HoleResult::A);
        assert_eq!(net_hole_result(Some(5), Some(4), false, false), HoleResult::B);
        assert_eq!(net_hole_result(Some(4), Some(4), false, false), HoleResult::AllSquare);
    }

    #[test]
    fn stroke_turns_loss_into_half() {
        assert_eq!(net_hole_result(Some(5), Some(4), true, false), HoleResult::AllSquare);
        assert_eq!(net_hole_result(Some(5), Some(5), false, true), HoleResult::B);
    }

    #[test]
    fn half_entered_hole_is_pending() {
        assert_eq!(net_hole_result(Some(3), None, false, false), HoleResult::Pending);
        assert_eq!(net_hole_result(None, Some(3), false, true), HoleResult::Pending);
        assert_eq!(net_hole_result(None, None, false, false), HoleResult::Pending);
        assert_ne!(HoleResult::Pending, HoleResult::AllSquare);
    }

    #[test]
    fn serde_tags() {
        assert_eq!(serde_json::to_string(&HoleResult::AllSquare).unwrap(), "\"AS\"");
        assert_eq!(serde_json::to_string(&HoleResult::A).unwrap(), "\"A\"");
    }

    proptest! {
        #[test]
        fn swap_symmetry(
            ga in proptest::option::of(1u32..=15),
            gb in proptest::option::of(1u32..=15),
            sa in any::<bool>(),
            sb in any::<bool>(),
        ) {
            let forward = net_hole_result(ga, gb, sa, sb);
            let backward = net_hole_result(gb, ga, sb, sa);
            prop_assert_eq!(forward, backward.swapped());
        }

        #[test]
        fn repeated_calls_agree(ga in 1u32..=15, gb in 1u32..=15, sa in any::<bool>()) {
            let first = net_hole_result(Some(ga), Some(gb), sa, false);
            let second = net_hole_result(Some(ga), Some(gb), sa, false);
            prop_assert_eq!(first, second);
            let net_a = net_score(ga, sa);
            let net_b = net_score(gb, false);
            prop_assert_eq!(first == HoleResult::A, net_a < net_b);
        }
    }
}
