//! Bounded system load score

use serde::{Deserialize, Serialize};
use std::fmt;

/// A system load heuristic in `0..=100`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadScore(u8);

impl LoadScore {
    pub const MAX: u8 = 100;

    /// Substituted when runtime metrics cannot be read
    pub const NEUTRAL: LoadScore = LoadScore(50);

    /// Create a score, clamping anything above 100
    pub fn new(value: u32) -> Self {
        Self(value.min(u32::from(Self::MAX)) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for LoadScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clamped_to_hundred() {
        assert_eq!(LoadScore::new(250).value(), 100);
        assert_eq!(LoadScore::new(91).value(), 91);
        assert_eq!(LoadScore::NEUTRAL.value(), 50);
    }

    proptest! {
        #[test]
        fn proptest_new_clamps_and_preserves_order(a in any::<u32>(), b in any::<u32>()) {
            let (sa, sb) = (LoadScore::new(a), LoadScore::new(b));
            prop_assert!(sa.value() <= LoadScore::MAX);
            prop_assert_eq!(u32::from(sa.value()), a.min(100));
            if a <= b {
                prop_assert!(sa <= sb);
            }
        }
    }
}
