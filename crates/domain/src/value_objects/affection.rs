//! Affection score value object.

use serde::{Deserialize, Serialize};
use std::fmt;

/// NPC favorability toward the player, always within `[0, 100]`.
///
/// The only way to change the score is [`Affection::apply`], which clamps,
/// so an out-of-range value can never be observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub struct Affection(i32);

impl Affection {
    pub const MIN: i32 = 0;
    pub const MAX: i32 = 100;

    /// Build from an arbitrary integer, clamping into range.
    pub fn new(value: i32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> i32 {
        self.0
    }

    /// Add a signed delta and clamp the result.
    pub fn apply(self, delta: i32) -> Self {
        Self::new(self.0.saturating_add(delta))
    }

    /// Band label used when describing the relationship to the oracle.
    pub fn band(self) -> AffectionBand {
        match self.0 {
            0..=25 => AffectionBand::Guarded,
            26..=60 => AffectionBand::Warm,
            61..=85 => AffectionBand::Flirty,
            _ => AffectionBand::Devoted,
        }
    }
}

impl From<i32> for Affection {
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}

impl From<Affection> for i32 {
    fn from(value: Affection) -> Self {
        value.0
    }
}

impl fmt::Display for Affection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffectionBand {
    Guarded,
    Warm,
    Flirty,
    Devoted,
}

impl AffectionBand {
    /// How the NPC should carry himself at this band.
    pub fn guidance(self) -> &'static str {
        match self {
            AffectionBand::Guarded => "polite but guarded",
            AffectionBand::Warm => "warmer and more playful",
            AffectionBand::Flirty => "openly flirty, showing some vulnerability",
            AffectionBand::Devoted => "deeply affectionate",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_clamps_to_range() {
        assert_eq!(Affection::new(95).apply(10).value(), 100);
        assert_eq!(Affection::new(3).apply(-10).value(), 0);
        assert_eq!(Affection::new(40).apply(-5).value(), 35);
    }

    #[test]
    fn apply_survives_extreme_deltas() {
        assert_eq!(Affection::new(50).apply(i32::MAX).value(), 100);
        assert_eq!(Affection::new(50).apply(i32::MIN).value(), 0);
    }

    #[test]
    fn zero_delta_is_idempotent_everywhere() {
        for start in -20..=120 {
            for delta in [-200, -15, -1, 0, 1, 10, 200] {
                let once = Affection::new(start).apply(delta);
                assert!((Affection::MIN..=Affection::MAX).contains(&once.value()));
                assert_eq!(once.apply(0), once);
            }
        }
    }

    #[test]
    fn deserializing_out_of_range_clamps() {
        let a: Affection = serde_json::from_str("250").expect("deserialize");
        assert_eq!(a.value(), 100);
    }

    #[test]
    fn bands_follow_thresholds() {
        assert_eq!(Affection::new(25).band(), AffectionBand::Guarded);
        assert_eq!(Affection::new(26).band(), AffectionBand::Warm);
        assert_eq!(Affection::new(61).band(), AffectionBand::Flirty);
        assert_eq!(Affection::new(86).band(), AffectionBand::Devoted);
    }
}
