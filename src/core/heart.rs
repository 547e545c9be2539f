//! Heart meter - a bounded engagement score, separate from XP.

use serde::{Deserialize, Serialize};

/// Lowest heart level
pub const HEART_MIN: i32 = 0;
/// Highest heart level
pub const HEART_MAX: i32 = 100;

/// How much each kind of engagement moves the heart meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartConfig {
    /// Gained for every qualifying activity
    pub per_activity: i32,
    /// Gained for every completed quest
    pub per_quest: i32,
    /// Lost for every missed day when a streak resets
    pub decay_per_missed_day: i32,
}

impl Default for HeartConfig {
    fn default() -> Self {
        Self {
            per_activity: 1,
            per_quest: 5,
            decay_per_missed_day: 10,
        }
    }
}

/// Applies `delta` to `current` and clamps the result into `HEART_MIN..=HEART_MAX`.
#[must_use]
pub fn adjust(current: i32, delta: i64) -> i32 {
    let raw = i64::from(current).saturating_add(delta);
    // Clamped into i32 range by construction
    i32::try_from(raw.clamp(i64::from(HEART_MIN), i64::from(HEART_MAX))).unwrap_or(HEART_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_within_bounds() {
        assert_eq!(adjust(50, 5), 55);
        assert_eq!(adjust(50, -20), 30);
    }

    #[test]
    fn test_adjust_clamps_any_increment() {
        assert_eq!(adjust(99, 1_000), HEART_MAX);
        assert_eq!(adjust(100, i64::MAX), HEART_MAX);
        assert_eq!(adjust(3, -50), HEART_MIN);
        assert_eq!(adjust(0, i64::MIN), HEART_MIN);
    }

    #[test]
    fn test_repeated_increments_stay_clamped() {
        let mut heart = 0;
        for _ in 0..500 {
            heart = adjust(heart, 7);
            assert!((HEART_MIN..=HEART_MAX).contains(&heart));
        }
        assert_eq!(heart, HEART_MAX);
    }
}
