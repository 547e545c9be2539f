//! Level curve - Converts experience into levels.
//!
//! `required(L)` is the XP needed inside level `L - 1` to reach level `L`. The curve is
//! linear and strictly monotone: `base + increment * (L - 2)`. Within-level XP always
//! satisfies `xp < required(level + 1)`.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};

/// Linear XP-per-level curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelCurve {
    /// XP needed to go from level 1 to level 2
    pub base: i64,
    /// Extra XP needed for each following level
    pub increment: i64,
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self {
            base: 100,
            increment: 100,
        }
    }
}

impl LevelCurve {
    /// Creates a validated curve.
    ///
    /// # Errors
    /// Returns `Error::Config` when `base` is not positive or `increment` is negative.
    pub fn new(base: i64, increment: i64) -> Result<Self> {
        let curve = Self { base, increment };
        curve.validate()?;
        Ok(curve)
    }

    /// Checks that the curve is monotonically increasing and never zero.
    pub fn validate(&self) -> Result<()> {
        if self.base <= 0 {
            return Err(Error::Config {
                message: format!("level_curve.base must be positive, got {}", self.base),
            });
        }
        if self.increment < 0 {
            return Err(Error::Config {
                message: format!(
                    "level_curve.increment must not be negative, got {}",
                    self.increment
                ),
            });
        }
        Ok(())
    }

    /// XP needed inside level `level - 1` to reach `level`. Levels below 2 need nothing.
    #[must_use]
    pub fn required(&self, level: i32) -> i64 {
        if level < 2 {
            return 0;
        }
        self.base + self.increment * i64::from(level - 2)
    }

    /// XP still missing from `(level, xp)` to the next level.
    #[must_use]
    pub fn xp_to_next_level(&self, level: i32, xp: i64) -> i64 {
        (self.required(level + 1) - xp).max(0)
    }

    /// Adds `gained` XP to `(level, xp)` and rolls overflow into level increments.
    #[must_use]
    pub fn apply_xp(&self, level: i32, xp: i64, gained: i64) -> (i32, i64) {
        let mut level = level.max(1);
        let mut xp = (xp + gained.max(0)).max(0);
        while xp >= self.required(level + 1) {
            xp -= self.required(level + 1);
            level += 1;
        }
        (level, xp)
    }

    /// Derives `(level, xp)` from lifetime XP.
    #[must_use]
    pub fn from_total(&self, total: i64) -> (i32, i64) {
        self.apply_xp(1, 0, total)
    }

    /// Lifetime XP corresponding to `(level, xp)`.
    #[must_use]
    pub fn total_at(&self, level: i32, xp: i64) -> i64 {
        (2..=level).map(|l| self.required(l)).sum::<i64>() + xp
    }
}

/// Emitted when a credit moves a profile to a higher level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUp {
    /// Level before the credit
    pub from: i32,
    /// Level after the credit
    pub to: i32,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_default_curve_values() {
        let curve = LevelCurve::default();
        assert_eq!(curve.required(1), 0);
        assert_eq!(curve.required(2), 100);
        assert_eq!(curve.required(3), 200);
        assert_eq!(curve.required(10), 900);
    }

    #[test]
    fn test_overflow_rolls_into_next_level() {
        let curve = LevelCurve::default();
        let (level, xp) = curve.apply_xp(1, 95, 10);
        assert_eq!(level, 2);
        assert_eq!(xp, 5);
        assert_eq!(curve.xp_to_next_level(level, xp), curve.required(3) - 5);
    }

    #[test]
    fn test_large_credit_crosses_several_levels() {
        let curve = LevelCurve::default();
        // 100 + 200 + 300 = 600 reaches level 4 exactly
        let (level, xp) = curve.apply_xp(1, 0, 650);
        assert_eq!(level, 4);
        assert_eq!(xp, 50);
    }

    #[test]
    fn test_xp_to_next_level_never_negative() {
        let curve = LevelCurve::new(50, 25).unwrap();
        for total in (0..5_000).step_by(7) {
            let (level, xp) = curve.from_total(total);
            let to_next = curve.xp_to_next_level(level, xp);
            assert!(to_next > 0, "total {total} gave to_next {to_next}");
            assert!(xp < curve.required(level + 1));
            assert_eq!(xp + to_next, curve.required(level + 1));
        }
    }

    #[test]
    fn test_total_round_trip() {
        let curve = LevelCurve::default();
        for total in [0, 1, 99, 100, 101, 299, 300, 12_345] {
            let (level, xp) = curve.from_total(total);
            assert_eq!(curve.total_at(level, xp), total);
        }
    }

    #[test]
    fn test_flat_curve_is_allowed() {
        let curve = LevelCurve::new(10, 0).unwrap();
        assert_eq!(curve.from_total(35), (4, 5));
    }

    #[test]
    fn test_invalid_curves_rejected() {
        assert!(matches!(
            LevelCurve::new(0, 10),
            Err(Error::Config { message: _ })
        ));
        assert!(matches!(
            LevelCurve::new(100, -1),
            Err(Error::Config { message: _ })
        ));
    }
}
