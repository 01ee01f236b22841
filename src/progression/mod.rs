//! Progression tiers and the level-difference multiplier.
//!
//! Over-levelled farming and under-levelled grinding both flatten out:
//! - Player a tier or more ahead: per-tier penalty, then a gap penalty once
//!   the player is far outside the content's expected window
//! - Content a tier or more ahead: per-tier bonus, capped, trimmed again if
//!   the stretch is extreme
//!
//! Final multiplier is always within [0.1, 2.5].

use serde::{Deserialize, Serialize};

use crate::constants::{
    PROGRESSION_MAX, PROGRESSION_MIN, TIER_BONUS_CAP, TIER_BONUS_STEP, TIER_PENALTY_STEP,
};

/// Coarse level bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TierName {
    Tutorial,     // 1-5
    Beginner,     // 6-10
    Novice,       // 11-15
    Intermediate, // 16-20
    Advanced,     // 21-25
    Expert,       // 26-30
    Master,       // 31-39
    Legendary,    // 40+
}

/// Tier a level falls into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContentTier {
    pub name: TierName,
    /// 1 (Tutorial) through 8 (Legendary)
    pub index: u32,
    pub scaling_factor: f64,
}

pub fn content_tier_of(level: u32) -> ContentTier {
    let (name, index, scaling_factor) = match level {
        0..=5 => (TierName::Tutorial, 1, 1.0),
        6..=10 => (TierName::Beginner, 2, 1.1),
        11..=15 => (TierName::Novice, 3, 1.2),
        16..=20 => (TierName::Intermediate, 4, 1.35),
        21..=25 => (TierName::Advanced, 5, 1.5),
        26..=30 => (TierName::Expert, 6, 1.7),
        31..=39 => (TierName::Master, 7, 1.9),
        _ => (TierName::Legendary, 8, 2.2),
    };
    ContentTier {
        name,
        index,
        scaling_factor,
    }
}

/// Levels a content is "meant" for: content -2 through content +3
pub fn expected_window(content_level: u32) -> (u32, u32) {
    (content_level.saturating_sub(2).max(1), content_level + 3)
}

/// Loot multiplier for a level gap.
///
/// `level_difference` is player level minus content level.
pub fn progression_penalty(level_difference: i32, player_level: u32, content_level: u32) -> f64 {
    let player_level = player_level.max(1);
    let content_level = content_level.max(1);
    let player_tier = content_tier_of(player_level).index;
    let content_tier = content_tier_of(content_level).index;

    let mut multiplier = 1.0;

    if level_difference > 0 {
        if player_tier > content_tier {
            let tier_diff = (player_tier - content_tier) as f64;
            let mut penalty = TIER_PENALTY_STEP * tier_diff;
            if player_tier <= 3 {
                penalty *= 0.6;
            } else if player_tier >= 6 {
                penalty *= 1.4;
            }
            multiplier = (1.0 - penalty).max(0.2);
        }

        let (_, window_top) = expected_window(content_level);
        if player_level > window_top {
            let gap = (player_level - window_top) as f64;
            let allowance = 0.5 * content_level as f64;
            if gap > allowance {
                multiplier *= (1.0 - 0.1 * (gap - allowance)).max(0.3);
            }
        }
    } else if level_difference < 0 && content_tier > player_tier {
        let tier_diff = (content_tier - player_tier) as f64;
        let mut bonus = TIER_BONUS_STEP * tier_diff;
        if player_tier <= 3 {
            bonus *= 1.3;
        } else if player_tier >= 6 {
            bonus *= 0.7;
        }
        multiplier = (1.0 + bonus).min(TIER_BONUS_CAP);

        let stretch_limit = player_level + 5;
        if content_level > stretch_limit {
            let stretch = (content_level - stretch_limit) as f64;
            if stretch > 10.0 {
                multiplier *= (1.0 - 0.05 * (stretch - 10.0)).max(0.5);
            }
        }
    }

    multiplier.clamp(PROGRESSION_MIN, PROGRESSION_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_breakpoints() {
        assert_eq!(content_tier_of(1).name, TierName::Tutorial);
        assert_eq!(content_tier_of(5).name, TierName::Tutorial);
        assert_eq!(content_tier_of(6).name, TierName::Beginner);
        assert_eq!(content_tier_of(20).index, 4);
        assert_eq!(content_tier_of(39).name, TierName::Master);
        assert_eq!(content_tier_of(40).name, TierName::Legendary);
        assert_eq!(content_tier_of(500).index, 8);
    }

    #[test]
    fn test_scaling_factor_grows_with_tier() {
        let mut prev = 0.0;
        for level in [1, 6, 11, 16, 21, 26, 31, 40] {
            let tier = content_tier_of(level);
            assert!(tier.scaling_factor > prev);
            prev = tier.scaling_factor;
        }
    }

    #[test]
    fn test_even_match_is_neutral() {
        assert_eq!(progression_penalty(0, 1, 1), 1.0);
        assert_eq!(progression_penalty(0, 30, 30), 1.0);
        // Same tier, small lead
        assert_eq!(progression_penalty(2, 8, 6), 1.0);
    }

    #[test]
    fn test_overlevelled_penalty() {
        let mult = progression_penalty(29, 30, 1);
        assert!(mult < 0.2, "level 30 vs level 1 should be heavily penalised: {mult}");
        assert!(mult >= PROGRESSION_MIN);
    }

    #[test]
    fn test_low_tier_penalty_softened() {
        // Player tier 3 vs content tier 2: 0.15 * 0.6 = 0.09 penalty
        let mult = progression_penalty(4, 11, 7);
        assert!((mult - 0.91).abs() < 1e-9, "got {mult}");
    }

    #[test]
    fn test_challenge_bonus_capped() {
        let mult = progression_penalty(-10, 5, 15);
        assert!(mult > 1.0);
        assert!(mult <= TIER_BONUS_CAP);
    }

    #[test]
    fn test_extreme_stretch_trimmed() {
        let reasonable = progression_penalty(-14, 1, 15);
        let extreme = progression_penalty(-59, 1, 60);
        assert!(extreme < TIER_BONUS_CAP);
        assert!(reasonable > 1.0);
    }

    #[test]
    fn test_bounds_over_grid() {
        for p in 1..=60u32 {
            for c in 1..=60u32 {
                let m = progression_penalty(p as i32 - c as i32, p, c);
                assert!((PROGRESSION_MIN..=PROGRESSION_MAX).contains(&m));
            }
        }
    }
}
