//! Centralized tuning constants for the loot core.
//!
//! Per-module tables (phase weights, affinity maps, fallback ids) remain in
//! their respective modules as the single source of truth.

// =====================================================
// Drop chance
// =====================================================

/// Lowest probability any entry can roll at
pub const MIN_DROP_CHANCE: f64 = 0.01;

/// Highest probability any entry can roll at
pub const MAX_DROP_CHANCE: f64 = 0.95;

/// Floor applied to each level-adjusted rarity weight before normalisation
pub const RARITY_WEIGHT_FLOOR: f64 = 0.001;

/// Accepted deviation of the rarity table's weight sum from 1.0
pub const RARITY_SUM_TOLERANCE: f64 = 0.01;

// =====================================================
// Progression
// =====================================================

/// Lower bound of the progression multiplier
pub const PROGRESSION_MIN: f64 = 0.1;

/// Upper bound of the progression multiplier
pub const PROGRESSION_MAX: f64 = 2.5;

/// Penalty per tier the player is ahead of the content
pub const TIER_PENALTY_STEP: f64 = 0.15;

/// Bonus per tier the content is ahead of the player
pub const TIER_BONUS_STEP: f64 = 0.2;

/// Cap on the challenge bonus
pub const TIER_BONUS_CAP: f64 = 1.8;

// =====================================================
// Farming
// =====================================================

/// Default rolling window for encounter history (1 hour)
pub const DEFAULT_FARMING_WINDOW_SECS: u64 = 3600;

/// Default asymptotic maximum penalty (70%)
pub const DEFAULT_MAX_FARMING_PENALTY: f64 = 0.70;

/// Player levels are bucketed to this width for farming keys
pub const FARMING_LEVEL_BUCKET: u32 = 5;

// =====================================================
// Rewards
// =====================================================

/// Gold: base = GOLD_BASE + GOLD_PER_LEVEL * content_level
pub const GOLD_BASE: f64 = 10.0;
pub const GOLD_PER_LEVEL: f64 = 5.0;

/// Gold variance (±30%)
pub const GOLD_VARIANCE: f64 = 0.30;

/// Experience: base = XP_BASE + XP_PER_LEVEL * content_level
pub const XP_BASE: f64 = 50.0;
pub const XP_PER_LEVEL: f64 = 10.0;

/// Experience lost per level the player is above the content
pub const XP_OVERLEVEL_STEP: f64 = 0.10;

/// Maximum experience reduction for over-levelled players
pub const XP_MAX_REDUCTION: f64 = 0.90;

/// Material handed out when an item cannot be generated
pub const SAFE_MATERIAL_ID: &str = "monster_essence";

// =====================================================
// Performance
// =====================================================

/// Generation latency budget per call in milliseconds
pub const PERF_BUDGET_MS: f64 = 50.0;

/// Hard cap on generated levels
pub const MAX_LEVEL: u32 = 100;
