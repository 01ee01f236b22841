//! Drop-chance calculation and the per-entry roll.
//!
//! Pipeline for one loot entry:
//! 1. base chance × content multiplier (exploration, area bonus) × progression
//! 2. meaningful-target blend (raise only)
//! 3. reward-class bonus
//! 4. pity bonus for consecutive empty encounters
//! 5. farming multiplier
//! 6. per-class minimum viable rate
//! 7. clamp to [MIN_DROP_CHANCE, MAX_DROP_CHANCE]
//!
//! On a successful roll the rarity tier is drawn from the entry's
//! level-adjusted weights.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{LootEntry, RewardClass};
use crate::constants::{MAX_DROP_CHANCE, MIN_DROP_CHANCE};
use crate::progression::progression_penalty;
use crate::rarity::{pick_tier, RarityTable, RarityTier};
use crate::rng::LootRng;

/// One value per reward class
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerClass {
    pub equipment: f64,
    pub spell: f64,
    pub healing: f64,
    pub consumable: f64,
    pub material: f64,
    pub currency: f64,
    pub other: f64,
}

impl PerClass {
    pub fn get(&self, class: RewardClass) -> f64 {
        match class {
            RewardClass::Equipment => self.equipment,
            RewardClass::Spell => self.spell,
            RewardClass::Healing => self.healing,
            RewardClass::Consumable => self.consumable,
            RewardClass::Material => self.material,
            RewardClass::Currency => self.currency,
            RewardClass::Other => self.other,
        }
    }

    fn values(&self) -> [f64; 7] {
        [
            self.equipment,
            self.spell,
            self.healing,
            self.consumable,
            self.material,
            self.currency,
            self.other,
        ]
    }
}

/// Coefficients of the drop-chance pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DropTuning {
    /// Multiplier per reward class, applied after target blending
    pub class_bonus: PerClass,
    /// How much one drop of each class counts toward a meaningful target
    pub value_weight: PerClass,
    /// Fraction of the gap to the target share that is closed (0..=1)
    pub target_blend: f64,
    /// Pity bonus per consecutive empty encounter
    pub pity_step: f64,
    /// Cap on the total pity bonus
    pub pity_cap: f64,
    /// Per-class floor on the final chance
    pub min_rate: PerClass,
}

impl Default for DropTuning {
    fn default() -> Self {
        Self {
            class_bonus: PerClass {
                equipment: 1.3,
                spell: 1.25,
                healing: 1.1,
                consumable: 1.1,
                material: 1.0,
                currency: 1.0,
                other: 1.0,
            },
            value_weight: PerClass {
                equipment: 1.5,
                spell: 1.4,
                healing: 0.9,
                consumable: 1.0,
                material: 0.8,
                currency: 0.7,
                other: 1.0,
            },
            target_blend: 0.5,
            pity_step: 0.15,
            pity_cap: 1.0,
            min_rate: PerClass {
                equipment: 0.05,
                spell: 0.05,
                healing: 0.15,
                consumable: 0.05,
                material: 0.05,
                currency: 0.05,
                other: 0.05,
            },
        }
    }
}

impl DropTuning {
    /// Describe the first invalid field, if any
    pub fn check(&self) -> Result<(), (&'static str, String)> {
        if !(0.0..=1.0).contains(&self.target_blend) {
            return Err(("target_blend", format!("{} not in [0, 1]", self.target_blend)));
        }
        if !(self.pity_step >= 0.0 && self.pity_cap >= 0.0) {
            return Err(("pity", "step and cap must be non-negative".into()));
        }
        if self.class_bonus.values().iter().any(|v| !(v.is_finite() && *v > 0.0)) {
            return Err(("class_bonus", "every bonus must be positive".into()));
        }
        if self.value_weight.values().iter().any(|v| !(v.is_finite() && *v > 0.0)) {
            return Err(("value_weight", "every weight must be positive".into()));
        }
        if self
            .min_rate
            .values()
            .iter()
            .any(|v| !(MIN_DROP_CHANCE..=MAX_DROP_CHANCE).contains(v))
        {
            return Err((
                "min_rate",
                format!("rates must lie in [{MIN_DROP_CHANCE}, {MAX_DROP_CHANCE}]"),
            ));
        }
        Ok(())
    }
}

/// A probability of at least one meaningful drop per encounter, spread over
/// a table of `entry_count` entries
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeaningfulTarget {
    pub probability: f64,
    pub entry_count: usize,
}

impl MeaningfulTarget {
    /// Per-entry share that reaches `probability` across all entries
    pub fn per_entry_share(&self) -> f64 {
        let n = self.entry_count.max(1) as f64;
        let p = self.probability.clamp(0.0, 0.999);
        1.0 - (1.0 - p).powf(1.0 / n)
    }
}

/// Everything about the encounter that bends one entry's chance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropContext {
    pub reward_class: RewardClass,
    pub target: Option<MeaningfulTarget>,
    pub consecutive_empty: u32,
    /// Anti-farming multiplier, 1.0 = none
    pub farming_multiplier: f64,
    /// Exploration and area bonus, applied to the base chance
    pub chance_multiplier: f64,
}

impl Default for DropContext {
    fn default() -> Self {
        Self {
            reward_class: RewardClass::Other,
            target: None,
            consecutive_empty: 0,
            farming_multiplier: 1.0,
            chance_multiplier: 1.0,
        }
    }
}

/// Outcome of one entry roll
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropRoll {
    pub dropped: bool,
    pub rarity: Option<RarityTier>,
    pub drop_chance: f64,
    /// Progression multiplier that was applied
    pub level_scaling: f64,
}

pub struct DropCalculator<'a> {
    rarity: &'a RarityTable,
    tuning: &'a DropTuning,
}

impl<'a> DropCalculator<'a> {
    pub fn new(rarity: &'a RarityTable, tuning: &'a DropTuning) -> Self {
        Self { rarity, tuning }
    }

    /// Final probability for an entry, plus the progression multiplier used
    pub fn drop_chance(
        &self,
        entry: &LootEntry,
        player_level: u32,
        content_level: u32,
        ctx: &DropContext,
    ) -> (f64, f64) {
        let level_difference = player_level as i32 - content_level as i32;
        let level_scaling = progression_penalty(level_difference, player_level, content_level);

        let base = sanitize(entry.drop_chance) * sanitize(ctx.chance_multiplier);
        let scaled = base * level_scaling;
        let chance = self.optimize(scaled, ctx);
        (chance.clamp(MIN_DROP_CHANCE, MAX_DROP_CHANCE), level_scaling)
    }

    fn optimize(&self, mut chance: f64, ctx: &DropContext) -> f64 {
        let class = ctx.reward_class;
        let tuning = self.tuning;

        if let Some(target) = ctx.target {
            let desired = target.per_entry_share() / tuning.value_weight.get(class);
            if desired > chance {
                chance += tuning.target_blend * (desired - chance);
            }
        }

        chance *= tuning.class_bonus.get(class);

        if ctx.consecutive_empty > 0 {
            let pity = (tuning.pity_step * ctx.consecutive_empty as f64).min(tuning.pity_cap);
            chance *= 1.0 + pity;
        }

        let farming = ctx.farming_multiplier.clamp(0.0, 1.0);
        chance *= farming;

        let mut floor = tuning.min_rate.get(class);
        if farming < 1.0 {
            floor *= farming;
        }
        chance.max(floor)
    }

    /// Roll an entry, computing its rarity weights on the spot
    pub fn roll_for_loot(
        &self,
        entry: &LootEntry,
        player_level: u32,
        content_level: u32,
        ctx: &DropContext,
        rng: &mut LootRng,
    ) -> DropRoll {
        let weights = self.rarity_weights(entry, player_level, content_level);
        self.roll_with_weights(entry, player_level, content_level, ctx, &weights, rng)
    }

    /// Normalised, level-adjusted weights for an entry
    pub fn rarity_weights(
        &self,
        entry: &LootEntry,
        player_level: u32,
        content_level: u32,
    ) -> Vec<(RarityTier, f64)> {
        let level_difference = content_level as i32 - player_level as i32;
        self.rarity
            .adjusted_weights(&entry.rarity_weights, level_difference)
    }

    /// Roll an entry against precomputed rarity weights
    pub fn roll_with_weights(
        &self,
        entry: &LootEntry,
        player_level: u32,
        content_level: u32,
        ctx: &DropContext,
        weights: &[(RarityTier, f64)],
        rng: &mut LootRng,
    ) -> DropRoll {
        let (drop_chance, level_scaling) = self.drop_chance(entry, player_level, content_level, ctx);
        let dropped = rng.chance(drop_chance);
        let rarity = dropped.then(|| pick_tier(weights, rng.roll()));

        debug!(
            item_type = %entry.item_type,
            drop_chance,
            level_scaling,
            dropped,
            rarity = ?rarity,
            "Entry rolled"
        );

        DropRoll {
            dropped,
            rarity,
            drop_chance,
            level_scaling,
        }
    }
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material_entry(chance: f64) -> LootEntry {
        LootEntry::new("material", chance).with_weights(&[
            (RarityTier::Common, 0.7),
            (RarityTier::Uncommon, 0.25),
            (RarityTier::Rare, 0.05),
        ])
    }

    fn material_ctx() -> DropContext {
        DropContext {
            reward_class: RewardClass::Material,
            ..DropContext::default()
        }
    }

    #[test]
    fn test_even_level_material_untouched() {
        let table = RarityTable::standard();
        let tuning = DropTuning::default();
        let calc = DropCalculator::new(&table, &tuning);
        let (chance, scaling) = calc.drop_chance(&material_entry(0.4), 1, 1, &material_ctx());
        assert!((chance - 0.4).abs() < 1e-12);
        assert_eq!(scaling, 1.0);
    }

    #[test]
    fn test_chance_clamped() {
        let table = RarityTable::standard();
        let tuning = DropTuning::default();
        let calc = DropCalculator::new(&table, &tuning);

        let high = LootEntry::new("equipment", 5.0);
        let ctx = DropContext {
            reward_class: RewardClass::Equipment,
            consecutive_empty: 50,
            ..DropContext::default()
        };
        let (chance, _) = calc.drop_chance(&high, 1, 40, &ctx);
        assert_eq!(chance, MAX_DROP_CHANCE);

        let low = LootEntry::new("material", 0.0);
        let ctx = DropContext {
            reward_class: RewardClass::Material,
            farming_multiplier: 0.0,
            ..DropContext::default()
        };
        let (chance, _) = calc.drop_chance(&low, 60, 1, &ctx);
        assert_eq!(chance, MIN_DROP_CHANCE);
    }

    #[test]
    fn test_healing_floor() {
        let table = RarityTable::standard();
        let tuning = DropTuning::default();
        let calc = DropCalculator::new(&table, &tuning);
        let ctx = DropContext {
            reward_class: RewardClass::Healing,
            ..DropContext::default()
        };
        let (chance, _) = calc.drop_chance(&LootEntry::new("healing", 0.02), 5, 5, &ctx);
        assert!((chance - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_farming_softens_floor() {
        let table = RarityTable::standard();
        let tuning = DropTuning::default();
        let calc = DropCalculator::new(&table, &tuning);
        let ctx = DropContext {
            reward_class: RewardClass::Healing,
            farming_multiplier: 0.5,
            ..DropContext::default()
        };
        let (chance, _) = calc.drop_chance(&LootEntry::new("healing", 0.02), 5, 5, &ctx);
        assert!((chance - 0.075).abs() < 1e-12);
    }

    #[test]
    fn test_pity_raises_and_caps() {
        let table = RarityTable::standard();
        let tuning = DropTuning::default();
        let calc = DropCalculator::new(&table, &tuning);
        let entry = material_entry(0.2);
        let chance_at = |n| {
            let ctx = DropContext {
                consecutive_empty: n,
                ..material_ctx()
            };
            calc.drop_chance(&entry, 1, 1, &ctx).0
        };
        assert!(chance_at(2) > chance_at(0));
        assert!((chance_at(2) - 0.2 * 1.3).abs() < 1e-12);
        assert_eq!(chance_at(20), chance_at(100));
        assert!((chance_at(100) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_target_blend_raises_only() {
        let table = RarityTable::standard();
        let tuning = DropTuning::default();
        let calc = DropCalculator::new(&table, &tuning);
        let target = MeaningfulTarget {
            probability: 0.5,
            entry_count: 2,
        };

        let low = material_entry(0.05);
        let with_target = DropContext {
            target: Some(target),
            ..material_ctx()
        };
        let (raised, _) = calc.drop_chance(&low, 1, 1, &with_target);
        assert!(raised > 0.05);

        let high = material_entry(0.9);
        let (kept, _) = calc.drop_chance(&high, 1, 1, &with_target);
        assert!((kept - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_per_entry_share() {
        let target = MeaningfulTarget {
            probability: 0.75,
            entry_count: 2,
        };
        // 1 - sqrt(0.25)
        assert!((target.per_entry_share() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_overlevelled_chance_lower() {
        let table = RarityTable::standard();
        let tuning = DropTuning::default();
        let calc = DropCalculator::new(&table, &tuning);
        let entry = material_entry(0.4);
        let (even, _) = calc.drop_chance(&entry, 1, 1, &material_ctx());
        let (over, _) = calc.drop_chance(&entry, 30, 1, &material_ctx());
        assert!(over < even);
    }

    #[test]
    fn test_roll_reports_rarity_only_on_drop() {
        let table = RarityTable::standard();
        let tuning = DropTuning::default();
        let calc = DropCalculator::new(&table, &tuning);
        let mut rng = LootRng::seeded(7);
        for _ in 0..200 {
            let roll = calc.roll_for_loot(&material_entry(0.4), 1, 1, &material_ctx(), &mut rng);
            assert_eq!(roll.dropped, roll.rarity.is_some());
            if let Some(tier) = roll.rarity {
                assert!(tier <= RarityTier::Rare);
            }
        }
    }

    #[test]
    fn test_default_tuning_valid() {
        assert!(DropTuning::default().check().is_ok());
        let bad = DropTuning {
            target_blend: 2.0,
            ..DropTuning::default()
        };
        assert_eq!(bad.check().unwrap_err().0, "target_blend");
    }
}
