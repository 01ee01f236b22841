//! Rarity tiers and the level-adjusted rarity roll.
//!
//! The table holds one definition per tier. Weights are expected to sum to
//! 1.0; a table that doesn't is logged once at construction and normalised
//! every time it is used.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::constants::{RARITY_SUM_TOLERANCE, RARITY_WEIGHT_FLOOR};
use crate::weighted;

/// Item rarity tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RarityTier {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl RarityTier {
    pub const ALL: [RarityTier; 5] = [
        RarityTier::Common,
        RarityTier::Uncommon,
        RarityTier::Rare,
        RarityTier::Epic,
        RarityTier::Legendary,
    ];

    /// 0 for common through 4 for legendary
    pub fn index(self) -> usize {
        match self {
            Self::Common => 0,
            Self::Uncommon => 1,
            Self::Rare => 2,
            Self::Epic => 3,
            Self::Legendary => 4,
        }
    }

    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Common,
            1 => Self::Uncommon,
            2 => Self::Rare,
            3 => Self::Epic,
            _ => Self::Legendary,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Uncommon => "uncommon",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        }
    }
}

impl fmt::Display for RarityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RarityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "common" => Ok(Self::Common),
            "uncommon" => Ok(Self::Uncommon),
            "rare" => Ok(Self::Rare),
            "epic" => Ok(Self::Epic),
            "legendary" => Ok(Self::Legendary),
            other => Err(format!("unknown rarity: {other}")),
        }
    }
}

/// Static definition of one tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierDefinition {
    pub tier: RarityTier,
    /// Share of drops at equal player/content level
    pub drop_rate: f64,
    /// Weight shift per level the content is above the player
    pub level_scaling: f64,
    pub value_multiplier: f64,
    pub quality_range: (f64, f64),
}

/// The five tier definitions, indexed by `RarityTier::index`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RarityTable {
    tiers: Vec<TierDefinition>,
}

impl Default for RarityTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl RarityTable {
    /// 65 / 25 / 8 / 1.8 / 0.2 %
    pub fn standard() -> Self {
        Self::new(Self::standard_definitions())
    }

    fn standard_definitions() -> Vec<TierDefinition> {
        vec![
            TierDefinition {
                tier: RarityTier::Common,
                drop_rate: 0.65,
                level_scaling: -0.004,
                value_multiplier: 1.0,
                quality_range: (0.6, 0.8),
            },
            TierDefinition {
                tier: RarityTier::Uncommon,
                drop_rate: 0.25,
                level_scaling: 0.0015,
                value_multiplier: 1.5,
                quality_range: (0.7, 0.9),
            },
            TierDefinition {
                tier: RarityTier::Rare,
                drop_rate: 0.08,
                level_scaling: 0.0015,
                value_multiplier: 2.5,
                quality_range: (0.8, 1.0),
            },
            TierDefinition {
                tier: RarityTier::Epic,
                drop_rate: 0.018,
                level_scaling: 0.0008,
                value_multiplier: 4.0,
                quality_range: (0.9, 1.1),
            },
            TierDefinition {
                tier: RarityTier::Legendary,
                drop_rate: 0.002,
                level_scaling: 0.0002,
                value_multiplier: 8.0,
                quality_range: (1.0, 1.25),
            },
        ]
    }

    /// Build a table from arbitrary definitions. Missing tiers are filled
    /// from the standard table; a bad weight sum is logged, never rejected.
    pub fn new(definitions: Vec<TierDefinition>) -> Self {
        let mut slots: Vec<Option<TierDefinition>> = vec![None; RarityTier::ALL.len()];
        for mut def in definitions {
            if def.quality_range.0 > def.quality_range.1 {
                warn!(tier = %def.tier, "Quality range inverted, swapping");
                def.quality_range = (def.quality_range.1, def.quality_range.0);
            }
            let idx = def.tier.index();
            slots[idx] = Some(def);
        }

        let standard = Self::standard_definitions();
        let tiers = slots
            .into_iter()
            .zip(standard)
            .map(|(slot, fallback)| slot.unwrap_or(fallback))
            .collect();

        let table = Self { tiers };
        table.validate();
        table
    }

    /// Returns the weight sum's deviation from 1.0, warning when it is
    /// outside tolerance.
    pub fn validate(&self) -> f64 {
        let sum: f64 = self.tiers.iter().map(|t| t.drop_rate).sum();
        let deviation = (sum - 1.0).abs();
        if deviation > RARITY_SUM_TOLERANCE {
            warn!(
                sum,
                "Rarity drop rates do not sum to 1.0; they will be normalised at use"
            );
        }
        deviation
    }

    pub fn definition(&self, tier: RarityTier) -> &TierDefinition {
        &self.tiers[tier.index()]
    }

    pub fn definitions(&self) -> &[TierDefinition] {
        &self.tiers
    }

    /// Default distribution as a weight map
    pub fn default_weights(&self) -> BTreeMap<RarityTier, f64> {
        self.tiers.iter().map(|t| (t.tier, t.drop_rate)).collect()
    }

    /// Level-adjust, floor and normalise a weight map.
    ///
    /// `level_difference` is content level minus player level. An empty map
    /// uses the table's default distribution.
    pub fn adjusted_weights(
        &self,
        weights: &BTreeMap<RarityTier, f64>,
        level_difference: i32,
    ) -> Vec<(RarityTier, f64)> {
        let source = if weights.is_empty() {
            self.default_weights()
        } else {
            weights.clone()
        };

        let mut adjusted: Vec<(RarityTier, f64)> = source
            .iter()
            .map(|(tier, w)| {
                let base = if w.is_finite() { *w } else { 0.0 };
                let scaled = base + level_difference as f64 * self.definition(*tier).level_scaling;
                (*tier, scaled.max(RARITY_WEIGHT_FLOOR))
            })
            .collect();

        if !weighted::normalize(&mut adjusted) {
            // Unreachable with the floor in place, kept for empty input
            adjusted = vec![(RarityTier::Common, 1.0)];
        }
        adjusted
    }

    /// Roll a tier from a weight map
    pub fn roll_for_rarity(
        &self,
        weights: &BTreeMap<RarityTier, f64>,
        level_difference: i32,
        roll: f64,
    ) -> RarityTier {
        let adjusted = self.adjusted_weights(weights, level_difference);
        pick_tier(&adjusted, roll)
    }
}

/// Pick from already-normalised weights
pub fn pick_tier(weights: &[(RarityTier, f64)], roll: f64) -> RarityTier {
    weighted::pick(weights, roll)
        .copied()
        .unwrap_or(RarityTier::Common)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rarity_ordering() {
        assert!(RarityTier::Common < RarityTier::Legendary);
        assert!(RarityTier::Rare < RarityTier::Epic);
        for (i, tier) in RarityTier::ALL.iter().enumerate() {
            assert_eq!(tier.index(), i);
            assert_eq!(RarityTier::from_index(i), *tier);
        }
    }

    #[test]
    fn test_standard_table_sums_to_one() {
        let table = RarityTable::standard();
        assert!(table.validate() < 1e-9);
    }

    #[test]
    fn test_malformed_table_normalised_not_rejected() {
        let table = RarityTable::new(vec![TierDefinition {
            tier: RarityTier::Common,
            drop_rate: 3.0,
            level_scaling: 0.0,
            value_multiplier: 1.0,
            quality_range: (0.9, 0.5),
        }]);
        assert!(table.validate() > 1.0);
        assert_eq!(table.definition(RarityTier::Common).quality_range, (0.5, 0.9));
        let weights = table.adjusted_weights(&BTreeMap::new(), 0);
        let sum: f64 = weights.iter().map(|(_, w)| w).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_level_difference_keeps_shape() {
        let table = RarityTable::standard();
        let mut map = BTreeMap::new();
        map.insert(RarityTier::Common, 0.7);
        map.insert(RarityTier::Uncommon, 0.25);
        map.insert(RarityTier::Rare, 0.05);
        let adjusted = table.adjusted_weights(&map, 0);
        assert_eq!(adjusted.len(), 3);
        assert!((adjusted[0].1 - 0.7).abs() < 1e-12);
        assert!((adjusted[2].1 - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_harder_content_shifts_toward_rare() {
        let table = RarityTable::standard();
        let even = table.adjusted_weights(&BTreeMap::new(), 0);
        let hard = table.adjusted_weights(&BTreeMap::new(), 20);
        assert!(hard[0].1 < even[0].1);
        assert!(hard[2].1 > even[2].1);
    }

    #[test]
    fn test_floor_keeps_tiers_reachable() {
        let table = RarityTable::standard();
        let mut map = BTreeMap::new();
        map.insert(RarityTier::Common, 0.01);
        map.insert(RarityTier::Legendary, 0.0);
        let adjusted = table.adjusted_weights(&map, 0);
        assert!(adjusted.iter().all(|(_, w)| *w > 0.0));
    }

    #[test]
    fn test_roll_extremes() {
        let table = RarityTable::standard();
        assert_eq!(
            table.roll_for_rarity(&BTreeMap::new(), 0, 0.0),
            RarityTier::Common
        );
        assert_eq!(
            table.roll_for_rarity(&BTreeMap::new(), 0, 0.9999),
            RarityTier::Legendary
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Epic".parse::<RarityTier>().unwrap(), RarityTier::Epic);
        assert!("mythic".parse::<RarityTier>().is_err());
    }
}
