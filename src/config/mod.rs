//! Engine configuration.
//!
//! Everything has a default, so a config file only needs the fields it
//! changes. Files are `.ron` or `.json`.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::catalog::ExplorationType;
use crate::constants::PERF_BUDGET_MS;
use crate::drops::DropTuning;
use crate::error::ConfigError;
use crate::farming::FarmingPolicy;
use crate::logging::TracingConfig;
use crate::rarity::TierDefinition;

/// Drop-chance and gold multipliers for one exploration style
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExplorationFactor {
    pub drop: f64,
    pub gold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorationMultipliers {
    pub standard: ExplorationFactor,
    pub thorough: ExplorationFactor,
    pub quick: ExplorationFactor,
    pub treasure_hunt: ExplorationFactor,
}

impl Default for ExplorationMultipliers {
    fn default() -> Self {
        Self {
            standard: ExplorationFactor { drop: 1.0, gold: 1.0 },
            thorough: ExplorationFactor { drop: 1.25, gold: 1.3 },
            quick: ExplorationFactor { drop: 0.75, gold: 0.8 },
            treasure_hunt: ExplorationFactor { drop: 1.5, gold: 2.0 },
        }
    }
}

impl ExplorationMultipliers {
    pub fn factor(&self, exploration: ExplorationType) -> ExplorationFactor {
        match exploration {
            ExplorationType::Standard => self.standard,
            ExplorationType::Thorough => self.thorough,
            ExplorationType::Quick => self.quick,
            ExplorationType::TreasureHunt => self.treasure_hunt,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LootConfig {
    /// Fixed seed for reproducible runs; random when absent
    pub seed: Option<u64>,
    pub farming: FarmingPolicy,
    /// Capacity of each engine cache
    pub cache_capacity: usize,
    pub drop_tuning: DropTuning,
    pub exploration: ExplorationMultipliers,
    /// Chance of at least one meaningful drop per encounter to steer toward
    pub meaningful_target: Option<f64>,
    /// Track consecutive empty encounters and apply the pity bonus
    pub pity_enabled: bool,
    /// Custom rarity tiers; missing tiers use the standard table
    pub rarity_tiers: Option<Vec<TierDefinition>>,
    pub perf_budget_ms: f64,
    /// Subscriber filters for hosts that let the crate install one
    pub logging: TracingConfig,
}

impl Default for LootConfig {
    fn default() -> Self {
        Self {
            seed: None,
            farming: FarmingPolicy::default(),
            cache_capacity: 256,
            drop_tuning: DropTuning::default(),
            exploration: ExplorationMultipliers::default(),
            meaningful_target: Some(0.3),
            pity_enabled: true,
            rarity_tiers: None,
            perf_budget_ms: PERF_BUDGET_MS,
            logging: TracingConfig::default(),
        }
    }
}

impl LootConfig {
    /// Deterministic config for tests and replays
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("ron") => ron::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };
        config.validate()?;
        info!(path = %path.display(), seed = ?config.seed, "Loot config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let farming = &self.farming;
        if farming.window_secs == 0 {
            return invalid("farming.window_secs", "must be positive");
        }
        if !(farming.max_penalty > 0.0 && farming.max_penalty < 1.0) {
            return invalid("farming.max_penalty", format!("{} not in (0, 1)", farming.max_penalty));
        }
        if !(farming.free_encounters < farming.moderate_limit
            && farming.moderate_limit < farming.heavy_limit)
        {
            return invalid(
                "farming thresholds",
                "free < moderate < heavy must hold".to_string(),
            );
        }
        if farming.heavy_range.1 > farming.max_penalty {
            return invalid(
                "farming.heavy_range",
                "upper end exceeds max_penalty".to_string(),
            );
        }
        if self.cache_capacity == 0 {
            return invalid("cache_capacity", "must be positive");
        }
        if let Err((field, reason)) = self.drop_tuning.check() {
            return invalid(field, reason);
        }
        let factors = [
            self.exploration.standard,
            self.exploration.thorough,
            self.exploration.quick,
            self.exploration.treasure_hunt,
        ];
        if factors
            .iter()
            .any(|f| !(f.drop.is_finite() && f.drop > 0.0 && f.gold.is_finite() && f.gold > 0.0))
        {
            return invalid("exploration", "multipliers must be positive");
        }
        if let Some(target) = self.meaningful_target {
            if !(0.0..1.0).contains(&target) {
                return invalid("meaningful_target", format!("{target} not in [0, 1)"));
            }
        }
        if !(self.perf_budget_ms > 0.0) {
            return invalid("perf_budget_ms", "must be positive");
        }
        Ok(())
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> Result<(), ConfigError> {
    Err(ConfigError::Invalid {
        field,
        reason: reason.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_default_is_valid() {
        assert!(LootConfig::default().validate().is_ok());
    }

    #[test]
    fn test_exploration_defaults() {
        let m = ExplorationMultipliers::default();
        assert_eq!(m.factor(ExplorationType::TreasureHunt).gold, 2.0);
        assert_eq!(m.factor(ExplorationType::Quick).drop, 0.75);
    }

    #[test]
    fn test_rejects_bad_penalty() {
        let mut config = LootConfig::default();
        config.farming.max_penalty = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "farming.max_penalty", .. })
        ));
    }

    #[test]
    fn test_rejects_unordered_thresholds() {
        let mut config = LootConfig::default();
        config.farming.moderate_limit = 30;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_json() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(file, r#"{{"seed": 7, "cache_capacity": 32}}"#).unwrap();
        let config = LootConfig::from_file(file.path()).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.cache_capacity, 32);
        assert_eq!(config.farming.window_secs, 3600);
    }

    #[test]
    fn test_load_ron() {
        let mut file = Builder::new().suffix(".ron").tempfile().unwrap();
        writeln!(file, "(seed: Some(9), pity_enabled: false, farming: (window_secs: 600))").unwrap();
        let config = LootConfig::from_file(file.path()).unwrap();
        assert_eq!(config.seed, Some(9));
        assert!(!config.pity_enabled);
        assert_eq!(config.farming.window_secs, 600);
        assert_eq!(config.farming.heavy_limit, 20);
    }

    #[test]
    fn test_load_logging_section() {
        let mut file = Builder::new().suffix(".ron").tempfile().unwrap();
        writeln!(
            file,
            r#"(logging: (default_level: warn, module_filters: [("loot_core::farming", debug)]))"#
        )
        .unwrap();
        let config = LootConfig::from_file(file.path()).unwrap();
        assert_eq!(
            config.logging.to_env_filter_string(),
            "warn,loot_core::farming=debug"
        );
        assert!(config.logging.show_targets);
    }

    #[test]
    fn test_unsupported_extension() {
        let file = Builder::new().suffix(".toml").tempfile().unwrap();
        assert!(matches!(
            LootConfig::from_file(file.path()),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_invalid_file_rejected() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(file, r#"{{"cache_capacity": 0}}"#).unwrap();
        assert!(matches!(
            LootConfig::from_file(file.path()),
            Err(ConfigError::Invalid { field: "cache_capacity", .. })
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = LootConfig::seeded(3);
        let back: LootConfig = serde_json::from_str(&config.to_json()).unwrap();
        assert_eq!(back.seed, Some(3));
    }
}
