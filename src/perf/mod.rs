//! Performance self-test and Monte-Carlo drop simulation.
//!
//! `run_performance_test` times generate calls on a scratch engine that
//! shares the live engine's config and catalog, so the live farming history
//! and pity counter are left alone. `simulate_drop_distribution` rolls a
//! single entry many times across CPU cores with rayon.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::info;

use crate::catalog::{ExplorationType, LootEntry};
use crate::drops::{DropCalculator, DropContext, DropTuning};
use crate::loot::LootEngine;
use crate::rarity::{RarityTable, RarityTier};
use crate::rng::LootRng;

/// Latency grade relative to the per-call budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PerformanceGrade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl PerformanceGrade {
    /// Grade from average latency as a fraction of the budget
    pub fn from_budget_ratio(ratio: f64) -> Self {
        if ratio <= 0.10 {
            Self::APlus
        } else if ratio <= 0.25 {
            Self::A
        } else if ratio <= 0.50 {
            Self::B
        } else if ratio <= 0.75 {
            Self::C
        } else if ratio <= 1.0 {
            Self::D
        } else {
            Self::F
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub iterations: u32,
    pub avg_ms: f64,
    pub p95_ms: f64,
    pub max_ms: f64,
    pub budget_ms: f64,
    pub calls_per_second: f64,
    pub items_generated: u64,
    pub grade: PerformanceGrade,
    pub within_budget: bool,
}

impl PerformanceReport {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

const MONSTER_MIX: [&str; 8] = [
    "slime",
    "goblin",
    "skeleton",
    "orc_warrior",
    "troll",
    "wraith",
    "lich",
    "unknown_beast_20",
];

const AREA_MIX: [(&str, ExplorationType); 4] = [
    ("forest", ExplorationType::Standard),
    ("dark_cave", ExplorationType::Quick),
    ("ancient_ruins", ExplorationType::Thorough),
    ("uncharted_wastes_30", ExplorationType::TreasureHunt),
];

/// Time a mix of monster and area calls, including unknown content
pub fn run_performance_test(engine: &LootEngine, iterations: u32) -> PerformanceReport {
    let scratch = LootEngine::new(engine.config().clone(), engine.catalog());
    let budget_ms = engine.config().perf_budget_ms;
    let iterations = iterations.max(1);

    let mut samples = Vec::with_capacity(iterations as usize);
    let mut items_generated = 0u64;
    let started = Instant::now();

    for i in 0..iterations as usize {
        let player_level = 1 + (i as u32 * 7) % 50;
        let call = Instant::now();
        let result = if i % 3 == 2 {
            let (area, exploration) = AREA_MIX[i % AREA_MIX.len()];
            scratch.generate_area_loot(area, player_level, exploration)
        } else {
            scratch.generate_monster_loot(MONSTER_MIX[i % MONSTER_MIX.len()], player_level, Some("forest"))
        };
        samples.push(call.elapsed().as_secs_f64() * 1000.0);
        items_generated += result.items.len() as u64;
    }

    let total_secs = started.elapsed().as_secs_f64();
    samples.sort_by(|a, b| a.total_cmp(b));
    let avg_ms = samples.iter().sum::<f64>() / samples.len() as f64;
    let p95_index = ((samples.len() as f64 * 0.95).ceil() as usize).saturating_sub(1);
    let p95_ms = samples[p95_index.min(samples.len() - 1)];
    let max_ms = samples.last().copied().unwrap_or_default();

    let grade = PerformanceGrade::from_budget_ratio(avg_ms / budget_ms);
    let report = PerformanceReport {
        iterations,
        avg_ms,
        p95_ms,
        max_ms,
        budget_ms,
        calls_per_second: if total_secs > 0.0 {
            iterations as f64 / total_secs
        } else {
            0.0
        },
        items_generated,
        grade,
        within_budget: max_ms <= budget_ms,
    };

    info!(
        iterations,
        avg_ms,
        p95_ms,
        grade = grade.as_str(),
        "Performance test finished"
    );
    report
}

/// Settings for a Monte-Carlo run of one entry
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub trials: u64,
    pub player_level: u32,
    pub content_level: u32,
    pub base_seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            trials: 100_000,
            player_level: 1,
            content_level: 1,
            base_seed: 42,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionReport {
    pub trials: u64,
    pub drops: u64,
    /// Chance the calculator assigned to the entry
    pub drop_chance: f64,
    pub drop_rate: f64,
    pub rarity_counts: BTreeMap<RarityTier, u64>,
    /// Fraction of drops per tier
    pub rarity_split: BTreeMap<RarityTier, f64>,
}

const SIM_CHUNK: u64 = 4096;

/// Roll `entry` `config.trials` times and tally drops and tiers
pub fn simulate_drop_distribution(
    entry: &LootEntry,
    ctx: &DropContext,
    rarity: &RarityTable,
    tuning: &DropTuning,
    config: &SimConfig,
) -> DistributionReport {
    let calculator = DropCalculator::new(rarity, tuning);
    let weights = calculator.rarity_weights(entry, config.player_level, config.content_level);
    let (drop_chance, _) = calculator.drop_chance(entry, config.player_level, config.content_level, ctx);

    let chunks = config.trials.div_ceil(SIM_CHUNK);
    let tallies: Vec<[u64; 6]> = (0..chunks)
        .into_par_iter()
        .map(|chunk| {
            let mut rng = LootRng::stream(config.base_seed, chunk, "simulate");
            let start = chunk * SIM_CHUNK;
            let end = (start + SIM_CHUNK).min(config.trials);
            // [drops, common, uncommon, rare, epic, legendary]
            let mut tally = [0u64; 6];
            for _ in start..end {
                if rng.chance(drop_chance) {
                    tally[0] += 1;
                    let tier = crate::rarity::pick_tier(&weights, rng.roll());
                    tally[1 + tier.index()] += 1;
                }
            }
            tally
        })
        .collect();

    let mut totals = [0u64; 6];
    for tally in &tallies {
        for (total, n) in totals.iter_mut().zip(tally) {
            *total += n;
        }
    }

    let drops = totals[0];
    let rarity_counts: BTreeMap<RarityTier, u64> = RarityTier::ALL
        .iter()
        .map(|tier| (*tier, totals[1 + tier.index()]))
        .collect();
    let rarity_split = rarity_counts
        .iter()
        .map(|(tier, n)| {
            let share = if drops == 0 { 0.0 } else { *n as f64 / drops as f64 };
            (*tier, share)
        })
        .collect();

    DistributionReport {
        trials: config.trials,
        drops,
        drop_chance,
        drop_rate: if config.trials == 0 {
            0.0
        } else {
            drops as f64 / config.trials as f64
        },
        rarity_counts,
        rarity_split,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{RewardClass, StaticCatalog};
    use crate::config::LootConfig;
    use std::sync::Arc;

    #[test]
    fn test_grade_thresholds() {
        assert_eq!(PerformanceGrade::from_budget_ratio(0.05), PerformanceGrade::APlus);
        assert_eq!(PerformanceGrade::from_budget_ratio(0.2), PerformanceGrade::A);
        assert_eq!(PerformanceGrade::from_budget_ratio(0.5), PerformanceGrade::B);
        assert_eq!(PerformanceGrade::from_budget_ratio(0.7), PerformanceGrade::C);
        assert_eq!(PerformanceGrade::from_budget_ratio(1.0), PerformanceGrade::D);
        assert_eq!(PerformanceGrade::from_budget_ratio(3.0), PerformanceGrade::F);
        assert_eq!(serde_json::to_string(&PerformanceGrade::APlus).unwrap(), "\"A+\"");
    }

    #[test]
    fn test_perf_run_leaves_engine_untouched() {
        let engine = LootEngine::new(LootConfig::seeded(11), Arc::new(StaticCatalog::builtin()));
        let report = run_performance_test(&engine, 30);
        assert_eq!(report.iterations, 30);
        assert!(report.avg_ms <= report.max_ms);
        assert!(report.p95_ms <= report.max_ms);
        let stats = engine.get_system_stats();
        assert_eq!(stats.monster_generations, 0);
        assert_eq!(stats.farming.tracked_keys, 0);
    }

    #[test]
    fn test_simulation_small() {
        let entry = LootEntry::new("material", 0.4).with_weights(&[
            (RarityTier::Common, 0.7),
            (RarityTier::Uncommon, 0.25),
            (RarityTier::Rare, 0.05),
        ]);
        let ctx = DropContext {
            reward_class: RewardClass::Material,
            ..DropContext::default()
        };
        let config = SimConfig {
            trials: 20_000,
            ..SimConfig::default()
        };
        let report = simulate_drop_distribution(
            &entry,
            &ctx,
            &RarityTable::standard(),
            &DropTuning::default(),
            &config,
        );
        assert_eq!(report.trials, 20_000);
        assert!((report.drop_rate - 0.4).abs() < 0.03);
        assert_eq!(report.rarity_counts[&RarityTier::Legendary], 0);
        let total: u64 = report.rarity_counts.values().sum();
        assert_eq!(total, report.drops);
    }

    #[test]
    fn test_deterministic_results() {
        let entry = LootEntry::new("equipment", 0.1);
        let ctx = DropContext {
            reward_class: RewardClass::Equipment,
            ..DropContext::default()
        };
        let config = SimConfig {
            trials: 10_000,
            player_level: 10,
            content_level: 14,
            base_seed: 7,
        };
        let table = RarityTable::standard();
        let tuning = DropTuning::default();
        let a = simulate_drop_distribution(&entry, &ctx, &table, &tuning, &config);
        let b = simulate_drop_distribution(&entry, &ctx, &table, &tuning, &config);
        assert_eq!(a.drops, b.drops);
        assert_eq!(a.rarity_counts, b.rarity_counts);
    }
}
