//! Loot orchestration.
//!
//! `LootEngine` walks a monster's or area's loot table. Every entry is rolled
//! by the drop calculator, and on success resolved to a concrete item and
//! generated. Gold and experience are added once per call.
//!
//! The two generate calls never fail. Unknown content gets a synthesised
//! table, unresolvable items become the guaranteed material, and any other
//! internal error degrades to a gold-only result.

pub mod item;
pub mod table;

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

use crate::cache::{weight_map_key, CacheStats, LootCache};
use crate::catalog::{
    normalize_id, AreaTheme, CharacterClass, ConsumableClass, EncounterType, ExplorationType,
    GameCatalog, ItemKind, LootEntry, RewardClass, RewardDescriptor, StaticCatalog,
};
use crate::config::LootConfig;
use crate::constants::{
    GOLD_BASE, GOLD_PER_LEVEL, GOLD_VARIANCE, MAX_LEVEL, XP_BASE, XP_MAX_REDUCTION,
    XP_OVERLEVEL_STEP, XP_PER_LEVEL,
};
use crate::drops::{DropCalculator, DropContext, MeaningfulTarget};
use crate::error::LootError;
use crate::farming::{
    Clock, ContentKind, DiminishingReturnsInfo, FarmingStats, FarmingTracker, SystemClock,
};
use crate::progression::progression_penalty;
use crate::rarity::{RarityTable, RarityTier};
use crate::resolver::{ItemResolver, ResolveContext};
use crate::rng::LootRng;

pub use item::{GeneratedItem, ItemProperty, SpellLearning};
pub use table::ResolvedTable;

/// Optional hints for one generate call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LootRequest {
    pub player_level: u32,
    pub class: Option<CharacterClass>,
    pub encounter: EncounterType,
    /// Area a monster was fought in
    pub area_id: Option<String>,
    /// Overrides the area's default exploration style
    pub exploration: Option<ExplorationType>,
    /// Overrides the configured meaningful-drop target
    pub meaningful_target: Option<f64>,
}

impl LootRequest {
    pub fn new(player_level: u32) -> Self {
        Self {
            player_level,
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class: CharacterClass) -> Self {
        self.class = Some(class);
        self
    }

    pub fn with_encounter(mut self, encounter: EncounterType) -> Self {
        self.encounter = encounter;
        self
    }

    pub fn in_area(mut self, area_id: &str) -> Self {
        self.area_id = Some(area_id.to_string());
        self
    }

    pub fn with_exploration(mut self, exploration: ExplorationType) -> Self {
        self.exploration = Some(exploration);
        self
    }

    pub fn with_target(mut self, probability: f64) -> Self {
        self.meaningful_target = Some(probability);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootMetadata {
    pub source_kind: ContentKind,
    pub source_id: String,
    pub player_level: u32,
    pub content_level: u32,
    /// Unix epoch milliseconds
    pub timestamp_ms: u64,
    pub farming_multiplier: f64,
    pub encounters_in_window: usize,
    pub exploration: Option<ExplorationType>,
    /// Synthesised table, fallback item, or degraded result
    pub used_fallback: bool,
    /// Empty encounters in a row after this one
    pub pity_streak: u32,
    pub generation_us: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootResult {
    pub items: Vec<GeneratedItem>,
    pub gold: u64,
    pub experience: u64,
    pub metadata: LootMetadata,
}

impl LootResult {
    pub fn total_value(&self) -> u64 {
        self.items
            .iter()
            .map(|i| i.value as u64 * i.quantity as u64)
            .sum()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Engine-wide counters and state sizes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemStats {
    pub seed: u64,
    pub monster_generations: u64,
    pub area_generations: u64,
    pub items_generated: u64,
    pub gold_generated: u64,
    pub fallbacks_used: u64,
    pub degraded_results: u64,
    pub pity_streak: u32,
    pub cache: CacheStats,
    pub farming: FarmingStats,
}

#[derive(Default)]
struct Counters {
    monster_generations: AtomicU64,
    area_generations: AtomicU64,
    items_generated: AtomicU64,
    gold_generated: AtomicU64,
    fallbacks_used: AtomicU64,
    degraded_results: AtomicU64,
}

/// Per-call view of the content being looted
struct Encounter<'a> {
    table: &'a ResolvedTable,
    player_level: u32,
    request: &'a LootRequest,
    area_theme: Option<AreaTheme>,
    chance_multiplier: f64,
    gold_multiplier: f64,
    exploration: Option<ExplorationType>,
}

pub struct LootEngine {
    config: LootConfig,
    catalog: Arc<dyn GameCatalog>,
    rarity: RarityTable,
    farming: FarmingTracker,
    cache: LootCache,
    seed: u64,
    nonce: AtomicU64,
    pity: AtomicU32,
    counters: Counters,
}

impl LootEngine {
    pub fn new(config: LootConfig, catalog: Arc<dyn GameCatalog>) -> Self {
        Self::with_clock(config, catalog, Arc::new(SystemClock::default()))
    }

    /// Engine over the bundled demo catalog
    pub fn with_builtin_catalog(config: LootConfig) -> Self {
        Self::new(config, Arc::new(StaticCatalog::builtin()))
    }

    pub fn with_clock(config: LootConfig, catalog: Arc<dyn GameCatalog>, clock: Arc<dyn Clock>) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let rarity = match &config.rarity_tiers {
            Some(tiers) => RarityTable::new(tiers.clone()),
            None => RarityTable::standard(),
        };
        let farming = FarmingTracker::new(config.farming.clone(), clock);
        let cache = LootCache::new(config.cache_capacity);

        info!(seed, cache_capacity = config.cache_capacity, "Loot engine ready");

        Self {
            config,
            catalog,
            rarity,
            farming,
            cache,
            seed,
            nonce: AtomicU64::new(0),
            pity: AtomicU32::new(0),
            counters: Counters::default(),
        }
    }

    pub fn config(&self) -> &LootConfig {
        &self.config
    }

    pub fn catalog(&self) -> Arc<dyn GameCatalog> {
        Arc::clone(&self.catalog)
    }

    pub fn rarity_table(&self) -> &RarityTable {
        &self.rarity
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    // =====================================================
    // Generation
    // =====================================================

    pub fn generate_monster_loot(
        &self,
        monster_id: &str,
        player_level: u32,
        area_id: Option<&str>,
    ) -> LootResult {
        let mut request = LootRequest::new(player_level);
        request.area_id = area_id.map(str::to_string);
        self.generate_monster_loot_with(monster_id, &request)
    }

    pub fn generate_area_loot(
        &self,
        area_id: &str,
        player_level: u32,
        exploration: ExplorationType,
    ) -> LootResult {
        let request = LootRequest::new(player_level).with_exploration(exploration);
        self.generate_area_loot_with(area_id, &request)
    }

    pub fn generate_monster_loot_with(&self, monster_id: &str, request: &LootRequest) -> LootResult {
        self.counters.monster_generations.fetch_add(1, Ordering::Relaxed);
        self.generate(ContentKind::Monster, monster_id, request)
    }

    pub fn generate_area_loot_with(&self, area_id: &str, request: &LootRequest) -> LootResult {
        self.counters.area_generations.fetch_add(1, Ordering::Relaxed);
        self.generate(ContentKind::Area, area_id, request)
    }

    fn generate(&self, kind: ContentKind, content_id: &str, request: &LootRequest) -> LootResult {
        let started = Instant::now();
        let id = normalize_id(content_id);
        let nonce = self.nonce.fetch_add(1, Ordering::Relaxed);
        let mut item_rng = LootRng::stream(self.seed, nonce, "items");
        let mut gold_rng = LootRng::stream(self.seed, nonce, "gold");

        let clamped;
        let request = if request.player_level > MAX_LEVEL {
            debug!(level = request.player_level, "Player level clamped to cap");
            clamped = LootRequest {
                player_level: MAX_LEVEL,
                ..request.clone()
            };
            &clamped
        } else {
            request
        };

        let mut result = match self.try_generate(kind, &id, request, &mut item_rng, &mut gold_rng) {
            Ok(result) => result,
            Err(err) => {
                warn!(content = %id, error = %err, "Loot generation degraded to gold only");
                self.counters.degraded_results.fetch_add(1, Ordering::Relaxed);
                self.degraded_result(kind, &id, request.player_level, &mut gold_rng)
            }
        };

        result.metadata.generation_us = started.elapsed().as_micros() as u64;
        if result.metadata.used_fallback {
            self.counters.fallbacks_used.fetch_add(1, Ordering::Relaxed);
        }
        self.counters
            .items_generated
            .fetch_add(result.items.len() as u64, Ordering::Relaxed);
        self.counters.gold_generated.fetch_add(result.gold, Ordering::Relaxed);

        info!(
            kind = ?kind,
            content = %id,
            player_level = result.metadata.player_level,
            items = result.items.len(),
            gold = result.gold,
            experience = result.experience,
            farming = result.metadata.farming_multiplier,
            "Loot generated"
        );
        result
    }

    fn try_generate(
        &self,
        kind: ContentKind,
        id: &str,
        request: &LootRequest,
        item_rng: &mut LootRng,
        gold_rng: &mut LootRng,
    ) -> Result<LootResult, LootError> {
        let player_level = request.player_level;
        if player_level == 0 {
            return Err(LootError::InvalidLevel(player_level));
        }

        let table = self.resolve_table(kind, id);
        let encounter = self.encounter(&table, request);

        let encounters_in_window = self.farming.record_encounter(kind, id, player_level);
        let farming_multiplier = self.farming.policy().multiplier_for_count(encounters_in_window);

        let mut used_fallback = table.synthesized;
        let mut meaningful = false;
        let mut items = Vec::new();
        let mut bonus_gold_entries = 0u32;

        let target = request
            .meaningful_target
            .or(self.config.meaningful_target)
            .map(|probability| MeaningfulTarget {
                probability,
                entry_count: table.drops.len(),
            });
        let consecutive_empty = if self.config.pity_enabled {
            self.pity.load(Ordering::Relaxed)
        } else {
            0
        };

        let calculator = DropCalculator::new(&self.rarity, &self.config.drop_tuning);
        let resolver = ItemResolver::new(self.catalog.as_ref()).with_cache(&self.cache);

        for entry in &table.drops {
            let reward_class = self.classify(entry);
            let ctx = DropContext {
                reward_class,
                target,
                consecutive_empty,
                farming_multiplier,
                chance_multiplier: encounter.chance_multiplier,
            };
            let weights = self.weights_for(entry, player_level, table.content_level);
            let roll = calculator.roll_with_weights(
                entry,
                player_level,
                table.content_level,
                &ctx,
                &weights,
                item_rng,
            );
            let Some(rarity) = roll.rarity else {
                continue;
            };

            if entry.item_type == RewardDescriptor::Gold {
                bonus_gold_entries += 1;
                continue;
            }

            let (item, fallback) = self.produce_item(&resolver, entry, &encounter, rarity, item_rng);
            used_fallback |= fallback;
            meaningful |= is_meaningful(reward_class, rarity);
            items.push(item);
        }

        let pity_streak = self.update_pity(meaningful);

        let level_difference = player_level as i32 - table.content_level as i32;
        let progression = progression_penalty(level_difference, player_level, table.content_level);
        let mut gold = self.roll_gold(&table, progression, encounter.gold_multiplier, gold_rng);
        if bonus_gold_entries > 0 {
            let bonus = self.roll_gold(&table, progression, encounter.gold_multiplier, item_rng) / 2;
            gold += bonus * bonus_gold_entries as u64;
        }

        let experience = match kind {
            ContentKind::Monster => experience_for(player_level, table.content_level),
            ContentKind::Area => 0,
        };

        debug!(
            content = %id,
            synthesized = table.synthesized,
            encounters_in_window,
            pity_streak,
            "Table resolved"
        );

        Ok(LootResult {
            items,
            gold,
            experience,
            metadata: LootMetadata {
                source_kind: kind,
                source_id: id.to_string(),
                player_level,
                content_level: table.content_level,
                timestamp_ms: now_epoch_ms(),
                farming_multiplier,
                encounters_in_window,
                exploration: encounter.exploration,
                used_fallback,
                pity_streak,
                generation_us: 0,
            },
        })
    }

    fn resolve_table(&self, kind: ContentKind, id: &str) -> Arc<ResolvedTable> {
        self.cache.table_or_insert_with((kind, id.to_string()), || {
            let found = match kind {
                ContentKind::Monster => self.catalog.monster(id).map(ResolvedTable::from_monster),
                ContentKind::Area => self.catalog.area(id).map(ResolvedTable::from_area),
            };
            found.unwrap_or_else(|| {
                let err = match kind {
                    ContentKind::Monster => LootError::UnknownMonster(id.to_string()),
                    ContentKind::Area => LootError::UnknownArea(id.to_string()),
                };
                warn!(error = %err, "Synthesising loot table");
                match kind {
                    ContentKind::Monster => ResolvedTable::synthesize_monster(id),
                    ContentKind::Area => ResolvedTable::synthesize_area(id),
                }
            })
        })
    }

    fn encounter<'a>(&self, table: &'a ResolvedTable, request: &'a LootRequest) -> Encounter<'a> {
        let player_level = request.player_level;
        match table.kind {
            ContentKind::Area => {
                let exploration = request.exploration.unwrap_or(table.default_exploration);
                let factor = self.config.exploration.factor(exploration);
                Encounter {
                    table,
                    player_level,
                    request,
                    area_theme: table.area_theme,
                    chance_multiplier: factor.drop * table.area_bonus,
                    gold_multiplier: factor.gold,
                    exploration: Some(exploration),
                }
            }
            ContentKind::Monster => {
                // The area a monster was fought in tints themes and drop rates
                let area = request.area_id.as_deref().map(normalize_id);
                let (area_theme, area_bonus) = match area.as_deref() {
                    Some(area_id) => match self.catalog.area(area_id) {
                        Some(a) => (Some(a.theme), a.loot_table.area_bonus),
                        None => (Some(AreaTheme::from_keywords(area_id)), 1.0),
                    },
                    None => (None, 1.0),
                };
                Encounter {
                    table,
                    player_level,
                    request,
                    area_theme,
                    chance_multiplier: area_bonus,
                    gold_multiplier: 1.0,
                    exploration: None,
                }
            }
        }
    }

    fn classify(&self, entry: &LootEntry) -> RewardClass {
        match &entry.item_type {
            RewardDescriptor::Concrete(id) => match self.catalog.item(id) {
                Some(item) => match item.kind {
                    ItemKind::Equipment => RewardClass::Equipment,
                    ItemKind::SpellContainer => RewardClass::Spell,
                    ItemKind::Consumable if item.consumable_class == Some(ConsumableClass::Healing) => {
                        RewardClass::Healing
                    }
                    ItemKind::Consumable => RewardClass::Consumable,
                    ItemKind::Material => RewardClass::Material,
                    ItemKind::Currency => RewardClass::Currency,
                    ItemKind::Misc => RewardClass::Other,
                },
                None => RewardClass::Other,
            },
            _ if !entry.equipment_categories.is_empty() => RewardClass::Equipment,
            descriptor => descriptor.default_class(),
        }
    }

    fn weights_for(
        &self,
        entry: &LootEntry,
        player_level: u32,
        content_level: u32,
    ) -> Arc<Vec<(RarityTier, f64)>> {
        let level_difference = content_level as i32 - player_level as i32;
        let key = (weight_map_key(&entry.rarity_weights), level_difference);
        self.cache.weights_or_insert_with(key, || {
            self.rarity
                .adjusted_weights(&entry.rarity_weights, level_difference)
        })
    }

    /// Resolve and build one item; the guaranteed material stands in for
    /// anything that cannot be built
    fn produce_item(
        &self,
        resolver: &ItemResolver<'_>,
        entry: &LootEntry,
        encounter: &Encounter<'_>,
        rarity: RarityTier,
        rng: &mut LootRng,
    ) -> (GeneratedItem, bool) {
        let table = encounter.table;
        let ctx = ResolveContext {
            player_level: encounter.player_level,
            content_level: table.content_level,
            class: encounter.request.class,
            area_theme: encounter.area_theme,
            monster: table.monster.clone(),
            encounter: encounter.request.encounter,
            rarity: Some(rarity),
        };

        let Some(resolved) = resolver.resolve_concrete_item(entry, &ctx, rng) else {
            return (item::safe_material(self.catalog.as_ref(), table.content_level), true);
        };

        let spec = item::ItemSpec {
            resolved: &resolved,
            rarity,
            content_level: table.content_level,
            quantity: entry.quantity,
        };
        match item::generate_item(self.catalog.as_ref(), &self.rarity, &spec, rng) {
            Ok(generated) => (generated, resolved.used_fallback),
            Err(err) => {
                warn!(item = %resolved.item_id, error = %err, "Item generation failed, substituting material");
                (item::safe_material(self.catalog.as_ref(), table.content_level), true)
            }
        }
    }

    fn update_pity(&self, meaningful: bool) -> u32 {
        if !self.config.pity_enabled {
            return 0;
        }
        if meaningful {
            self.pity.store(0, Ordering::Relaxed);
            0
        } else {
            self.pity.fetch_add(1, Ordering::Relaxed).saturating_add(1)
        }
    }

    fn roll_gold(
        &self,
        table: &ResolvedTable,
        progression: f64,
        gold_multiplier: f64,
        rng: &mut LootRng,
    ) -> u64 {
        let (lo, hi) = table.gold_range;
        let base = GOLD_BASE + GOLD_PER_LEVEL * table.content_level as f64 + rng.range_u32(lo, hi) as f64;
        let variance = rng.range_f64(1.0 - GOLD_VARIANCE, 1.0 + GOLD_VARIANCE);
        (base * progression * gold_multiplier * variance).round().max(1.0) as u64
    }

    fn degraded_result(
        &self,
        kind: ContentKind,
        id: &str,
        player_level: u32,
        gold_rng: &mut LootRng,
    ) -> LootResult {
        let level = player_level.clamp(1, MAX_LEVEL);
        let base = GOLD_BASE + GOLD_PER_LEVEL * level as f64;
        let variance = gold_rng.range_f64(1.0 - GOLD_VARIANCE, 1.0 + GOLD_VARIANCE);
        LootResult {
            items: Vec::new(),
            gold: (base * variance).round().max(1.0) as u64,
            experience: 0,
            metadata: LootMetadata {
                source_kind: kind,
                source_id: id.to_string(),
                player_level: level,
                content_level: level,
                timestamp_ms: now_epoch_ms(),
                farming_multiplier: 1.0,
                encounters_in_window: 0,
                exploration: None,
                used_fallback: true,
                pity_streak: self.pity.load(Ordering::Relaxed),
                generation_us: 0,
            },
        }
    }

    // =====================================================
    // Introspection
    // =====================================================

    /// Counters and state sizes. Touches neither cache order nor farming
    /// history.
    pub fn get_system_stats(&self) -> SystemStats {
        let c = &self.counters;
        SystemStats {
            seed: self.seed,
            monster_generations: c.monster_generations.load(Ordering::Relaxed),
            area_generations: c.area_generations.load(Ordering::Relaxed),
            items_generated: c.items_generated.load(Ordering::Relaxed),
            gold_generated: c.gold_generated.load(Ordering::Relaxed),
            fallbacks_used: c.fallbacks_used.load(Ordering::Relaxed),
            degraded_results: c.degraded_results.load(Ordering::Relaxed),
            pity_streak: self.pity.load(Ordering::Relaxed),
            cache: self.cache.stats(),
            farming: self.farming.stats(),
        }
    }

    pub fn get_diminishing_returns_info(
        &self,
        kind: ContentKind,
        content_id: &str,
        player_level: u32,
    ) -> DiminishingReturnsInfo {
        self.farming
            .info(kind, &normalize_id(content_id), player_level.min(MAX_LEVEL))
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
        debug!("Loot caches cleared");
    }

    pub fn reset_farming(&self) {
        self.farming.clear();
        self.pity.store(0, Ordering::Relaxed);
        debug!("Farming history reset");
    }
}

fn is_meaningful(class: RewardClass, rarity: RarityTier) -> bool {
    matches!(class, RewardClass::Equipment | RewardClass::Spell) || rarity > RarityTier::Common
}

/// `50 + 10 × level`, minus 10% per level the player is above the content,
/// at most 90% off
pub fn experience_for(player_level: u32, content_level: u32) -> u64 {
    let base = XP_BASE + XP_PER_LEVEL * content_level as f64;
    let over = player_level.saturating_sub(content_level) as f64;
    let reduction = (over * XP_OVERLEVEL_STEP).min(XP_MAX_REDUCTION);
    (base * (1.0 - reduction)).round() as u64
}

fn now_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::farming::ManualClock;

    fn engine(seed: u64) -> LootEngine {
        LootEngine::with_clock(
            LootConfig::seeded(seed),
            Arc::new(StaticCatalog::builtin()),
            Arc::new(ManualClock::new(1_000_000)),
        )
    }

    #[test]
    fn test_experience_curve() {
        assert_eq!(experience_for(1, 1), 60);
        assert_eq!(experience_for(5, 10), 150);
        assert_eq!(experience_for(12, 10), 120);
        assert_eq!(experience_for(60, 10), 15);
    }

    #[test]
    fn test_monster_loot_metadata() {
        let engine = engine(1);
        let result = engine.generate_monster_loot("Goblin", 3, Some("forest"));
        assert_eq!(result.metadata.source_id, "goblin");
        assert_eq!(result.metadata.content_level, 3);
        assert_eq!(result.metadata.source_kind, ContentKind::Monster);
        assert!(result.gold >= 1);
        assert_eq!(result.experience, 80);
    }

    #[test]
    fn test_area_loot_has_no_experience() {
        let engine = engine(2);
        let result = engine.generate_area_loot("forest", 5, ExplorationType::Thorough);
        assert_eq!(result.experience, 0);
        assert_eq!(result.metadata.exploration, Some(ExplorationType::Thorough));
    }

    #[test]
    fn test_unknown_monster_synthesised() {
        let engine = engine(3);
        let result = engine.generate_monster_loot("void_horror_33", 30, None);
        assert!(result.metadata.used_fallback);
        assert_eq!(result.metadata.content_level, 33);
        assert!(result.gold >= 1);
    }

    #[test]
    fn test_invalid_level_degrades_to_gold() {
        let engine = engine(4);
        let result = engine.generate_monster_loot("slime", 0, None);
        assert!(result.items.is_empty());
        assert!(result.gold >= 1);
        assert!(result.metadata.used_fallback);
        assert_eq!(engine.get_system_stats().degraded_results, 1);
    }

    #[test]
    fn test_same_seed_same_loot() {
        let a = engine(5);
        let b = engine(5);
        for _ in 0..10 {
            let ra = a.generate_monster_loot("orc_warrior", 15, None);
            let rb = b.generate_monster_loot("orc_warrior", 15, None);
            assert_eq!(ra.items, rb.items);
            assert_eq!(ra.gold, rb.gold);
        }
    }

    #[test]
    fn test_stats_do_not_mutate() {
        let engine = engine(6);
        engine.generate_monster_loot("skeleton", 8, None);
        let first = engine.get_system_stats();
        let second = engine.get_system_stats();
        assert_eq!(first, second);
        assert_eq!(first.monster_generations, 1);
        assert_eq!(first.farming.tracked_keys, 1);
    }

    #[test]
    fn test_clear_and_reset() {
        let engine = engine(7);
        engine.generate_monster_loot("troll", 18, None);
        assert!(engine.get_system_stats().cache.entries() > 0);
        engine.clear_cache();
        assert_eq!(engine.get_system_stats().cache.entries(), 0);
        engine.reset_farming();
        let info = engine.get_diminishing_returns_info(ContentKind::Monster, "troll", 18);
        assert_eq!(info.encounters_in_window, 0);
    }

    #[test]
    fn test_pity_streak_grows_without_meaningful_drops() {
        let mut config = LootConfig::seeded(8);
        config.meaningful_target = None;
        let engine = LootEngine::with_clock(
            config,
            Arc::new(StaticCatalog::builtin()),
            Arc::new(ManualClock::new(0)),
        );
        // Mostly common ore; empty encounters should build a streak
        let mut last = 0;
        let mut grew = false;
        for _ in 0..5 {
            let result = engine.generate_area_loot("dark_cave", 12, ExplorationType::Quick);
            if result.metadata.pity_streak > last {
                grew = true;
            }
            last = result.metadata.pity_streak;
        }
        assert!(grew);
    }

    #[test]
    fn test_gold_entry_yields_no_item() {
        let engine = engine(9);
        let result = engine.generate_monster_loot("demon_lord", 45, None);
        assert!(result.items.iter().all(|i| i.id != "gold"));
    }
}
