//! Reward resolution: descriptor + context → concrete item id.
//!
//! Precedence for one entry:
//! 1. explicit candidate list, filtered against the catalog
//! 2. equipment categories (or an equipment descriptor)
//! 3. consumables through the learning-phase table
//! 4. materials through the crafting-phase table
//! 5. spell containers through the container level bands
//! 6. concrete ids, checked against the catalog
//!
//! When every stage comes up empty the fallback table always yields an id.

pub mod consumable;
pub mod equipment;
pub mod fallback;
pub mod material;
pub mod spell;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cache::LootCache;
use crate::catalog::{
    AreaTheme, CharacterClass, EncounterType, GameCatalog, ItemKind, LootEntry, MonsterFamily,
    RewardDescriptor, SpellContainer,
};
use crate::error::LootError;
use crate::rarity::RarityTier;
use crate::rng::LootRng;
use crate::weighted;

/// Monster facts that bias material selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterHint {
    pub family: MonsterFamily,
    /// Material ids this monster favours
    pub material_affinity: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolveContext {
    pub player_level: u32,
    pub content_level: u32,
    pub class: Option<CharacterClass>,
    pub area_theme: Option<AreaTheme>,
    pub monster: Option<MonsterHint>,
    pub encounter: EncounterType,
    /// Tier the drop roll produced
    pub rarity: Option<RarityTier>,
}

impl ResolveContext {
    pub fn new(player_level: u32, content_level: u32) -> Self {
        Self {
            player_level: player_level.max(1),
            content_level: content_level.max(1),
            class: None,
            area_theme: None,
            monster: None,
            encounter: EncounterType::Normal,
            rarity: None,
        }
    }
}

/// A concrete reward
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedItem {
    pub item_id: String,
    /// Spell taught, for spell containers
    pub spell_id: Option<String>,
    /// True when the fallback table produced this id
    pub used_fallback: bool,
}

impl ResolvedItem {
    pub fn item(id: impl Into<String>) -> Self {
        Self {
            item_id: id.into(),
            spell_id: None,
            used_fallback: false,
        }
    }
}

pub struct ItemResolver<'a> {
    catalog: &'a dyn GameCatalog,
    cache: Option<&'a LootCache>,
}

impl<'a> ItemResolver<'a> {
    pub fn new(catalog: &'a dyn GameCatalog) -> Self {
        Self {
            catalog,
            cache: None,
        }
    }

    /// Share candidate pools through an engine cache
    pub fn with_cache(mut self, cache: &'a LootCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Resolve an entry to an item. `None` only for gold entries.
    pub fn resolve_concrete_item(
        &self,
        entry: &LootEntry,
        ctx: &ResolveContext,
        rng: &mut LootRng,
    ) -> Option<ResolvedItem> {
        if entry.item_type == RewardDescriptor::Gold {
            return None;
        }

        match self.try_resolve(entry, ctx, rng) {
            Ok(resolved) => Some(resolved),
            Err(err) => {
                warn!(item_type = %entry.item_type, error = %err, "Resolution fell back");
                Some(fallback::fallback_item(
                    self.catalog,
                    &entry.item_type,
                    ctx,
                ))
            }
        }
    }

    fn try_resolve(
        &self,
        entry: &LootEntry,
        ctx: &ResolveContext,
        rng: &mut LootRng,
    ) -> Result<ResolvedItem, LootError> {
        if !entry.candidates.is_empty() {
            if let Some(resolved) = self.pick_candidate(entry, ctx, rng) {
                return Ok(resolved);
            }
            debug!(item_type = %entry.item_type, "No catalog match among candidates");
        }

        let wants_equipment = matches!(entry.item_type, RewardDescriptor::EquipmentCategory(_))
            || !entry.equipment_categories.is_empty();
        if wants_equipment {
            let slot = match entry.item_type {
                RewardDescriptor::EquipmentCategory(slot) => slot,
                _ => None,
            };
            return equipment::resolve(self, &entry.equipment_categories, slot, ctx, rng)
                .map(ResolvedItem::item);
        }

        match &entry.item_type {
            RewardDescriptor::ConsumablePhaseClass(class) => {
                consumable::resolve(self.catalog, *class, ctx, rng).map(ResolvedItem::item)
            }
            RewardDescriptor::MaterialPhaseClass(class) => {
                material::resolve(self.catalog, *class, ctx, rng).map(ResolvedItem::item)
            }
            RewardDescriptor::SpellContainer(container) => {
                spell::resolve(self.catalog, *container, ctx, rng)
            }
            RewardDescriptor::Concrete(id) => self.resolve_known(id, ctx, rng),
            RewardDescriptor::EquipmentCategory(_) | RewardDescriptor::Gold => {
                Err(LootError::EmptyPool(entry.item_type.to_string()))
            }
        }
    }

    /// Uniform pick among candidates the catalog knows
    fn pick_candidate(
        &self,
        entry: &LootEntry,
        ctx: &ResolveContext,
        rng: &mut LootRng,
    ) -> Option<ResolvedItem> {
        let key = format!("cand:{}", entry.candidates.join(","));
        let pool = self.pool(key, || {
            entry
                .candidates
                .iter()
                .filter(|id| self.catalog.item(id).is_some())
                .cloned()
                .collect()
        });

        let weighted: Vec<(&String, f64)> = pool.iter().map(|id| (id, 1.0)).collect();
        let id = weighted::pick(&weighted, rng.roll())?;
        self.resolve_known(id, ctx, rng).ok()
    }

    /// A catalog id as-is; spell containers keep their id and gain a spell
    fn resolve_known(
        &self,
        id: &str,
        ctx: &ResolveContext,
        rng: &mut LootRng,
    ) -> Result<ResolvedItem, LootError> {
        let item = self
            .catalog
            .item(id)
            .ok_or_else(|| LootError::UnknownItem(id.to_string()))?;
        if item.kind != ItemKind::SpellContainer {
            return Ok(ResolvedItem::item(id));
        }

        // Untyped containers draw from the book band
        let container = item.container.unwrap_or(SpellContainer::Book);
        let taught = spell::resolve(self.catalog, container, ctx, rng)?;
        Ok(ResolvedItem {
            item_id: id.to_string(),
            ..taught
        })
    }

    pub(crate) fn pool(
        &self,
        key: String,
        build: impl FnOnce() -> Vec<String>,
    ) -> std::sync::Arc<Vec<String>> {
        match self.cache {
            Some(cache) => cache.pool_or_insert_with(key, build),
            None => std::sync::Arc::new(build()),
        }
    }

    pub(crate) fn catalog(&self) -> &'a dyn GameCatalog {
        self.catalog
    }
}

/// Weight for how close an item level sits to a target level
pub(crate) fn level_closeness(item_level: u32, target: u32, falloff: f64) -> f64 {
    let distance = (item_level as f64 - target as f64).abs();
    1.0 / (1.0 + falloff * distance)
}
