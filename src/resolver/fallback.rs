//! Deterministic fallback when every resolution stage fails.
//!
//! Tables are indexed by learning phase. Ids the catalog doesn't know are
//! skipped by walking down to weaker phases, and the guaranteed material
//! closes the chain, so a result always exists.

use tracing::warn;

use super::consumable::LearningPhase;
use super::{ResolveContext, ResolvedItem};
use crate::catalog::{CharacterClass, ConsumableClass, GameCatalog, RewardDescriptor};
use crate::constants::SAFE_MATERIAL_ID;

type PhaseTable = [&'static str; 5];

const WARRIOR_GEAR: PhaseTable = [
    "rusty_sword",
    "iron_sword",
    "steel_longsword",
    "knight_blade",
    "dragonbone_greatsword",
];
const MAGE_GEAR: PhaseTable = [
    "apprentice_staff",
    "oak_staff",
    "crystal_staff",
    "archmage_staff",
    "staff_of_eternity",
];
const ROGUE_GEAR: PhaseTable = [
    "worn_dagger",
    "steel_dagger",
    "shadow_fang",
    "nightsong_blade",
    "void_kris",
];
const RANGER_GEAR: PhaseTable = [
    "short_bow",
    "hunting_bow",
    "elven_longbow",
    "storm_bow",
    "sunpiercer",
];
const CLERIC_GEAR: PhaseTable = [
    "wooden_mace",
    "iron_mace",
    "blessed_mace",
    "sanctified_hammer",
    "dawnbringer",
];
const CLASSLESS_GEAR: PhaseTable = [
    "copper_ring",
    "silver_ring",
    "jade_amulet",
    "ring_of_power",
    "amulet_of_ages",
];

const HEALING: PhaseTable = [
    "minor_healing_potion",
    "healing_potion",
    "greater_healing_potion",
    "superior_healing_potion",
    "elixir_of_life",
];
const MANA: PhaseTable = [
    "minor_mana_potion",
    "mana_potion",
    "greater_mana_potion",
    "arcane_draught",
    "arcane_draught",
];
const MATERIALS: PhaseTable = [
    "copper_ore",
    "iron_ore",
    "mithril_ore",
    "adamantite_ore",
    "starmetal_ore",
];

pub fn gear_table(class: Option<CharacterClass>) -> &'static PhaseTable {
    match class {
        Some(CharacterClass::Warrior) => &WARRIOR_GEAR,
        Some(CharacterClass::Mage) => &MAGE_GEAR,
        Some(CharacterClass::Rogue) => &ROGUE_GEAR,
        Some(CharacterClass::Ranger) => &RANGER_GEAR,
        Some(CharacterClass::Cleric) => &CLERIC_GEAR,
        None => &CLASSLESS_GEAR,
    }
}

fn consumable_table(
    wanted: Option<ConsumableClass>,
    class: Option<CharacterClass>,
) -> &'static PhaseTable {
    match (wanted, class) {
        (Some(ConsumableClass::Mana), _) | (None, Some(CharacterClass::Mage)) => &MANA,
        _ => &HEALING,
    }
}

/// Always-present result for a descriptor
pub fn fallback_item(
    catalog: &dyn GameCatalog,
    descriptor: &RewardDescriptor,
    ctx: &ResolveContext,
) -> ResolvedItem {
    let phase = LearningPhase::from_level(ctx.player_level).index();

    if let RewardDescriptor::SpellContainer(container) = descriptor {
        if let Some(spell) = lowest_learnable_spell(catalog, ctx.class) {
            if catalog.item(container.item_id()).is_some() {
                return ResolvedItem {
                    item_id: container.item_id().to_string(),
                    spell_id: Some(spell),
                    used_fallback: true,
                };
            }
        }
    }

    let table = match descriptor {
        RewardDescriptor::EquipmentCategory(_) => gear_table(ctx.class),
        RewardDescriptor::ConsumablePhaseClass(wanted) => consumable_table(*wanted, ctx.class),
        _ => &MATERIALS,
    };

    let item_id = table[..=phase]
        .iter()
        .rev()
        .find(|id| catalog.item(id).is_some())
        .map(|id| id.to_string())
        .unwrap_or_else(|| {
            warn!(descriptor = %descriptor, "Fallback table exhausted, using safe material");
            SAFE_MATERIAL_ID.to_string()
        });

    ResolvedItem {
        item_id,
        spell_id: None,
        used_fallback: true,
    }
}

/// Lowest-level spell the class can learn, or the lowest overall
fn lowest_learnable_spell(catalog: &dyn GameCatalog, class: Option<CharacterClass>) -> Option<String> {
    let spells = catalog.spells().values();
    let by_class = class.and_then(|class| {
        spells
            .clone()
            .filter(|s| s.learnable_by(class))
            .min_by_key(|s| s.learn_level)
    });
    by_class
        .or_else(|| spells.min_by_key(|s| s.learn_level))
        .map(|s| s.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogData, SpellContainer, StaticCatalog};

    #[test]
    fn test_class_and_phase_pick() {
        let catalog = StaticCatalog::builtin();
        let ctx = ResolveContext {
            class: Some(CharacterClass::Rogue),
            ..ResolveContext::new(15, 15)
        };
        let item = fallback_item(&catalog, &RewardDescriptor::EquipmentCategory(None), &ctx);
        assert_eq!(item.item_id, "shadow_fang");
        assert!(item.used_fallback);
    }

    #[test]
    fn test_mage_gets_mana() {
        let catalog = StaticCatalog::builtin();
        let ctx = ResolveContext {
            class: Some(CharacterClass::Mage),
            ..ResolveContext::new(2, 2)
        };
        let item = fallback_item(&catalog, &RewardDescriptor::ConsumablePhaseClass(None), &ctx);
        assert_eq!(item.item_id, "minor_mana_potion");
    }

    #[test]
    fn test_spell_fallback_lowest_level() {
        let catalog = StaticCatalog::builtin();
        let ctx = ResolveContext {
            class: Some(CharacterClass::Rogue),
            ..ResolveContext::new(50, 50)
        };
        let item = fallback_item(
            &catalog,
            &RewardDescriptor::SpellContainer(SpellContainer::Tome),
            &ctx,
        );
        assert_eq!(item.item_id, "spell_tome");
        assert_eq!(item.spell_id.as_deref(), Some("arcane_missile"));
    }

    #[test]
    fn test_every_table_id_in_builtin() {
        let catalog = StaticCatalog::builtin();
        let tables = [
            &WARRIOR_GEAR,
            &MAGE_GEAR,
            &ROGUE_GEAR,
            &RANGER_GEAR,
            &CLERIC_GEAR,
            &CLASSLESS_GEAR,
            &HEALING,
            &MANA,
            &MATERIALS,
        ];
        for table in tables {
            for id in table.iter() {
                assert!(catalog.item(id).is_some(), "missing {id}");
            }
        }
    }

    #[test]
    fn test_empty_catalog_still_answers() {
        let catalog = StaticCatalog::from_data(CatalogData::default()).unwrap();
        let item = fallback_item(
            &catalog,
            &RewardDescriptor::Concrete("nothing".into()),
            &ResolveContext::new(30, 30),
        );
        assert_eq!(item.item_id, SAFE_MATERIAL_ID);
    }
}
