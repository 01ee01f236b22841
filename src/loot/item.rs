//! Generated item payloads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::{CharacterClass, Element, GameCatalog, ItemKind, ItemTemplate};
use crate::constants::{MAX_LEVEL, SAFE_MATERIAL_ID};
use crate::error::LootError;
use crate::rarity::{RarityTable, RarityTier};
use crate::resolver::ResolvedItem;
use crate::rng::LootRng;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemProperty {
    pub stat: String,
    pub value: f64,
}

/// What a spell-learning item teaches and who can learn it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellLearning {
    pub spell_id: String,
    pub spell_name: String,
    pub element: Element,
    pub required_level: u32,
    pub classes: Vec<CharacterClass>,
    pub stat_requirements: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedItem {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    pub rarity: RarityTier,
    pub level: u32,
    pub quality: f64,
    pub value: u32,
    pub quantity: u32,
    /// Rare and above
    pub bonus_properties: Vec<ItemProperty>,
    /// Epic and above
    pub special_properties: Vec<String>,
    /// Legendary only
    pub legendary_properties: Vec<String>,
    pub spell: Option<SpellLearning>,
}

/// Property pools by rarity band for one kind of item
struct PropertyPools {
    bonus: &'static [&'static str],
    special: &'static [&'static str],
    legendary: &'static [&'static str],
}

const GEAR_POOLS: PropertyPools = PropertyPools {
    bonus: &[
        "strength",
        "dexterity",
        "intelligence",
        "wisdom",
        "constitution",
        "critical_chance",
        "attack_speed",
        "max_health",
        "max_mana",
    ],
    special: &[
        "lifesteal",
        "thorns",
        "elemental_damage",
        "mana_regeneration",
        "evasion",
        "spell_echo",
    ],
    legendary: &["phoenix_rebirth", "time_dilation", "worldbreaker", "soul_harvest"],
};

const SPELL_POOLS: PropertyPools = PropertyPools {
    bonus: &["spell_power", "cast_speed", "mana_cost_reduction", "spell_duration"],
    special: &["double_cast", "element_mastery", "instant_learning"],
    legendary: &["forbidden_knowledge", "arcane_resonance"],
};

const CONSUMABLE_POOLS: PropertyPools = PropertyPools {
    bonus: &["potency", "effect_duration", "extra_charges", "cooldown_reduction"],
    special: &["cleansing", "overheal_shield", "lingering_effect"],
    legendary: &["everlasting", "miracle_cure"],
};

const MATERIAL_POOLS: PropertyPools = PropertyPools {
    bonus: &["purity", "crafting_yield", "crafting_quality", "durability_bonus"],
    special: &["imbued", "resonant", "flawless"],
    legendary: &["primordial", "starforged"],
};

fn pools_for(kind: ItemKind) -> &'static PropertyPools {
    match kind {
        ItemKind::Equipment => &GEAR_POOLS,
        ItemKind::SpellContainer => &SPELL_POOLS,
        ItemKind::Consumable => &CONSUMABLE_POOLS,
        ItemKind::Material | ItemKind::Currency | ItemKind::Misc => &MATERIAL_POOLS,
    }
}

/// Inputs for one item
pub struct ItemSpec<'a> {
    pub resolved: &'a ResolvedItem,
    pub rarity: RarityTier,
    pub content_level: u32,
    pub quantity: Option<(u32, u32)>,
}

pub fn generate_item(
    catalog: &dyn GameCatalog,
    rarity_table: &RarityTable,
    spec: &ItemSpec<'_>,
    rng: &mut LootRng,
) -> Result<GeneratedItem, LootError> {
    let template = catalog
        .item(&spec.resolved.item_id)
        .ok_or_else(|| LootError::UnknownItem(spec.resolved.item_id.clone()))?;

    let spell = match &spec.resolved.spell_id {
        Some(spell_id) => {
            let spell = catalog
                .spell(spell_id)
                .ok_or_else(|| LootError::UnknownItem(spell_id.clone()))?;
            Some(SpellLearning {
                spell_id: spell.id.clone(),
                spell_name: spell.name.clone(),
                element: spell.element,
                required_level: spell.learn_level,
                classes: spell.available_classes.clone(),
                stat_requirements: spell.requirements.clone(),
            })
        }
        None => None,
    };

    let level = item_level(template, spec.content_level, spell.as_ref(), rng);
    let definition = rarity_table.definition(spec.rarity);
    let quality = rng.range_f64(definition.quality_range.0, definition.quality_range.1);
    let value = (template.base_value as f64 * definition.value_multiplier * quality)
        .round()
        .max(1.0) as u32;

    let quantity = match (template.kind, spec.quantity) {
        (ItemKind::Equipment, _) | (_, None) => 1,
        (_, Some((lo, hi))) => rng.range_u32(lo.max(1), hi.max(1)),
    };

    let mut item = GeneratedItem {
        id: template.id.clone(),
        name: match &spell {
            Some(spell) => format!("{}: {}", template.name, spell.spell_name),
            None => template.name.clone(),
        },
        kind: template.kind,
        rarity: spec.rarity,
        level,
        quality,
        value,
        quantity,
        bonus_properties: Vec::new(),
        special_properties: Vec::new(),
        legendary_properties: Vec::new(),
        spell,
    };

    add_properties(&mut item, definition.value_multiplier, rng);
    Ok(item)
}

fn item_level(
    template: &ItemTemplate,
    content_level: u32,
    spell: Option<&SpellLearning>,
    rng: &mut LootRng,
) -> u32 {
    if let Some(spell) = spell {
        return spell.required_level.max(1);
    }
    if template.kind == ItemKind::Equipment {
        return template.level.max(1);
    }
    let jitter = rng.range_i32(-1, 1);
    (content_level as i32 + jitter).clamp(1, MAX_LEVEL as i32) as u32
}

fn add_properties(item: &mut GeneratedItem, value_multiplier: f64, rng: &mut LootRng) {
    let index = item.rarity.index();
    let pools = pools_for(item.kind);

    if index >= 2 {
        let magnitude = (item.level as f64 * 0.5 + 2.0) * item.quality * value_multiplier.sqrt();
        for stat in choose_distinct(pools.bonus, index - 1, rng) {
            let value = (magnitude * rng.range_f64(0.8, 1.2) * 10.0).round() / 10.0;
            item.bonus_properties.push(ItemProperty {
                stat: stat.to_string(),
                value,
            });
        }
    }
    if index >= 3 {
        item.special_properties = choose_distinct(pools.special, index - 2, rng)
            .into_iter()
            .map(str::to_string)
            .collect();
    }
    if index >= 4 {
        item.legendary_properties = choose_distinct(pools.legendary, 1, rng)
            .into_iter()
            .map(str::to_string)
            .collect();
    }
}

/// `count` distinct entries, in draw order
fn choose_distinct(pool: &[&'static str], count: usize, rng: &mut LootRng) -> Vec<&'static str> {
    let mut remaining: Vec<&'static str> = pool.to_vec();
    let mut chosen = Vec::with_capacity(count);
    while chosen.len() < count && !remaining.is_empty() {
        let i = rng.range_u32(0, remaining.len() as u32 - 1) as usize;
        chosen.push(remaining.swap_remove(i));
    }
    chosen
}

/// The guaranteed material, built from the catalog when it has one
pub fn safe_material(catalog: &dyn GameCatalog, content_level: u32) -> GeneratedItem {
    let (name, value) = catalog
        .item(SAFE_MATERIAL_ID)
        .map(|t| (t.name.clone(), t.base_value.max(1)))
        .unwrap_or_else(|| ("Monster Essence".to_string(), 1));
    GeneratedItem {
        id: SAFE_MATERIAL_ID.to_string(),
        name,
        kind: ItemKind::Material,
        rarity: RarityTier::Common,
        level: content_level.max(1),
        quality: 1.0,
        value,
        quantity: 1,
        bonus_properties: Vec::new(),
        special_properties: Vec::new(),
        legendary_properties: Vec::new(),
        spell: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;

    fn spec<'a>(resolved: &'a ResolvedItem, rarity: RarityTier) -> ItemSpec<'a> {
        ItemSpec {
            resolved,
            rarity,
            content_level: 20,
            quantity: None,
        }
    }

    #[test]
    fn test_quality_and_value_follow_tier() {
        let catalog = StaticCatalog::builtin();
        let table = RarityTable::standard();
        let mut rng = LootRng::seeded(51);
        let resolved = ResolvedItem::item("iron_ore");
        for tier in RarityTier::ALL {
            let item = generate_item(&catalog, &table, &spec(&resolved, tier), &mut rng).unwrap();
            let def = table.definition(tier);
            assert!(item.quality >= def.quality_range.0 && item.quality <= def.quality_range.1);
            let expected = (4.0 * def.value_multiplier * item.quality).round().max(1.0) as u32;
            assert_eq!(item.value, expected);
        }
    }

    #[test]
    fn test_properties_gated_by_rarity() {
        let catalog = StaticCatalog::builtin();
        let table = RarityTable::standard();
        let mut rng = LootRng::seeded(52);
        let resolved = ResolvedItem::item("knight_blade");

        let uncommon = generate_item(&catalog, &table, &spec(&resolved, RarityTier::Uncommon), &mut rng).unwrap();
        assert!(uncommon.bonus_properties.is_empty());

        let rare = generate_item(&catalog, &table, &spec(&resolved, RarityTier::Rare), &mut rng).unwrap();
        assert_eq!(rare.bonus_properties.len(), 1);
        assert!(rare.special_properties.is_empty());

        let epic = generate_item(&catalog, &table, &spec(&resolved, RarityTier::Epic), &mut rng).unwrap();
        assert_eq!(epic.bonus_properties.len(), 2);
        assert_eq!(epic.special_properties.len(), 1);
        assert!(epic.legendary_properties.is_empty());

        let legendary = generate_item(&catalog, &table, &spec(&resolved, RarityTier::Legendary), &mut rng).unwrap();
        assert_eq!(legendary.bonus_properties.len(), 3);
        assert_eq!(legendary.special_properties.len(), 2);
        assert_eq!(legendary.legendary_properties.len(), 1);
        assert_eq!(legendary.level, 28);
    }

    #[test]
    fn test_properties_for_every_kind() {
        let catalog = StaticCatalog::builtin();
        let table = RarityTable::standard();
        let mut rng = LootRng::seeded(56);
        let tome = ResolvedItem {
            item_id: "spell_tome".into(),
            spell_id: Some("fireball".into()),
            used_fallback: false,
        };
        let legendary = generate_item(&catalog, &table, &spec(&tome, RarityTier::Legendary), &mut rng).unwrap();
        assert_eq!(legendary.bonus_properties.len(), 3);
        assert_eq!(legendary.special_properties.len(), 2);
        assert_eq!(legendary.legendary_properties.len(), 1);
        assert!(legendary
            .bonus_properties
            .iter()
            .all(|p| SPELL_POOLS.bonus.contains(&p.stat.as_str())));

        for id in ["iron_ore", "healing_potion"] {
            let resolved = ResolvedItem::item(id);
            let common = generate_item(&catalog, &table, &spec(&resolved, RarityTier::Common), &mut rng).unwrap();
            assert!(common.bonus_properties.is_empty(), "{id}");

            let epic = generate_item(&catalog, &table, &spec(&resolved, RarityTier::Epic), &mut rng).unwrap();
            assert_eq!(epic.bonus_properties.len(), 2, "{id}");
            assert_eq!(epic.special_properties.len(), 1, "{id}");
            assert!(epic.legendary_properties.is_empty(), "{id}");
        }
    }

    #[test]
    fn test_spell_container_payload() {
        let catalog = StaticCatalog::builtin();
        let table = RarityTable::standard();
        let mut rng = LootRng::seeded(53);
        let resolved = ResolvedItem {
            item_id: "spell_book".into(),
            spell_id: Some("fireball".into()),
            used_fallback: false,
        };
        let item = generate_item(&catalog, &table, &spec(&resolved, RarityTier::Common), &mut rng).unwrap();
        let spell = item.spell.unwrap();
        assert_eq!(spell.required_level, 8);
        assert_eq!(spell.classes, vec![CharacterClass::Mage]);
        assert_eq!(item.level, 8);
        assert!(item.name.contains("Fireball"));
    }

    #[test]
    fn test_quantity_range() {
        let catalog = StaticCatalog::builtin();
        let table = RarityTable::standard();
        let mut rng = LootRng::seeded(54);
        let resolved = ResolvedItem::item("bone_shard");
        let spec = ItemSpec {
            quantity: Some((2, 4)),
            ..spec(&resolved, RarityTier::Common)
        };
        for _ in 0..50 {
            let item = generate_item(&catalog, &table, &spec, &mut rng).unwrap();
            assert!((2..=4).contains(&item.quantity));
        }
    }

    #[test]
    fn test_unknown_item_is_error() {
        let catalog = StaticCatalog::builtin();
        let table = RarityTable::standard();
        let mut rng = LootRng::seeded(55);
        let resolved = ResolvedItem::item("nope");
        assert!(matches!(
            generate_item(&catalog, &table, &spec(&resolved, RarityTier::Common), &mut rng),
            Err(LootError::UnknownItem(_))
        ));
    }

    #[test]
    fn test_safe_material() {
        let catalog = StaticCatalog::builtin();
        let item = safe_material(&catalog, 12);
        assert_eq!(item.id, SAFE_MATERIAL_ID);
        assert_eq!(item.rarity, RarityTier::Common);
        assert_eq!(item.name, "Monster Essence");
    }
}
