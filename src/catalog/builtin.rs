//! Bundled demo dataset.
//!
//! Small but complete: every id the resolver's fallback tables name exists
//! here, every monster and area has a loot table, and each crafting and
//! learning phase has at least one item per class.

use std::collections::BTreeMap;

use super::{
    AreaLootTable, AreaTemplate, AreaTheme, CatalogData, CharacterClass, ConsumableClass, Element,
    EquipmentSlot, EquipmentTemplate, ExplorationType, ItemKind, ItemTemplate, LootEntry,
    MaterialClass, MonsterFamily, MonsterLootTable, MonsterTemplate, SpellContainer,
    SpellTemplate,
};
use crate::rarity::RarityTier;

use CharacterClass::{Cleric, Mage, Ranger, Rogue, Warrior};
use RarityTier::{Common, Epic, Legendary, Rare, Uncommon};

pub fn catalog_data() -> CatalogData {
    let mut items = consumables();
    items.extend(materials());
    items.extend(containers());

    CatalogData {
        items,
        equipment: equipment(),
        spells: spells(),
        monsters: monsters(),
        areas: areas(),
    }
}

// ============================================================================
// Items
// ============================================================================

fn item(id: &str, name: &str, kind: ItemKind, level: u32, value: u32) -> ItemTemplate {
    ItemTemplate {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        base_value: value,
        level,
        rarity: None,
        consumable_class: None,
        material_class: None,
        container: None,
    }
}

fn consumable(id: &str, name: &str, class: ConsumableClass, level: u32, value: u32) -> ItemTemplate {
    ItemTemplate {
        consumable_class: Some(class),
        ..item(id, name, ItemKind::Consumable, level, value)
    }
}

fn material(id: &str, name: &str, class: MaterialClass, level: u32, value: u32) -> ItemTemplate {
    ItemTemplate {
        material_class: Some(class),
        ..item(id, name, ItemKind::Material, level, value)
    }
}

fn consumables() -> Vec<ItemTemplate> {
    use ConsumableClass::*;
    vec![
        consumable("minor_healing_potion", "Minor Healing Potion", Healing, 1, 10),
        consumable("healing_potion", "Healing Potion", Healing, 8, 25),
        consumable("greater_healing_potion", "Greater Healing Potion", Healing, 16, 60),
        consumable("superior_healing_potion", "Superior Healing Potion", Healing, 28, 140),
        consumable("elixir_of_life", "Elixir of Life", Healing, 40, 320),
        consumable("minor_mana_potion", "Minor Mana Potion", Mana, 1, 12),
        consumable("mana_potion", "Mana Potion", Mana, 8, 30),
        consumable("greater_mana_potion", "Greater Mana Potion", Mana, 16, 70),
        consumable("arcane_draught", "Arcane Draught", Mana, 28, 160),
        consumable("strength_tonic", "Strength Tonic", Enhancement, 5, 30),
        consumable("swiftness_draught", "Swiftness Draught", Enhancement, 12, 55),
        consumable("battle_elixir", "Battle Elixir", Enhancement, 22, 120),
        consumable("titan_brew", "Titan Brew", Enhancement, 35, 260),
        consumable("antidote", "Antidote", Utility, 1, 8),
        consumable("smoke_bomb", "Smoke Bomb", Utility, 6, 20),
        consumable("fire_resist_salve", "Fire Resist Salve", Utility, 15, 45),
        consumable("frost_ward_oil", "Frost Ward Oil", Utility, 20, 50),
        consumable("recall_scroll", "Recall Scroll", Utility, 10, 35),
        consumable("phoenix_feather", "Phoenix Feather", Revival, 12, 200),
        consumable("spirit_ash", "Spirit Ash", Revival, 30, 450),
    ]
}

fn materials() -> Vec<ItemTemplate> {
    use MaterialClass::*;
    vec![
        material("copper_ore", "Copper Ore", Ore, 1, 2),
        material("iron_ore", "Iron Ore", Ore, 8, 4),
        material("mithril_ore", "Mithril Ore", Ore, 18, 12),
        material("adamantite_ore", "Adamantite Ore", Ore, 28, 30),
        material("starmetal_ore", "Starmetal Ore", Ore, 40, 75),
        material("silverleaf", "Silverleaf", Herb, 1, 2),
        material("moonpetal", "Moonpetal", Herb, 12, 9),
        material("dragonroot", "Dragonroot", Herb, 30, 40),
        material("rough_hide", "Rough Hide", Hide, 1, 2),
        material("thick_hide", "Thick Hide", Hide, 12, 8),
        material("drake_scale", "Drake Scale", Hide, 30, 45),
        material("bone_shard", "Bone Shard", Bone, 1, 2),
        material("ancient_bone", "Ancient Bone", Bone, 20, 18),
        material("monster_essence", "Monster Essence", Essence, 1, 3),
        material("elemental_essence", "Elemental Essence", Essence, 15, 20),
        material("void_essence", "Void Essence", Essence, 35, 70),
        material("rough_gem", "Rough Gem", Gem, 5, 10),
        material("sapphire", "Sapphire", Gem, 18, 35),
        material("star_diamond", "Star Diamond", Gem, 38, 120),
        material("linen_scrap", "Linen Scrap", Cloth, 1, 1),
        material("silk_bolt", "Silk Bolt", Cloth, 14, 10),
        material("spirit_silk", "Spirit Silk", Cloth, 30, 38),
        material("oak_log", "Oak Log", Wood, 1, 1),
        material("ironwood_log", "Ironwood Log", Wood, 14, 9),
        material("elder_wood", "Elder Wood", Wood, 30, 36),
        material("ancient_coin", "Ancient Coin", Relic, 10, 25),
        material("runic_tablet", "Runic Tablet", Relic, 22, 60),
        material("titan_relic", "Titan Relic", Relic, 40, 200),
    ]
}

fn containers() -> Vec<ItemTemplate> {
    [
        (SpellContainer::Scroll, "Spell Scroll", 1, 30),
        (SpellContainer::Book, "Spell Book", 8, 90),
        (SpellContainer::Tome, "Spell Tome", 18, 240),
        (SpellContainer::AncientTome, "Ancient Tome", 30, 800),
    ]
    .into_iter()
    .map(|(container, name, level, value)| ItemTemplate {
        container: Some(container),
        ..item(container.item_id(), name, ItemKind::SpellContainer, level, value)
    })
    .collect()
}

// ============================================================================
// Equipment
// ============================================================================

struct GearLine<'a> {
    category: &'a str,
    slot: EquipmentSlot,
    classes: &'a [CharacterClass],
    /// One id/name per phase, weakest first
    tiers: [(&'a str, &'a str); 5],
}

const GEAR_LEVELS: [u32; 5] = [1, 8, 16, 28, 40];
const GEAR_RARITY: [RarityTier; 5] = [Common, Common, Uncommon, Rare, Epic];
const GEAR_VALUE: [u32; 5] = [15, 45, 120, 320, 900];

fn equipment() -> Vec<EquipmentTemplate> {
    let lines = [
        GearLine {
            category: "sword",
            slot: EquipmentSlot::Weapon,
            classes: &[Warrior],
            tiers: [
                ("rusty_sword", "Rusty Sword"),
                ("iron_sword", "Iron Sword"),
                ("steel_longsword", "Steel Longsword"),
                ("knight_blade", "Knight Blade"),
                ("dragonbone_greatsword", "Dragonbone Greatsword"),
            ],
        },
        GearLine {
            category: "staff",
            slot: EquipmentSlot::Weapon,
            classes: &[Mage],
            tiers: [
                ("apprentice_staff", "Apprentice Staff"),
                ("oak_staff", "Oak Staff"),
                ("crystal_staff", "Crystal Staff"),
                ("archmage_staff", "Archmage Staff"),
                ("staff_of_eternity", "Staff of Eternity"),
            ],
        },
        GearLine {
            category: "dagger",
            slot: EquipmentSlot::Weapon,
            classes: &[Rogue],
            tiers: [
                ("worn_dagger", "Worn Dagger"),
                ("steel_dagger", "Steel Dagger"),
                ("shadow_fang", "Shadow Fang"),
                ("nightsong_blade", "Nightsong Blade"),
                ("void_kris", "Void Kris"),
            ],
        },
        GearLine {
            category: "bow",
            slot: EquipmentSlot::Weapon,
            classes: &[Ranger],
            tiers: [
                ("short_bow", "Short Bow"),
                ("hunting_bow", "Hunting Bow"),
                ("elven_longbow", "Elven Longbow"),
                ("storm_bow", "Storm Bow"),
                ("sunpiercer", "Sunpiercer"),
            ],
        },
        GearLine {
            category: "mace",
            slot: EquipmentSlot::Weapon,
            classes: &[Cleric, Warrior],
            tiers: [
                ("wooden_mace", "Wooden Mace"),
                ("iron_mace", "Iron Mace"),
                ("blessed_mace", "Blessed Mace"),
                ("sanctified_hammer", "Sanctified Hammer"),
                ("dawnbringer", "Dawnbringer"),
            ],
        },
        GearLine {
            category: "heavy_armor",
            slot: EquipmentSlot::Armor,
            classes: &[Warrior, Cleric],
            tiers: [
                ("padded_armor", "Padded Armor"),
                ("chainmail", "Chainmail"),
                ("plate_armor", "Plate Armor"),
                ("dragonscale_plate", "Dragonscale Plate"),
                ("titan_plate", "Titan Plate"),
            ],
        },
        GearLine {
            category: "robe",
            slot: EquipmentSlot::Armor,
            classes: &[Mage, Cleric],
            tiers: [
                ("cloth_robe", "Cloth Robe"),
                ("apprentice_robe", "Apprentice Robe"),
                ("silk_robe", "Silk Robe"),
                ("archmage_robe", "Archmage Robe"),
                ("robe_of_stars", "Robe of Stars"),
            ],
        },
        GearLine {
            category: "light_armor",
            slot: EquipmentSlot::Armor,
            classes: &[Rogue, Ranger],
            tiers: [
                ("leather_vest", "Leather Vest"),
                ("studded_leather", "Studded Leather"),
                ("ranger_garb", "Ranger Garb"),
                ("shadow_leathers", "Shadow Leathers"),
                ("wyrmhide_armor", "Wyrmhide Armor"),
            ],
        },
        GearLine {
            category: "ring",
            slot: EquipmentSlot::Accessory,
            classes: &[],
            tiers: [
                ("copper_ring", "Copper Ring"),
                ("silver_ring", "Silver Ring"),
                ("sapphire_ring", "Sapphire Ring"),
                ("ring_of_power", "Ring of Power"),
                ("band_of_ages", "Band of Ages"),
            ],
        },
        GearLine {
            category: "amulet",
            slot: EquipmentSlot::Accessory,
            classes: &[],
            tiers: [
                ("wooden_charm", "Wooden Charm"),
                ("bone_talisman", "Bone Talisman"),
                ("jade_amulet", "Jade Amulet"),
                ("sunstone_pendant", "Sunstone Pendant"),
                ("amulet_of_ages", "Amulet of Ages"),
            ],
        },
    ];

    let mut gear = Vec::new();
    for line in lines {
        for (i, (id, name)) in line.tiers.iter().enumerate() {
            gear.push(EquipmentTemplate {
                id: id.to_string(),
                name: name.to_string(),
                slot: line.slot,
                category: line.category.to_string(),
                level_requirement: GEAR_LEVELS[i],
                class_requirements: line.classes.to_vec(),
                rarity: GEAR_RARITY[i],
                base_value: GEAR_VALUE[i],
            });
        }
    }
    // The top ring and amulet are the only legendary pieces
    for piece in gear.iter_mut() {
        if piece.id == "band_of_ages" || piece.id == "amulet_of_ages" {
            piece.rarity = Legendary;
        }
    }
    gear
}

// ============================================================================
// Spells
// ============================================================================

fn spell(
    id: &str,
    name: &str,
    learn_level: u32,
    element: Element,
    classes: &[CharacterClass],
    rarity: RarityTier,
    requirements: &[(&str, u32)],
) -> SpellTemplate {
    SpellTemplate {
        id: id.to_string(),
        name: name.to_string(),
        learn_level,
        element,
        available_classes: classes.to_vec(),
        rarity,
        requirements: requirements
            .iter()
            .map(|(stat, v)| (stat.to_string(), *v))
            .collect::<BTreeMap<_, _>>(),
    }
}

fn spells() -> Vec<SpellTemplate> {
    use Element::*;
    vec![
        spell("spark", "Spark", 1, Fire, &[Mage], Common, &[("intelligence", 8)]),
        spell("fireball", "Fireball", 8, Fire, &[Mage], Uncommon, &[("intelligence", 12)]),
        spell("flame_wall", "Flame Wall", 18, Fire, &[Mage], Rare, &[("intelligence", 16)]),
        spell("meteor", "Meteor", 36, Fire, &[Mage], Legendary, &[("intelligence", 24)]),
        spell("frost_bolt", "Frost Bolt", 3, Ice, &[Mage], Common, &[("intelligence", 9)]),
        spell("ice_lance", "Ice Lance", 14, Ice, &[Mage, Ranger], Uncommon, &[("intelligence", 13)]),
        spell("blizzard", "Blizzard", 28, Ice, &[Mage], Epic, &[("intelligence", 20)]),
        spell("shock", "Shock", 2, Lightning, &[Mage, Ranger], Common, &[]),
        spell("chain_lightning", "Chain Lightning", 20, Lightning, &[Mage], Rare, &[("intelligence", 17)]),
        spell("heal", "Heal", 1, Light, &[Cleric], Common, &[("wisdom", 8)]),
        spell("holy_light", "Holy Light", 10, Light, &[Cleric], Uncommon, &[("wisdom", 12)]),
        spell("resurrection", "Resurrection", 26, Light, &[Cleric], Epic, &[("wisdom", 20)]),
        spell("divine_judgment", "Divine Judgment", 40, Light, &[Cleric, Warrior], Legendary, &[("wisdom", 24)]),
        spell("entangle", "Entangle", 4, Nature, &[Ranger, Cleric], Common, &[]),
        spell("thorn_volley", "Thorn Volley", 16, Nature, &[Ranger], Uncommon, &[("dexterity", 14)]),
        spell("shadow_step", "Shadow Step", 6, Dark, &[Rogue], Common, &[("dexterity", 10)]),
        spell("poison_cloud", "Poison Cloud", 15, Dark, &[Rogue, Mage], Uncommon, &[("dexterity", 12)]),
        spell("death_mark", "Death Mark", 32, Dark, &[Rogue], Epic, &[("dexterity", 22)]),
        spell("stone_skin", "Stone Skin", 7, Earth, &[Warrior, Cleric], Common, &[("constitution", 10)]),
        spell("earthquake", "Earthquake", 30, Earth, &[Warrior, Mage], Rare, &[("strength", 18)]),
        spell("arcane_missile", "Arcane Missile", 5, Arcane, &[], Common, &[]),
        spell("time_stop", "Time Stop", 45, Arcane, &[Mage], Legendary, &[("intelligence", 28)]),
        spell("battle_cry", "Battle Cry", 3, Neutral, &[Warrior], Common, &[]),
        spell("whirlwind", "Whirlwind", 12, Neutral, &[Warrior], Uncommon, &[("strength", 14)]),
        spell("tidal_wave", "Tidal Wave", 24, Water, &[Mage, Cleric], Rare, &[("intelligence", 18)]),
    ]
}

// ============================================================================
// Monsters
// ============================================================================

fn monster(
    id: &str,
    name: &str,
    level: u32,
    family: MonsterFamily,
    gold_range: (u32, u32),
    affinity: &[&str],
    drops: Vec<LootEntry>,
) -> MonsterTemplate {
    MonsterTemplate {
        id: id.to_string(),
        name: name.to_string(),
        level,
        family,
        loot_table: MonsterLootTable {
            drops,
            gold_range,
            material_affinity: affinity.iter().map(|s| s.to_string()).collect(),
        },
    }
}

fn low_weights() -> [(RarityTier, f64); 3] {
    [(Common, 0.7), (Uncommon, 0.25), (Rare, 0.05)]
}

fn mid_weights() -> [(RarityTier, f64); 4] {
    [(Common, 0.5), (Uncommon, 0.3), (Rare, 0.15), (Epic, 0.05)]
}

fn high_weights() -> [(RarityTier, f64); 5] {
    [
        (Common, 0.3),
        (Uncommon, 0.3),
        (Rare, 0.25),
        (Epic, 0.12),
        (Legendary, 0.03),
    ]
}

fn monsters() -> Vec<MonsterTemplate> {
    use MonsterFamily::*;
    vec![
        monster(
            "slime",
            "Slime",
            1,
            Slime,
            (1, 3),
            &["monster_essence"],
            vec![
                LootEntry::new("material", 0.4).with_weights(&low_weights()),
                LootEntry::new("healing", 0.1),
            ],
        ),
        monster(
            "giant_rat",
            "Giant Rat",
            2,
            Beast,
            (1, 4),
            &["rough_hide", "bone_shard"],
            vec![
                LootEntry::new("material", 0.45).with_weights(&low_weights()),
                LootEntry::new("consumable", 0.12),
            ],
        ),
        monster(
            "goblin",
            "Goblin",
            3,
            Humanoid,
            (2, 8),
            &["copper_ore", "linen_scrap"],
            vec![
                LootEntry::new("material", 0.4).with_weights(&low_weights()),
                LootEntry::new("consumable", 0.2),
                LootEntry::new("weapon", 0.08)
                    .with_categories(&["sword", "dagger", "mace"])
                    .with_weights(&low_weights()),
                LootEntry::new("spell_scroll", 0.03),
            ],
        ),
        monster(
            "forest_wolf",
            "Forest Wolf",
            5,
            Beast,
            (2, 6),
            &["rough_hide", "bone_shard"],
            vec![
                LootEntry::new("hide", 0.5).with_quantity(1, 2),
                LootEntry::new("healing", 0.1),
            ],
        ),
        monster(
            "skeleton",
            "Skeleton",
            8,
            Undead,
            (4, 10),
            &["bone_shard", "ancient_bone"],
            vec![
                LootEntry::new("bone", 0.5).with_quantity(1, 3),
                LootEntry::new("equipment", 0.1).with_weights(&low_weights()),
                LootEntry::new("spell_scroll", 0.05),
            ],
        ),
        monster(
            "bandit",
            "Bandit",
            10,
            Humanoid,
            (8, 20),
            &["linen_scrap", "ancient_coin"],
            vec![
                LootEntry::new("consumable", 0.3),
                LootEntry::new("equipment", 0.12).with_weights(&low_weights()),
                LootEntry::new("material", 0.3),
                LootEntry::new("ancient_coin", 0.05),
            ],
        ),
        monster(
            "cave_spider",
            "Cave Spider",
            12,
            Insect,
            (5, 12),
            &["silk_bolt"],
            vec![
                LootEntry::new("cloth", 0.45).with_quantity(1, 2),
                LootEntry::new("utility", 0.15).with_candidates(&["antidote", "smoke_bomb"]),
            ],
        ),
        monster(
            "orc_warrior",
            "Orc Warrior",
            15,
            Humanoid,
            (10, 25),
            &["iron_ore", "thick_hide"],
            vec![
                LootEntry::new("material", 0.4).with_weights(&mid_weights()),
                LootEntry::new("weapon", 0.12)
                    .with_categories(&["sword", "mace"])
                    .with_weights(&mid_weights()),
                LootEntry::new("armor", 0.08).with_categories(&["heavy_armor"]),
                LootEntry::new("consumable", 0.2),
            ],
        ),
        monster(
            "troll",
            "Troll",
            18,
            Beast,
            (12, 30),
            &["thick_hide", "ancient_bone"],
            vec![
                LootEntry::new("material", 0.5).with_weights(&mid_weights()),
                LootEntry::new("healing", 0.2),
                LootEntry::new("spell_book", 0.05),
            ],
        ),
        monster(
            "stone_golem",
            "Stone Golem",
            22,
            Construct,
            (15, 35),
            &["mithril_ore", "sapphire", "runic_tablet"],
            vec![
                LootEntry::new("ore", 0.55).with_quantity(1, 3),
                LootEntry::new("gem", 0.15).with_weights(&mid_weights()),
                LootEntry::new("armor", 0.08).with_weights(&mid_weights()),
            ],
        ),
        monster(
            "wraith",
            "Wraith",
            25,
            Undead,
            (18, 40),
            &["void_essence", "spirit_silk"],
            vec![
                LootEntry::new("essence", 0.45),
                LootEntry::new("spell_tome", 0.06).with_weights(&mid_weights()),
                LootEntry::new("accessory", 0.08).with_weights(&mid_weights()),
            ],
        ),
        monster(
            "fire_elemental",
            "Fire Elemental",
            28,
            Elemental,
            (20, 45),
            &["elemental_essence"],
            vec![
                LootEntry::new("essence", 0.6).with_quantity(1, 2),
                LootEntry::new("fire_resist_salve", 0.15),
                LootEntry::new("spell_book", 0.08).with_weights(&mid_weights()),
            ],
        ),
        monster(
            "lich",
            "Lich",
            38,
            Undead,
            (40, 90),
            &["void_essence", "ancient_bone", "runic_tablet"],
            vec![
                LootEntry::new("ancient_tome", 0.1).with_weights(&high_weights()),
                LootEntry::new("equipment", 0.25).with_weights(&high_weights()),
                LootEntry::new("revival", 0.1),
                LootEntry::new("material", 0.5),
            ],
        ),
        monster(
            "demon_lord",
            "Demon Lord",
            45,
            Demon,
            (60, 140),
            &["void_essence", "star_diamond"],
            vec![
                LootEntry::new("equipment", 0.4).with_weights(&high_weights()),
                LootEntry::new("ancient_tome", 0.12).with_weights(&high_weights()),
                LootEntry::new("material", 0.6).with_quantity(2, 4),
                LootEntry::new("gold", 0.5),
            ],
        ),
        monster(
            "ancient_dragon",
            "Ancient Dragon",
            50,
            Dragon,
            (100, 250),
            &["drake_scale", "starmetal_ore", "star_diamond", "titan_relic"],
            vec![
                LootEntry::new("equipment", 0.5).with_weights(&high_weights()),
                LootEntry::new("material", 0.7).with_quantity(2, 5),
                LootEntry::new("ancient_tome", 0.15).with_weights(&high_weights()),
                LootEntry::new("elixir_of_life", 0.2),
            ],
        ),
    ]
}

// ============================================================================
// Areas
// ============================================================================

fn area(
    id: &str,
    name: &str,
    theme: AreaTheme,
    recommended_level: u32,
    area_bonus: f64,
    drops: Vec<LootEntry>,
) -> AreaTemplate {
    AreaTemplate {
        id: id.to_string(),
        name: name.to_string(),
        theme,
        loot_table: AreaLootTable {
            recommended_level,
            drops,
            exploration_type: ExplorationType::Standard,
            area_bonus,
        },
    }
}

fn areas() -> Vec<AreaTemplate> {
    use AreaTheme::*;
    vec![
        area(
            "forest",
            "Whispering Forest",
            Forest,
            5,
            1.0,
            vec![
                LootEntry::new("herb", 0.5).with_quantity(1, 3),
                LootEntry::new("wood", 0.4).with_quantity(1, 2),
                LootEntry::new("healing", 0.2),
                LootEntry::new("equipment", 0.05).with_weights(&low_weights()),
            ],
        ),
        area(
            "dark_cave",
            "Dark Cave",
            Cave,
            12,
            1.0,
            vec![
                LootEntry::new("ore", 0.55).with_quantity(1, 3),
                LootEntry::new("gem", 0.15).with_weights(&low_weights()),
                LootEntry::new("utility", 0.15),
            ],
        ),
        area(
            "misty_swamp",
            "Misty Swamp",
            Swamp,
            15,
            1.05,
            vec![
                LootEntry::new("herb", 0.5).with_quantity(1, 2),
                LootEntry::new("antidote", 0.25),
                LootEntry::new("spell_scroll", 0.06),
            ],
        ),
        area(
            "ancient_ruins",
            "Ancient Ruins",
            Ruins,
            20,
            1.1,
            vec![
                LootEntry::new("relic", 0.3).with_weights(&mid_weights()),
                LootEntry::new("spell_book", 0.08),
                LootEntry::new("accessory", 0.08).with_weights(&mid_weights()),
                LootEntry::new("material", 0.4),
            ],
        ),
        area(
            "haunted_crypt",
            "Haunted Crypt",
            Crypt,
            25,
            1.1,
            vec![
                LootEntry::new("bone", 0.5).with_quantity(1, 3),
                LootEntry::new("essence", 0.3),
                LootEntry::new("revival", 0.05),
                LootEntry::new("spell_tome", 0.05).with_weights(&mid_weights()),
            ],
        ),
        area(
            "frozen_tundra",
            "Frozen Tundra",
            Tundra,
            30,
            1.0,
            vec![
                LootEntry::new("hide", 0.4),
                LootEntry::new("frost_ward_oil", 0.2),
                LootEntry::new("armor", 0.08).with_weights(&mid_weights()),
            ],
        ),
        area(
            "volcano_peak",
            "Volcano Peak",
            Volcano,
            35,
            1.15,
            vec![
                LootEntry::new("ore", 0.5).with_quantity(1, 3),
                LootEntry::new("essence", 0.35),
                LootEntry::new("weapon", 0.1).with_weights(&high_weights()),
                LootEntry::new("spell_tome", 0.06),
            ],
        ),
        area(
            "sunken_temple",
            "Sunken Temple",
            Temple,
            40,
            1.2,
            vec![
                LootEntry::new("relic", 0.35).with_weights(&high_weights()),
                LootEntry::new("ancient_tome", 0.08).with_weights(&high_weights()),
                LootEntry::new("equipment", 0.15).with_weights(&high_weights()),
                LootEntry::new("consumable", 0.3),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{GameCatalog, RewardDescriptor, StaticCatalog};

    #[test]
    fn test_builtin_ids_unique() {
        assert!(StaticCatalog::from_data(catalog_data()).is_ok());
    }

    #[test]
    fn test_concrete_drops_exist() {
        let catalog = StaticCatalog::builtin();
        let tables = catalog_data();
        let entries = tables
            .monsters
            .iter()
            .flat_map(|m| m.loot_table.drops.iter())
            .chain(tables.areas.iter().flat_map(|a| a.loot_table.drops.iter()));
        for entry in entries {
            if let RewardDescriptor::Concrete(id) = &entry.item_type {
                assert!(catalog.item(id).is_some(), "missing {id}");
            }
            for id in &entry.candidates {
                assert!(catalog.item(id).is_some(), "missing candidate {id}");
            }
            for category in &entry.equipment_categories {
                assert!(
                    !catalog.equipment_in_category(category).is_empty(),
                    "empty category {category}"
                );
            }
        }
    }

    #[test]
    fn test_every_material_class_stocked() {
        let data = catalog_data();
        for class in MaterialClass::ALL {
            assert!(
                data.items.iter().any(|i| i.material_class == Some(class)),
                "no {class:?} material"
            );
        }
    }
}
