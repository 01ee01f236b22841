//! Read-only game catalogs.
//!
//! The loot core never owns item, spell, monster, area or equipment data. It
//! reads them through `GameCatalog`. `StaticCatalog` is the in-memory
//! implementation: loadable from JSON or RON, or built from the bundled demo
//! dataset.

pub mod builtin;
pub mod reward;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

use crate::error::CatalogError;
use crate::rarity::RarityTier;

pub use reward::{LootEntry, RewardClass, RewardDescriptor};

// ============================================================================
// Shared vocabulary
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterClass {
    Warrior,
    Mage,
    Rogue,
    Cleric,
    Ranger,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 5] = [
        CharacterClass::Warrior,
        CharacterClass::Mage,
        CharacterClass::Rogue,
        CharacterClass::Cleric,
        CharacterClass::Ranger,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warrior => "warrior",
            Self::Mage => "mage",
            Self::Rogue => "rogue",
            Self::Cleric => "cleric",
            Self::Ranger => "ranger",
        }
    }
}

impl FromStr for CharacterClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_id(s).as_str() {
            "warrior" | "fighter" | "knight" => Ok(Self::Warrior),
            "mage" | "wizard" | "sorcerer" => Ok(Self::Mage),
            "rogue" | "thief" | "assassin" => Ok(Self::Rogue),
            "cleric" | "priest" | "healer" => Ok(Self::Cleric),
            "ranger" | "archer" | "hunter" => Ok(Self::Ranger),
            other => Err(format!("unknown class: {other}")),
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Fire,
    Ice,
    Lightning,
    Earth,
    Water,
    Nature,
    Light,
    Dark,
    Arcane,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaTheme {
    Forest,
    Cave,
    Mountain,
    Swamp,
    Desert,
    Volcano,
    Tundra,
    Ruins,
    Crypt,
    Temple,
    Coast,
    Plains,
}

impl AreaTheme {
    /// Guess a theme from an area name, for areas missing from the catalog
    pub fn from_keywords(name: &str) -> Self {
        let name = normalize_id(name);
        let table = [
            ("forest", Self::Forest),
            ("wood", Self::Forest),
            ("grove", Self::Forest),
            ("cave", Self::Cave),
            ("mine", Self::Cave),
            ("mountain", Self::Mountain),
            ("peak", Self::Mountain),
            ("swamp", Self::Swamp),
            ("marsh", Self::Swamp),
            ("desert", Self::Desert),
            ("dune", Self::Desert),
            ("volcan", Self::Volcano),
            ("lava", Self::Volcano),
            ("tundra", Self::Tundra),
            ("frozen", Self::Tundra),
            ("ice", Self::Tundra),
            ("ruin", Self::Ruins),
            ("crypt", Self::Crypt),
            ("tomb", Self::Crypt),
            ("grave", Self::Crypt),
            ("temple", Self::Temple),
            ("shrine", Self::Temple),
            ("coast", Self::Coast),
            ("beach", Self::Coast),
            ("shore", Self::Coast),
        ];
        table
            .iter()
            .find(|(kw, _)| name.contains(kw))
            .map(|(_, theme)| *theme)
            .unwrap_or(Self::Plains)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonsterFamily {
    Beast,
    Undead,
    Humanoid,
    Elemental,
    Plant,
    Construct,
    Dragon,
    Demon,
    Slime,
    Insect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Equipment,
    Consumable,
    Material,
    SpellContainer,
    Currency,
    Misc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumableClass {
    Healing,
    Mana,
    Enhancement,
    Utility,
    Revival,
}

impl ConsumableClass {
    pub const ALL: [ConsumableClass; 5] = [
        ConsumableClass::Healing,
        ConsumableClass::Mana,
        ConsumableClass::Enhancement,
        ConsumableClass::Utility,
        ConsumableClass::Revival,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialClass {
    Ore,
    Herb,
    Hide,
    Bone,
    Essence,
    Gem,
    Cloth,
    Wood,
    Relic,
}

impl MaterialClass {
    pub const ALL: [MaterialClass; 9] = [
        MaterialClass::Ore,
        MaterialClass::Herb,
        MaterialClass::Hide,
        MaterialClass::Bone,
        MaterialClass::Essence,
        MaterialClass::Gem,
        MaterialClass::Cloth,
        MaterialClass::Wood,
        MaterialClass::Relic,
    ];
}

/// Spell-learning item types, weakest to strongest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellContainer {
    Scroll,
    Book,
    Tome,
    AncientTome,
}

impl SpellContainer {
    /// Item id of the container itself
    pub fn item_id(self) -> &'static str {
        match self {
            Self::Scroll => "spell_scroll",
            Self::Book => "spell_book",
            Self::Tome => "spell_tome",
            Self::AncientTome => "ancient_tome",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Accessory,
}

/// How a fight went, used to bias consumable drops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterType {
    #[default]
    Normal,
    Group,
    Boss,
    Rare,
}

/// Exploration style for area loot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplorationType {
    #[default]
    Standard,
    Thorough,
    Quick,
    TreasureHunt,
}

impl FromStr for ExplorationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_id(s).as_str() {
            "standard" => Ok(Self::Standard),
            "thorough" => Ok(Self::Thorough),
            "quick" => Ok(Self::Quick),
            "treasure_hunt" => Ok(Self::TreasureHunt),
            other => Err(format!("unknown exploration type: {other}")),
        }
    }
}

// ============================================================================
// Templates
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemTemplate {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    pub base_value: u32,
    /// Level the item is aimed at
    pub level: u32,
    #[serde(default)]
    pub rarity: Option<RarityTier>,
    #[serde(default)]
    pub consumable_class: Option<ConsumableClass>,
    #[serde(default)]
    pub material_class: Option<MaterialClass>,
    #[serde(default)]
    pub container: Option<SpellContainer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentTemplate {
    pub id: String,
    pub name: String,
    pub slot: EquipmentSlot,
    /// e.g. "sword", "robe", "ring"
    pub category: String,
    pub level_requirement: u32,
    /// Empty = usable by every class
    #[serde(default)]
    pub class_requirements: Vec<CharacterClass>,
    pub rarity: RarityTier,
    pub base_value: u32,
}

impl EquipmentTemplate {
    pub fn usable_by(&self, class: CharacterClass) -> bool {
        self.class_requirements.is_empty() || self.class_requirements.contains(&class)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpellTemplate {
    pub id: String,
    pub name: String,
    pub learn_level: u32,
    pub element: Element,
    #[serde(default)]
    pub available_classes: Vec<CharacterClass>,
    pub rarity: RarityTier,
    /// Stat requirements, e.g. {"intelligence": 14}
    #[serde(default)]
    pub requirements: BTreeMap<String, u32>,
}

impl SpellTemplate {
    pub fn learnable_by(&self, class: CharacterClass) -> bool {
        self.available_classes.is_empty() || self.available_classes.contains(&class)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonsterLootTable {
    pub drops: Vec<LootEntry>,
    pub gold_range: (u32, u32),
    /// Material ids this monster is known to drop, strongest first
    #[serde(default)]
    pub material_affinity: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonsterTemplate {
    pub id: String,
    pub name: String,
    pub level: u32,
    pub family: MonsterFamily,
    pub loot_table: MonsterLootTable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaLootTable {
    pub recommended_level: u32,
    pub drops: Vec<LootEntry>,
    #[serde(default)]
    pub exploration_type: ExplorationType,
    /// Multiplier on every drop chance in the area
    #[serde(default = "default_area_bonus")]
    pub area_bonus: f64,
}

fn default_area_bonus() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaTemplate {
    pub id: String,
    pub name: String,
    pub theme: AreaTheme,
    pub loot_table: AreaLootTable,
}

// ============================================================================
// Catalog access
// ============================================================================

/// Read-only lookups the loot core needs. Ids are normalised by the caller
/// with `normalize_id` before lookup.
pub trait GameCatalog: Send + Sync {
    fn item(&self, id: &str) -> Option<&ItemTemplate>;
    fn items(&self) -> &BTreeMap<String, ItemTemplate>;
    fn monster(&self, id: &str) -> Option<&MonsterTemplate>;
    fn area(&self, id: &str) -> Option<&AreaTemplate>;
    fn spell(&self, id: &str) -> Option<&SpellTemplate>;
    fn spells(&self) -> &BTreeMap<String, SpellTemplate>;
    fn equipment(&self, id: &str) -> Option<&EquipmentTemplate>;
    fn equipment_in_category(&self, category: &str) -> Vec<&EquipmentTemplate>;
    fn equipment_categories(&self) -> Vec<&str>;
}

/// Lower-case, trimmed, spaces and dashes as underscores
pub fn normalize_id(id: &str) -> String {
    id.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

/// Serialized catalog layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogData {
    pub items: Vec<ItemTemplate>,
    pub equipment: Vec<EquipmentTemplate>,
    pub spells: Vec<SpellTemplate>,
    pub monsters: Vec<MonsterTemplate>,
    pub areas: Vec<AreaTemplate>,
}

/// In-memory catalog. Equipment templates are mirrored into the item index
/// so `item(id)` answers for gear too.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    items: BTreeMap<String, ItemTemplate>,
    equipment: BTreeMap<String, EquipmentTemplate>,
    categories: BTreeMap<String, Vec<String>>,
    spells: BTreeMap<String, SpellTemplate>,
    monsters: BTreeMap<String, MonsterTemplate>,
    areas: BTreeMap<String, AreaTemplate>,
}

impl StaticCatalog {
    /// Bundled demo dataset
    pub fn builtin() -> Self {
        Self::index(builtin::catalog_data())
    }

    /// Strict construction: duplicate ids are rejected
    pub fn from_data(data: CatalogData) -> Result<Self, CatalogError> {
        check_unique("items", data.items.iter().map(|i| i.id.as_str()))?;
        check_unique("equipment", data.equipment.iter().map(|e| e.id.as_str()))?;
        check_unique("spells", data.spells.iter().map(|s| s.id.as_str()))?;
        check_unique("monsters", data.monsters.iter().map(|m| m.id.as_str()))?;
        check_unique("areas", data.areas.iter().map(|a| a.id.as_str()))?;
        Ok(Self::index(data))
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(json)?;
        Self::from_data(data)
    }

    pub fn from_ron_str(text: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = ron::from_str(text)?;
        Self::from_data(data)
    }

    /// Load by extension: `.ron` or anything else as JSON
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let catalog = match path.extension().and_then(|e| e.to_str()) {
            Some("ron") => Self::from_ron_str(&content)?,
            _ => Self::from_json_str(&content)?,
        };
        info!(
            path = %path.display(),
            items = catalog.items.len(),
            monsters = catalog.monsters.len(),
            areas = catalog.areas.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    fn index(data: CatalogData) -> Self {
        let mut catalog = Self::default();

        for mut item in data.items {
            item.id = normalize_id(&item.id);
            catalog.items.insert(item.id.clone(), item);
        }

        for mut gear in data.equipment {
            gear.id = normalize_id(&gear.id);
            let id = gear.id.clone();
            catalog
                .categories
                .entry(normalize_id(&gear.category))
                .or_default()
                .push(id.clone());
            if catalog.items.contains_key(&id) {
                warn!(id = %id, "Equipment id shadows an item entry");
            }
            catalog.items.insert(
                id.clone(),
                ItemTemplate {
                    id: id.clone(),
                    name: gear.name.clone(),
                    kind: ItemKind::Equipment,
                    base_value: gear.base_value,
                    level: gear.level_requirement,
                    rarity: Some(gear.rarity),
                    consumable_class: None,
                    material_class: None,
                    container: None,
                },
            );
            catalog.equipment.insert(id, gear);
        }

        for mut spell in data.spells {
            spell.id = normalize_id(&spell.id);
            catalog.spells.insert(spell.id.clone(), spell);
        }
        for mut monster in data.monsters {
            monster.id = normalize_id(&monster.id);
            let table = &mut monster.loot_table;
            table.drops.iter_mut().for_each(LootEntry::normalize_ids);
            for id in &mut table.material_affinity {
                *id = normalize_id(id);
            }
            catalog.monsters.insert(monster.id.clone(), monster);
        }
        for mut area in data.areas {
            area.id = normalize_id(&area.id);
            area.loot_table.drops.iter_mut().for_each(LootEntry::normalize_ids);
            catalog.areas.insert(area.id.clone(), area);
        }

        catalog
    }
}

fn check_unique<'a>(
    table: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), CatalogError> {
    let mut seen = std::collections::BTreeSet::new();
    for id in ids {
        let id = normalize_id(id);
        if !seen.insert(id.clone()) {
            return Err(CatalogError::DuplicateId { table, id });
        }
    }
    Ok(())
}

impl GameCatalog for StaticCatalog {
    fn item(&self, id: &str) -> Option<&ItemTemplate> {
        self.items.get(id)
    }

    fn items(&self) -> &BTreeMap<String, ItemTemplate> {
        &self.items
    }

    fn monster(&self, id: &str) -> Option<&MonsterTemplate> {
        self.monsters.get(id)
    }

    fn area(&self, id: &str) -> Option<&AreaTemplate> {
        self.areas.get(id)
    }

    fn spell(&self, id: &str) -> Option<&SpellTemplate> {
        self.spells.get(id)
    }

    fn spells(&self) -> &BTreeMap<String, SpellTemplate> {
        &self.spells
    }

    fn equipment(&self, id: &str) -> Option<&EquipmentTemplate> {
        self.equipment.get(id)
    }

    fn equipment_in_category(&self, category: &str) -> Vec<&EquipmentTemplate> {
        self.categories
            .get(category)
            .map(|ids| ids.iter().filter_map(|id| self.equipment.get(id)).collect())
            .unwrap_or_default()
    }

    fn equipment_categories(&self) -> Vec<&str> {
        self.categories.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_id() {
        assert_eq!(normalize_id("  Forest Wolf "), "forest_wolf");
        assert_eq!(normalize_id("Stone-Golem"), "stone_golem");
        assert_eq!(normalize_id("slime"), "slime");
    }

    #[test]
    fn test_builtin_catalog_populated() {
        let catalog = StaticCatalog::builtin();
        assert!(catalog.item("iron_ore").is_some());
        assert!(catalog.monster("goblin").is_some());
        assert!(catalog.area("forest").is_some());
        assert!(catalog.spell("fireball").is_some());
        assert!(!catalog.equipment_in_category("sword").is_empty());
    }

    #[test]
    fn test_equipment_mirrored_into_items() {
        let catalog = StaticCatalog::builtin();
        let item = catalog.item("iron_sword").unwrap();
        assert_eq!(item.kind, ItemKind::Equipment);
        assert_eq!(
            item.level,
            catalog.equipment("iron_sword").unwrap().level_requirement
        );
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut data = builtin::catalog_data();
        let dup = data.items[0].clone();
        data.items.push(dup);
        assert!(matches!(
            StaticCatalog::from_data(data),
            Err(CatalogError::DuplicateId { table: "items", .. })
        ));
    }

    #[test]
    fn test_json_catalog_roundtrip_through_data() {
        let json = r#"{
            "items": [
                {"id": "Iron-Ore", "name": "Iron Ore", "kind": "material", "base_value": 4,
                 "level": 8, "material_class": "ore"}
            ],
            "monsters": [
                {"id": "rat", "name": "Rat", "level": 1, "family": "beast",
                 "loot_table": {
                    "drops": [{"item_type": "material", "drop_chance": 0.5,
                               "rarity_weights": {"common": 0.9, "uncommon": 0.1}}],
                    "gold_range": [1, 2]
                 }}
            ]
        }"#;
        let catalog = StaticCatalog::from_json_str(json).unwrap();
        assert!(catalog.item("iron_ore").is_some());
        let rat = catalog.monster("rat").unwrap();
        assert_eq!(rat.loot_table.drops.len(), 1);
        assert_eq!(
            rat.loot_table.drops[0].item_type,
            RewardDescriptor::MaterialPhaseClass(None)
        );
        assert_eq!(rat.loot_table.drops[0].rarity_weights.len(), 2);
    }

    #[test]
    fn test_loaded_drop_ids_normalised() {
        let ron = r#"(
            monsters: [(
                id: "Cave Rat",
                name: "Cave Rat",
                level: 3,
                family: beast,
                loot_table: (
                    drops: [(
                        item_type: "ore",
                        drop_chance: 0.5,
                        candidates: ["Iron-Ore", " Copper Ore "],
                        equipment_categories: ["Short-Sword"],
                    )],
                    gold_range: (1, 2),
                    material_affinity: ["Iron-Ore"],
                ),
            )],
            areas: [(
                id: "Rat Warren",
                name: "Rat Warren",
                theme: cave,
                loot_table: (
                    recommended_level: 3,
                    drops: [(item_type: "material", drop_chance: 0.4, candidates: ["IRON-ORE"])],
                ),
            )],
        )"#;
        let catalog = StaticCatalog::from_ron_str(ron).unwrap();

        let rat = catalog.monster("cave_rat").unwrap();
        let entry = &rat.loot_table.drops[0];
        assert_eq!(entry.candidates, vec!["iron_ore", "copper_ore"]);
        assert_eq!(entry.equipment_categories, vec!["short_sword"]);
        assert_eq!(rat.loot_table.material_affinity, vec!["iron_ore"]);

        let warren = catalog.area("rat_warren").unwrap();
        assert_eq!(warren.loot_table.drops[0].candidates, vec!["iron_ore"]);
    }

    #[test]
    fn test_theme_keywords() {
        assert_eq!(AreaTheme::from_keywords("Whispering Woods"), AreaTheme::Forest);
        assert_eq!(AreaTheme::from_keywords("old_crypt"), AreaTheme::Crypt);
        assert_eq!(AreaTheme::from_keywords("nowhere"), AreaTheme::Plains);
    }

    #[test]
    fn test_class_aliases() {
        assert_eq!("Wizard".parse::<CharacterClass>().unwrap(), CharacterClass::Mage);
        assert!("bard".parse::<CharacterClass>().is_err());
    }
}
