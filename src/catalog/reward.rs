//! Reward descriptors and loot table entries.
//!
//! Catalog data names rewards with string tokens ("iron_ore", "material",
//! "spell_scroll", ...). They are parsed once into `RewardDescriptor`, and
//! everything downstream dispatches on the variant.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::{normalize_id, ConsumableClass, EquipmentSlot, MaterialClass, SpellContainer};
use crate::rarity::RarityTier;

/// What a loot entry hands out
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RewardDescriptor {
    /// A specific catalog item id
    Concrete(String),
    /// Any gear, optionally restricted to one slot
    EquipmentCategory(Option<EquipmentSlot>),
    /// A consumable picked through the learning-phase table
    ConsumablePhaseClass(Option<ConsumableClass>),
    /// A material picked through the crafting-phase table
    MaterialPhaseClass(Option<MaterialClass>),
    /// A spell-learning item
    SpellContainer(SpellContainer),
    /// Extra gold; never resolves to an item
    Gold,
}

impl FromStr for RewardDescriptor {
    type Err = std::convert::Infallible;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = normalize_id(token);
        let descriptor = match token.as_str() {
            "equipment" | "gear" => Self::EquipmentCategory(None),
            "weapon" => Self::EquipmentCategory(Some(EquipmentSlot::Weapon)),
            "armor" | "armour" => Self::EquipmentCategory(Some(EquipmentSlot::Armor)),
            "accessory" | "jewelry" => Self::EquipmentCategory(Some(EquipmentSlot::Accessory)),

            "consumable" | "potion" => Self::ConsumablePhaseClass(None),
            "healing" | "healing_item" => Self::ConsumablePhaseClass(Some(ConsumableClass::Healing)),
            "mana" | "mana_item" => Self::ConsumablePhaseClass(Some(ConsumableClass::Mana)),
            "enhancement" | "buff" => Self::ConsumablePhaseClass(Some(ConsumableClass::Enhancement)),
            "utility" => Self::ConsumablePhaseClass(Some(ConsumableClass::Utility)),
            "revival" | "revive" => Self::ConsumablePhaseClass(Some(ConsumableClass::Revival)),

            "material" | "crafting_material" | "materials" => Self::MaterialPhaseClass(None),
            "ore" => Self::MaterialPhaseClass(Some(MaterialClass::Ore)),
            "herb" => Self::MaterialPhaseClass(Some(MaterialClass::Herb)),
            "hide" | "leather" => Self::MaterialPhaseClass(Some(MaterialClass::Hide)),
            "bone" => Self::MaterialPhaseClass(Some(MaterialClass::Bone)),
            "essence" => Self::MaterialPhaseClass(Some(MaterialClass::Essence)),
            "gem" => Self::MaterialPhaseClass(Some(MaterialClass::Gem)),
            "cloth" | "fabric" => Self::MaterialPhaseClass(Some(MaterialClass::Cloth)),
            "wood" => Self::MaterialPhaseClass(Some(MaterialClass::Wood)),
            "relic" => Self::MaterialPhaseClass(Some(MaterialClass::Relic)),

            "spell_scroll" | "scroll" => Self::SpellContainer(SpellContainer::Scroll),
            "spell_book" | "book" => Self::SpellContainer(SpellContainer::Book),
            "spell_tome" | "tome" => Self::SpellContainer(SpellContainer::Tome),
            "ancient_tome" => Self::SpellContainer(SpellContainer::AncientTome),

            "gold" | "coins" => Self::Gold,
            _ => Self::Concrete(token),
        };
        Ok(descriptor)
    }
}

impl From<String> for RewardDescriptor {
    fn from(token: String) -> Self {
        match token.parse() {
            Ok(descriptor) => descriptor,
            Err(never) => match never {},
        }
    }
}

impl From<&str> for RewardDescriptor {
    fn from(token: &str) -> Self {
        Self::from(token.to_string())
    }
}

impl fmt::Display for RewardDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            Self::Concrete(id) => id.as_str(),
            Self::EquipmentCategory(None) => "equipment",
            Self::EquipmentCategory(Some(EquipmentSlot::Weapon)) => "weapon",
            Self::EquipmentCategory(Some(EquipmentSlot::Armor)) => "armor",
            Self::EquipmentCategory(Some(EquipmentSlot::Accessory)) => "accessory",
            Self::ConsumablePhaseClass(None) => "consumable",
            Self::ConsumablePhaseClass(Some(class)) => match class {
                ConsumableClass::Healing => "healing",
                ConsumableClass::Mana => "mana",
                ConsumableClass::Enhancement => "enhancement",
                ConsumableClass::Utility => "utility",
                ConsumableClass::Revival => "revival",
            },
            Self::MaterialPhaseClass(None) => "material",
            Self::MaterialPhaseClass(Some(class)) => match class {
                MaterialClass::Ore => "ore",
                MaterialClass::Herb => "herb",
                MaterialClass::Hide => "hide",
                MaterialClass::Bone => "bone",
                MaterialClass::Essence => "essence",
                MaterialClass::Gem => "gem",
                MaterialClass::Cloth => "cloth",
                MaterialClass::Wood => "wood",
                MaterialClass::Relic => "relic",
            },
            Self::SpellContainer(container) => container.item_id(),
            Self::Gold => "gold",
        };
        f.write_str(token)
    }
}

impl From<RewardDescriptor> for String {
    fn from(descriptor: RewardDescriptor) -> Self {
        descriptor.to_string()
    }
}

/// Coarse reward class used for drop-rate tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardClass {
    Equipment,
    Spell,
    Healing,
    Consumable,
    Material,
    Currency,
    Other,
}

impl RewardDescriptor {
    /// Class implied by the descriptor alone. Concrete ids need a catalog
    /// lookup to be classified and report `Other` here.
    pub fn default_class(&self) -> RewardClass {
        match self {
            Self::Concrete(_) => RewardClass::Other,
            Self::EquipmentCategory(_) => RewardClass::Equipment,
            Self::ConsumablePhaseClass(Some(ConsumableClass::Healing)) => RewardClass::Healing,
            Self::ConsumablePhaseClass(_) => RewardClass::Consumable,
            Self::MaterialPhaseClass(_) => RewardClass::Material,
            Self::SpellContainer(_) => RewardClass::Spell,
            Self::Gold => RewardClass::Currency,
        }
    }
}

/// One row of a monster or area loot table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LootEntry {
    pub item_type: RewardDescriptor,
    pub drop_chance: f64,
    #[serde(default)]
    pub rarity_weights: BTreeMap<RarityTier, f64>,
    /// Explicit item ids to choose from
    #[serde(default)]
    pub candidates: Vec<String>,
    /// Equipment categories ("sword", "robe", ...) to choose from
    #[serde(default)]
    pub equipment_categories: Vec<String>,
    #[serde(default)]
    pub quantity: Option<(u32, u32)>,
}

impl LootEntry {
    pub fn new(item_type: impl Into<RewardDescriptor>, drop_chance: f64) -> Self {
        Self {
            item_type: item_type.into(),
            drop_chance,
            rarity_weights: BTreeMap::new(),
            candidates: Vec::new(),
            equipment_categories: Vec::new(),
            quantity: None,
        }
    }

    pub fn with_weights(mut self, weights: &[(RarityTier, f64)]) -> Self {
        self.rarity_weights = weights.iter().copied().collect();
        self
    }

    pub fn with_candidates(mut self, ids: &[&str]) -> Self {
        self.candidates = ids.iter().map(|id| normalize_id(id)).collect();
        self
    }

    pub fn with_categories(mut self, categories: &[&str]) -> Self {
        self.equipment_categories = categories.iter().map(|c| normalize_id(c)).collect();
        self
    }

    /// Normalise candidate ids and category names in place. Entries loaded
    /// through serde skip the builders and need this before lookup.
    pub fn normalize_ids(&mut self) {
        for id in self.candidates.iter_mut().chain(self.equipment_categories.iter_mut()) {
            *id = normalize_id(id);
        }
    }

    pub fn with_quantity(mut self, min: u32, max: u32) -> Self {
        self.quantity = Some((min.min(max), min.max(max)));
        self
    }
}
