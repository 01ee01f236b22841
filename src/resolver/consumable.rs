//! Consumable selection through learning phases.
//!
//! A phase decides the base mix of consumable classes. The area and the kind
//! of encounter bend it: boss fights lean to enhancement and revival, group
//! fights to healing, hostile terrain to utility.

use serde::{Deserialize, Serialize};

use super::{level_closeness, ResolveContext};
use crate::catalog::{
    AreaTheme, CharacterClass, ConsumableClass, EncounterType, GameCatalog, ItemKind, ItemTemplate,
};
use crate::error::LootError;
use crate::rng::LootRng;
use crate::weighted;

/// Where a player is in learning the game, by level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningPhase {
    Discovery,   // 1-5
    Foundation,  // 6-12
    Development, // 13-22
    Mastery,     // 23-35
    Endgame,     // 36+
}

impl LearningPhase {
    pub fn from_level(level: u32) -> Self {
        match level {
            0..=5 => Self::Discovery,
            6..=12 => Self::Foundation,
            13..=22 => Self::Development,
            23..=35 => Self::Mastery,
            _ => Self::Endgame,
        }
    }

    /// 0 for discovery through 4 for endgame
    pub fn index(self) -> usize {
        self as usize
    }

    /// Base weights, in `ConsumableClass::ALL` order
    pub fn weights(self) -> [f64; 5] {
        match self {
            Self::Discovery => [60.0, 20.0, 5.0, 15.0, 0.0],
            Self::Foundation => [45.0, 25.0, 12.0, 15.0, 3.0],
            Self::Development => [35.0, 25.0, 20.0, 14.0, 6.0],
            Self::Mastery => [28.0, 22.0, 26.0, 14.0, 10.0],
            Self::Endgame => [22.0, 20.0, 30.0, 14.0, 14.0],
        }
    }
}

fn encounter_modifiers(encounter: EncounterType) -> [f64; 5] {
    match encounter {
        EncounterType::Normal => [1.0; 5],
        EncounterType::Boss => [1.0, 1.0, 2.0, 1.0, 2.5],
        EncounterType::Group => [1.3, 1.0, 1.5, 1.0, 1.0],
        EncounterType::Rare => [1.0, 1.0, 1.5, 1.2, 1.5],
    }
}

fn theme_modifiers(theme: AreaTheme) -> [f64; 5] {
    match theme {
        AreaTheme::Swamp | AreaTheme::Volcano | AreaTheme::Tundra | AreaTheme::Desert => {
            [1.0, 1.0, 1.0, 1.5, 1.0]
        }
        AreaTheme::Crypt => [1.0, 1.0, 1.0, 1.0, 1.5],
        AreaTheme::Temple | AreaTheme::Ruins => [1.0, 1.3, 1.0, 1.0, 1.0],
        _ => [1.0; 5],
    }
}

fn class_modifiers(class: CharacterClass) -> [f64; 5] {
    match class {
        CharacterClass::Mage => [0.8, 1.6, 1.0, 1.0, 1.0],
        CharacterClass::Cleric => [0.9, 1.3, 1.0, 1.0, 1.0],
        CharacterClass::Warrior => [1.2, 0.4, 1.3, 1.0, 1.0],
        CharacterClass::Rogue | CharacterClass::Ranger => [1.0, 0.7, 1.2, 1.2, 1.0],
    }
}

/// Final class weights for a context
pub fn class_weights(ctx: &ResolveContext) -> Vec<(ConsumableClass, f64)> {
    let base = LearningPhase::from_level(ctx.player_level).weights();
    let encounter = encounter_modifiers(ctx.encounter);
    let theme = ctx.area_theme.map_or([1.0; 5], theme_modifiers);
    let class = ctx.class.map_or([1.0; 5], class_modifiers);

    ConsumableClass::ALL
        .iter()
        .enumerate()
        .map(|(i, c)| (*c, base[i] * encounter[i] * theme[i] * class[i]))
        .collect()
}

pub(super) fn resolve(
    catalog: &dyn GameCatalog,
    class: Option<ConsumableClass>,
    ctx: &ResolveContext,
    rng: &mut LootRng,
) -> Result<String, LootError> {
    let class = match class {
        Some(class) => class,
        None => *weighted::pick(&class_weights(ctx), rng.roll())
            .ok_or_else(|| LootError::EmptyPool("consumable class".into()))?,
    };
    pick_item(catalog, class, ctx.player_level, rng)
}

/// Closest-level item of a class, never more than five levels above the
/// player unless nothing lower exists
fn pick_item(
    catalog: &dyn GameCatalog,
    class: ConsumableClass,
    player_level: u32,
    rng: &mut LootRng,
) -> Result<String, LootError> {
    let of_class: Vec<&ItemTemplate> = catalog
        .items()
        .values()
        .filter(|item| item.kind == ItemKind::Consumable && item.consumable_class == Some(class))
        .collect();

    let reachable: Vec<(&ItemTemplate, f64)> = of_class
        .iter()
        .filter(|item| item.level <= player_level + 5)
        .map(|item| (*item, level_closeness(item.level, player_level, 0.2)))
        .collect();

    if let Some(item) = weighted::pick(&reachable, rng.roll()) {
        return Ok(item.id.clone());
    }

    of_class
        .iter()
        .min_by_key(|item| item.level)
        .map(|item| item.id.clone())
        .ok_or_else(|| LootError::EmptyPool(format!("consumable {class:?}")))
}
