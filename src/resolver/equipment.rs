//! Equipment selection.
//!
//! Categories expand through the catalog into a pool. Each piece is weighted
//! by class fit, closeness to a jittered effective level, and a rarity bias
//! that grows with player level. Pieces more than five levels above the
//! player are never offered.

use super::{level_closeness, ItemResolver, ResolveContext};
use crate::catalog::{normalize_id, CharacterClass, EquipmentSlot, EquipmentTemplate};
use crate::error::LootError;
use crate::rng::LootRng;
use crate::weighted;

const CLASS_MATCH: f64 = 2.5;
const CLASS_MISMATCH: f64 = 0.3;
const LEVEL_FALLOFF: f64 = 0.25;
const LEVEL_JITTER: i32 = 2;
const MAX_LEVELS_ABOVE: u32 = 5;
/// Bonus for pieces whose own rarity matches the rolled tier
const ROLLED_RARITY_BONUS: f64 = 1.5;

pub fn class_weight(piece: &EquipmentTemplate, class: Option<CharacterClass>) -> f64 {
    match class {
        _ if piece.class_requirements.is_empty() => 1.0,
        None => 1.0,
        Some(class) if piece.usable_by(class) => CLASS_MATCH,
        Some(_) => CLASS_MISMATCH,
    }
}

/// Favour higher rarities as the player levels: below level 10 rare gear is
/// damped, above it boosted. Never under 0.2.
pub fn rarity_bias(rarity_index: usize, player_level: u32) -> f64 {
    let slope = player_level as f64 / 20.0 - 0.5;
    (1.0 + rarity_index as f64 * slope).max(0.2)
}

pub(super) fn resolve(
    resolver: &ItemResolver<'_>,
    categories: &[String],
    slot: Option<EquipmentSlot>,
    ctx: &ResolveContext,
    rng: &mut LootRng,
) -> Result<String, LootError> {
    let catalog = resolver.catalog();
    let key = format!(
        "equip:{:?}:{}",
        slot,
        if categories.is_empty() {
            "*".to_string()
        } else {
            categories.join(",")
        }
    );
    let pool = resolver.pool(key, || {
        let names: Vec<String> = if categories.is_empty() {
            catalog
                .equipment_categories()
                .into_iter()
                .map(str::to_string)
                .collect()
        } else {
            categories.iter().map(|c| normalize_id(c)).collect()
        };
        names
            .iter()
            .flat_map(|name| catalog.equipment_in_category(name))
            .filter(|piece| slot.map_or(true, |s| piece.slot == s))
            .map(|piece| piece.id.clone())
            .collect()
    });

    let jitter = rng.range_i32(-LEVEL_JITTER, LEVEL_JITTER);
    let effective = (ctx.player_level as i32 + jitter).max(1) as u32;
    let ceiling = ctx.player_level + MAX_LEVELS_ABOVE;

    let weighted: Vec<(&EquipmentTemplate, f64)> = pool
        .iter()
        .filter_map(|id| catalog.equipment(id))
        .filter(|piece| piece.level_requirement <= ceiling)
        .map(|piece| {
            let mut w = class_weight(piece, ctx.class)
                * level_closeness(piece.level_requirement, effective, LEVEL_FALLOFF)
                * rarity_bias(piece.rarity.index(), ctx.player_level);
            if ctx.rarity == Some(piece.rarity) {
                w *= ROLLED_RARITY_BONUS;
            }
            (piece, w)
        })
        .collect();

    weighted::pick(&weighted, rng.roll())
        .map(|piece| piece.id.clone())
        .ok_or_else(|| LootError::EmptyPool(format!("equipment {}", categories.join(","))))
}
