//! Spell-learning items.
//!
//! Each container teaches spells from its own level band around the player.
//! Areas bias toward their elements: off-element spells survive the filter
//! only 30% of the time. Survivors are weighted by how well their rarity
//! suits the container and by learn-level distance.

use super::{ResolveContext, ResolvedItem};
use crate::catalog::{AreaTheme, Element, GameCatalog, SpellContainer, SpellTemplate};
use crate::error::LootError;
use crate::rng::LootRng;
use crate::weighted;

const OFF_ELEMENT_KEEP: f64 = 0.3;
const BAND_WIDENINGS: u32 = 3;

/// Learn-level band `(lo, hi)` a container draws from
pub fn level_band(container: SpellContainer, player_level: u32) -> (u32, u32) {
    let p = player_level as i64;
    let (lo, hi) = match container {
        SpellContainer::Scroll => (p - 8, p + 2),
        SpellContainer::Book => (p - 4, p + 5),
        SpellContainer::Tome => (p, p + 8),
        SpellContainer::AncientTome => (p + 3, p + 15),
    };
    (lo.max(1) as u32, hi.max(1) as u32)
}

/// Weight of each spell rarity per container, common first
fn rarity_bias(container: SpellContainer) -> [f64; 5] {
    match container {
        SpellContainer::Scroll => [1.0, 0.6, 0.3, 0.1, 0.05],
        SpellContainer::Book => [0.6, 1.0, 0.6, 0.3, 0.1],
        SpellContainer::Tome => [0.2, 0.6, 1.0, 0.8, 0.3],
        SpellContainer::AncientTome => [0.05, 0.2, 0.6, 1.0, 1.0],
    }
}

pub fn theme_elements(theme: AreaTheme) -> &'static [Element] {
    match theme {
        AreaTheme::Volcano => &[Element::Fire],
        AreaTheme::Tundra => &[Element::Ice],
        AreaTheme::Forest => &[Element::Nature],
        AreaTheme::Crypt => &[Element::Dark, Element::Light],
        AreaTheme::Temple => &[Element::Light, Element::Water],
        AreaTheme::Swamp | AreaTheme::Coast => &[Element::Water, Element::Nature],
        AreaTheme::Cave | AreaTheme::Mountain => &[Element::Earth],
        AreaTheme::Ruins => &[Element::Arcane],
        AreaTheme::Desert => &[Element::Fire, Element::Earth],
        AreaTheme::Plains => &[],
    }
}

pub(super) fn resolve(
    catalog: &dyn GameCatalog,
    container: SpellContainer,
    ctx: &ResolveContext,
    rng: &mut LootRng,
) -> Result<ResolvedItem, LootError> {
    let all: Vec<&SpellTemplate> = catalog.spells().values().collect();

    // Class filter only when it leaves something to pick
    let learnable: Vec<&SpellTemplate> = match ctx.class {
        Some(class) => {
            let filtered: Vec<_> = all.iter().copied().filter(|s| s.learnable_by(class)).collect();
            if filtered.is_empty() {
                all
            } else {
                filtered
            }
        }
        None => all,
    };

    let (mut lo, mut hi) = level_band(container, ctx.player_level);
    let mut in_band = within(&learnable, lo, hi);
    for _ in 0..BAND_WIDENINGS {
        if !in_band.is_empty() {
            break;
        }
        let width = (hi - lo).max(1);
        lo = lo.saturating_sub(width).max(1);
        hi += width;
        in_band = within(&learnable, lo, hi);
    }
    if in_band.is_empty() {
        in_band = learnable;
    }

    let elements = ctx.area_theme.map_or(&[][..], theme_elements);
    let pool: Vec<&SpellTemplate> = if elements.is_empty() {
        in_band
    } else {
        let kept: Vec<&SpellTemplate> = in_band
            .iter()
            .copied()
            .filter(|s| elements.contains(&s.element) || rng.chance(OFF_ELEMENT_KEEP))
            .collect();
        if kept.is_empty() {
            in_band
        } else {
            kept
        }
    };

    let bias = rarity_bias(container);
    let weighted: Vec<(&SpellTemplate, f64)> = pool
        .iter()
        .map(|s| {
            let distance = (s.learn_level as f64 - ctx.player_level as f64).abs();
            (*s, bias[s.rarity.index()] / (1.0 + distance))
        })
        .collect();

    let spell = weighted::pick(&weighted, rng.roll())
        .ok_or_else(|| LootError::EmptyPool(format!("spells for {}", container.item_id())))?;

    Ok(ResolvedItem {
        item_id: container.item_id().to_string(),
        spell_id: Some(spell.id.clone()),
        used_fallback: false,
    })
}

fn within<'a>(spells: &[&'a SpellTemplate], lo: u32, hi: u32) -> Vec<&'a SpellTemplate> {
    spells
        .iter()
        .copied()
        .filter(|s| (lo..=hi).contains(&s.learn_level))
        .collect()
}
