//! Material selection through crafting phases.
//!
//! Every reachable material is weighted as
//! `phase class weight × family priority × theme priority × level closeness`,
//! and ids the monster lists in its affinity get a further ×4.

use serde::{Deserialize, Serialize};

use super::{level_closeness, ResolveContext};
use crate::catalog::{AreaTheme, GameCatalog, ItemKind, ItemTemplate, MaterialClass, MonsterFamily};
use crate::error::LootError;
use crate::rng::LootRng;
use crate::weighted;

use MaterialClass::{Bone, Cloth, Essence, Gem, Herb, Hide, Ore, Relic, Wood};

const AFFINITY_BONUS: f64 = 4.0;
const FAMILY_PRIORITY: [f64; 3] = [3.0, 2.0, 1.5];
const THEME_PRIORITY: [f64; 2] = [2.0, 1.5];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CraftingPhase {
    Gathering,  // 1-8
    Refining,   // 9-18
    Artisan,    // 19-30
    Masterwork, // 31+
}

impl CraftingPhase {
    pub fn from_level(level: u32) -> Self {
        match level {
            0..=8 => Self::Gathering,
            9..=18 => Self::Refining,
            19..=30 => Self::Artisan,
            _ => Self::Masterwork,
        }
    }

    /// Base weights, in `MaterialClass::ALL` order
    pub fn weights(self) -> [f64; 9] {
        match self {
            Self::Gathering => [20.0, 25.0, 20.0, 10.0, 3.0, 2.0, 10.0, 10.0, 0.0],
            Self::Refining => [18.0, 18.0, 16.0, 12.0, 10.0, 6.0, 10.0, 8.0, 2.0],
            Self::Artisan => [14.0, 12.0, 12.0, 12.0, 18.0, 14.0, 8.0, 6.0, 4.0],
            Self::Masterwork => [10.0, 8.0, 8.0, 10.0, 22.0, 20.0, 6.0, 4.0, 12.0],
        }
    }

    pub fn weight_of(self, class: MaterialClass) -> f64 {
        let idx = MaterialClass::ALL.iter().position(|c| *c == class).unwrap_or(0);
        self.weights()[idx]
    }
}

/// Materials a monster family yields, strongest first
pub fn family_priorities(family: MonsterFamily) -> [MaterialClass; 3] {
    match family {
        MonsterFamily::Beast => [Hide, Bone, Herb],
        MonsterFamily::Undead => [Bone, Essence, Cloth],
        MonsterFamily::Humanoid => [Cloth, Ore, Relic],
        MonsterFamily::Elemental => [Essence, Gem, Ore],
        MonsterFamily::Plant => [Herb, Wood, Essence],
        MonsterFamily::Construct => [Ore, Gem, Relic],
        MonsterFamily::Dragon => [Hide, Gem, Relic],
        MonsterFamily::Demon => [Essence, Relic, Bone],
        MonsterFamily::Slime => [Essence, Herb, Gem],
        MonsterFamily::Insect => [Cloth, Hide, Essence],
    }
}

/// Materials an area yields, strongest first
pub fn theme_priorities(theme: AreaTheme) -> [MaterialClass; 2] {
    match theme {
        AreaTheme::Forest => [Herb, Wood],
        AreaTheme::Cave | AreaTheme::Mountain => [Ore, Gem],
        AreaTheme::Swamp => [Herb, Bone],
        AreaTheme::Desert => [Gem, Relic],
        AreaTheme::Volcano => [Ore, Essence],
        AreaTheme::Tundra => [Hide, Gem],
        AreaTheme::Ruins => [Relic, Gem],
        AreaTheme::Crypt => [Bone, Essence],
        AreaTheme::Temple => [Relic, Cloth],
        AreaTheme::Coast => [Gem, Cloth],
        AreaTheme::Plains => [Herb, Hide],
    }
}

/// Phase weight for a class after family and theme priorities
pub fn class_weight(class: MaterialClass, ctx: &ResolveContext) -> f64 {
    let mut weight = CraftingPhase::from_level(ctx.player_level).weight_of(class);
    if let Some(monster) = &ctx.monster {
        if let Some(rank) = family_priorities(monster.family).iter().position(|c| *c == class) {
            weight *= FAMILY_PRIORITY[rank];
        }
    }
    if let Some(theme) = ctx.area_theme {
        if let Some(rank) = theme_priorities(theme).iter().position(|c| *c == class) {
            weight *= THEME_PRIORITY[rank];
        }
    }
    weight
}

pub(super) fn resolve(
    catalog: &dyn GameCatalog,
    class: Option<MaterialClass>,
    ctx: &ResolveContext,
    rng: &mut LootRng,
) -> Result<String, LootError> {
    let materials: Vec<&ItemTemplate> = catalog
        .items()
        .values()
        .filter(|item| item.kind == ItemKind::Material)
        .filter(|item| class.map_or(true, |c| item.material_class == Some(c)))
        .collect();

    let affinity: &[String] = ctx
        .monster
        .as_ref()
        .map(|m| m.material_affinity.as_slice())
        .unwrap_or(&[]);

    let weighted: Vec<(&ItemTemplate, f64)> = materials
        .iter()
        .filter(|item| item.level <= ctx.player_level + 5)
        .map(|item| {
            // A forced class skips the phase table
            let class_w = match (class, item.material_class) {
                (Some(_), _) => 1.0,
                (None, Some(c)) => class_weight(c, ctx),
                (None, None) => 1.0,
            };
            let affinity_w = if affinity.iter().any(|id| *id == item.id) {
                AFFINITY_BONUS
            } else {
                1.0
            };
            let w = class_w * affinity_w * level_closeness(item.level, ctx.player_level, 0.15);
            (*item, w)
        })
        .collect();

    if let Some(item) = weighted::pick(&weighted, rng.roll()) {
        return Ok(item.id.clone());
    }

    materials
        .iter()
        .min_by_key(|item| item.level)
        .map(|item| item.id.clone())
        .ok_or_else(|| LootError::EmptyPool(format!("material {class:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::resolver::MonsterHint;

    #[test]
    fn test_phase_breakpoints() {
        assert_eq!(CraftingPhase::from_level(8), CraftingPhase::Gathering);
        assert_eq!(CraftingPhase::from_level(9), CraftingPhase::Refining);
        assert_eq!(CraftingPhase::from_level(30), CraftingPhase::Artisan);
        assert_eq!(CraftingPhase::from_level(31), CraftingPhase::Masterwork);
    }

    #[test]
    fn test_no_relics_while_gathering() {
        let ctx = ResolveContext::new(3, 3);
        assert_eq!(class_weight(Relic, &ctx), 0.0);
    }

    #[test]
    fn test_family_and_theme_priorities() {
        let plain = ResolveContext::new(10, 10);
        let beast = ResolveContext {
            monster: Some(MonsterHint {
                family: MonsterFamily::Beast,
                material_affinity: vec![],
            }),
            area_theme: Some(AreaTheme::Tundra),
            ..ResolveContext::new(10, 10)
        };
        // Hide: family ×3, theme ×2
        assert!((class_weight(Hide, &beast) - class_weight(Hide, &plain) * 6.0).abs() < 1e-9);
        assert_eq!(class_weight(Wood, &beast), class_weight(Wood, &plain));
    }

    #[test]
    fn test_affinity_ids_favoured() {
        let catalog = StaticCatalog::builtin();
        let mut rng = LootRng::seeded(31);
        let hint = |affinity: Vec<String>| ResolveContext {
            monster: Some(MonsterHint {
                family: MonsterFamily::Slime,
                material_affinity: affinity,
            }),
            ..ResolveContext::new(2, 2)
        };
        let with = hint(vec!["monster_essence".into()]);
        let without = hint(vec![]);
        let mut count = |ctx: &ResolveContext| {
            (0..2000)
                .filter(|_| resolve(&catalog, None, ctx, &mut rng).unwrap() == "monster_essence")
                .count()
        };
        let favoured = count(&with);
        let plain = count(&without);
        assert!(favoured > plain * 2, "{favoured} vs {plain}");
    }

    #[test]
    fn test_level_ceiling() {
        let catalog = StaticCatalog::builtin();
        let mut rng = LootRng::seeded(32);
        let ctx = ResolveContext::new(4, 4);
        for _ in 0..300 {
            let id = resolve(&catalog, None, &ctx, &mut rng).unwrap();
            assert!(catalog.item(&id).unwrap().level <= 9);
        }
    }

    #[test]
    fn test_forced_class_out_of_reach() {
        let catalog = StaticCatalog::builtin();
        let mut rng = LootRng::seeded(33);
        let id = resolve(&catalog, Some(Relic), &ResolveContext::new(1, 1), &mut rng).unwrap();
        assert_eq!(id, "ancient_coin");
    }
}
