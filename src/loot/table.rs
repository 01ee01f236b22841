//! Loot tables as the engine sees them: catalog tables for known content,
//! synthesised minimal tables for anything the catalog is missing.

use serde::{Deserialize, Serialize};

use crate::catalog::{
    AreaTemplate, AreaTheme, ExplorationType, LootEntry, MonsterFamily, MonsterTemplate,
};
use crate::constants::MAX_LEVEL;
use crate::farming::ContentKind;
use crate::resolver::MonsterHint;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedTable {
    pub kind: ContentKind,
    pub id: String,
    pub name: String,
    pub content_level: u32,
    pub drops: Vec<LootEntry>,
    pub gold_range: (u32, u32),
    pub monster: Option<MonsterHint>,
    pub area_theme: Option<AreaTheme>,
    pub area_bonus: f64,
    pub default_exploration: ExplorationType,
    /// Built from the id alone; the catalog had no entry
    pub synthesized: bool,
}

impl ResolvedTable {
    pub fn from_monster(monster: &MonsterTemplate) -> Self {
        Self {
            kind: ContentKind::Monster,
            id: monster.id.clone(),
            name: monster.name.clone(),
            content_level: monster.level.clamp(1, MAX_LEVEL),
            drops: monster.loot_table.drops.clone(),
            gold_range: ordered(monster.loot_table.gold_range),
            monster: Some(MonsterHint {
                family: monster.family,
                material_affinity: monster.loot_table.material_affinity.clone(),
            }),
            area_theme: None,
            area_bonus: 1.0,
            default_exploration: ExplorationType::Standard,
            synthesized: false,
        }
    }

    pub fn from_area(area: &AreaTemplate) -> Self {
        let level = area.loot_table.recommended_level.clamp(1, MAX_LEVEL);
        Self {
            kind: ContentKind::Area,
            id: area.id.clone(),
            name: area.name.clone(),
            content_level: level,
            drops: area.loot_table.drops.clone(),
            gold_range: (level, level * 2),
            monster: None,
            area_theme: Some(area.theme),
            area_bonus: area.loot_table.area_bonus,
            default_exploration: area.loot_table.exploration_type,
            synthesized: false,
        }
    }

    /// Minimal table for a monster the catalog doesn't know
    pub fn synthesize_monster(id: &str) -> Self {
        let level = estimate_level(id);
        Self {
            kind: ContentKind::Monster,
            id: id.to_string(),
            name: display_name(id),
            content_level: level,
            drops: vec![
                LootEntry::new("material", 0.5),
                LootEntry::new("consumable", 0.25),
                LootEntry::new("equipment", 0.08),
                LootEntry::new("spell_scroll", 0.03),
            ],
            gold_range: (1 + level / 2, 3 + level),
            monster: Some(MonsterHint {
                family: guess_family(id),
                material_affinity: Vec::new(),
            }),
            area_theme: None,
            area_bonus: 1.0,
            default_exploration: ExplorationType::Standard,
            synthesized: true,
        }
    }

    /// Minimal table for an area the catalog doesn't know
    pub fn synthesize_area(id: &str) -> Self {
        let level = estimate_level(id);
        Self {
            kind: ContentKind::Area,
            id: id.to_string(),
            name: display_name(id),
            content_level: level,
            drops: vec![
                LootEntry::new("material", 0.5),
                LootEntry::new("consumable", 0.3),
                LootEntry::new("equipment", 0.06),
                LootEntry::new("spell_scroll", 0.04),
            ],
            gold_range: (level, level * 2),
            monster: None,
            area_theme: Some(AreaTheme::from_keywords(id)),
            area_bonus: 1.0,
            default_exploration: ExplorationType::Standard,
            synthesized: true,
        }
    }
}

fn ordered((lo, hi): (u32, u32)) -> (u32, u32) {
    (lo.min(hi), lo.max(hi))
}

const LEVEL_KEYWORDS: &[(&str, u32)] = &[
    ("ancient", 50),
    ("dragon", 45),
    ("demon", 40),
    ("lich", 38),
    ("elder", 30),
    ("boss", 30),
    ("lord", 30),
    ("king", 25),
    ("elite", 20),
    ("captain", 15),
    ("veteran", 12),
    ("young", 3),
    ("small", 2),
    ("tiny", 1),
    ("baby", 1),
];

const DEFAULT_ESTIMATED_LEVEL: u32 = 5;

/// Level guess from an id: the first number in it, else a keyword, else 5
pub fn estimate_level(id: &str) -> u32 {
    let digits: String = id
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if let Ok(level) = digits.parse::<u32>() {
        return level.clamp(1, MAX_LEVEL);
    }

    let lower = id.to_ascii_lowercase();
    LEVEL_KEYWORDS
        .iter()
        .find(|(kw, _)| lower.contains(kw))
        .map(|(_, level)| *level)
        .unwrap_or(DEFAULT_ESTIMATED_LEVEL)
}

fn guess_family(id: &str) -> MonsterFamily {
    const FAMILIES: &[(&[&str], MonsterFamily)] = &[
        (&["skeleton", "zombie", "ghost", "ghoul", "lich", "wraith"], MonsterFamily::Undead),
        (&["dragon", "drake", "wyrm", "wyvern"], MonsterFamily::Dragon),
        (&["demon", "imp", "fiend"], MonsterFamily::Demon),
        (&["golem", "construct", "automaton"], MonsterFamily::Construct),
        (&["elemental", "wisp"], MonsterFamily::Elemental),
        (&["slime", "ooze", "jelly"], MonsterFamily::Slime),
        (&["spider", "beetle", "wasp", "scorpion"], MonsterFamily::Insect),
        (&["treant", "vine", "shroom"], MonsterFamily::Plant),
        (&["wolf", "rat", "bear", "boar", "bat"], MonsterFamily::Beast),
    ];
    let lower = id.to_ascii_lowercase();
    FAMILIES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|kw| lower.contains(kw)))
        .map(|(_, family)| *family)
        .unwrap_or(MonsterFamily::Humanoid)
}

fn display_name(id: &str) -> String {
    id.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_level_digits_first() {
        assert_eq!(estimate_level("goblin_lvl_12"), 12);
        assert_eq!(estimate_level("ancient_thing_7"), 7);
        assert_eq!(estimate_level("level_9999"), MAX_LEVEL);
        assert_eq!(estimate_level("floor_0_rat"), 1);
    }

    #[test]
    fn test_estimate_level_keywords() {
        assert_eq!(estimate_level("elder_treant"), 30);
        assert_eq!(estimate_level("tiny_bat"), 1);
        assert_eq!(estimate_level("mystery"), DEFAULT_ESTIMATED_LEVEL);
    }

    #[test]
    fn test_guess_family() {
        assert_eq!(guess_family("cave_spider_queen"), MonsterFamily::Insect);
        assert_eq!(guess_family("frost_wyrm"), MonsterFamily::Dragon);
        assert_eq!(guess_family("bandit_chief"), MonsterFamily::Humanoid);
    }

    #[test]
    fn test_synthesized_tables() {
        let monster = ResolvedTable::synthesize_monster("shadow_beast_14");
        assert!(monster.synthesized);
        assert_eq!(monster.content_level, 14);
        assert_eq!(monster.drops.len(), 4);
        assert!(monster.gold_range.0 <= monster.gold_range.1);

        let area = ResolvedTable::synthesize_area("sunken_crypt");
        assert_eq!(area.area_theme, Some(AreaTheme::Crypt));
        assert_eq!(area.name, "Sunken Crypt");
    }
}
