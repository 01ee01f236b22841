//! Tower Loot Core
//!
//! Procedural reward generation for the Tower MMORPG:
//! - Rarity tiers with level-adjusted weights
//! - Progression scaling by content tier
//! - Anti-farming diminishing returns per content and level bucket
//! - Drop-chance pipeline with pity and meaningful-drop targeting
//! - Item resolution for equipment, consumables, materials and spells
//! - Loot orchestration with gold and experience rewards
//! - Performance self-test and Monte-Carlo drop simulation

pub mod cache;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod drops;
pub mod error;
pub mod farming;
pub mod logging;
pub mod loot;
pub mod perf;
pub mod progression;
pub mod rarity;
pub mod resolver;
pub mod rng;
pub mod weighted;

pub use catalog::{
    CharacterClass, EncounterType, ExplorationType, GameCatalog, LootEntry, RewardDescriptor,
    StaticCatalog,
};
pub use config::LootConfig;
pub use error::{CatalogError, ConfigError, LootError};
pub use farming::{ContentKind, DiminishingReturnsInfo};
pub use loot::{GeneratedItem, LootEngine, LootRequest, LootResult, SystemStats};
pub use perf::{run_performance_test, PerformanceGrade, PerformanceReport};
pub use rarity::{RarityTable, RarityTier};
