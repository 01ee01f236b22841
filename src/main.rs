//! Loot demo: prints sample drops and the performance report as JSON.
//!
//! Usage: `loot-demo [config.ron|config.json] [catalog.ron|catalog.json]`

use anyhow::Context;
use std::sync::Arc;

use loot_core::logging::{init_tracing, TimingSpan};
use loot_core::{
    run_performance_test, CharacterClass, ContentKind, ExplorationType, GameCatalog, LootConfig,
    LootEngine, LootRequest, StaticCatalog,
};

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => LootConfig::from_file(&path).with_context(|| format!("loading config {path}"))?,
        None => LootConfig::seeded(42),
    };
    init_tracing(&config.logging);

    let catalog: Arc<dyn GameCatalog> = match args.next() {
        Some(path) => {
            Arc::new(StaticCatalog::from_file(&path).with_context(|| format!("loading catalog {path}"))?)
        }
        None => Arc::new(StaticCatalog::builtin()),
    };

    let engine = LootEngine::new(config, catalog);

    {
        let _span = TimingSpan::new("sample_loot");

        let goblin = engine.generate_monster_loot("goblin", 3, Some("forest"));
        println!("{}", serde_json::to_string_pretty(&goblin)?);

        let request = LootRequest::new(22).with_class(CharacterClass::Mage);
        let wraith = engine.generate_monster_loot_with("wraith", &request);
        println!("{}", serde_json::to_string_pretty(&wraith)?);

        let ruins = engine.generate_area_loot("ancient_ruins", 20, ExplorationType::TreasureHunt);
        println!("{}", serde_json::to_string_pretty(&ruins)?);

        let unknown = engine.generate_monster_loot("cursed_knight_18", 16, None);
        println!("{}", serde_json::to_string_pretty(&unknown)?);
    }

    for _ in 0..12 {
        engine.generate_monster_loot("slime", 2, None);
    }
    let info = engine.get_diminishing_returns_info(ContentKind::Monster, "slime", 2);
    println!("{}", serde_json::to_string_pretty(&info)?);

    let report = run_performance_test(&engine, 500);
    println!("{}", report.to_json());

    println!("{}", serde_json::to_string_pretty(&engine.get_system_stats())?);
    Ok(())
}
