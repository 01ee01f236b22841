use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::collections::BTreeMap;
use std::sync::Arc;

use loot_core::catalog::RewardClass;
use loot_core::drops::{DropCalculator, DropContext, DropTuning};
use loot_core::resolver::{ItemResolver, ResolveContext};
use loot_core::rng::LootRng;
use loot_core::{
    ExplorationType, LootConfig, LootEngine, LootEntry, RarityTable, RarityTier, StaticCatalog,
};

fn bench_engine() -> LootEngine {
    let mut config = LootConfig::seeded(42);
    // Short window keeps the encounter history bounded
    config.farming.window_secs = 1;
    LootEngine::new(config, Arc::new(StaticCatalog::builtin()))
}

fn bench_generation(c: &mut Criterion) {
    let engine = bench_engine();

    c.bench_function("generate_monster_loot", |b| {
        b.iter(|| engine.generate_monster_loot(black_box("orc_warrior"), black_box(15), Some("dark_cave")))
    });

    c.bench_function("generate_monster_loot_unknown", |b| {
        b.iter(|| engine.generate_monster_loot(black_box("shadow_beast_27"), black_box(25), None))
    });

    c.bench_function("generate_area_loot", |b| {
        b.iter(|| {
            engine.generate_area_loot(
                black_box("ancient_ruins"),
                black_box(20),
                ExplorationType::TreasureHunt,
            )
        })
    });
}

fn bench_rarity(c: &mut Criterion) {
    let table = RarityTable::standard();
    let weights: BTreeMap<RarityTier, f64> = [
        (RarityTier::Common, 0.6),
        (RarityTier::Uncommon, 0.3),
        (RarityTier::Rare, 0.1),
    ]
    .into_iter()
    .collect();
    let mut rng = LootRng::seeded(7);

    c.bench_function("roll_for_rarity", |b| {
        b.iter(|| table.roll_for_rarity(black_box(&weights), black_box(4), rng.roll()))
    });
}

fn bench_drop_and_resolve(c: &mut Criterion) {
    let table = RarityTable::standard();
    let tuning = DropTuning::default();
    let calc = DropCalculator::new(&table, &tuning);
    let catalog = StaticCatalog::builtin();
    let resolver = ItemResolver::new(&catalog);
    let entry = LootEntry::new("equipment", 0.2);
    let drop_ctx = DropContext {
        reward_class: RewardClass::Equipment,
        consecutive_empty: 3,
        ..DropContext::default()
    };
    let resolve_ctx = ResolveContext::new(18, 20);
    let mut rng = LootRng::seeded(9);

    c.bench_function("roll_for_loot", |b| {
        b.iter(|| calc.roll_for_loot(black_box(&entry), 18, 20, &drop_ctx, &mut rng))
    });

    c.bench_function("resolve_equipment_uncached", |b| {
        b.iter(|| resolver.resolve_concrete_item(black_box(&entry), &resolve_ctx, &mut rng))
    });
}

criterion_group!(benches, bench_generation, bench_rarity, bench_drop_and_resolve);
criterion_main!(benches);
