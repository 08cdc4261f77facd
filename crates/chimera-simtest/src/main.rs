//! Chimera Headless Simulation Harness
//!
//! Validates the nutrition engine against a manifest-defined organism
//! without a host game. Runs entirely in-process — no engine, no
//! rendering, no persistence.
//!
//! Usage:
//!   cargo run -p chimera-simtest
//!   cargo run -p chimera-simtest -- --verbose

use std::collections::HashSet;

use hecs::{Entity, EntityBuilder, World};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use chimera_core::body::{extract_nutrition, store_nutrition};
use chimera_core::components::{
    Heart, NutritionConsumer, NutritionSource, NutritionStore, Structural,
};
use chimera_core::constants::PULSE_INTERVAL_TICKS;
use chimera_core::generation::{spawn_organism, OrganismConfig};
use chimera_core::registry::BodyRegistry;

// ── Organism manifest (demo organism the harness assembles) ─────────────
const MANIFEST_JSON: &str = include_str!("../../../data/organism_manifest.json");

fn one() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct PartSpec {
    name: String,
    #[serde(default = "one")]
    count: u32,
    #[serde(default)]
    structural: bool,
    #[serde(default)]
    heart: bool,
    #[serde(default)]
    species: String,
    #[serde(default)]
    consumption_per_day: f32,
    #[serde(default)]
    generation_per_day: f32,
    #[serde(default)]
    capacity: f32,
    #[serde(default)]
    initial_fill: f32,
}

impl PartSpec {
    fn has_nutrition(&self) -> bool {
        self.consumption_per_day > 0.0 || self.generation_per_day > 0.0 || self.capacity > 0.0
    }
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: String) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail,
    }
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Chimera Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Organism manifest validation
    results.extend(validate_manifest(verbose));

    // 2. Fair-share distribution sweeps
    results.extend(validate_distribution(verbose));

    // 3. Manifest organism lifecycle
    results.extend(validate_lifecycle(verbose));

    // 4. Registry cadence & ownership
    results.extend(validate_registry(verbose));

    // 5. Randomized generation soak
    results.extend(validate_generation_soak(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn parse_manifest() -> Result<Vec<PartSpec>, serde_json::Error> {
    serde_json::from_str(MANIFEST_JSON)
}

// ── 1. Organism manifest ────────────────────────────────────────────────

fn validate_manifest(_verbose: bool) -> Vec<TestResult> {
    println!("--- Organism Manifest ---");
    let mut results = Vec::new();

    let manifest = match parse_manifest() {
        Ok(m) => m,
        Err(e) => {
            results.push(check(
                "manifest_parse",
                false,
                format!("JSON parse error: {}", e),
            ));
            return results;
        }
    };
    results.push(check(
        "manifest_parse",
        true,
        format!("{} part specs", manifest.len()),
    ));

    let hearts: u32 = manifest.iter().filter(|p| p.heart).map(|p| p.count).sum();
    results.push(check(
        "manifest_single_heart",
        hearts == 1,
        format!("{} hearts", hearts),
    ));

    let stores: u32 = manifest
        .iter()
        .filter(|p| p.capacity > 0.0)
        .map(|p| p.count)
        .sum();
    let sources: u32 = manifest
        .iter()
        .filter(|p| p.generation_per_day > 0.0)
        .map(|p| p.count)
        .sum();
    results.push(check(
        "manifest_has_reserves",
        stores > 0 && sources > 0,
        format!("{} stores, {} sources", stores, sources),
    ));

    let sane = manifest.iter().all(|p| {
        p.count >= 1
            && p.capacity >= 0.0
            && (0.0..=1.0).contains(&p.initial_fill)
            && p.consumption_per_day >= 0.0
            && p.generation_per_day >= 0.0
            && p.consumption_per_day.is_finite()
            && p.generation_per_day.is_finite()
            && !p.name.is_empty()
    });
    results.push(check(
        "manifest_values_sane",
        sane,
        "counts, rates, and fills in range".into(),
    ));

    results
}

// ── 2. Distribution sweeps ──────────────────────────────────────────────

fn validate_distribution(_verbose: bool) -> Vec<TestResult> {
    println!("--- Fair-Share Distribution ---");
    let mut results = Vec::new();

    // Equal split across empty stores.
    let mut world = World::new();
    let stores: HashSet<Entity> = (0..4)
        .map(|_| world.spawn((NutritionStore::new(50.0),)))
        .collect();
    let leftover = store_nutrition(&mut world, &stores, 100.0);
    let even = stores
        .iter()
        .all(|&e| (world.get::<&NutritionStore>(e).unwrap().current - 25.0).abs() < 1e-3);
    results.push(check(
        "store_equal_split",
        leftover == 0.0 && even,
        format!("leftover {:.3}", leftover),
    ));

    // Saturation: overflow comes back, every store full.
    let mut world = World::new();
    let stores: HashSet<Entity> = (0..3)
        .map(|_| world.spawn((NutritionStore::new(10.0),)))
        .collect();
    let leftover = store_nutrition(&mut world, &stores, 100.0);
    let full = stores
        .iter()
        .all(|&e| world.get::<&NutritionStore>(e).unwrap().is_full());
    results.push(check(
        "store_saturation",
        (leftover - 70.0).abs() < 1e-3 && full,
        format!("leftover {:.3}, all full: {}", leftover, full),
    ));

    // Uneven capacities force multiple rounds but still settle.
    let mut world = World::new();
    let mut stores = HashSet::new();
    for capacity in [5.0f32, 10.0, 20.0, 40.0, 80.0] {
        stores.insert(world.spawn((NutritionStore::new(capacity),)));
    }
    let leftover = store_nutrition(&mut world, &stores, 120.0);
    let absorbed: f32 = stores
        .iter()
        .map(|&e| world.get::<&NutritionStore>(e).unwrap().current)
        .sum();
    results.push(check(
        "store_multi_round",
        (absorbed + leftover - 120.0).abs() < 1e-2,
        format!("absorbed {:.2}, leftover {:.2}", absorbed, leftover),
    ));

    // Extraction mirrors storage.
    let mut world = World::new();
    let stores: HashSet<Entity> = (0..4)
        .map(|_| world.spawn((NutritionStore::with_fill(50.0, 30.0),)))
        .collect();
    let unmet = extract_nutrition(&mut world, &stores, 60.0);
    let drained: f32 = stores
        .iter()
        .map(|&e| 30.0 - world.get::<&NutritionStore>(e).unwrap().current)
        .sum();
    results.push(check(
        "extract_equal_split",
        unmet == 0.0 && (drained - 60.0).abs() < 1e-2,
        format!("drained {:.2}", drained),
    ));

    // Demand beyond reserves reports the unmet remainder.
    let mut world = World::new();
    let stores: HashSet<Entity> = (0..2)
        .map(|_| world.spawn((NutritionStore::with_fill(50.0, 10.0),)))
        .collect();
    let unmet = extract_nutrition(&mut world, &stores, 100.0);
    results.push(check(
        "extract_unmet",
        (unmet - 80.0).abs() < 1e-2,
        format!("unmet {:.2}", unmet),
    ));

    results
}

// ── 3. Manifest organism lifecycle ──────────────────────────────────────

fn assemble_organism(
    world: &mut World,
    registry: &mut BodyRegistry,
    body_id: &str,
    manifest: &[PartSpec],
) -> Vec<Entity> {
    let mut spawned = Vec::new();
    for spec in manifest {
        for _ in 0..spec.count {
            let mut builder = EntityBuilder::new();
            if spec.structural {
                builder.add(Structural);
            }
            if spec.heart {
                builder.add(Heart::new(spec.species.clone()));
            }
            if spec.consumption_per_day > 0.0 {
                builder.add(NutritionConsumer {
                    per_day: spec.consumption_per_day,
                });
            }
            if spec.generation_per_day > 0.0 {
                builder.add(NutritionSource {
                    per_day: spec.generation_per_day,
                });
            }
            if spec.capacity > 0.0 {
                builder.add(NutritionStore::with_fill(
                    spec.capacity,
                    spec.capacity * spec.initial_fill,
                ));
            }
            let entity = world.spawn(builder.build());
            if spec.heart {
                registry.register_heart(body_id, entity);
            }
            if spec.structural {
                registry.register_part(body_id, entity);
            }
            if spec.has_nutrition() {
                registry.register_nutrition(world, body_id, entity);
            }
            spawned.push(entity);
        }
    }
    spawned
}

fn validate_lifecycle(verbose: bool) -> Vec<TestResult> {
    println!("--- Manifest Organism Lifecycle ---");
    let mut results = Vec::new();

    let manifest = match parse_manifest() {
        Ok(m) => m,
        Err(_) => return results, // already reported in section 1
    };

    let mut world = World::new();
    let mut registry = BodyRegistry::new();
    let parts = assemble_organism(&mut world, &mut registry, "demo", &manifest);

    let body = registry.body("demo").expect("body exists");
    results.push(check(
        "lifecycle_assembled",
        body.part_count() > 0 && body.store_count() > 0,
        format!(
            "{} parts, {} stores, capacity {:.1}",
            body.part_count(),
            body.store_count(),
            body.nutrition_capacity()
        ),
    ));
    results.push(check(
        "lifecycle_species",
        body.species(&world).as_deref() == Some("heartwood"),
        format!("species {:?}", body.species(&world)),
    ));

    // 1000 pulses: the invariant must hold after every one.
    let mut invariant_ok = true;
    let mut sync_ok = true;
    for _ in 0..1000 {
        for _ in 0..PULSE_INTERVAL_TICKS {
            registry.on_tick(&mut world);
        }
        let body = registry.body("demo").unwrap();
        let current = body.current_nutrition();
        let capacity = body.nutrition_capacity();
        if current < 0.0 || current > capacity + 1e-2 {
            invariant_ok = false;
        }
        let sum: f32 = parts
            .iter()
            .filter_map(|&e| world.get::<&NutritionStore>(e).ok().map(|s| s.current))
            .sum();
        if (current - sum).abs() > 1e-2 {
            sync_ok = false;
        }
    }
    let body = registry.body("demo").unwrap();
    results.push(check(
        "lifecycle_invariant_1000_pulses",
        invariant_ok,
        format!(
            "reserves {:.2} / capacity {:.2}",
            body.current_nutrition(),
            body.nutrition_capacity()
        ),
    ));
    results.push(check(
        "lifecycle_aggregate_sync",
        sync_ok,
        "aggregate matches per-store sum".into(),
    ));

    if verbose {
        println!(
            "  organism after 1000 pulses: reserves {:.2}, hunger {:?}",
            body.current_nutrition(),
            body.heart()
                .and_then(|h| world.get::<&Heart>(h).ok().map(|h| h.hunger_ticks))
        );
    }

    // Starve it: remove every source, drain, expect hunger.
    let sources: Vec<Entity> = world
        .query::<&NutritionSource>()
        .iter()
        .map(|(e, _)| e)
        .collect();
    for entity in sources {
        registry.deregister_nutrition(&world, entity);
    }
    for _ in 0..2000 {
        for _ in 0..PULSE_INTERVAL_TICKS {
            registry.on_tick(&mut world);
        }
    }
    let body = registry.body("demo").unwrap();
    let hunger = body
        .heart()
        .and_then(|h| world.get::<&Heart>(h).ok().map(|h| h.hunger_ticks))
        .unwrap_or(0);
    results.push(check(
        "lifecycle_starvation",
        body.current_nutrition() == 0.0 && hunger > 0,
        format!(
            "reserves {:.2}, hunger {}",
            body.current_nutrition(),
            hunger
        ),
    ));

    results
}

// ── 4. Registry cadence & ownership ─────────────────────────────────────

fn validate_registry(_verbose: bool) -> Vec<TestResult> {
    println!("--- Registry ---");
    let mut results = Vec::new();

    let mut world = World::new();
    let mut registry = BodyRegistry::new();
    let store = world.spawn((NutritionStore::with_fill(100.0, 50.0),));
    registry.register_nutrition(&world, "alpha", store);

    for _ in 0..(PULSE_INTERVAL_TICKS - 1) {
        registry.on_tick(&mut world);
    }
    let before = registry.body("alpha").unwrap().current_nutrition();
    registry.on_tick(&mut world);
    let after = registry.body("alpha").unwrap().current_nutrition();
    results.push(check(
        "registry_cadence",
        before == 50.0 && after < 50.0,
        format!("before pulse {:.2}, after {:.2}", before, after),
    ));

    // Moving a component between bodies must not double-count it.
    let source = world.spawn((NutritionSource { per_day: 90.0 },));
    registry.register_nutrition(&world, "alpha", source);
    registry.register_nutrition(&world, "beta", source);
    let alpha_gen = registry.body("alpha").unwrap().nutrition_gen();
    let beta_gen = registry.body("beta").unwrap().nutrition_gen();
    results.push(check(
        "registry_exclusive_ownership",
        alpha_gen == 0.0 && beta_gen == 90.0,
        format!("alpha {:.1}, beta {:.1}", alpha_gen, beta_gen),
    ));

    results
}

// ── 5. Randomized generation soak ───────────────────────────────────────

fn validate_generation_soak(verbose: bool) -> Vec<TestResult> {
    println!("--- Generation Soak ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(0x5EED);

    let mut violations = 0u32;
    for round in 0..20 {
        let config = OrganismConfig {
            structural_parts: rng.gen_range(0..40),
            stores: rng.gen_range(1..12),
            store_capacity: rng.gen_range(5.0..200.0),
            store_fill: rng.gen_range(0.0..1.0),
            sources: rng.gen_range(0..6),
            source_per_day: rng.gen_range(0.0..1500.0),
            consumers: rng.gen_range(0..6),
            consumer_per_day: rng.gen_range(0.0..400.0),
            ..OrganismConfig::default()
        };

        let mut world = World::new();
        let mut registry = BodyRegistry::new();
        spawn_organism(&mut world, &mut registry, "soak", &config, &mut rng);

        for _ in 0..200 {
            let body = registry.body_mut("soak").unwrap();
            body.run_nutrition(&mut world);
            let current = body.current_nutrition();
            if current < 0.0 || current > body.nutrition_capacity() + 1e-2 {
                violations += 1;
            }
        }
        if verbose {
            let body = registry.body("soak").unwrap();
            println!(
                "  round {:2}: {} stores, reserves {:.2}/{:.2}",
                round,
                body.store_count(),
                body.current_nutrition(),
                body.nutrition_capacity()
            );
        }
    }

    results.push(check(
        "soak_capacity_invariant",
        violations == 0,
        format!("{} violations over 20 organisms x 200 pulses", violations),
    ));

    results
}
