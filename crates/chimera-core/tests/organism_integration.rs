//! End-to-end tests driving the registry the way a host scheduler would.

use std::collections::HashMap;

use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use chimera_core::body::Body;
use chimera_core::components::{
    Heart, NutritionConsumer, NutritionSource, NutritionStore, Structural,
};
use chimera_core::constants::{BASE_METABOLISM, PULSES_PER_DAY, PULSE_INTERVAL_TICKS};
use chimera_core::generation::{spawn_organism, OrganismConfig};
use chimera_core::registry::BodyRegistry;

fn run_pulse(registry: &mut BodyRegistry, world: &mut World) {
    for _ in 0..PULSE_INTERVAL_TICKS {
        registry.on_tick(world);
    }
}

#[test]
fn test_two_bodies_tick_independently() {
    let mut world = World::new();
    let mut registry = BodyRegistry::new();

    // One well-fed organism, one starving husk.
    let fed_source = world.spawn((NutritionSource {
        per_day: BASE_METABOLISM * 4.0,
    },));
    let fed_store = world.spawn((NutritionStore::new(100.0),));
    registry.register_nutrition(&world, "fed", fed_source);
    registry.register_nutrition(&world, "fed", fed_store);

    let husk_heart = world.spawn((Heart::new("husk"), Structural));
    registry.register_heart("husk", husk_heart);
    registry.register_part("husk", husk_heart);

    for _ in 0..10 {
        run_pulse(&mut registry, &mut world);
    }

    let fed = registry.body("fed").unwrap();
    assert!(fed.current_nutrition() > 0.0);
    assert!(fed.current_nutrition() <= fed.nutrition_capacity());

    // The husk has no reserves at all, so every pulse goes hungry.
    assert_eq!(world.get::<&Heart>(husk_heart).unwrap().hunger_ticks, 10);
}

#[test]
fn test_starvation_after_source_loss() {
    let mut world = World::new();
    let mut registry = BodyRegistry::new();
    let mut rng = StdRng::seed_from_u64(11);

    let config = OrganismConfig {
        jitter: 0.0,
        ..OrganismConfig::default()
    };
    let heart = spawn_organism(&mut world, &mut registry, "wyrm", &config, &mut rng);

    run_pulse(&mut registry, &mut world);
    assert_eq!(world.get::<&Heart>(heart).unwrap().hunger_ticks, 0);

    // Tear out every source; reserves drain, then hunger sets in.
    let sources: Vec<Entity> = world
        .query::<&NutritionSource>()
        .iter()
        .map(|(e, _)| e)
        .collect();
    for entity in sources {
        registry.deregister_nutrition(&world, entity);
    }
    // Reserves cover roughly (4 * 60 * 0.5) / ((150 + 21 + 50) / 500)
    // pulses; far fewer than 500.
    for _ in 0..500 {
        run_pulse(&mut registry, &mut world);
    }

    let hunger = world.get::<&Heart>(heart).unwrap().hunger_ticks;
    assert!(hunger > 0, "expected hunger after losing all sources");
    assert_eq!(registry.body("wyrm").unwrap().current_nutrition(), 0.0);
}

#[test]
fn test_withdrawal_roundtrip() {
    let mut world = World::new();
    let mut registry = BodyRegistry::new();

    let store = world.spawn((NutritionStore::with_fill(20.0, 10.0),));
    registry.register_nutrition(&world, "wyrm", store);

    let body = registry.body_mut("wyrm").unwrap();
    assert!(!body.request_nutrition(&mut world, 15.0));
    assert_eq!(body.current_nutrition(), 10.0);

    assert!(body.request_nutrition(&mut world, 5.0));
    assert_eq!(body.current_nutrition(), 5.0);
    assert_eq!(world.get::<&NutritionStore>(store).unwrap().current, 5.0);
}

/// Capacity invariant under a random storm of registrations,
/// deregistrations, and pulses.
#[test]
fn test_invariant_under_random_churn() {
    let mut world = World::new();
    let mut registry = BodyRegistry::new();
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);

    let ids = ["a", "b", "c"];
    let mut tracked: HashMap<&str, Vec<Entity>> = HashMap::new();

    for _ in 0..400 {
        let id = ids[rng.gen_range(0..ids.len())];
        match rng.gen_range(0..5u32) {
            0 => {
                let capacity = rng.gen_range(1.0..100.0f32);
                let fill = rng.gen_range(0.0..1.0f32);
                let entity =
                    world.spawn((NutritionStore::with_fill(capacity, capacity * fill),));
                registry.register_nutrition(&world, id, entity);
                tracked.entry(id).or_default().push(entity);
            }
            1 => {
                let entity = world.spawn((NutritionSource {
                    per_day: rng.gen_range(0.0..2000.0f32),
                },));
                registry.register_nutrition(&world, id, entity);
                tracked.entry(id).or_default().push(entity);
            }
            2 => {
                let entity = world.spawn((NutritionConsumer {
                    per_day: rng.gen_range(0.0..1000.0f32),
                },));
                registry.register_nutrition(&world, id, entity);
                tracked.entry(id).or_default().push(entity);
            }
            3 => {
                if let Some(list) = tracked.get_mut(id) {
                    if !list.is_empty() {
                        let entity = list.swap_remove(rng.gen_range(0..list.len()));
                        registry.deregister_nutrition(&world, entity);
                    }
                }
            }
            _ => {
                run_pulse(&mut registry, &mut world);
                for id in ids {
                    if let Some(body) = registry.body(id) {
                        let current = body.current_nutrition();
                        let capacity = body.nutrition_capacity();
                        assert!(current >= 0.0, "negative reserves on {id}");
                        assert!(
                            current <= capacity + capacity.abs() * 1e-4 + 1e-2,
                            "reserves {current} above capacity {capacity} on {id}"
                        );
                    }
                }
            }
        }
    }
}

/// After a pulse the body's counter matches the per-store truth.
#[test]
fn test_aggregate_matches_store_sum() {
    let mut world = World::new();
    let mut registry = BodyRegistry::new();
    let mut rng = StdRng::seed_from_u64(5);

    let mut stores = Vec::new();
    for _ in 0..6 {
        let capacity = rng.gen_range(5.0..80.0f32);
        let entity =
            world.spawn((NutritionStore::with_fill(capacity, capacity * 0.25),));
        registry.register_nutrition(&world, "wyrm", entity);
        stores.push(entity);
    }
    let source = world.spawn((NutritionSource { per_day: 5000.0 },));
    registry.register_nutrition(&world, "wyrm", source);

    for _ in 0..20 {
        run_pulse(&mut registry, &mut world);
        let sum: f32 = stores
            .iter()
            .map(|&e| world.get::<&NutritionStore>(e).unwrap().current)
            .sum();
        let body = registry.body("wyrm").unwrap();
        assert!(
            (body.current_nutrition() - sum).abs() < 1e-2,
            "aggregate {} drifted from store sum {}",
            body.current_nutrition(),
            sum
        );
    }
}

/// Conservation: a surplus pulse with ample free capacity banks exactly the
/// candidate amount, split equally.
#[test]
fn test_conservation_under_pure_storage() {
    let mut world = World::new();
    let mut body = Body::new("wyrm");

    let mut stores = Vec::new();
    for _ in 0..4 {
        let entity = world.spawn((NutritionStore::new(1000.0),));
        body.register_nutrition(&world, entity);
        stores.push(entity);
    }
    // Net of +40 per pulse, candidate 20, plenty of room.
    let source = world.spawn((NutritionSource {
        per_day: BASE_METABOLISM + 40.0 * PULSES_PER_DAY,
    },));
    body.register_nutrition(&world, source);

    body.run_nutrition(&mut world);

    assert!((body.current_nutrition() - 20.0).abs() < 1e-3);
    for &entity in &stores {
        let current = world.get::<&NutritionStore>(entity).unwrap().current;
        assert!((current - 5.0).abs() < 1e-3);
    }
}
