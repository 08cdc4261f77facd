//! Demo organism generation for harnesses and benchmarks.
//!
//! Hosts normally construct parts themselves; this module builds a whole
//! organism in one call so headless tools have something to chew on.

use hecs::World;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::{Heart, NutritionConsumer, NutritionSource, NutritionStore, Structural};
use crate::registry::BodyRegistry;

/// Shape of a generated organism.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganismConfig {
    pub species: String,
    pub structural_parts: u32,
    pub stores: u32,
    pub store_capacity: f32,
    /// Starting fill fraction for each store (0.0..=1.0).
    pub store_fill: f32,
    pub sources: u32,
    pub source_per_day: f32,
    pub consumers: u32,
    pub consumer_per_day: f32,
    /// Relative jitter applied to capacities and rates (0.0 disables).
    pub jitter: f32,
}

impl Default for OrganismConfig {
    fn default() -> Self {
        Self {
            species: "chimera".to_string(),
            structural_parts: 12,
            stores: 4,
            store_capacity: 60.0,
            store_fill: 0.5,
            sources: 2,
            source_per_day: 400.0,
            consumers: 2,
            consumer_per_day: 25.0,
            jitter: 0.1,
        }
    }
}

/// Spawn a complete organism into `world` and register every part with
/// `registry` under `body_id`. Returns the heart entity.
pub fn spawn_organism(
    world: &mut World,
    registry: &mut BodyRegistry,
    body_id: &str,
    config: &OrganismConfig,
    rng: &mut impl Rng,
) -> hecs::Entity {
    let heart = world.spawn((Heart::new(config.species.clone()), Structural));
    registry.register_heart(body_id, heart);
    registry.register_part(body_id, heart);

    for _ in 0..config.structural_parts {
        let part = world.spawn((Structural,));
        registry.register_part(body_id, part);
    }

    let fill = config.store_fill.clamp(0.0, 1.0);
    for _ in 0..config.stores {
        let capacity = jittered(config.store_capacity, config.jitter, rng);
        let entity = world.spawn((
            Structural,
            NutritionStore::with_fill(capacity, capacity * fill),
        ));
        registry.register_part(body_id, entity);
        registry.register_nutrition(world, body_id, entity);
    }

    for _ in 0..config.sources {
        let per_day = jittered(config.source_per_day, config.jitter, rng);
        let entity = world.spawn((Structural, NutritionSource { per_day }));
        registry.register_part(body_id, entity);
        registry.register_nutrition(world, body_id, entity);
    }

    for _ in 0..config.consumers {
        let per_day = jittered(config.consumer_per_day, config.jitter, rng);
        let entity = world.spawn((Structural, NutritionConsumer { per_day }));
        registry.register_part(body_id, entity);
        registry.register_nutrition(world, body_id, entity);
    }

    heart
}

fn jittered(base: f32, jitter: f32, rng: &mut impl Rng) -> f32 {
    if jitter <= 0.0 {
        return base;
    }
    base * (1.0 + rng.gen_range(-jitter..jitter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_spawn_counts() {
        let mut world = World::new();
        let mut registry = BodyRegistry::new();
        let mut rng = StdRng::seed_from_u64(7);

        let config = OrganismConfig::default();
        spawn_organism(&mut world, &mut registry, "demo", &config, &mut rng);

        let body = registry.body("demo").unwrap();
        // Heart plus plain parts plus every nutrition part.
        let expected = 1
            + config.structural_parts
            + config.stores
            + config.sources
            + config.consumers;
        assert_eq!(body.part_count(), expected as usize);
        assert_eq!(body.store_count(), config.stores as usize);
        assert_eq!(body.species(&world).as_deref(), Some("chimera"));
    }

    #[test]
    fn test_zero_jitter_is_exact() {
        let mut world = World::new();
        let mut registry = BodyRegistry::new();
        let mut rng = StdRng::seed_from_u64(7);

        let config = OrganismConfig {
            jitter: 0.0,
            ..OrganismConfig::default()
        };
        spawn_organism(&mut world, &mut registry, "demo", &config, &mut rng);

        let body = registry.body("demo").unwrap();
        let expected_capacity = config.store_capacity * config.stores as f32;
        assert!((body.nutrition_capacity() - expected_capacity).abs() < 1e-3);
        assert!(
            (body.current_nutrition() - expected_capacity * config.store_fill).abs() < 1e-3
        );
    }

    #[test]
    fn test_generated_organism_holds_invariant() {
        let mut world = World::new();
        let mut registry = BodyRegistry::new();
        let mut rng = StdRng::seed_from_u64(99);

        spawn_organism(
            &mut world,
            &mut registry,
            "demo",
            &OrganismConfig::default(),
            &mut rng,
        );

        for _ in 0..50 {
            let body = registry.body_mut("demo").unwrap();
            body.run_nutrition(&mut world);
            let current = body.current_nutrition();
            assert!(current >= 0.0);
            assert!(current <= body.nutrition_capacity() + 1e-3);
        }
    }
}
