//! One organism's nutrition economy.
//!
//! A [`Body`] tracks the parts registered to a single organism and
//! rebalances its shared nutrition pool once per pulse: recompute the
//! aggregate rates from current membership, work out the net delta, then
//! spread surplus into its stores or drain them to cover the deficit using
//! the fair-share algorithms below.

use std::collections::HashSet;

use hecs::{Entity, World};

use crate::components::{Heart, NutritionConsumer, NutritionSource, NutritionStore};
use crate::constants::{
    BASE_METABOLISM, MAX_SHARE_ROUNDS, METABOLISM_PER_PART, PULSES_PER_DAY,
    SCAFFOLD_CONVERSION_COST, STORAGE_FRACTION,
};

/// One organism: membership sets plus aggregate nutrition counters.
///
/// Aggregates are maintained incrementally on register/deregister and
/// recomputed wholesale from membership at the top of every pulse, so a
/// store mutated behind the body's back is picked up one pulse later.
#[derive(Debug, Clone, Default)]
pub struct Body {
    id: String,
    heart: Option<Entity>,
    parts: HashSet<Entity>,
    consumers: HashSet<Entity>,
    sources: HashSet<Entity>,
    stores: HashSet<Entity>,
    current_nutrition: f32,
    nutrition_capacity: f32,
    passive_consumption: f32,
    nutrition_gen: f32,
    hunger_penalty: f32,
}

impl Body {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn current_nutrition(&self) -> f32 {
        self.current_nutrition
    }

    pub fn nutrition_capacity(&self) -> f32 {
        self.nutrition_capacity
    }

    pub fn passive_consumption(&self) -> f32 {
        self.passive_consumption
    }

    pub fn nutrition_gen(&self) -> f32 {
        self.nutrition_gen
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn store_count(&self) -> usize {
        self.stores.len()
    }

    pub fn heart(&self) -> Option<Entity> {
        self.heart
    }

    /// Species tag carried by the heart, if one is installed.
    pub fn species(&self, world: &World) -> Option<String> {
        let heart = self.heart?;
        world.get::<&Heart>(heart).ok().map(|h| h.species.clone())
    }

    /// Nutrition price the host charges when converting dead structure
    /// into living scaffold for this body.
    pub fn conversion_cost(&self) -> f32 {
        SCAFFOLD_CONVERSION_COST
    }

    /// Install the heart. Replaces any prior heart silently.
    pub fn register_heart(&mut self, entity: Entity) {
        self.heart = Some(entity);
    }

    /// Add a structural part. Idempotent (set semantics).
    pub fn register_part(&mut self, entity: Entity) {
        self.parts.insert(entity);
    }

    pub fn deregister_part(&mut self, entity: Entity) {
        self.parts.remove(&entity);
    }

    /// Classify a nutrition component by the capabilities it carries and
    /// fold its contributions into the aggregates. An entity with several
    /// capabilities lands in every matching set.
    ///
    /// Contributions are folded in unconditionally: re-registering a
    /// component without a deregister in between double-counts it until
    /// the next pulse resync.
    pub fn register_nutrition(&mut self, world: &World, entity: Entity) {
        if let Ok(consumer) = world.get::<&NutritionConsumer>(entity) {
            self.consumers.insert(entity);
            self.passive_consumption += consumer.per_day;
        }
        if let Ok(source) = world.get::<&NutritionSource>(entity) {
            self.sources.insert(entity);
            self.nutrition_gen += source.per_day;
        }
        if let Ok(store) = world.get::<&NutritionStore>(entity) {
            self.stores.insert(entity);
            self.nutrition_capacity += store.capacity;
            self.current_nutrition += store.current;
        }
    }

    /// Remove a nutrition component from every set it belongs to and back
    /// its contributions out of the aggregates.
    pub fn deregister_nutrition(&mut self, world: &World, entity: Entity) {
        if self.consumers.remove(&entity) {
            if let Ok(consumer) = world.get::<&NutritionConsumer>(entity) {
                self.passive_consumption -= consumer.per_day;
            }
        }
        if self.sources.remove(&entity) {
            if let Ok(source) = world.get::<&NutritionSource>(entity) {
                self.nutrition_gen -= source.per_day;
            }
        }
        if self.stores.remove(&entity) {
            if let Ok(store) = world.get::<&NutritionStore>(entity) {
                self.nutrition_capacity -= store.capacity;
                self.current_nutrition -= store.current;
            }
        }
    }

    /// Transient extra hunger applied to the next pulse only.
    pub fn add_hunger_penalty(&mut self, amount: f32) {
        self.hunger_penalty += amount;
    }

    /// The balancing pulse.
    ///
    /// Recomputes the aggregates from membership, converts the daily net
    /// into a per-pulse delta, then either banks part of a surplus into the
    /// stores or drains them to cover a deficit. A deficit the reserves
    /// cannot cover bumps the heart's hunger counter.
    pub fn run_nutrition(&mut self, world: &mut World) {
        self.update_passive_consumption(world);
        self.update_nutrition_gen(world);
        self.update_store_totals(world);

        let net =
            (self.nutrition_gen - self.passive_consumption - self.hunger_penalty) / PULSES_PER_DAY;
        log::trace!("body {}: pulse net {:+.4}", self.id, net);

        if net > 0.0 {
            let to_store = net * STORAGE_FRACTION;
            let free = self.nutrition_capacity - self.current_nutrition;
            if free <= 0.0 {
                // No room anywhere; the whole candidate evaporates.
            } else if to_store >= free {
                for &entity in &self.stores {
                    if let Ok(mut store) = world.get::<&mut NutritionStore>(entity) {
                        store.current = store.capacity;
                    }
                }
                self.current_nutrition = self.nutrition_capacity;
            } else {
                let leftover = store_nutrition(world, &self.stores, to_store);
                self.current_nutrition =
                    (self.current_nutrition + to_store - leftover).min(self.nutrition_capacity);
            }
        } else if net < 0.0 {
            let deficit = -net;
            if deficit >= self.current_nutrition {
                let shortfall = deficit - self.current_nutrition;
                for &entity in &self.stores {
                    if let Ok(mut store) = world.get::<&mut NutritionStore>(entity) {
                        store.current = 0.0;
                    }
                }
                self.current_nutrition = 0.0;
                if shortfall > 0.0 && !self.parts.is_empty() {
                    if let Some(heart) = self.heart {
                        if let Ok(mut heart) = world.get::<&mut Heart>(heart) {
                            heart.hunger_ticks += 1;
                            log::debug!(
                                "body {}: unmet deficit {:.4}, hunger at {}",
                                self.id,
                                shortfall,
                                heart.hunger_ticks
                            );
                        }
                    }
                }
            } else {
                let unmet = extract_nutrition(world, &self.stores, deficit);
                self.current_nutrition = (self.current_nutrition - (deficit - unmet)).max(0.0);
            }
        }

        self.hunger_penalty = 0.0;
    }

    /// On-demand withdrawal outside the pulse cycle. Fails without
    /// mutating anything when reserves cannot cover `qty`.
    pub fn request_nutrition(&mut self, world: &mut World, qty: f32) -> bool {
        if qty > self.current_nutrition {
            return false;
        }

        extract_nutrition(world, &self.stores, qty);
        self.current_nutrition = (self.current_nutrition - qty).max(0.0);
        true
    }

    fn update_passive_consumption(&mut self, world: &World) {
        self.passive_consumption =
            BASE_METABOLISM + METABOLISM_PER_PART * self.parts.len() as f32;
        for &entity in &self.consumers {
            if let Ok(consumer) = world.get::<&NutritionConsumer>(entity) {
                self.passive_consumption += consumer.per_day;
            }
        }
    }

    fn update_nutrition_gen(&mut self, world: &World) {
        self.nutrition_gen = 0.0;
        for &entity in &self.sources {
            if let Ok(source) = world.get::<&NutritionSource>(entity) {
                self.nutrition_gen += source.per_day;
            }
        }
    }

    fn update_store_totals(&mut self, world: &World) {
        self.nutrition_capacity = 0.0;
        self.current_nutrition = 0.0;
        for &entity in &self.stores {
            if let Ok(store) = world.get::<&NutritionStore>(entity) {
                self.nutrition_capacity += store.capacity;
                self.current_nutrition += store.current;
            }
        }
    }
}

/// Spread `to_store` across `stores` by equal shares.
///
/// Each round divides the remainder evenly over the stores still under
/// capacity; whatever a store cannot hold rolls into the next round's
/// remainder. Stops when the remainder is absorbed, the pool empties, or
/// [`MAX_SHARE_ROUNDS`] is hit. Returns the unabsorbed remainder.
///
/// Shares are equal per round, not proportional to capacity — small stores
/// saturate first and drop out of later rounds.
pub fn store_nutrition(world: &mut World, stores: &HashSet<Entity>, to_store: f32) -> f32 {
    let mut pool: Vec<Entity> = stores.iter().copied().collect();
    let mut remaining = to_store;

    for _round in 0..=MAX_SHARE_ROUNDS {
        if pool.is_empty() {
            return remaining;
        }

        let share = remaining / pool.len() as f32;
        let mut leftover = 0.0;
        let mut still_open = Vec::with_capacity(pool.len());
        for &entity in &pool {
            if let Ok(mut store) = world.get::<&mut NutritionStore>(entity) {
                leftover += store.absorb(share);
                if !store.is_full() {
                    still_open.push(entity);
                }
            } else {
                // A despawned store can no longer hold its share.
                leftover += share;
            }
        }

        if leftover <= 0.0 {
            return 0.0;
        }
        pool = still_open;
        remaining = leftover;
    }

    remaining
}

/// Pull `to_extract` out of `stores` by equal shares; the mirror image of
/// [`store_nutrition`]. Returns the unmet remainder.
pub fn extract_nutrition(world: &mut World, stores: &HashSet<Entity>, to_extract: f32) -> f32 {
    let mut pool: Vec<Entity> = stores.iter().copied().collect();
    let mut remaining = to_extract;

    for _round in 0..=MAX_SHARE_ROUNDS {
        if pool.is_empty() {
            return remaining;
        }

        let share = remaining / pool.len() as f32;
        let mut unmet = 0.0;
        let mut still_holding = Vec::with_capacity(pool.len());
        for &entity in &pool {
            if let Ok(mut store) = world.get::<&mut NutritionStore>(entity) {
                unmet += store.release(share);
                if !store.is_empty() {
                    still_holding.push(entity);
                }
            } else {
                unmet += share;
            }
        }

        if unmet <= 0.0 {
            return 0.0;
        }
        pool = still_holding;
        remaining = unmet;
    }

    remaining
}
