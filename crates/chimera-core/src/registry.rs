//! Registry of every body in one simulated space.
//!
//! The host owns one registry per world and routes all part events through
//! it. Bodies are created lazily the first time a part claims their id and
//! are never destroyed here; an empty body is valid and inert. The registry
//! also counts world ticks and pulses every body on a fixed cadence.

use std::collections::HashMap;

use hecs::{Entity, World};

use crate::body::Body;
use crate::constants::PULSE_INTERVAL_TICKS;

/// Owns all bodies keyed by organism id and drives their pulses.
///
/// Nutrition components are exclusively owned: registering one under a new
/// body id strips it from its previous body first.
#[derive(Debug, Default)]
pub struct BodyRegistry {
    bodies: HashMap<String, Body>,
    /// Which body currently owns each nutrition component.
    owners: HashMap<Entity, String>,
    ticks: u64,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(&self, body_id: &str) -> Option<&Body> {
        self.bodies.get(body_id)
    }

    pub fn body_mut(&mut self, body_id: &str) -> Option<&mut Body> {
        self.bodies.get_mut(body_id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// World ticks seen so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn register_part(&mut self, body_id: &str, entity: Entity) {
        self.body_entry(body_id).register_part(entity);
    }

    pub fn register_heart(&mut self, body_id: &str, entity: Entity) {
        self.body_entry(body_id).register_heart(entity);
    }

    /// Register a nutrition component, moving it out of any body that
    /// currently owns it.
    pub fn register_nutrition(&mut self, world: &World, body_id: &str, entity: Entity) {
        if let Some(prior) = self.owners.get(&entity) {
            if prior != body_id {
                let prior = prior.clone();
                if let Some(previous) = self.bodies.get_mut(&prior) {
                    previous.deregister_nutrition(world, entity);
                }
            }
        }
        self.owners.insert(entity, body_id.to_string());
        self.body_entry(body_id).register_nutrition(world, entity);
    }

    pub fn deregister_part(&mut self, body_id: &str, entity: Entity) {
        if let Some(body) = self.bodies.get_mut(body_id) {
            body.deregister_part(entity);
        }
    }

    /// Deregister a nutrition component from whichever body owns it.
    pub fn deregister_nutrition(&mut self, world: &World, entity: Entity) {
        if let Some(owner) = self.owners.remove(&entity) {
            if let Some(body) = self.bodies.get_mut(&owner) {
                body.deregister_nutrition(world, entity);
            }
        }
    }

    /// One world tick. Every [`PULSE_INTERVAL_TICKS`]-th call pulses all
    /// bodies; the rest are no-ops. Pulse order over bodies is unspecified;
    /// each body's pulse is independent of the others.
    pub fn on_tick(&mut self, world: &mut World) {
        self.ticks += 1;
        if self.ticks % PULSE_INTERVAL_TICKS != 0 {
            return;
        }
        log::trace!("nutrition pulse at tick {}", self.ticks);
        for body in self.bodies.values_mut() {
            body.run_nutrition(world);
        }
    }

    fn body_entry(&mut self, body_id: &str) -> &mut Body {
        self.bodies.entry(body_id.to_string()).or_insert_with(|| {
            log::debug!("creating body {}", body_id);
            Body::new(body_id)
        })
    }
}
