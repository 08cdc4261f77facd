//! Nutrition capability components: consumers, sources, stores.
//!
//! Rates are per in-game day. One entity may carry several of these at
//! once — a gland that both generates and stores, say — and the body
//! processes it under every branch that applies.

use serde::{Deserialize, Serialize};

/// Passive nutrition drain while the part is attached.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NutritionConsumer {
    /// Nutrition consumed per day.
    pub per_day: f32,
}

/// Nutrition generation while the part is attached.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NutritionSource {
    /// Nutrition generated per day.
    pub per_day: f32,
}

/// A bounded nutrition reservoir.
///
/// `current` stays in `[0, capacity]`; [`absorb`](NutritionStore::absorb)
/// and [`release`](NutritionStore::release) clamp rather than error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NutritionStore {
    pub capacity: f32,
    pub current: f32,
}

impl NutritionStore {
    /// An empty store.
    pub fn new(capacity: f32) -> Self {
        Self {
            capacity,
            current: 0.0,
        }
    }

    /// A store pre-filled to `current`, clamped into `[0, capacity]`.
    pub fn with_fill(capacity: f32, current: f32) -> Self {
        Self {
            capacity,
            current: current.clamp(0.0, capacity.max(0.0)),
        }
    }

    pub fn free_capacity(&self) -> f32 {
        (self.capacity - self.current).max(0.0)
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.current <= 0.0
    }

    /// Take in up to `amount`; returns the part that did not fit.
    pub fn absorb(&mut self, amount: f32) -> f32 {
        let accepted = amount.min(self.free_capacity());
        self.current += accepted;
        amount - accepted
    }

    /// Give up up to `amount`; returns the unmet remainder.
    pub fn release(&mut self, amount: f32) -> f32 {
        let given = amount.min(self.current);
        self.current -= given;
        amount - given
    }
}
