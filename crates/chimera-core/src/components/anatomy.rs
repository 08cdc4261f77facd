//! Structural anatomy: plain parts and the heart.

use serde::{Deserialize, Serialize};

use crate::constants::STARVATION_PULSES;

/// Marker for a structural part. Each attached structural part raises the
/// body's base metabolic cost.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Structural;

/// The privileged core organ of a body. At most one per body; registering
/// another silently replaces the old one.
///
/// The heart carries the organism's species tag and accumulates hunger:
/// one count for every pulse in which the body could not cover its full
/// nutrition deficit from reserves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heart {
    pub species: String,
    /// Pulses in which the full deficit could not be met.
    pub hunger_ticks: u32,
}

impl Heart {
    pub fn new(species: impl Into<String>) -> Self {
        Self {
            species: species.into(),
            hunger_ticks: 0,
        }
    }

    /// True once hunger has accumulated past the starvation threshold.
    /// Downstream starvation consequences are the host's concern.
    pub fn is_starving(&self) -> bool {
        self.hunger_ticks > STARVATION_PULSES
    }
}
