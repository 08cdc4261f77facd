//! Chimera Core - Composite Organism Simulation Engine
//!
//! Simulates organisms ("bodies") assembled from discrete parts that
//! generate, store, and consume a shared nutrition pool. Parts attach and
//! detach at runtime; every pulse the engine rebalances each body's pool,
//! fairly spreading surplus into its reserves or draining them to cover a
//! deficit.
//!
//! # Architecture
//!
//! Parts live as entities in a host-owned `hecs` world:
//! - **Entities**: body parts the host game constructs and registers
//! - **Components**: optional capability records attached to parts
//!   ([`components::NutritionStore`], [`components::NutritionSource`],
//!   [`components::NutritionConsumer`], [`components::Structural`],
//!   [`components::Heart`])
//! - **[`body::Body`]**: one organism's membership sets, aggregate counters,
//!   and balancing step
//! - **[`registry::BodyRegistry`]**: routes registrations to bodies and
//!   drives every body's pulse on a fixed tick cadence
//!
//! # Example
//!
//! ```rust,no_run
//! use chimera_core::prelude::*;
//! use hecs::World;
//!
//! let mut world = World::new();
//! let mut registry = BodyRegistry::new();
//!
//! let gut = world.spawn((Structural, NutritionSource { per_day: 300.0 },));
//! registry.register_part("wyrm-1", gut);
//! registry.register_nutrition(&world, "wyrm-1", gut);
//!
//! // Host scheduler loop
//! loop {
//!     registry.on_tick(&mut world);
//! }
//! ```

pub mod body;
pub mod components;
pub mod constants;
pub mod generation;
pub mod registry;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::body::Body;
    pub use crate::components::*;
    pub use crate::registry::BodyRegistry;
}
