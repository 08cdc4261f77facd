//! Simulation constants — tick cadence, metabolism, distribution policy.
//!
//! Rates on capability components are expressed per in-game day; the pulse
//! divides by [`PULSES_PER_DAY`] to get per-pulse deltas.

/// World ticks per in-game day.
pub const TICKS_PER_DAY: u32 = 60_000;

/// The registry pulses each body's nutrition economy every this many world
/// ticks.
pub const PULSE_INTERVAL_TICKS: u64 = 120;

/// Nutrition pulses per in-game day.
pub const PULSES_PER_DAY: f32 = TICKS_PER_DAY as f32 / PULSE_INTERVAL_TICKS as f32;

/// Flat daily metabolic cost every body pays, independent of size.
pub const BASE_METABOLISM: f32 = 150.0;

/// Additional daily metabolic cost per attached structural part.
pub const METABOLISM_PER_PART: f32 = 1.0;

/// Fraction of a positive net that is banked into stores each pulse.
/// The remainder is not tracked anywhere.
pub const STORAGE_FRACTION: f32 = 0.5;

/// Rounds a fair-share distribution pass runs before giving up and
/// reporting its remainder. Termination safeguard, not an optimization:
/// each round either finishes or strictly shrinks the eligible store set.
pub const MAX_SHARE_ROUNDS: u32 = 5;

/// Hunger pulses after which a body counts as starving.
pub const STARVATION_PULSES: u32 = 200;

/// Nutrition price for converting dead structure into living scaffold.
pub const SCAFFOLD_CONVERSION_COST: f32 = 15.0;
