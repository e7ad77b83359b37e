//! Buff engine data: templates, live instances and stat aggregation.
//!
//! Buffs are a tagged variant rather than a type hierarchy. The
//! [`BuffEffect`] tag decides whether an instance ticks (DoT/HoT), absorbs
//! damage (Shield) or only contributes stat deltas. Driving instances over
//! time against a combatant lives in [`crate::engine`].

pub mod definition;
pub mod instance;
pub mod stats;

pub use definition::{BuffDefinition, BuffEffect, BuffKind, StatDeltas};
pub use instance::{BuffInstance, BuffProgress, PeriodicKind, PeriodicTick};
pub use stats::{BaseStats, EffectiveStats};
