//! Authoritative combat state.
//!
//! This module owns the data structures that describe combatants and the
//! in-flight abilities between them. Runtime layers clone or query this state
//! but mutate it exclusively through the engine.
pub mod arena;
pub mod combatant;
pub mod common;

pub use arena::CombatState;
pub use combatant::{BuffList, Combatant, DamageApplied, PeriodicDue};
pub use common::{AbilityInstanceId, BuffInstanceId, EntityId, Position, ResourceMeter};
