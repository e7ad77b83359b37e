//! Abilities: templates, in-flight instances and cast timers.
//!
//! # Lifecycle
//!
//! ```text
//! begin_cast ──(cast_time)──▶ spawn AbilityInstance
//!     Traveling ──(arrived / instant)──▶ Resolving ──(effect + buff)──▶ Finished
//! ```
//!
//! Resolution itself needs the combatant store and collaborators, so it is
//! driven by [`crate::engine::CombatEngine`].

pub mod cast;
pub mod definition;
pub mod describe;
pub mod instance;

pub use cast::{CastState, Cooldowns};
pub use definition::{AbilityCategory, AbilityDefinition, AbilityFlags, TargetingMode};
pub use instance::{AbilityInstance, AbilityPhase};
