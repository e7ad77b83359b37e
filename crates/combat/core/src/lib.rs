//! Deterministic combat rules shared by the runtime and offline tools.
//!
//! `combat-core` defines the canonical resolution logic (abilities, buffs,
//! the damage-mitigation pipeline) and exposes pure APIs with no I/O. All
//! state mutation flows through [`engine::CombatEngine`], which only acts
//! with server [`engine::Authority`]; everything observable leaves through
//! the collaborator traits in [`env`].
pub mod ability;
pub mod buff;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod events;
pub mod state;

pub use ability::{
    AbilityCategory, AbilityDefinition, AbilityFlags, AbilityInstance, AbilityPhase, CastState,
    Cooldowns, TargetingMode,
};
pub use buff::{
    BaseStats, BuffDefinition, BuffEffect, BuffInstance, BuffKind, BuffProgress, EffectiveStats,
    PeriodicKind, PeriodicTick, StatDeltas,
};
pub use combat::{Mitigation, ShieldEntry, ShieldLedger, mitigate, threat_for};
pub use config::CombatConfig;
pub use engine::{Authority, CastError, CastOutcome, CombatEngine, EngineError, StepSummary};
pub use env::{
    AiSink, BehaviorSignals, CombatEnv, EventSink, NullCollaborators, Presentation, Spawner,
};
pub use error::{CoreError, ErrorSeverity};
pub use events::{AiMessage, Color, CombatEvent};
pub use state::{
    AbilityInstanceId, BuffInstanceId, CombatState, Combatant, DamageApplied, EntityId, Position,
    ResourceMeter,
};
