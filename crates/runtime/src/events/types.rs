//! Runtime event payloads that are not already defined by combat-core.

use serde::{Deserialize, Serialize};

use combat_core::{
    AbilityInstanceId, BuffInstanceId, BuffKind, CastError, Color, EntityId, StepSummary,
};

/// Floating combat text requests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PresentationEvent {
    FloatingText {
        target: EntityId,
        text: String,
        color: Color,
    },
}

/// Signals addressed to a target's behavior (player controller or AI brain).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BehaviorEvent {
    Interrupt {
        target: EntityId,
    },
    Taunt {
        target: EntityId,
        source: EntityId,
        duration: f32,
    },
}

/// Client-visible spawn/despawn of abilities and buffs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LifecycleEvent {
    AbilitySpawned {
        id: AbilityInstanceId,
        ability: String,
        caster: EntityId,
        target: EntityId,
    },
    AbilityDespawned {
        id: AbilityInstanceId,
    },
    BuffSpawned {
        target: EntityId,
        buff: BuffInstanceId,
        kind: BuffKind,
    },
    BuffDespawned {
        target: EntityId,
        buff: BuffInstanceId,
    },
}

/// Worker bookkeeping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimulationEvent {
    /// A step that did something. Idle steps are not announced.
    Stepped {
        tick: u64,
        elapsed: f64,
        summary: StepSummary,
    },
    /// A cast request was refused before anything changed.
    CastRejected {
        caster: EntityId,
        ability: String,
        reason: CastError,
    },
}
