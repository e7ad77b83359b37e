//! Traits describing the collaborators the engine pushes into.
//!
//! Every collaborator is a sink: the engine calls it, never reads a result
//! back and never depends on its outcome. The [`CombatEnv`] aggregate bundles
//! them so the engine can reach everything it needs without hard coupling to
//! concrete implementations (a runtime event bus, a test recorder, or nothing).
#[cfg(test)]
pub(crate) mod recorder;

use crate::ability::AbilityInstance;
use crate::buff::BuffInstance;
use crate::events::{AiMessage, Color, CombatEvent};
use crate::state::{AbilityInstanceId, BuffInstanceId, EntityId};

/// Receives health and threat notifications.
pub trait EventSink {
    fn publish(&self, event: CombatEvent);
}

/// Renders floating combat text over a combatant.
pub trait Presentation {
    fn floating_text(&self, target: EntityId, text: &str, color: Color);
}

/// Message sink of the AI subsystem.
pub trait AiSink {
    fn post(&self, message: AiMessage);
}

/// Capability set every targetable entity kind offers, player or not.
pub trait BehaviorSignals {
    fn interrupt(&self, target: EntityId);

    fn set_taunt(&self, target: EntityId, source: EntityId, duration: f32);
}

/// Client-visible representation of abilities and buffs.
pub trait Spawner {
    fn spawn_ability(&self, instance: &AbilityInstance);

    fn despawn_ability(&self, id: AbilityInstanceId);

    fn spawn_buff(&self, target: EntityId, buff: &BuffInstance);

    fn despawn_buff(&self, target: EntityId, id: BuffInstanceId);
}

/// Aggregates the collaborators required by the engine.
#[derive(Clone, Copy)]
pub struct CombatEnv<'a> {
    events: &'a dyn EventSink,
    presentation: &'a dyn Presentation,
    ai: &'a dyn AiSink,
    behavior: &'a dyn BehaviorSignals,
    spawner: &'a dyn Spawner,
}

impl<'a> CombatEnv<'a> {
    pub fn new(
        events: &'a dyn EventSink,
        presentation: &'a dyn Presentation,
        ai: &'a dyn AiSink,
        behavior: &'a dyn BehaviorSignals,
        spawner: &'a dyn Spawner,
    ) -> Self {
        Self {
            events,
            presentation,
            ai,
            behavior,
            spawner,
        }
    }

    /// Uses one object for every collaborator role.
    pub fn uniform<C>(collaborators: &'a C) -> Self
    where
        C: EventSink + Presentation + AiSink + BehaviorSignals + Spawner,
    {
        Self::new(
            collaborators,
            collaborators,
            collaborators,
            collaborators,
            collaborators,
        )
    }

    /// An environment that drops everything.
    pub fn silent() -> CombatEnv<'static> {
        static NULL: NullCollaborators = NullCollaborators;
        CombatEnv::uniform(&NULL)
    }

    pub fn events(&self) -> &'a dyn EventSink {
        self.events
    }

    pub fn presentation(&self) -> &'a dyn Presentation {
        self.presentation
    }

    pub fn ai(&self) -> &'a dyn AiSink {
        self.ai
    }

    pub fn behavior(&self) -> &'a dyn BehaviorSignals {
        self.behavior
    }

    pub fn spawner(&self) -> &'a dyn Spawner {
        self.spawner
    }
}

impl std::fmt::Debug for CombatEnv<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombatEnv").finish_non_exhaustive()
    }
}

/// Collaborator that ignores every call.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullCollaborators;

impl EventSink for NullCollaborators {
    fn publish(&self, _event: CombatEvent) {}
}

impl Presentation for NullCollaborators {
    fn floating_text(&self, _target: EntityId, _text: &str, _color: Color) {}
}

impl AiSink for NullCollaborators {
    fn post(&self, _message: AiMessage) {}
}

impl BehaviorSignals for NullCollaborators {
    fn interrupt(&self, _target: EntityId) {}

    fn set_taunt(&self, _target: EntityId, _source: EntityId, _duration: f32) {}
}

impl Spawner for NullCollaborators {
    fn spawn_ability(&self, _instance: &AbilityInstance) {}

    fn despawn_ability(&self, _id: AbilityInstanceId) {}

    fn spawn_buff(&self, _target: EntityId, _buff: &BuffInstance) {}

    fn despawn_buff(&self, _target: EntityId, _id: BuffInstanceId) {}
}
