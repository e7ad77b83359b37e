//! In-flight ability executions.

use std::sync::Arc;

use crate::state::{AbilityInstanceId, EntityId, Position};

use super::definition::AbilityDefinition;

/// Lifecycle of an ability instance. Ordered: phases only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AbilityPhase {
    Traveling,
    Resolving,
    Finished,
}

/// One execution of an [`AbilityDefinition`] between cast completion and cleanup.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityInstance {
    id: AbilityInstanceId,
    definition: Arc<AbilityDefinition>,
    caster: EntityId,
    target: EntityId,
    position: Position,
    /// Outgoing amount fixed at spawn (template amount × caster damage increase).
    amount: u32,
    elapsed: f32,
    phase: AbilityPhase,
}

impl AbilityInstance {
    pub fn new(
        id: AbilityInstanceId,
        definition: Arc<AbilityDefinition>,
        caster: EntityId,
        target: EntityId,
        origin: Position,
        amount: u32,
    ) -> Self {
        Self {
            id,
            definition,
            caster,
            target,
            position: origin,
            amount,
            elapsed: 0.0,
            phase: AbilityPhase::Traveling,
        }
    }

    pub fn id(&self) -> AbilityInstanceId {
        self.id
    }

    pub fn definition(&self) -> &AbilityDefinition {
        &self.definition
    }

    pub fn caster(&self) -> EntityId {
        self.caster
    }

    pub fn target(&self) -> EntityId {
        self.target
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn amount(&self) -> u32 {
        self.amount
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn phase(&self) -> AbilityPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == AbilityPhase::Finished
    }

    /// Moves the instance toward `target_position`.
    ///
    /// Instant abilities (`travel_speed == 0`) switch to `Resolving` at once.
    /// Otherwise the instance stays `Traveling` while farther than
    /// `arrival_threshold` from the target, moving `travel_speed × elapsed`
    /// along the straight line (never past the target), and switches to
    /// `Resolving` once within the threshold.
    pub fn advance(&mut self, target_position: Position, elapsed: f32, arrival_threshold: f32) {
        if self.phase != AbilityPhase::Traveling {
            return;
        }
        self.elapsed += elapsed.max(0.0);

        if self.definition.is_instant_travel() {
            self.transition(AbilityPhase::Resolving);
            return;
        }

        let distance = self.position.distance(&target_position);
        if distance > arrival_threshold {
            let step = self.definition.travel_speed * elapsed.max(0.0);
            self.position = self.position.step_toward(&target_position, step);
        } else {
            self.transition(AbilityPhase::Resolving);
        }
    }

    /// Marks the instance done. Used after resolution and for silent discards.
    pub fn finish(&mut self) {
        self.transition(AbilityPhase::Finished);
    }

    fn transition(&mut self, next: AbilityPhase) {
        debug_assert!(next >= self.phase, "ability phase reverted");
        if next > self.phase {
            self.phase = next;
        }
    }
}
