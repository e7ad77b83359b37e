//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! driving the combat engine or streaming events from specific topics.
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};

use combat_core::{
    AbilityDefinition, AbilityInstanceId, BuffDefinition, BuffInstance, BuffInstanceId,
    CastOutcome, CastState, CombatState, Combatant, DamageApplied, EntityId, Position,
    StepSummary,
};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    /// Sends one command and waits for the worker's reply.
    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Advance the simulation by `elapsed` seconds.
    ///
    /// Only needed when the runtime was built without auto-tick; with
    /// auto-tick the extra step simply lands between two timer steps.
    pub async fn step(&self, elapsed: f32) -> Result<StepSummary> {
        self.request(|reply| Command::Step { elapsed, reply }).await?
    }

    /// Validate and start a cast. Rejections are also published on
    /// [`Topic::Simulation`].
    pub async fn begin_cast(
        &self,
        caster: EntityId,
        ability: Arc<AbilityDefinition>,
        target: EntityId,
    ) -> Result<CastOutcome> {
        self.request(|reply| Command::BeginCast {
            caster,
            ability,
            target,
            reply,
        })
        .await?
    }

    pub async fn cancel_cast(&self, caster: EntityId) -> Result<Option<CastState>> {
        self.request(|reply| Command::CancelCast { caster, reply }).await?
    }

    /// Returns true when starting to move broke the current cast.
    pub async fn set_moving(&self, id: EntityId, moving: bool) -> Result<bool> {
        self.request(|reply| Command::SetMoving { id, moving, reply }).await?
    }

    pub async fn move_combatant(&self, id: EntityId, position: Position) -> Result<()> {
        self.request(|reply| Command::MoveCombatant {
            id,
            position,
            reply,
        })
        .await?
    }

    /// Spawn an ability instance without cast validation (scripted effects).
    pub async fn spawn_ability(
        &self,
        ability: Arc<AbilityDefinition>,
        caster: EntityId,
        target: EntityId,
    ) -> Result<AbilityInstanceId> {
        self.request(|reply| Command::SpawnAbility {
            ability,
            caster,
            target,
            reply,
        })
        .await?
    }

    pub async fn take_damage(&self, target: EntityId, amount: u32) -> Result<DamageApplied> {
        self.request(|reply| Command::TakeDamage {
            target,
            amount,
            reply,
        })
        .await?
    }

    pub async fn gain_health(&self, target: EntityId, amount: u32) -> Result<u32> {
        self.request(|reply| Command::GainHealth {
            target,
            amount,
            reply,
        })
        .await?
    }

    pub async fn set_max_health(&self, target: EntityId, maximum: u32) -> Result<()> {
        self.request(|reply| Command::SetMaxHealth {
            target,
            maximum,
            reply,
        })
        .await?
    }

    pub async fn add_buff(
        &self,
        target: EntityId,
        owner: EntityId,
        buff: BuffDefinition,
        threat_modifier: f32,
    ) -> Result<BuffInstanceId> {
        self.request(|reply| Command::AddBuff {
            target,
            owner,
            buff,
            threat_modifier,
            reply,
        })
        .await?
    }

    pub async fn remove_buff(
        &self,
        target: EntityId,
        id: BuffInstanceId,
    ) -> Result<Option<BuffInstance>> {
        self.request(|reply| Command::RemoveBuff { target, id, reply }).await?
    }

    pub async fn generate_threat(
        &self,
        target: EntityId,
        source: EntityId,
        amount: u32,
    ) -> Result<()> {
        self.request(|reply| Command::GenerateThreat {
            target,
            source,
            amount,
            reply,
        })
        .await?
    }

    /// Add a combatant, returning the one it replaced.
    pub async fn insert_combatant(&self, combatant: Combatant) -> Result<Option<Combatant>> {
        self.request(|reply| Command::InsertCombatant {
            combatant: Box::new(combatant),
            reply,
        })
        .await?
    }

    pub async fn remove_combatant(&self, id: EntityId) -> Result<Option<Combatant>> {
        self.request(|reply| Command::RemoveCombatant { id, reply })
            .await?
    }

    /// Query the current combat state (read-only snapshot)
    pub async fn query_state(&self) -> Result<CombatState> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    /// Ask the worker to stop. Pending commands queued before this one are
    /// still handled.
    pub async fn shutdown(&self) -> Result<()> {
        self.request(|reply| Command::Shutdown { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Combat` - Health, shield, threat and death notifications
    /// - `Topic::Presentation` - Floating combat text
    /// - `Topic::Ai` - Messages for the AI subsystem
    /// - `Topic::Behavior` - Interrupt and taunt signals
    /// - `Topic::Lifecycle` - Ability/buff spawn and despawn
    /// - `Topic::Simulation` - Step summaries and rejected casts
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use combat_runtime::Topic;
    ///
    /// // Only subscribe to combat events
    /// let mut combat_rx = handle.subscribe(Topic::Combat);
    /// while let Ok(event) = combat_rx.recv().await {
    ///     // Handle combat events
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    ///
    /// Returns a map of topic to receiver for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
