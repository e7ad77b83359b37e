//! Authoritative combat engine.
//!
//! The [`CombatEngine`] is the only path that mutates [`CombatState`]. It
//! checks authority, drives the mitigation pipeline and buff engine, and
//! announces every change through the collaborators in [`CombatEnv`].
//!
//! # Step order
//!
//! ```text
//! step(dt):
//!   casts      cooldowns tick, finished casts spawn ability instances
//!   abilities  advance → resolve effect → attach buff → finish → despawn
//!   buffs      tick (periodic damage/heal) → sweep expired and depleted
//! ```
//!
//! Operations on one combatant are strictly ordered within a step. Nothing
//! here blocks or schedules callbacks; every timer is accumulated time
//! compared against a threshold.

mod buffs;
mod casting;
mod errors;
mod health;
mod resolve;

pub use casting::CastOutcome;
pub use errors::{CastError, EngineError};

use crate::combat::threat_for;
use crate::config::CombatConfig;
use crate::env::CombatEnv;
use crate::events::CombatEvent;
use crate::state::{CombatState, Combatant, EntityId};

/// Which side of the simulation the engine runs on.
///
/// Only the server mutates state. On a client every mutating call returns
/// [`EngineError::NotAuthoritative`] without touching anything.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Authority {
    #[default]
    Server,
    Client,
}

impl Authority {
    pub fn is_authoritative(&self) -> bool {
        matches!(self, Self::Server)
    }
}

/// Counters describing what one [`CombatEngine::step`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepSummary {
    pub casts_completed: usize,
    /// Casts dropped at completion (caster died, target vanished, pool drained).
    pub casts_dropped: usize,
    pub abilities_resolved: usize,
    /// Instances finished without effect because caster or target vanished.
    pub abilities_discarded: usize,
    pub buffs_removed: usize,
    /// Buffs that could not be attached because the target's list was full.
    pub buffs_rejected: usize,
}

impl StepSummary {
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

/// Combat engine borrowing the state it mutates.
pub struct CombatEngine<'a> {
    state: &'a mut CombatState,
    authority: Authority,
}

impl<'a> CombatEngine<'a> {
    pub fn new(state: &'a mut CombatState, authority: Authority) -> Self {
        Self { state, authority }
    }

    /// Engine with server authority.
    pub fn authoritative(state: &'a mut CombatState) -> Self {
        Self::new(state, Authority::Server)
    }

    pub fn state(&self) -> &CombatState {
        self.state
    }

    pub fn authority(&self) -> Authority {
        self.authority
    }

    /// Advances every timer by `elapsed` seconds.
    pub fn step(&mut self, env: &CombatEnv<'_>, elapsed: f32) -> Result<StepSummary, EngineError> {
        self.ensure_authority()?;
        let elapsed = elapsed.max(0.0);
        let mut summary = StepSummary::default();

        self.state.advance_clock(elapsed);
        self.advance_casts(env, elapsed, &mut summary);
        self.advance_abilities(env, elapsed, &mut summary);
        self.advance_buffs(env, elapsed, &mut summary)?;

        Ok(summary)
    }

    /// Adds a combatant, returning the one it replaced.
    pub fn insert_combatant(
        &mut self,
        combatant: Combatant,
    ) -> Result<Option<Combatant>, EngineError> {
        self.ensure_authority()?;
        Ok(self.state.insert_combatant(combatant))
    }

    pub fn remove_combatant(&mut self, id: EntityId) -> Result<Option<Combatant>, EngineError> {
        self.ensure_authority()?;
        Ok(self.state.remove_combatant(id))
    }

    /// Announces threat caused by `source` on `target`.
    pub fn generate_threat(
        &mut self,
        env: &CombatEnv<'_>,
        target: EntityId,
        source: EntityId,
        amount: u32,
    ) -> Result<(), EngineError> {
        self.ensure_authority()?;
        self.combatant(target)?;
        env.events().publish(CombatEvent::ThreatGenerated {
            target,
            source,
            amount,
        });
        Ok(())
    }

    /// Threat for `amount` scaled by `threat_modifier`, attributed to `source`.
    fn attribute_threat(
        &mut self,
        env: &CombatEnv<'_>,
        target: EntityId,
        source: EntityId,
        amount: u32,
        threat_modifier: f32,
    ) -> Result<(), EngineError> {
        self.generate_threat(env, target, source, threat_for(amount, threat_modifier))
    }

    fn ensure_authority(&self) -> Result<(), EngineError> {
        if self.authority.is_authoritative() {
            Ok(())
        } else {
            Err(EngineError::NotAuthoritative)
        }
    }

    fn config(&self) -> &CombatConfig {
        &self.state.config
    }

    fn combatant(&self, id: EntityId) -> Result<&Combatant, EngineError> {
        self.state
            .combatant(id)
            .ok_or(EngineError::UnknownCombatant(id))
    }

    fn combatant_mut(&mut self, id: EntityId) -> Result<&mut Combatant, EngineError> {
        self.state
            .combatant_mut(id)
            .ok_or(EngineError::UnknownCombatant(id))
    }
}
