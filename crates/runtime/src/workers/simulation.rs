//! Simulation worker that owns the authoritative [`combat_core::CombatState`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), drives
//! [`combat_core::CombatEngine`] and lets the engine publish its side effects
//! onto the EventBus through [`BusCollaborators`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, error, info, trace, warn};

use combat_core::{
    AbilityDefinition, AbilityInstanceId, Authority, BuffDefinition, BuffInstance,
    BuffInstanceId, CastError, CastOutcome, CastState, CombatEngine, CombatEnv, CombatState,
    Combatant, CoreError, DamageApplied, EngineError, EntityId, ErrorSeverity, Position,
    StepSummary,
};

use crate::api::{Result, RuntimeError};
use crate::collaborators::BusCollaborators;
use crate::events::{Event, EventBus, SimulationEvent};

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Advance the simulation by `elapsed` seconds.
    Step {
        elapsed: f32,
        reply: oneshot::Sender<Result<StepSummary>>,
    },
    BeginCast {
        caster: EntityId,
        ability: Arc<AbilityDefinition>,
        target: EntityId,
        reply: oneshot::Sender<Result<CastOutcome>>,
    },
    CancelCast {
        caster: EntityId,
        reply: oneshot::Sender<Result<Option<CastState>>>,
    },
    SetMoving {
        id: EntityId,
        moving: bool,
        reply: oneshot::Sender<Result<bool>>,
    },
    MoveCombatant {
        id: EntityId,
        position: Position,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Spawn an ability instance directly, skipping the cast checks.
    SpawnAbility {
        ability: Arc<AbilityDefinition>,
        caster: EntityId,
        target: EntityId,
        reply: oneshot::Sender<Result<AbilityInstanceId>>,
    },
    TakeDamage {
        target: EntityId,
        amount: u32,
        reply: oneshot::Sender<Result<DamageApplied>>,
    },
    GainHealth {
        target: EntityId,
        amount: u32,
        reply: oneshot::Sender<Result<u32>>,
    },
    SetMaxHealth {
        target: EntityId,
        maximum: u32,
        reply: oneshot::Sender<Result<()>>,
    },
    AddBuff {
        target: EntityId,
        owner: EntityId,
        buff: BuffDefinition,
        threat_modifier: f32,
        reply: oneshot::Sender<Result<BuffInstanceId>>,
    },
    RemoveBuff {
        target: EntityId,
        id: BuffInstanceId,
        reply: oneshot::Sender<Result<Option<BuffInstance>>>,
    },
    GenerateThreat {
        target: EntityId,
        source: EntityId,
        amount: u32,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Add (or replace) a combatant.
    InsertCombatant {
        combatant: Box<Combatant>,
        reply: oneshot::Sender<Result<Option<Combatant>>>,
    },
    RemoveCombatant {
        id: EntityId,
        reply: oneshot::Sender<Result<Option<Combatant>>>,
    },
    /// Query the current combat state (read-only).
    QueryState { reply: oneshot::Sender<CombatState> },
    /// Stop the worker loop after replying.
    Shutdown { reply: oneshot::Sender<()> },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Step { .. } => "step",
            Command::BeginCast { .. } => "begin_cast",
            Command::CancelCast { .. } => "cancel_cast",
            Command::SetMoving { .. } => "set_moving",
            Command::MoveCombatant { .. } => "move_combatant",
            Command::SpawnAbility { .. } => "spawn_ability",
            Command::TakeDamage { .. } => "take_damage",
            Command::GainHealth { .. } => "gain_health",
            Command::SetMaxHealth { .. } => "set_max_health",
            Command::AddBuff { .. } => "add_buff",
            Command::RemoveBuff { .. } => "remove_buff",
            Command::GenerateThreat { .. } => "generate_threat",
            Command::InsertCombatant { .. } => "insert_combatant",
            Command::RemoveCombatant { .. } => "remove_combatant",
            Command::QueryState { .. } => "query_state",
            Command::Shutdown { .. } => "shutdown",
        }
    }
}

/// Fixed-rate stepping driven by the worker itself.
#[derive(Clone, Copy, Debug)]
pub struct AutoTick {
    pub period: Duration,
}

/// Background task that processes combat commands.
///
/// The worker is the only owner of the state; every mutation happens on its
/// task, one command or tick at a time.
pub struct SimulationWorker {
    state: CombatState,
    authority: Authority,
    command_rx: mpsc::Receiver<Command>,
    collaborators: BusCollaborators,
    auto_tick: Option<AutoTick>,
    ticks: u64,
}

impl SimulationWorker {
    /// Creates a new simulation worker.
    pub fn new(
        state: CombatState,
        authority: Authority,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        auto_tick: Option<AutoTick>,
    ) -> Self {
        info!(
            target: "runtime::simulation",
            combatants = state.combatants().count(),
            authority = %authority,
            auto_tick = ?auto_tick.map(|tick| tick.period),
            "SimulationWorker initialized"
        );

        Self {
            state,
            authority,
            command_rx,
            collaborators: BusCollaborators::new(event_bus),
            auto_tick,
            ticks: 0,
        }
    }

    /// Main worker loop.
    ///
    /// Runs until a shutdown command arrives or every handle is dropped.
    pub async fn run(mut self) {
        let mut ticker = self.auto_tick.map(|tick| {
            let mut interval = tokio::time::interval(tick.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });

        loop {
            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(Command::Shutdown { reply }) => {
                        let _ = reply.send(());
                        break;
                    }
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                () = next_tick(&mut ticker) => {
                    let elapsed = self.auto_tick.map_or(0.0, |tick| tick.period.as_secs_f32());
                    // Failures are already logged by `step`.
                    let _ = self.step(elapsed);
                }
            }
        }

        info!(
            target: "runtime::simulation",
            ticks = self.ticks,
            elapsed = self.state.elapsed(),
            "SimulationWorker stopped"
        );
    }

    fn handle_command(&mut self, cmd: Command) {
        let name = cmd.name();
        trace!(target: "runtime::simulation", command = name, "handling command");

        let delivered = match cmd {
            Command::Step { elapsed, reply } => reply.send(self.step(elapsed)).is_ok(),
            Command::BeginCast {
                caster,
                ability,
                target,
                reply,
            } => reply
                .send(self.begin_cast(caster, ability, target))
                .is_ok(),
            Command::CancelCast { caster, reply } => {
                let result = self.with_engine(name, |engine, _| engine.cancel_cast(caster));
                reply.send(result).is_ok()
            }
            Command::SetMoving { id, moving, reply } => {
                let result = self.with_engine(name, |engine, _| engine.set_moving(id, moving));
                reply.send(result).is_ok()
            }
            Command::MoveCombatant {
                id,
                position,
                reply,
            } => {
                let result =
                    self.with_engine(name, |engine, _| engine.move_combatant(id, position));
                reply.send(result).is_ok()
            }
            Command::SpawnAbility {
                ability,
                caster,
                target,
                reply,
            } => {
                let result = self.with_engine(name, |engine, env| {
                    engine.spawn_ability(env, ability, caster, target)
                });
                reply.send(result).is_ok()
            }
            Command::TakeDamage {
                target,
                amount,
                reply,
            } => {
                let result =
                    self.with_engine(name, |engine, env| engine.take_damage(env, target, amount));
                reply.send(result).is_ok()
            }
            Command::GainHealth {
                target,
                amount,
                reply,
            } => {
                let result =
                    self.with_engine(name, |engine, env| engine.gain_health(env, target, amount));
                reply.send(result).is_ok()
            }
            Command::SetMaxHealth {
                target,
                maximum,
                reply,
            } => {
                let result = self.with_engine(name, |engine, env| {
                    engine.set_max_health(env, target, maximum)
                });
                reply.send(result).is_ok()
            }
            Command::AddBuff {
                target,
                owner,
                buff,
                threat_modifier,
                reply,
            } => {
                let result = self.with_engine(name, |engine, env| {
                    engine.add_buff(env, target, owner, buff, threat_modifier)
                });
                reply.send(result).is_ok()
            }
            Command::RemoveBuff { target, id, reply } => {
                let result =
                    self.with_engine(name, |engine, env| engine.remove_buff(env, target, id));
                reply.send(result).is_ok()
            }
            Command::GenerateThreat {
                target,
                source,
                amount,
                reply,
            } => {
                let result = self.with_engine(name, |engine, env| {
                    engine.generate_threat(env, target, source, amount)
                });
                reply.send(result).is_ok()
            }
            Command::InsertCombatant { combatant, reply } => {
                let entity = combatant.id();
                let health = combatant.health_text();
                let result =
                    self.with_engine(name, |engine, _| engine.insert_combatant(*combatant));
                if result.is_ok() {
                    debug!(target: "runtime::simulation", %entity, %health, "combatant joined");
                }
                reply.send(result).is_ok()
            }
            Command::RemoveCombatant { id, reply } => {
                let result = self.with_engine(name, |engine, _| engine.remove_combatant(id));
                if result.is_ok() {
                    debug!(target: "runtime::simulation", entity = %id, "combatant left");
                }
                reply.send(result).is_ok()
            }
            Command::QueryState { reply } => reply.send(self.state.clone()).is_ok(),
            // Handled by the run loop before dispatch.
            Command::Shutdown { reply } => reply.send(()).is_ok(),
        };

        if !delivered {
            debug!(
                target: "runtime::simulation",
                command = name,
                "reply channel closed (caller dropped)"
            );
        }
    }

    /// Advances the simulation and announces non-idle steps.
    fn step(&mut self, elapsed: f32) -> Result<StepSummary> {
        let summary = self.with_engine("step", |engine, env| engine.step(env, elapsed))?;
        self.ticks += 1;

        if !summary.is_idle() {
            debug!(
                target: "runtime::simulation",
                tick = self.ticks,
                casts_completed = summary.casts_completed,
                abilities_resolved = summary.abilities_resolved,
                buffs_removed = summary.buffs_removed,
                "step"
            );
            self.collaborators
                .bus()
                .publish(Event::Simulation(SimulationEvent::Stepped {
                    tick: self.ticks,
                    elapsed: self.state.elapsed(),
                    summary,
                }));
        }
        Ok(summary)
    }

    fn begin_cast(
        &mut self,
        caster: EntityId,
        ability: Arc<AbilityDefinition>,
        target: EntityId,
    ) -> Result<CastOutcome> {
        let name = ability.name.clone();
        let result = self.with_engine("begin_cast", |engine, env| {
            engine.begin_cast(env, caster, ability, target)
        });

        if let Err(RuntimeError::Engine(EngineError::Cast(reason))) = &result {
            self.announce_rejected_cast(caster, name, reason.clone());
        }
        result
    }

    fn announce_rejected_cast(&self, caster: EntityId, ability: String, reason: CastError) {
        self.collaborators
            .bus()
            .publish(Event::Simulation(SimulationEvent::CastRejected {
                caster,
                ability,
                reason,
            }));
    }

    /// Runs one engine operation against the owned state, logging failures
    /// by severity.
    fn with_engine<T>(
        &mut self,
        operation: &'static str,
        f: impl FnOnce(&mut CombatEngine<'_>, &CombatEnv<'_>) -> std::result::Result<T, EngineError>,
    ) -> Result<T> {
        let env = self.collaborators.env();
        let mut engine = CombatEngine::new(&mut self.state, self.authority);

        f(&mut engine, &env).map_err(|error| {
            log_engine_error(operation, &error);
            error.into()
        })
    }
}

/// Resolves on the next auto-tick, or never when auto-tick is off.
async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

fn log_engine_error(operation: &'static str, error: &EngineError) {
    let code = error.error_code();
    match error.severity() {
        ErrorSeverity::Ignored => {
            trace!(target: "runtime::simulation", operation, code, "{}", error)
        }
        ErrorSeverity::Discarded => {
            debug!(target: "runtime::simulation", operation, code, "{}", error)
        }
        ErrorSeverity::Validation => {
            warn!(target: "runtime::simulation", operation, code, "{}", error)
        }
        ErrorSeverity::Fatal => {
            error!(target: "runtime::simulation", operation, code, "{}", error)
        }
    }
}
