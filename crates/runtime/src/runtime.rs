//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and exposes a builder-based API for clients to drive combat.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use combat_core::{Authority, CombatConfig, CombatState, Combatant};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::{Event, EventBus, Topic};
use crate::workers::{AutoTick, Command, SimulationWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub combat: CombatConfig,
    /// Participant role; clients never mutate state.
    pub authority: Authority,
    /// Steps per second when `auto_tick` is enabled.
    pub tick_rate_hz: u32,
    /// Let the worker step itself on a fixed timer instead of waiting for
    /// explicit `step` commands.
    pub auto_tick: bool,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl RuntimeConfig {
    pub const DEFAULT_TICK_RATE_HZ: u32 = 20;

    /// Fixed step length derived from the tick rate.
    pub fn tick_period(&self) -> Option<Duration> {
        (self.tick_rate_hz > 0)
            .then(|| Duration::from_nanos(1_000_000_000 / u64::from(self.tick_rate_hz)))
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            combat: CombatConfig::default(),
            authority: Authority::default(),
            tick_rate_hz: Self::DEFAULT_TICK_RATE_HZ,
            auto_tick: false,
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

/// Main runtime that orchestrates the combat simulation
///
/// Runtime owns the worker task; [`RuntimeHandle`] provides a cloneable
/// façade for clients.
pub struct Runtime {
    // Shared handle (can be cloned for clients)
    handle: RuntimeHandle,

    // Background worker
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Subscribe to one event topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Shutdown the runtime gracefully
    ///
    /// Stops the worker even while cloned handles are still alive; those
    /// handles then fail with [`RuntimeError::CommandChannelClosed`].
    pub async fn shutdown(self) -> Result<()> {
        // The worker may already be gone if every sender was dropped.
        match self.handle.shutdown().await {
            Ok(()) | Err(RuntimeError::CommandChannelClosed) => {}
            Err(RuntimeError::ReplyChannelClosed(_)) => {}
            Err(error) => return Err(error),
        }
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    state: Option<CombatState>,
    combatants: Vec<Combatant>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            state: None,
            combatants: Vec::new(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide initial combat state. Its `config` is replaced by the
    /// runtime's combat configuration.
    pub fn initial_state(mut self, state: CombatState) -> Self {
        self.state = Some(state);
        self
    }

    /// Add a combatant to the initial state.
    pub fn combatant(mut self, combatant: Combatant) -> Self {
        self.combatants.push(combatant);
        self
    }

    pub fn authority(mut self, authority: Authority) -> Self {
        self.config.authority = authority;
        self
    }

    /// Step automatically at `tick_rate_hz`.
    pub fn auto_tick(mut self, tick_rate_hz: u32) -> Self {
        self.config.auto_tick = true;
        self.config.tick_rate_hz = tick_rate_hz;
        self
    }

    /// Build the runtime
    pub async fn build(self) -> Result<Runtime> {
        let auto_tick = if self.config.auto_tick {
            let period = self
                .config
                .tick_period()
                .ok_or(RuntimeError::InvalidTickRate)?;
            Some(AutoTick { period })
        } else {
            None
        };

        let mut state = self.state.unwrap_or_default();
        state.config = self.config.combat.clone();
        for combatant in self.combatants {
            state.insert_combatant(combatant);
        }

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let sim_worker = SimulationWorker::new(
            state,
            self.config.authority,
            command_rx,
            event_bus,
            auto_tick,
        );

        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        Ok(Runtime {
            handle,
            sim_worker_handle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_period_follows_rate() {
        let config = RuntimeConfig {
            tick_rate_hz: 50,
            ..RuntimeConfig::default()
        };
        assert_eq!(config.tick_period(), Some(Duration::from_millis(20)));

        let stopped = RuntimeConfig {
            tick_rate_hz: 0,
            ..RuntimeConfig::default()
        };
        assert_eq!(stopped.tick_period(), None);
    }

    #[tokio::test]
    async fn auto_tick_without_rate_is_rejected() {
        let result = Runtime::builder().auto_tick(0).build().await;

        assert!(matches!(result, Err(RuntimeError::InvalidTickRate)));
    }
}
