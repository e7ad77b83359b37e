//! Runtime orchestration for the combat simulation.
//!
//! This crate puts the pure `combat-core` engine behind a single worker task
//! that owns the state, and routes everything the engine makes observable
//! onto a topic-based event bus. Consumers embed [`Runtime`] to drive combat
//! and subscribe to events, and interact with it through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`collaborators`] adapts the engine's sink traits onto the bus
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod collaborators;
pub mod events;
pub mod runtime;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use collaborators::BusCollaborators;
pub use events::{
    BehaviorEvent, Event, EventBus, LifecycleEvent, PresentationEvent, SimulationEvent, Topic,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
