//! Topic-based event bus for runtime events.
//!
//! Everything the combat engine makes observable is published onto one of a
//! handful of topics, and consumers subscribe only to the topics they need.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{BehaviorEvent, LifecycleEvent, PresentationEvent, SimulationEvent};
