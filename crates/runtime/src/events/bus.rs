//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use combat_core::{AiMessage, CombatEvent};

use super::types::{BehaviorEvent, LifecycleEvent, PresentationEvent, SimulationEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Health, shield, threat and death notifications
    Combat,
    /// Floating combat text
    Presentation,
    /// Messages for the AI subsystem
    Ai,
    /// Interrupt and taunt signals
    Behavior,
    /// Ability/buff spawn and despawn
    Lifecycle,
    /// Worker bookkeeping (steps, rejected casts)
    Simulation,
}

impl Topic {
    pub const ALL: [Topic; 6] = [
        Topic::Combat,
        Topic::Presentation,
        Topic::Ai,
        Topic::Behavior,
        Topic::Lifecycle,
        Topic::Simulation,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "topic", content = "event", rename_all = "snake_case")]
pub enum Event {
    Combat(CombatEvent),
    Presentation(PresentationEvent),
    Ai(AiMessage),
    Behavior(BehaviorEvent),
    Lifecycle(LifecycleEvent),
    Simulation(SimulationEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Combat(_) => Topic::Combat,
            Event::Presentation(_) => Topic::Presentation,
            Event::Ai(_) => Topic::Ai,
            Event::Behavior(_) => Topic::Behavior,
            Event::Lifecycle(_) => Topic::Lifecycle,
            Event::Simulation(_) => Topic::Simulation,
        }
    }
}

/// Topic-based event bus
///
/// Fire-and-forget fan-out: every subscriber of a topic gets its own copy,
/// publishing never waits and never fails, and late subscribers see no replay.
/// A lagging subscriber loses the oldest events, not the publisher's time.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<[broadcast::Sender<Event>; Topic::ALL.len()]>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let channels = Topic::ALL.map(|_| broadcast::channel(capacity).0);

        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channels[topic.index()].send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!(target: "runtime::events", "No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels[topic.index()].subscribe()
    }

    /// Subscribe to multiple topics
    ///
    /// Returns receivers for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }

    /// Number of live receivers on `topic`.
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.channels[topic.index()].receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::EntityId;

    fn zero(entity: u32) -> Event {
        Event::Combat(CombatEvent::HealthZero {
            entity: EntityId(entity),
        })
    }

    #[test]
    fn every_subscriber_gets_its_own_copy() {
        let bus = EventBus::with_capacity(8);
        let mut first = bus.subscribe(Topic::Combat);
        let mut second = bus.subscribe(Topic::Combat);

        bus.publish(zero(1));

        assert_eq!(first.try_recv().unwrap(), zero(1));
        assert_eq!(second.try_recv().unwrap(), zero(1));
    }

    #[test]
    fn topics_are_isolated_and_unobserved_publish_is_fine() {
        let bus = EventBus::with_capacity(8);
        bus.publish(zero(1));

        let mut presentation = bus.subscribe(Topic::Presentation);
        let mut combat = bus.subscribe(Topic::Combat);
        assert_eq!(bus.subscriber_count(Topic::Combat), 1);
        assert_eq!(bus.subscriber_count(Topic::Ai), 0);
        bus.publish(zero(2));

        assert!(presentation.try_recv().is_err());
        // No replay of the event published before subscribing.
        assert_eq!(combat.try_recv().unwrap(), zero(2));
        assert!(combat.try_recv().is_err());
    }

    #[test]
    fn events_arrive_in_publish_order() {
        let bus = EventBus::with_capacity(8);
        let mut combat = bus.subscribe(Topic::Combat);

        for entity in 0..5 {
            bus.publish(zero(entity));
        }

        for entity in 0..5 {
            assert_eq!(combat.try_recv().unwrap(), zero(entity));
        }
    }

    #[test]
    fn events_serialize_with_topic_tag() {
        let json = serde_json::to_value(zero(3)).unwrap();

        assert_eq!(json["topic"], "combat");
        assert_eq!(json["event"]["type"], "health_zero");
        assert_eq!(json["event"]["entity"], 3);
    }
}
