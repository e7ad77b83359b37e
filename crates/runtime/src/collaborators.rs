//! Bridges the engine's collaborator traits onto the [`EventBus`].
//!
//! The engine only knows the sink traits from `combat_core::env`; in the
//! runtime every one of them turns into a publish on the matching topic.

use combat_core::{
    AbilityInstance, AbilityInstanceId, AiMessage, AiSink, BehaviorSignals, BuffInstance,
    BuffInstanceId, Color, CombatEnv, CombatEvent, EntityId, EventSink, Presentation, Spawner,
};

use crate::events::{BehaviorEvent, Event, EventBus, LifecycleEvent, PresentationEvent};

/// Publishes every engine side effect onto the bus.
#[derive(Clone, Debug)]
pub struct BusCollaborators {
    bus: EventBus,
}

impl BusCollaborators {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Environment handed to the engine for one command or step.
    pub fn env(&self) -> CombatEnv<'_> {
        CombatEnv::uniform(self)
    }
}

impl EventSink for BusCollaborators {
    fn publish(&self, event: CombatEvent) {
        self.bus.publish(Event::Combat(event));
    }
}

impl Presentation for BusCollaborators {
    fn floating_text(&self, target: EntityId, text: &str, color: Color) {
        self.bus
            .publish(Event::Presentation(PresentationEvent::FloatingText {
                target,
                text: text.to_owned(),
                color,
            }));
    }
}

impl AiSink for BusCollaborators {
    fn post(&self, message: AiMessage) {
        self.bus.publish(Event::Ai(message));
    }
}

impl BehaviorSignals for BusCollaborators {
    fn interrupt(&self, target: EntityId) {
        self.bus
            .publish(Event::Behavior(BehaviorEvent::Interrupt { target }));
    }

    fn set_taunt(&self, target: EntityId, source: EntityId, duration: f32) {
        self.bus.publish(Event::Behavior(BehaviorEvent::Taunt {
            target,
            source,
            duration,
        }));
    }
}

impl Spawner for BusCollaborators {
    fn spawn_ability(&self, instance: &AbilityInstance) {
        self.bus
            .publish(Event::Lifecycle(LifecycleEvent::AbilitySpawned {
                id: instance.id(),
                ability: instance.definition().name.clone(),
                caster: instance.caster(),
                target: instance.target(),
            }));
    }

    fn despawn_ability(&self, id: AbilityInstanceId) {
        self.bus
            .publish(Event::Lifecycle(LifecycleEvent::AbilityDespawned { id }));
    }

    fn spawn_buff(&self, target: EntityId, buff: &BuffInstance) {
        self.bus.publish(Event::Lifecycle(LifecycleEvent::BuffSpawned {
            target,
            buff: buff.id(),
            kind: buff.kind(),
        }));
    }

    fn despawn_buff(&self, target: EntityId, id: BuffInstanceId) {
        self.bus
            .publish(Event::Lifecycle(LifecycleEvent::BuffDespawned { target, buff: id }));
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tokio::sync::broadcast::Receiver;

    use super::*;
    use crate::events::Topic;

    fn next(receivers: &mut HashMap<Topic, Receiver<Event>>, topic: Topic) -> Option<Event> {
        receivers.get_mut(&topic)?.try_recv().ok()
    }

    #[test]
    fn each_sink_lands_on_its_topic() {
        let bus = EventBus::with_capacity(16);
        let mut receivers = bus.subscribe_multiple(&Topic::ALL);
        let collaborators = BusCollaborators::new(bus);
        let env = collaborators.env();

        env.events()
            .publish(CombatEvent::HealthZero { entity: EntityId(1) });
        env.presentation()
            .floating_text(EntityId(1), "Shield, 5", Color::YELLOW);
        env.behavior().interrupt(EntityId(2));
        env.spawner().despawn_ability(AbilityInstanceId(7));

        assert_eq!(
            next(&mut receivers, Topic::Combat).map(|event| event.topic()),
            Some(Topic::Combat)
        );
        assert_eq!(
            next(&mut receivers, Topic::Presentation),
            Some(Event::Presentation(PresentationEvent::FloatingText {
                target: EntityId(1),
                text: "Shield, 5".into(),
                color: Color::YELLOW,
            }))
        );
        assert_eq!(
            next(&mut receivers, Topic::Behavior),
            Some(Event::Behavior(BehaviorEvent::Interrupt {
                target: EntityId(2)
            }))
        );
        assert_eq!(
            next(&mut receivers, Topic::Lifecycle),
            Some(Event::Lifecycle(LifecycleEvent::AbilityDespawned {
                id: AbilityInstanceId(7)
            }))
        );
        assert!(next(&mut receivers, Topic::Ai).is_none());
        assert!(next(&mut receivers, Topic::Simulation).is_none());
    }
}
