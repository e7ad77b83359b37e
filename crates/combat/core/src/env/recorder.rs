//! Collaborator that records every call, for engine tests.

use std::cell::RefCell;

use crate::ability::AbilityInstance;
use crate::buff::BuffInstance;
use crate::events::{AiMessage, Color, CombatEvent};
use crate::state::{AbilityInstanceId, BuffInstanceId, EntityId};

use super::{AiSink, BehaviorSignals, EventSink, Presentation, Spawner};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Signal {
    Interrupt(EntityId),
    Taunt {
        target: EntityId,
        source: EntityId,
        duration: f32,
    },
    SpawnAbility(AbilityInstanceId),
    DespawnAbility(AbilityInstanceId),
    SpawnBuff(EntityId, BuffInstanceId),
    DespawnBuff(EntityId, BuffInstanceId),
}

#[derive(Debug, Default)]
pub(crate) struct Recorder {
    pub events: RefCell<Vec<CombatEvent>>,
    pub texts: RefCell<Vec<(EntityId, String, Color)>>,
    pub messages: RefCell<Vec<AiMessage>>,
    pub signals: RefCell<Vec<Signal>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<CombatEvent> {
        self.events.borrow().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.texts.borrow().iter().map(|(_, text, _)| text.clone()).collect()
    }

    pub fn threat(&self) -> Vec<(EntityId, u32)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                CombatEvent::ThreatGenerated { source, amount, .. } => Some((*source, *amount)),
                _ => None,
            })
            .collect()
    }

    pub fn count_health_zero(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| matches!(event, CombatEvent::HealthZero { .. }))
            .count()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
        self.texts.borrow_mut().clear();
        self.messages.borrow_mut().clear();
        self.signals.borrow_mut().clear();
    }
}

impl EventSink for Recorder {
    fn publish(&self, event: CombatEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl Presentation for Recorder {
    fn floating_text(&self, target: EntityId, text: &str, color: Color) {
        self.texts.borrow_mut().push((target, text.to_string(), color));
    }
}

impl AiSink for Recorder {
    fn post(&self, message: AiMessage) {
        self.messages.borrow_mut().push(message);
    }
}

impl BehaviorSignals for Recorder {
    fn interrupt(&self, target: EntityId) {
        self.signals.borrow_mut().push(Signal::Interrupt(target));
    }

    fn set_taunt(&self, target: EntityId, source: EntityId, duration: f32) {
        self.signals.borrow_mut().push(Signal::Taunt {
            target,
            source,
            duration,
        });
    }
}

impl Spawner for Recorder {
    fn spawn_ability(&self, instance: &AbilityInstance) {
        self.signals
            .borrow_mut()
            .push(Signal::SpawnAbility(instance.id()));
    }

    fn despawn_ability(&self, id: AbilityInstanceId) {
        self.signals.borrow_mut().push(Signal::DespawnAbility(id));
    }

    fn spawn_buff(&self, target: EntityId, buff: &BuffInstance) {
        self.signals
            .borrow_mut()
            .push(Signal::SpawnBuff(target, buff.id()));
    }

    fn despawn_buff(&self, target: EntityId, id: BuffInstanceId) {
        self.signals.borrow_mut().push(Signal::DespawnBuff(target, id));
    }
}
