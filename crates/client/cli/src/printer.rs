//! Renders runtime events for the terminal.
use std::collections::HashMap;

use anyhow::Result;
use combat_core::{AiMessage, CombatEvent};
use combat_runtime::{
    BehaviorEvent, Event, LifecycleEvent, PresentationEvent, SimulationEvent, Topic,
};
use tokio::sync::broadcast::{Receiver, error::TryRecvError};

use crate::roster::name_of;

/// Topics the duel prints. Lifecycle spawn/despawn traffic is left out.
pub const PRINTED_TOPICS: [Topic; 5] = [
    Topic::Combat,
    Topic::Presentation,
    Topic::Ai,
    Topic::Behavior,
    Topic::Simulation,
];

/// Drains the subscribed topics after every step and prints what arrived.
pub struct EventPrinter {
    receivers: HashMap<Topic, Receiver<Event>>,
    json: bool,
}

impl EventPrinter {
    pub fn new(receivers: HashMap<Topic, Receiver<Event>>, json: bool) -> Self {
        Self { receivers, json }
    }

    /// Print everything published so far, one topic after another.
    pub fn flush(&mut self, clock: f64) -> Result<()> {
        for topic in PRINTED_TOPICS {
            let Some(receiver) = self.receivers.get_mut(&topic) else {
                continue;
            };
            loop {
                match receiver.try_recv() {
                    Ok(event) => {
                        if self.json {
                            println!("{}", serde_json::to_string(&event)?);
                        } else if let Some(text) = describe(&event) {
                            println!("[{clock:>6.2}s] {text}");
                        }
                    }
                    Err(TryRecvError::Lagged(skipped)) => {
                        tracing::warn!(?topic, skipped, "event printer lagged behind");
                    }
                    Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                }
            }
        }
        Ok(())
    }
}

/// One-line human readable rendering. `None` for events not worth a line.
pub fn describe(event: &Event) -> Option<String> {
    let line = match event {
        Event::Combat(CombatEvent::HealthChanged {
            entity,
            health_fraction,
            text,
            shield,
        }) => format!(
            "{:<7} health {text} ({:.0}%) shield {shield}",
            name_of(*entity),
            health_fraction * 100.0
        ),
        // Duplicate of HealthChanged for party frames.
        Event::Combat(CombatEvent::HealthChangedForGroup { .. }) => return None,
        Event::Combat(CombatEvent::ThreatGenerated {
            target,
            source,
            amount,
        }) => format!(
            "{:<7} +{amount} threat on {}",
            name_of(*source),
            name_of(*target)
        ),
        Event::Combat(CombatEvent::HealthZero { entity }) => {
            format!("{:<7} has fallen", name_of(*entity))
        }
        Event::Presentation(PresentationEvent::FloatingText {
            target,
            text,
            color,
        }) => format!("{:<7} \"{text}\" {color}", name_of(*target)),
        Event::Ai(AiMessage::AbilityResolved {
            source,
            target,
            magnitude,
        }) => format!(
            "{:<7} ai: helped {} for {magnitude}",
            name_of(*source),
            name_of(*target)
        ),
        Event::Behavior(BehaviorEvent::Interrupt { target }) => {
            format!("{:<7} interrupted", name_of(*target))
        }
        Event::Behavior(BehaviorEvent::Taunt {
            target,
            source,
            duration,
        }) => format!(
            "{:<7} taunted by {} for {duration:.1}s",
            name_of(*target),
            name_of(*source)
        ),
        Event::Lifecycle(LifecycleEvent::AbilitySpawned {
            ability, caster, ..
        }) => format!("{:<7} releases {ability}", name_of(*caster)),
        Event::Lifecycle(other) => format!("{other:?}"),
        Event::Simulation(SimulationEvent::Stepped { summary, .. }) => format!(
            "step: {} casts done, {} abilities resolved, {} buffs removed",
            summary.casts_completed, summary.abilities_resolved, summary.buffs_removed
        ),
        Event::Simulation(SimulationEvent::CastRejected {
            caster,
            ability,
            reason,
        }) => format!("{:<7} cannot cast {ability}: {reason}", name_of(*caster)),
    };
    Some(line)
}

#[cfg(test)]
mod tests {
    use combat_core::{Color, EntityId};

    use super::*;
    use crate::roster::{KNIGHT, MAGE};

    #[test]
    fn renders_threat_and_text() {
        let threat = Event::Combat(CombatEvent::ThreatGenerated {
            target: KNIGHT,
            source: MAGE,
            amount: 60,
        });
        let text = Event::Presentation(PresentationEvent::FloatingText {
            target: KNIGHT,
            text: "20 (80 absorbed)".into(),
            color: Color::RED,
        });

        assert_eq!(
            describe(&threat).as_deref(),
            Some("Mage    +60 threat on Knight")
        );
        assert_eq!(
            describe(&text).as_deref(),
            Some("Knight  \"20 (80 absorbed)\" #ff0000")
        );
    }

    #[test]
    fn group_health_is_not_repeated() {
        let event = Event::Combat(CombatEvent::HealthChangedForGroup {
            entity: EntityId(1),
            health_fraction: 0.5,
        });

        assert!(describe(&event).is_none());
    }
}
