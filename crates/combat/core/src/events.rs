//! Notifications emitted by the engine.
//!
//! Everything here is plain data. Delivery (fan-out, transport, replay) is the
//! concern of whichever [`crate::env::EventSink`] the caller plugs in.

use std::fmt;

use crate::state::EntityId;

/// Health and threat notifications observed by UI, party frames and AI.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum CombatEvent {
    /// Fired after every health or shield mutation.
    HealthChanged {
        entity: EntityId,
        health_fraction: f32,
        /// `"current/max"`.
        text: String,
        /// Total remaining shield value.
        shield: u32,
    },
    /// Party-facing variant of `HealthChanged`.
    HealthChangedForGroup {
        entity: EntityId,
        health_fraction: f32,
    },
    /// Threat attributed to `source` by the combatant it hurt.
    ThreatGenerated {
        target: EntityId,
        source: EntityId,
        amount: u32,
    },
    /// Health crossed from positive to zero.
    HealthZero { entity: EntityId },
}

impl CombatEvent {
    /// Combatant the event is about.
    pub fn entity(&self) -> EntityId {
        match self {
            Self::HealthChanged { entity, .. }
            | Self::HealthChangedForGroup { entity, .. }
            | Self::HealthZero { entity } => *entity,
            Self::ThreatGenerated { target, .. } => *target,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::HealthChanged { .. } => "health_changed",
            Self::HealthChangedForGroup { .. } => "health_changed_for_group",
            Self::ThreatGenerated { .. } => "threat_generated",
            Self::HealthZero { .. } => "health_zero",
        }
    }
}

/// Typed messages for the AI subsystem. Pushed, never read back.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum AiMessage {
    /// A friendly ability landed; AI may treat the healer as a threat source.
    AbilityResolved {
        source: EntityId,
        target: EntityId,
        magnitude: u32,
    },
}

/// Floating text color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const YELLOW: Self = Self::rgb(255, 235, 4);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threat_event_is_about_the_target() {
        let event = CombatEvent::ThreatGenerated {
            target: EntityId(2),
            source: EntityId(1),
            amount: 60,
        };

        assert_eq!(event.entity(), EntityId(2));
        assert_eq!(event.kind(), "threat_generated");
    }

    #[test]
    fn color_formats_as_hex() {
        assert_eq!(Color::RED.to_string(), "#ff0000");
    }
}
