//! Live buff applications and their time progression.

use crate::state::{BuffInstanceId, EntityId};

use super::definition::{BuffDefinition, BuffEffect, BuffKind};

/// Polarity of a periodic effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum PeriodicKind {
    Damage,
    Heal,
}

/// Amount released by one periodic tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeriodicTick {
    pub kind: PeriodicKind,
    pub amount: u32,
}

/// Mutable per-variant progress of a buff instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuffProgress {
    Stat,
    /// Amount released so far.
    Periodic { applied: u32 },
    /// Absorption left before the shield breaks.
    Shield { remaining: u32 },
}

/// One active application of a [`BuffDefinition`] on a combatant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuffInstance {
    id: BuffInstanceId,
    definition: BuffDefinition,
    /// Combatant that applied the buff, used for threat attribution.
    owner: EntityId,
    /// Threat multiplier inherited from the applying ability.
    threat_modifier: f32,
    elapsed: f32,
    progress: BuffProgress,
}

impl BuffInstance {
    pub fn new(
        id: BuffInstanceId,
        definition: BuffDefinition,
        owner: EntityId,
        threat_modifier: f32,
    ) -> Self {
        let progress = match definition.effect {
            BuffEffect::Stat => BuffProgress::Stat,
            BuffEffect::DamageOverTime { .. } | BuffEffect::HealOverTime { .. } => {
                BuffProgress::Periodic { applied: 0 }
            }
            BuffEffect::Shield { capacity } => BuffProgress::Shield {
                remaining: capacity,
            },
        };

        Self {
            id,
            definition,
            owner,
            threat_modifier,
            elapsed: 0.0,
            progress,
        }
    }

    pub fn id(&self) -> BuffInstanceId {
        self.id
    }

    pub fn definition(&self) -> &BuffDefinition {
        &self.definition
    }

    pub fn kind(&self) -> BuffKind {
        self.definition.kind()
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub fn threat_modifier(&self) -> f32 {
        self.threat_modifier
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn progress(&self) -> BuffProgress {
        self.progress
    }

    /// Advances the buff by `elapsed` seconds.
    ///
    /// Periodic variants release `floor(total * elapsed / duration)` minus what
    /// was already released; the step that reaches the duration releases the
    /// exact remainder, so the released amounts always sum to `total`.
    pub fn tick(&mut self, elapsed: f32) -> Option<PeriodicTick> {
        debug_assert!(elapsed >= 0.0, "buff time must not run backwards");
        self.elapsed += elapsed.max(0.0);

        let (kind, total) = match self.definition.effect {
            BuffEffect::DamageOverTime { total } => (PeriodicKind::Damage, total),
            BuffEffect::HealOverTime { total } => (PeriodicKind::Heal, total),
            BuffEffect::Stat | BuffEffect::Shield { .. } => return None,
        };
        let BuffProgress::Periodic { applied } = &mut self.progress else {
            return None;
        };

        let due = periodic_due(total, self.elapsed, self.definition.duration);
        let amount = due.saturating_sub(*applied);
        *applied = (*applied).max(due);

        (amount > 0).then_some(PeriodicTick { kind, amount })
    }

    /// True once elapsed time reached the template duration.
    pub fn is_expired(&self) -> bool {
        self.elapsed >= self.definition.duration
    }

    /// True for a shield with nothing left to absorb.
    pub fn is_depleted(&self) -> bool {
        matches!(self.progress, BuffProgress::Shield { remaining: 0 })
    }

    /// Expired by time or, for shields, broken.
    pub fn should_remove(&self) -> bool {
        self.is_expired() || self.is_depleted()
    }

    /// Remaining absorption, `None` for non-shield variants.
    pub fn remaining_shield(&self) -> Option<u32> {
        match self.progress {
            BuffProgress::Shield { remaining } => Some(remaining),
            _ => None,
        }
    }

    pub(crate) fn set_remaining_shield(&mut self, value: u32) {
        if let BuffProgress::Shield { remaining } = &mut self.progress {
            debug_assert!(value <= *remaining, "shields only ever lose absorption");
            *remaining = value;
        }
    }
}

fn periodic_due(total: u32, elapsed: f32, duration: f32) -> u32 {
    if duration <= 0.0 || elapsed >= duration {
        return total;
    }
    let share = f64::from(total) * f64::from(elapsed) / f64::from(duration);
    // Absorb float noise such as 19.999999 for an exact 20.
    ((share + 1e-6).floor() as u32).min(total)
}
