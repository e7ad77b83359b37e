//! Immutable buff templates.

/// Category tag of a buff template.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BuffKind {
    /// Pure stat modifier.
    Buff,
    /// Periodic damage.
    DamageOverTime,
    /// Periodic healing.
    HealOverTime,
    /// Damage absorption.
    Shield,
}

/// Stat deltas contributed by an active (non-shield) buff.
///
/// - `movement_speed` / `attack_speed`: fractional change, applied as `× (1 + delta)`
/// - `damage_mitigation`: fraction of incoming damage removed, applied as `× (1 - delta)`
///   to the surviving multiplier
/// - `damage_increase`: fraction added to outgoing ability amounts
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatDeltas {
    pub movement_speed: f32,
    pub attack_speed: f32,
    pub damage_mitigation: f32,
    pub damage_increase: f32,
}

impl StatDeltas {
    pub const NONE: Self = Self {
        movement_speed: 0.0,
        attack_speed: 0.0,
        damage_mitigation: 0.0,
        damage_increase: 0.0,
    };

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

/// Variant-specific payload of a buff template.
///
/// Periodic totals and shield capacity only exist on the variants that use
/// them, so a shield can never carry a tick budget and vice versa.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuffEffect {
    /// Stat deltas only.
    #[default]
    Stat,
    /// Deals `total` damage spread evenly over the duration.
    DamageOverTime { total: u32 },
    /// Heals `total` spread evenly over the duration.
    HealOverTime { total: u32 },
    /// Absorbs up to `capacity` incoming damage.
    Shield { capacity: u32 },
}

/// Immutable buff template attached to an ability.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BuffDefinition {
    /// Lifetime in seconds.
    pub duration: f32,
    pub deltas: StatDeltas,
    pub effect: BuffEffect,
}

impl BuffDefinition {
    /// Stat-only buff.
    pub fn stat(duration: f32, deltas: StatDeltas) -> Self {
        Self {
            duration,
            deltas,
            effect: BuffEffect::Stat,
        }
    }

    pub fn damage_over_time(duration: f32, total: u32) -> Self {
        Self {
            duration,
            deltas: StatDeltas::NONE,
            effect: BuffEffect::DamageOverTime { total },
        }
    }

    pub fn heal_over_time(duration: f32, total: u32) -> Self {
        Self {
            duration,
            deltas: StatDeltas::NONE,
            effect: BuffEffect::HealOverTime { total },
        }
    }

    pub fn shield(duration: f32, capacity: u32) -> Self {
        Self {
            duration,
            deltas: StatDeltas::NONE,
            effect: BuffEffect::Shield { capacity },
        }
    }

    pub fn with_deltas(mut self, deltas: StatDeltas) -> Self {
        self.deltas = deltas;
        self
    }

    pub fn kind(&self) -> BuffKind {
        match self.effect {
            BuffEffect::Stat => BuffKind::Buff,
            BuffEffect::DamageOverTime { .. } => BuffKind::DamageOverTime,
            BuffEffect::HealOverTime { .. } => BuffKind::HealOverTime,
            BuffEffect::Shield { .. } => BuffKind::Shield,
        }
    }

    pub fn is_shield(&self) -> bool {
        matches!(self.effect, BuffEffect::Shield { .. })
    }

    pub fn is_periodic(&self) -> bool {
        matches!(
            self.effect,
            BuffEffect::DamageOverTime { .. } | BuffEffect::HealOverTime { .. }
        )
    }
}
