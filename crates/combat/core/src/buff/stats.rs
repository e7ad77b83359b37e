//! Stat aggregation over active buffs.
//!
//! Effective stats are recomputed from the base values and every active
//! non-shield buff whenever the buff list changes. Nothing is accumulated
//! incrementally, so removing a buff can never leave residue behind.

use super::instance::BuffInstance;

/// Base stats of a combatant before buffs.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BaseStats {
    pub movement_speed: f32,
    pub attack_speed: f32,
    /// Surviving multiplier applied to incoming damage (1.0 = no mitigation).
    pub mitigation: f32,
    /// Fraction added to outgoing ability amounts.
    pub damage_increase: f32,
}

impl BaseStats {
    pub const NEUTRAL: Self = Self {
        movement_speed: 1.0,
        attack_speed: 1.0,
        mitigation: 1.0,
        damage_increase: 0.0,
    };

    pub fn with_mitigation(mut self, mitigation: f32) -> Self {
        self.mitigation = mitigation;
        self
    }
}

impl Default for BaseStats {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Stats after every active non-shield buff has been folded in.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectiveStats {
    pub movement_speed: f32,
    pub attack_speed: f32,
    pub mitigation: f32,
    pub damage_increase: f32,
}

impl EffectiveStats {
    /// Folds buff deltas onto `base`.
    ///
    /// ```text
    /// movement_speed  = base × Π(1 + Δmove)
    /// attack_speed    = base × Π(1 + Δattack)
    /// mitigation      = base × Π(1 − Δmitigation)      (clamped at 0)
    /// damage_increase = base + ΣΔincrease
    /// ```
    pub fn aggregate<'a>(
        base: &BaseStats,
        buffs: impl IntoIterator<Item = &'a BuffInstance>,
    ) -> Self {
        let mut stats = Self {
            movement_speed: base.movement_speed,
            attack_speed: base.attack_speed,
            mitigation: base.mitigation,
            damage_increase: base.damage_increase,
        };

        for buff in buffs {
            let definition = buff.definition();
            if definition.is_shield() {
                continue;
            }
            let deltas = definition.deltas;
            stats.movement_speed *= 1.0 + deltas.movement_speed;
            stats.attack_speed *= 1.0 + deltas.attack_speed;
            stats.mitigation *= 1.0 - deltas.damage_mitigation;
            stats.damage_increase += deltas.damage_increase;
        }

        stats.movement_speed = stats.movement_speed.max(0.0);
        stats.attack_speed = stats.attack_speed.max(0.0);
        stats.mitigation = stats.mitigation.max(0.0);
        stats
    }
}

impl From<BaseStats> for EffectiveStats {
    fn from(base: BaseStats) -> Self {
        Self::aggregate(&base, [] as [&BuffInstance; 0])
    }
}

impl Default for EffectiveStats {
    fn default() -> Self {
        BaseStats::NEUTRAL.into()
    }
}
