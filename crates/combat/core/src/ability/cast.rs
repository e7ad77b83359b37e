//! Cast-side timers: in-progress casts and cooldowns.
//!
//! Both are plain accumulated time compared against a threshold, advanced by
//! the engine once per step.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::state::EntityId;

use super::definition::AbilityDefinition;

/// A cast that has started but not yet completed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastState {
    ability: Arc<AbilityDefinition>,
    target: EntityId,
    elapsed: f32,
}

impl CastState {
    pub fn new(ability: Arc<AbilityDefinition>, target: EntityId) -> Self {
        Self {
            ability,
            target,
            elapsed: 0.0,
        }
    }

    pub fn ability(&self) -> &Arc<AbilityDefinition> {
        &self.ability
    }

    pub fn target(&self) -> EntityId {
        self.target
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Cast bar fill in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.ability.cast_time <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.ability.cast_time).min(1.0)
    }

    /// Adds time; returns true once the cast time is reached.
    pub fn advance(&mut self, elapsed: f32) -> bool {
        self.elapsed += elapsed.max(0.0);
        self.elapsed >= self.ability.cast_time
    }
}

/// Remaining cooldown per ability name.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cooldowns {
    remaining: BTreeMap<String, f32>,
}

impl Cooldowns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds until `ability` is ready again (0 when ready).
    pub fn remaining(&self, ability: &str) -> f32 {
        self.remaining.get(ability).copied().unwrap_or(0.0)
    }

    pub fn is_ready(&self, ability: &str) -> bool {
        self.remaining(ability) <= 0.0
    }

    pub fn start(&mut self, ability: &AbilityDefinition) {
        if ability.cooldown > 0.0 {
            self.remaining.insert(ability.name.clone(), ability.cooldown);
        }
    }

    pub fn tick(&mut self, elapsed: f32) {
        let elapsed = elapsed.max(0.0);
        self.remaining.retain(|_, left| {
            *left -= elapsed;
            *left > 0.0
        });
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::{AbilityCategory, TargetingMode};

    #[test]
    fn cooldown_counts_down_and_clears() {
        let bolt = AbilityDefinition::new("Bolt", AbilityCategory::Damage, TargetingMode::Enemy)
            .with_cooldown(3.0);
        let mut cooldowns = Cooldowns::new();

        cooldowns.start(&bolt);
        assert!(!cooldowns.is_ready("Bolt"));

        cooldowns.tick(2.0);
        assert_eq!(cooldowns.remaining("Bolt"), 1.0);

        cooldowns.tick(1.0);
        assert!(cooldowns.is_ready("Bolt"));
        assert!(cooldowns.is_empty());
    }

    #[test]
    fn cast_completes_at_cast_time() {
        let ability = Arc::new(
            AbilityDefinition::new("Heal", AbilityCategory::Heal, TargetingMode::Friend)
                .with_cast_time(1.5),
        );
        let mut cast = CastState::new(ability, EntityId(2));

        assert!(!cast.advance(1.0));
        assert!((cast.progress() - 2.0 / 3.0).abs() < 1e-6);
        assert!(cast.advance(0.5));
    }
}
