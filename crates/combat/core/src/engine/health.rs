//! Health pipeline: damage, healing and max-health changes.

use crate::env::CombatEnv;
use crate::events::{Color, CombatEvent};
use crate::state::{DamageApplied, EntityId};

use super::{CombatEngine, EngineError};

impl CombatEngine<'_> {
    /// Runs `raw` through mitigation and shields, then lowers health.
    ///
    /// Emits the damage text, `HealthChanged`/`HealthChangedForGroup`, a fade
    /// for every shield this hit depleted, and `HealthZero` when health
    /// crossed from positive to zero.
    pub fn take_damage(
        &mut self,
        env: &CombatEnv<'_>,
        target: EntityId,
        raw: u32,
    ) -> Result<DamageApplied, EngineError> {
        self.ensure_authority()?;
        let outcome = self.combatant_mut(target)?.apply_damage(raw);

        for shield in &outcome.depleted {
            env.spawner().despawn_buff(target, shield.id());
            env.presentation()
                .floating_text(target, "Shield faded", Color::YELLOW);
        }

        self.announce_health(env, target)?;
        if outcome.died {
            env.events().publish(CombatEvent::HealthZero { entity: target });
        }

        let text = if outcome.applied < raw {
            format!("{} ({} absorbed)", outcome.applied, raw - outcome.applied)
        } else {
            outcome.applied.to_string()
        };
        env.presentation().floating_text(target, &text, Color::RED);

        Ok(outcome)
    }

    /// Raises health by `amount` (clamped at max). Returns the amount added.
    pub fn gain_health(
        &mut self,
        env: &CombatEnv<'_>,
        target: EntityId,
        amount: u32,
    ) -> Result<u32, EngineError> {
        self.ensure_authority()?;
        let added = self.combatant_mut(target)?.apply_heal(amount);

        self.announce_health(env, target)?;
        env.presentation()
            .floating_text(target, &amount.to_string(), Color::YELLOW);

        Ok(added)
    }

    /// Changes max health, clamping current health into the new range.
    ///
    /// Clamping a living combatant down to zero publishes `HealthZero`.
    pub fn set_max_health(
        &mut self,
        env: &CombatEnv<'_>,
        target: EntityId,
        maximum: u32,
    ) -> Result<(), EngineError> {
        self.ensure_authority()?;
        let died = self.combatant_mut(target)?.set_max_health(maximum);
        self.announce_health(env, target)?;
        if died {
            env.events().publish(CombatEvent::HealthZero { entity: target });
        }
        Ok(())
    }

    pub(super) fn announce_health(
        &self,
        env: &CombatEnv<'_>,
        target: EntityId,
    ) -> Result<(), EngineError> {
        let combatant = self.combatant(target)?;
        let health_fraction = combatant.health_fraction();

        env.events().publish(CombatEvent::HealthChanged {
            entity: target,
            health_fraction,
            text: combatant.health_text(),
            shield: combatant.total_shield(),
        });
        env.events().publish(CombatEvent::HealthChangedForGroup {
            entity: target,
            health_fraction,
        });
        Ok(())
    }
}
