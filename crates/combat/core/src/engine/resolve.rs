//! Ability runtime: spawning, travel and effect resolution.

use std::sync::Arc;

use crate::ability::{
    AbilityCategory, AbilityDefinition, AbilityInstance, AbilityPhase, TargetingMode,
};
use crate::env::CombatEnv;
use crate::events::AiMessage;
use crate::state::{AbilityInstanceId, EntityId};

use super::{CombatEngine, EngineError, StepSummary};

impl CombatEngine<'_> {
    /// Creates an ability instance at the caster's position.
    ///
    /// The outgoing amount is fixed here from the caster's current damage
    /// increase.
    pub fn spawn_ability(
        &mut self,
        env: &CombatEnv<'_>,
        definition: Arc<AbilityDefinition>,
        caster: EntityId,
        target: EntityId,
    ) -> Result<AbilityInstanceId, EngineError> {
        self.ensure_authority()?;
        self.combatant(target)?;
        let source = self.combatant(caster)?;
        let origin = source.position();
        let amount = definition.scaled_amount(source.stats().damage_increase);

        let id = self.state.allocate_ability_id();
        let instance = AbilityInstance::new(id, definition, caster, target, origin, amount);
        env.spawner().spawn_ability(&instance);
        self.state.abilities_mut().push(instance);
        Ok(id)
    }

    /// Moves every in-flight instance, resolves arrivals and cleans up.
    pub(super) fn advance_abilities(
        &mut self,
        env: &CombatEnv<'_>,
        elapsed: f32,
        summary: &mut StepSummary,
    ) {
        let threshold = self.config().arrival_threshold;
        let mut instances = std::mem::take(self.state.abilities_mut());

        for instance in instances.iter_mut() {
            let Some(target) = self.state.combatant(instance.target()) else {
                instance.finish();
                summary.abilities_discarded += 1;
                continue;
            };
            instance.advance(target.position(), elapsed, threshold);
            if instance.phase() != AbilityPhase::Resolving {
                continue;
            }

            if !self.state.contains(instance.caster()) {
                instance.finish();
                summary.abilities_discarded += 1;
                continue;
            }

            match self.resolve_effect(env, instance) {
                Ok(()) => summary.abilities_resolved += 1,
                Err(_) => summary.abilities_discarded += 1,
            }
            if let Some(buff) = instance.definition().buff {
                let attached = self.add_buff(
                    env,
                    instance.target(),
                    instance.caster(),
                    buff,
                    instance.definition().threat_modifier,
                );
                if attached.is_err() {
                    summary.buffs_rejected += 1;
                }
            }
            instance.finish();
        }

        let (finished, mut active): (Vec<_>, Vec<_>) =
            instances.into_iter().partition(AbilityInstance::is_finished);
        for instance in &finished {
            env.spawner().despawn_ability(instance.id());
        }
        active.append(self.state.abilities_mut());
        *self.state.abilities_mut() = active;
    }

    /// Applies the immediate effect of an arrived ability.
    ///
    /// - friendly with a positive amount: heal, then tell the AI
    /// - anything else with a positive amount: damage, then threat
    /// - interrupt: signal the target and cancel its cast
    /// - taunt: force the target onto the caster
    fn resolve_effect(
        &mut self,
        env: &CombatEnv<'_>,
        instance: &AbilityInstance,
    ) -> Result<(), EngineError> {
        let definition = instance.definition();
        let caster = instance.caster();
        let target = instance.target();
        let amount = instance.amount();

        if amount > 0 {
            if definition.targeting == TargetingMode::Friend {
                self.gain_health(env, target, amount)?;
                env.ai().post(AiMessage::AbilityResolved {
                    source: caster,
                    target,
                    magnitude: amount,
                });
            } else {
                self.take_damage(env, target, amount)?;
                self.attribute_threat(env, target, caster, amount, definition.threat_modifier)?;
            }
        }

        match definition.category {
            AbilityCategory::Interrupt => {
                env.behavior().interrupt(target);
                self.interrupt_cast(target);
            }
            AbilityCategory::Taunt => {
                let duration = self.config().taunt_duration;
                env.behavior().set_taunt(target, caster, duration);
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buff::BuffDefinition;
    use crate::config::CombatConfig;
    use crate::env::recorder::{Recorder, Signal};
    use crate::events::CombatEvent;
    use crate::state::{CombatState, Combatant, Position};

    const PRIEST: EntityId = EntityId(1);
    const KNIGHT: EntityId = EntityId(2);
    const OGRE: EntityId = EntityId(3);

    fn party() -> CombatState {
        let mut state = CombatState::new(CombatConfig::default());
        state.insert_combatant(Combatant::new(PRIEST, 80));
        state.insert_combatant(Combatant::new(KNIGHT, 120).with_health(50));
        state.insert_combatant(
            Combatant::new(OGRE, 300).with_position(Position::new(8.0, 0.0, 0.0)),
        );
        state
    }

    fn resolve(
        state: &mut CombatState,
        env: &CombatEnv<'_>,
        ability: AbilityDefinition,
        caster: EntityId,
        target: EntityId,
    ) {
        let mut engine = CombatEngine::authoritative(state);
        engine
            .spawn_ability(env, Arc::new(ability), caster, target)
            .unwrap();
        engine.step(env, 0.1).unwrap();
    }

    #[test]
    fn friendly_ability_heals_and_notifies_ai() {
        let mut state = party();
        let recorder = Recorder::default();
        let env = CombatEnv::uniform(&recorder);
        let heal = AbilityDefinition::new("Heal", AbilityCategory::Heal, TargetingMode::Friend)
            .with_amount(30);

        resolve(&mut state, &env, heal, PRIEST, KNIGHT);

        assert_eq!(state.combatant(KNIGHT).map(|c| c.health().current), Some(80));
        assert_eq!(
            recorder.messages.borrow().as_slice(),
            [AiMessage::AbilityResolved {
                source: PRIEST,
                target: KNIGHT,
                magnitude: 30,
            }]
        );
        assert!(recorder.threat().is_empty());
    }

    #[test]
    fn interrupt_signals_target_and_damages() {
        let mut state = party();
        let recorder = Recorder::default();
        let env = CombatEnv::uniform(&recorder);
        let kick = AbilityDefinition::new("Kick", AbilityCategory::Interrupt, TargetingMode::Enemy)
            .with_amount(12);

        resolve(&mut state, &env, kick, KNIGHT, OGRE);

        assert!(recorder.signals.borrow().contains(&Signal::Interrupt(OGRE)));
        assert_eq!(state.combatant(OGRE).map(|c| c.health().current), Some(288));
    }

    #[test]
    fn taunt_lasts_three_seconds_and_names_caster() {
        let mut state = party();
        let recorder = Recorder::default();
        let env = CombatEnv::uniform(&recorder);
        let taunt = AbilityDefinition::new("Taunt", AbilityCategory::Taunt, TargetingMode::Enemy);

        resolve(&mut state, &env, taunt, KNIGHT, OGRE);

        assert!(recorder.signals.borrow().contains(&Signal::Taunt {
            target: OGRE,
            source: KNIGHT,
            duration: 3.0,
        }));
        // No amount, so no damage and no threat.
        assert!(recorder.threat().is_empty());
        let health_changes = recorder
            .events()
            .into_iter()
            .filter(|event| matches!(event, CombatEvent::HealthChanged { .. }))
            .count();
        assert_eq!(health_changes, 0);
    }

    #[test]
    fn attached_buff_is_registered_after_the_effect() {
        let mut state = party();
        let recorder = Recorder::default();
        let env = CombatEnv::uniform(&recorder);
        let poison = AbilityDefinition::new(
            "Poison",
            AbilityCategory::DamageOverTime,
            TargetingMode::Enemy,
        )
        .with_threat_modifier(2.0)
        .with_buff(BuffDefinition::damage_over_time(4.0, 40));

        resolve(&mut state, &env, poison, PRIEST, OGRE);

        let buffs = state.combatant(OGRE).map(|c| c.buffs().to_vec()).unwrap_or_default();
        assert_eq!(buffs.len(), 1);
        assert_eq!(buffs[0].owner(), PRIEST);
        assert_eq!(buffs[0].threat_modifier(), 2.0);

        let signals = recorder.signals.borrow();
        let spawn = signals.iter().position(|s| matches!(s, Signal::SpawnBuff(OGRE, _)));
        let despawn = signals.iter().position(|s| matches!(s, Signal::DespawnAbility(_)));
        assert!(spawn < despawn);
    }

    #[test]
    fn damage_increase_scales_outgoing_amount() {
        let mut state = party();
        let env = CombatEnv::silent();
        let mut engine = CombatEngine::authoritative(&mut state);
        engine
            .add_buff(
                &env,
                PRIEST,
                PRIEST,
                BuffDefinition::stat(
                    30.0,
                    crate::buff::StatDeltas {
                        damage_increase: 0.5,
                        ..crate::buff::StatDeltas::NONE
                    },
                ),
                1.0,
            )
            .unwrap();
        let smite = AbilityDefinition::new("Smite", AbilityCategory::Damage, TargetingMode::Enemy)
            .with_amount(20);

        let id = engine
            .spawn_ability(&env, Arc::new(smite), PRIEST, OGRE)
            .unwrap();

        assert_eq!(engine.state().ability(id).map(|i| i.amount()), Some(30));
    }
}
