//! Buff engine: registration, removal and per-step ticking.

use crate::buff::{BuffDefinition, BuffInstance, PeriodicKind};
use crate::config::CombatConfig;
use crate::env::CombatEnv;
use crate::events::Color;
use crate::state::{BuffInstanceId, EntityId};

use super::{CombatEngine, EngineError, StepSummary};

impl CombatEngine<'_> {
    /// Attaches a new buff to `target`, behind every buff it already has.
    ///
    /// Shields are announced with `"Shield, <capacity>"` and a health update.
    pub fn add_buff(
        &mut self,
        env: &CombatEnv<'_>,
        target: EntityId,
        owner: EntityId,
        definition: BuffDefinition,
        threat_modifier: f32,
    ) -> Result<BuffInstanceId, EngineError> {
        self.ensure_authority()?;
        self.combatant(target)?;

        let id = self.state.allocate_buff_id();
        let instance = BuffInstance::new(id, definition, owner, threat_modifier);
        self.combatant_mut(target)?
            .push_buff(instance.clone())
            .map_err(|_| EngineError::BuffCapacity {
                entity: target,
                capacity: CombatConfig::MAX_BUFFS,
            })?;

        env.spawner().spawn_buff(target, &instance);
        if let Some(remaining) = instance.remaining_shield() {
            self.announce_health(env, target)?;
            env.presentation().floating_text(
                target,
                &format!("Shield, {remaining}"),
                Color::YELLOW,
            );
        }
        Ok(id)
    }

    /// Detaches a buff. Returns `None` when it was already gone.
    pub fn remove_buff(
        &mut self,
        env: &CombatEnv<'_>,
        target: EntityId,
        id: BuffInstanceId,
    ) -> Result<Option<BuffInstance>, EngineError> {
        self.ensure_authority()?;
        let removed = self.combatant_mut(target)?.take_buff(id);
        if let Some(buff) = &removed {
            self.announce_removal(env, target, buff)?;
        }
        Ok(removed)
    }

    /// Ticks every buff on every combatant, then sweeps finished ones.
    ///
    /// Periodic amounts go through the same damage and healing paths as a
    /// direct hit, so mitigation and shields apply identically.
    pub(super) fn advance_buffs(
        &mut self,
        env: &CombatEnv<'_>,
        elapsed: f32,
        summary: &mut StepSummary,
    ) -> Result<(), EngineError> {
        for id in self.state.combatant_ids() {
            let due = self.combatant_mut(id)?.tick_buffs(elapsed);

            for periodic in due {
                if !self.state.contains(periodic.owner) {
                    if self.combatant_mut(id)?.take_buff(periodic.buff).is_some() {
                        env.spawner().despawn_buff(id, periodic.buff);
                        summary.buffs_removed += 1;
                    }
                    continue;
                }

                let amount = periodic.tick.amount;
                match periodic.tick.kind {
                    PeriodicKind::Damage => {
                        self.take_damage(env, id, amount)?;
                        self.attribute_threat(
                            env,
                            id,
                            periodic.owner,
                            amount,
                            periodic.threat_modifier,
                        )?;
                    }
                    PeriodicKind::Heal => {
                        if !self.combatant(id)?.is_dead() {
                            self.gain_health(env, id, amount)?;
                        }
                    }
                }
            }

            let expired = self.combatant_mut(id)?.sweep_buffs();
            summary.buffs_removed += expired.len();
            for buff in &expired {
                self.announce_removal(env, id, buff)?;
            }
        }
        Ok(())
    }

    fn announce_removal(
        &self,
        env: &CombatEnv<'_>,
        target: EntityId,
        buff: &BuffInstance,
    ) -> Result<(), EngineError> {
        env.spawner().despawn_buff(target, buff.id());
        if buff.definition().is_shield() {
            self.announce_health(env, target)?;
            env.presentation()
                .floating_text(target, "Shield faded", Color::YELLOW);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buff::StatDeltas;
    use crate::env::recorder::{Recorder, Signal};
    use crate::events::CombatEvent;
    use crate::state::{CombatState, Combatant};

    const VICTIM: EntityId = EntityId(1);
    const CASTER: EntityId = EntityId(2);

    fn arena() -> CombatState {
        let mut state = CombatState::new(CombatConfig::default());
        state.insert_combatant(Combatant::new(VICTIM, 500));
        state.insert_combatant(Combatant::new(CASTER, 500));
        state
    }

    fn victim_health(state: &CombatState) -> u32 {
        state.combatant(VICTIM).map(|c| c.health().current).unwrap_or_default()
    }

    #[test]
    fn damage_over_time_applies_exact_total_in_five_steps() {
        let mut state = arena();
        let recorder = Recorder::default();
        let env = CombatEnv::uniform(&recorder);
        let mut engine = CombatEngine::authoritative(&mut state);
        engine
            .add_buff(&env, VICTIM, CASTER, BuffDefinition::damage_over_time(10.0, 100), 1.0)
            .unwrap();

        let mut losses = Vec::new();
        for _ in 0..5 {
            let before = victim_health(engine.state());
            engine.step(&env, 2.0).unwrap();
            losses.push(before - victim_health(engine.state()));
        }

        assert_eq!(losses, vec![20, 20, 20, 20, 20]);
        assert_eq!(losses.iter().sum::<u32>(), 100);
        assert!(engine.state().combatant(VICTIM).map(|c| c.buffs().is_empty()).unwrap());
        assert_eq!(
            recorder.threat(),
            vec![(CASTER, 20), (CASTER, 20), (CASTER, 20), (CASTER, 20), (CASTER, 20)]
        );
    }

    #[test]
    fn buff_is_present_at_four_seconds_and_gone_at_six() {
        let mut state = arena();
        let env = CombatEnv::silent();
        let mut engine = CombatEngine::authoritative(&mut state);
        let haste = BuffDefinition::stat(
            5.0,
            StatDeltas {
                movement_speed: 0.5,
                ..StatDeltas::NONE
            },
        );
        let id = engine.add_buff(&env, VICTIM, CASTER, haste, 1.0).unwrap();
        let present = |engine: &CombatEngine<'_>| {
            engine
                .state()
                .combatant(VICTIM)
                .and_then(|c| c.buff(id))
                .is_some()
        };

        engine.step(&env, 2.0).unwrap();
        engine.step(&env, 2.0).unwrap();
        assert!(present(&engine));

        let summary = engine.step(&env, 2.0).unwrap();
        assert!(!present(&engine));
        assert_eq!(summary.buffs_removed, 1);
        assert_eq!(
            engine.state().combatant(VICTIM).map(|c| c.stats().movement_speed),
            Some(1.0)
        );
    }

    #[test]
    fn periodic_damage_is_soaked_by_shields() {
        let mut state = arena();
        let env = CombatEnv::silent();
        let mut engine = CombatEngine::authoritative(&mut state);
        engine
            .add_buff(&env, VICTIM, CASTER, BuffDefinition::shield(60.0, 15), 1.0)
            .unwrap();
        engine
            .add_buff(&env, VICTIM, CASTER, BuffDefinition::damage_over_time(2.0, 40), 1.0)
            .unwrap();

        engine.step(&env, 1.0).unwrap();
        engine.step(&env, 1.0).unwrap();

        assert_eq!(victim_health(engine.state()), 475);
    }

    #[test]
    fn shield_announcements() {
        let mut state = arena();
        let recorder = Recorder::default();
        let env = CombatEnv::uniform(&recorder);
        let mut engine = CombatEngine::authoritative(&mut state);

        let id = engine
            .add_buff(&env, VICTIM, CASTER, BuffDefinition::shield(10.0, 50), 1.0)
            .unwrap();
        assert!(matches!(
            recorder.events().first(),
            Some(CombatEvent::HealthChanged { shield: 50, .. })
        ));

        let removed = engine.remove_buff(&env, VICTIM, id).unwrap();

        assert!(removed.is_some());
        assert_eq!(recorder.texts(), vec!["Shield, 50", "Shield faded"]);
        assert!(
            recorder
                .signals
                .borrow()
                .contains(&Signal::DespawnBuff(VICTIM, id))
        );
        assert_eq!(engine.remove_buff(&env, VICTIM, id).unwrap(), None);
    }

    #[test]
    fn periodic_buff_with_vanished_owner_is_dropped() {
        let mut state = arena();
        let recorder = Recorder::default();
        let env = CombatEnv::uniform(&recorder);
        CombatEngine::authoritative(&mut state)
            .add_buff(&env, VICTIM, CASTER, BuffDefinition::damage_over_time(4.0, 40), 1.0)
            .unwrap();
        state.remove_combatant(CASTER);
        recorder.clear();

        CombatEngine::authoritative(&mut state)
            .step(&env, 1.0)
            .unwrap();

        assert_eq!(victim_health(&state), 500);
        assert!(state.combatant(VICTIM).map(|c| c.buffs().is_empty()).unwrap());
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn heal_over_time_skips_dead_combatants() {
        let mut state = arena();
        let env = CombatEnv::silent();
        let mut engine = CombatEngine::authoritative(&mut state);
        engine.take_damage(&env, VICTIM, 500).unwrap();
        engine
            .add_buff(&env, VICTIM, CASTER, BuffDefinition::heal_over_time(2.0, 30), 1.0)
            .unwrap();

        engine.step(&env, 1.0).unwrap();
        engine.step(&env, 1.0).unwrap();

        assert_eq!(victim_health(engine.state()), 0);
    }

    #[test]
    fn full_buff_list_rejects_new_buffs() {
        let mut state = arena();
        let env = CombatEnv::silent();
        let mut engine = CombatEngine::authoritative(&mut state);
        for _ in 0..CombatConfig::MAX_BUFFS {
            engine
                .add_buff(&env, VICTIM, CASTER, BuffDefinition::shield(60.0, 1), 1.0)
                .unwrap();
        }

        let result = engine.add_buff(&env, VICTIM, CASTER, BuffDefinition::shield(60.0, 1), 1.0);

        assert_eq!(
            result,
            Err(EngineError::BuffCapacity {
                entity: VICTIM,
                capacity: CombatConfig::MAX_BUFFS,
            })
        );
    }
}
