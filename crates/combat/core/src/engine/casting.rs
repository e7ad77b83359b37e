//! Casting: validation, cast bars, cooldowns and movement.

use std::sync::Arc;

use crate::ability::{AbilityDefinition, CastState};
use crate::env::CombatEnv;
use crate::state::{AbilityInstanceId, EntityId, Position};

use super::{CastError, CombatEngine, EngineError, StepSummary};

/// What [`CombatEngine::begin_cast`] did with an accepted request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CastOutcome {
    /// A cast bar started; the ability spawns when it fills.
    Started,
    /// Instant cast: the ability was spawned immediately.
    Completed(AbilityInstanceId),
}

impl CombatEngine<'_> {
    /// Validates and starts a cast.
    ///
    /// Checks run in a fixed order and the first failure is returned:
    /// caster alive, not already casting, off cooldown, enough resource,
    /// valid target, in range, not moving (unless the ability allows it).
    /// A rejected request changes nothing.
    pub fn begin_cast(
        &mut self,
        env: &CombatEnv<'_>,
        caster: EntityId,
        ability: Arc<AbilityDefinition>,
        target: EntityId,
    ) -> Result<CastOutcome, EngineError> {
        self.ensure_authority()?;
        let target = self.validate_cast(caster, &ability, target)?;

        if ability.is_instant_cast() {
            let id = self.complete_cast(env, caster, ability, target)?;
            return Ok(CastOutcome::Completed(id));
        }

        *self.combatant_mut(caster)?.cast_mut() = Some(CastState::new(ability, target));
        Ok(CastOutcome::Started)
    }

    /// Drops the caster's cast in progress, if any.
    pub fn cancel_cast(&mut self, caster: EntityId) -> Result<Option<CastState>, EngineError> {
        self.ensure_authority()?;
        Ok(self.combatant_mut(caster)?.cast_mut().take())
    }

    /// Records whether `id` is moving. Starting to move cancels a cast that
    /// cannot be kept up on the move; returns true in that case.
    pub fn set_moving(&mut self, id: EntityId, moving: bool) -> Result<bool, EngineError> {
        self.ensure_authority()?;
        let combatant = self.combatant_mut(id)?;
        combatant.set_moving(moving);

        let breaks_cast = moving
            && combatant
                .cast()
                .is_some_and(|cast| !cast.ability().is_castable_while_moving());
        if breaks_cast {
            combatant.cast_mut().take();
        }
        Ok(breaks_cast)
    }

    pub fn move_combatant(&mut self, id: EntityId, position: Position) -> Result<(), EngineError> {
        self.ensure_authority()?;
        self.combatant_mut(id)?.set_position(position);
        Ok(())
    }

    pub(super) fn interrupt_cast(&mut self, target: EntityId) {
        if let Some(combatant) = self.state.combatant_mut(target) {
            combatant.cast_mut().take();
        }
    }

    /// Ticks cooldowns and cast bars; completed casts spawn their ability.
    pub(super) fn advance_casts(
        &mut self,
        env: &CombatEnv<'_>,
        elapsed: f32,
        summary: &mut StepSummary,
    ) {
        for id in self.state.combatant_ids() {
            let Some(combatant) = self.state.combatant_mut(id) else {
                continue;
            };
            combatant.cooldowns_mut().tick(elapsed);

            let finished = combatant
                .cast_mut()
                .as_mut()
                .is_some_and(|cast| cast.advance(elapsed));
            if !finished {
                continue;
            }
            let Some(cast) = combatant.cast_mut().take() else {
                continue;
            };

            let alive = !combatant.is_dead();
            let spawned = alive
                && self.state.contains(cast.target())
                && self
                    .complete_cast(env, id, Arc::clone(cast.ability()), cast.target())
                    .is_ok();
            if spawned {
                summary.casts_completed += 1;
            } else {
                summary.casts_dropped += 1;
            }
        }
    }

    /// Spends the cost, starts the cooldown and spawns the ability.
    fn complete_cast(
        &mut self,
        env: &CombatEnv<'_>,
        caster: EntityId,
        ability: Arc<AbilityDefinition>,
        target: EntityId,
    ) -> Result<AbilityInstanceId, EngineError> {
        let combatant = self.combatant_mut(caster)?;
        if !combatant.spend_resource(ability.resource_cost) {
            return Err(CastError::NotEnoughResource {
                required: ability.resource_cost,
                available: combatant.resource().current,
            }
            .into());
        }
        combatant.cooldowns_mut().start(&ability);
        self.spawn_ability(env, ability, caster, target)
    }

    /// Returns the resolved target on success.
    fn validate_cast(
        &self,
        caster: EntityId,
        ability: &AbilityDefinition,
        requested: EntityId,
    ) -> Result<EntityId, EngineError> {
        let source = self.combatant(caster)?;
        if source.is_dead() {
            return Err(CastError::CasterDead.into());
        }
        if let Some(cast) = source.cast() {
            return Err(CastError::AlreadyCasting {
                ability: cast.ability().name.clone(),
            }
            .into());
        }
        let cooldown = source.cooldowns().remaining(&ability.name);
        if cooldown > 0.0 {
            return Err(CastError::OnCooldown {
                ability: ability.name.clone(),
                remaining: cooldown,
            }
            .into());
        }
        let available = source.resource().current;
        if available < ability.resource_cost {
            return Err(CastError::NotEnoughResource {
                required: ability.resource_cost,
                available,
            }
            .into());
        }

        let target = if ability.is_only_self_cast() {
            caster
        } else {
            requested
        };
        if target == caster && !ability.allows_self_target() {
            return Err(CastError::InvalidTarget {
                ability: ability.name.clone(),
                target,
            }
            .into());
        }
        let destination = self.combatant(target)?;

        if ability.range > 0.0 && target != caster {
            let distance = source.position().distance(&destination.position());
            if distance > ability.range {
                return Err(CastError::OutOfRange {
                    distance,
                    range: ability.range,
                }
                .into());
            }
        }
        if source.is_moving() && !ability.is_castable_while_moving() {
            return Err(CastError::Moving {
                ability: ability.name.clone(),
            }
            .into());
        }
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::{AbilityCategory, AbilityFlags, TargetingMode};
    use crate::config::CombatConfig;
    use crate::env::recorder::Recorder;
    use crate::state::{CombatState, Combatant};

    const MAGE: EntityId = EntityId(1);
    const DUMMY: EntityId = EntityId(2);

    fn range_setup() -> CombatState {
        let mut state = CombatState::new(CombatConfig::default());
        state.insert_combatant(Combatant::new(MAGE, 100).with_resource(50));
        state.insert_combatant(
            Combatant::new(DUMMY, 200).with_position(Position::new(10.0, 0.0, 0.0)),
        );
        state
    }

    fn fireball() -> Arc<AbilityDefinition> {
        Arc::new(
            AbilityDefinition::new("Fireball", AbilityCategory::Damage, TargetingMode::Enemy)
                .with_amount(40)
                .with_resource_cost(20)
                .with_cast_time(2.0)
                .with_cooldown(4.0)
                .with_range(30.0),
        )
    }

    fn cast_error(result: Result<CastOutcome, EngineError>) -> Option<&'static str> {
        match result {
            Err(EngineError::Cast(error)) => Some(error.as_str()),
            _ => None,
        }
    }

    #[test]
    fn cast_completes_then_spends_and_cools_down() {
        let mut state = range_setup();
        let recorder = Recorder::default();
        let env = CombatEnv::uniform(&recorder);
        let mut engine = CombatEngine::authoritative(&mut state);

        let outcome = engine.begin_cast(&env, MAGE, fireball(), DUMMY).unwrap();
        assert_eq!(outcome, CastOutcome::Started);

        let first = engine.step(&env, 1.0).unwrap();
        assert_eq!(first.casts_completed, 0);
        assert_eq!(
            engine.state().combatant(MAGE).map(|c| c.resource().current),
            Some(50)
        );

        let second = engine.step(&env, 1.0).unwrap();
        assert_eq!(second.casts_completed, 1);
        assert_eq!(second.abilities_resolved, 1);

        let mage = engine.state().combatant(MAGE).unwrap();
        assert_eq!(mage.resource().current, 30);
        assert_eq!(mage.cooldowns().remaining("Fireball"), 4.0);
        assert!(!mage.is_casting());
        assert_eq!(
            engine.state().combatant(DUMMY).map(|c| c.health().current),
            Some(160)
        );
        assert_eq!(recorder.threat(), vec![(MAGE, 40)]);
    }

    #[test]
    fn validation_order_reports_first_failure() {
        let mut state = range_setup();
        let env = CombatEnv::silent();
        let mut engine = CombatEngine::authoritative(&mut state);

        engine.begin_cast(&env, MAGE, fireball(), DUMMY).unwrap();
        assert_eq!(
            cast_error(engine.begin_cast(&env, MAGE, fireball(), DUMMY)),
            Some("already_casting")
        );

        engine.step(&env, 2.0).unwrap();
        assert_eq!(
            cast_error(engine.begin_cast(&env, MAGE, fireball(), DUMMY)),
            Some("on_cooldown")
        );

        let expensive = Arc::new(
            AbilityDefinition::new("Meteor", AbilityCategory::Damage, TargetingMode::Enemy)
                .with_resource_cost(31),
        );
        assert_eq!(
            cast_error(engine.begin_cast(&env, MAGE, expensive, DUMMY)),
            Some("not_enough_resource")
        );

        let short = Arc::new(
            AbilityDefinition::new("Touch", AbilityCategory::Damage, TargetingMode::Enemy)
                .with_range(5.0),
        );
        assert_eq!(
            cast_error(engine.begin_cast(&env, MAGE, short.clone(), MAGE)),
            Some("invalid_target")
        );
        assert_eq!(
            cast_error(engine.begin_cast(&env, MAGE, short, DUMMY)),
            Some("out_of_range")
        );
    }

    #[test]
    fn cancelled_cast_spends_nothing_and_never_lands() {
        let mut state = range_setup();
        let recorder = Recorder::default();
        let env = CombatEnv::uniform(&recorder);
        let mut engine = CombatEngine::authoritative(&mut state);

        engine.begin_cast(&env, MAGE, fireball(), DUMMY).unwrap();
        engine.step(&env, 1.0).unwrap();

        let cancelled = engine.cancel_cast(MAGE).unwrap();
        assert_eq!(
            cancelled.map(|cast| (cast.ability().name.clone(), cast.target())),
            Some(("Fireball".to_string(), DUMMY))
        );

        let summary = engine.step(&env, 2.0).unwrap();
        assert_eq!(summary.casts_completed, 0);

        let mage = engine.state().combatant(MAGE).unwrap();
        assert!(!mage.is_casting());
        assert_eq!(mage.resource().current, 50);
        assert!(mage.cooldowns().is_ready("Fireball"));
        assert_eq!(
            engine.state().combatant(DUMMY).map(|c| c.health().current),
            Some(200)
        );
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn cancel_without_cast_is_a_no_op() {
        let mut state = range_setup();
        let before = state.clone();
        let mut engine = CombatEngine::authoritative(&mut state);

        assert_eq!(engine.cancel_cast(MAGE), Ok(None));
        assert_eq!(
            engine.cancel_cast(EntityId(42)),
            Err(EngineError::UnknownCombatant(EntityId(42)))
        );
        assert_eq!(state, before);
    }

    #[test]
    fn moving_blocks_and_breaks_cast_bars() {
        let mut state = range_setup();
        let env = CombatEnv::silent();
        let mut engine = CombatEngine::authoritative(&mut state);

        engine.begin_cast(&env, MAGE, fireball(), DUMMY).unwrap();
        assert!(engine.set_moving(MAGE, true).unwrap());
        assert!(!engine.state().combatant(MAGE).unwrap().is_casting());

        assert_eq!(
            cast_error(engine.begin_cast(&env, MAGE, fireball(), DUMMY)),
            Some("moving")
        );

        let mobile = Arc::new(
            AbilityDefinition::new("Frostbolt", AbilityCategory::Damage, TargetingMode::Enemy)
                .with_cast_time(1.5)
                .with_flags(AbilityFlags::CASTABLE_WHILE_MOVING),
        );
        assert_eq!(
            engine.begin_cast(&env, MAGE, mobile, DUMMY),
            Ok(CastOutcome::Started)
        );
    }

    #[test]
    fn instant_self_cast_spawns_immediately() {
        let mut state = range_setup();
        let env = CombatEnv::silent();
        let mut engine = CombatEngine::authoritative(&mut state);
        let ward = Arc::new(
            AbilityDefinition::new("Ward", AbilityCategory::Shield, TargetingMode::Friend)
                .with_flags(AbilityFlags::ONLY_SELF_CAST)
                .with_resource_cost(10),
        );

        let outcome = engine.begin_cast(&env, MAGE, ward, DUMMY).unwrap();

        let CastOutcome::Completed(id) = outcome else {
            panic!("expected an instant cast, got {outcome:?}");
        };
        assert_eq!(engine.state().ability(id).map(|i| i.target()), Some(MAGE));
        assert_eq!(
            engine.state().combatant(MAGE).map(|c| c.resource().current),
            Some(40)
        );
    }

    #[test]
    fn interrupt_cancels_target_cast() {
        let mut state = range_setup();
        let env = CombatEnv::silent();
        let mut engine = CombatEngine::authoritative(&mut state);
        engine.begin_cast(&env, MAGE, fireball(), DUMMY).unwrap();
        let kick = Arc::new(
            AbilityDefinition::new("Kick", AbilityCategory::Interrupt, TargetingMode::Enemy),
        );

        engine.spawn_ability(&env, kick, DUMMY, MAGE).unwrap();
        let summary = engine.step(&env, 0.5).unwrap();

        assert_eq!(summary.abilities_resolved, 1);
        assert!(!engine.state().combatant(MAGE).unwrap().is_casting());
        assert_eq!(
            engine.state().combatant(MAGE).map(|c| c.resource().current),
            Some(50)
        );
    }
}
