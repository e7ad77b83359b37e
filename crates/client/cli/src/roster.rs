//! Duel participants and their priority rotations.
use std::sync::Arc;

use anyhow::Result;
use combat_content::AbilityRegistry;
use combat_core::{AbilityCategory, AbilityDefinition, CombatState, Combatant, EntityId, Position};

pub const MAGE: EntityId = EntityId(1);
pub const KNIGHT: EntityId = EntityId(2);
pub const CLERIC: EntityId = EntityId(3);

/// Display name for a duel participant.
pub fn name_of(id: EntityId) -> &'static str {
    match id {
        MAGE => "Mage",
        KNIGHT => "Knight",
        CLERIC => "Cleric",
        _ => "Unknown",
    }
}

/// One ability a participant tries, together with who it is aimed at.
#[derive(Clone, Debug)]
pub struct Move {
    pub ability: Arc<AbilityDefinition>,
    pub target: EntityId,
}

/// Priority list walked top to bottom every step.
#[derive(Clone, Debug)]
pub struct Rotation {
    pub caster: EntityId,
    pub moves: Vec<Move>,
}

impl Rotation {
    /// First move that would pass the cast checks against `state`.
    pub fn next_move(&self, state: &CombatState) -> Option<&Move> {
        let caster = state.combatant(self.caster)?;
        if caster.is_dead() || caster.is_casting() {
            return None;
        }

        self.moves.iter().find(|candidate| {
            let ability = &candidate.ability;
            let Some(target) = state.combatant(candidate.target) else {
                return false;
            };

            caster.cooldowns().is_ready(&ability.name)
                && caster.resource().current >= ability.resource_cost
                && !target.is_dead()
                && worth_casting(ability, target)
        })
    }
}

/// Skips heals and shields nobody needs right now.
fn worth_casting(ability: &AbilityDefinition, target: &Combatant) -> bool {
    match ability.category {
        AbilityCategory::Heal | AbilityCategory::HealOverTime => target.health_fraction() < 0.8,
        AbilityCategory::Shield => target.total_shield() == 0,
        _ => true,
    }
}

/// Combatants and rotations of the scripted three-way duel.
pub struct Roster {
    pub combatants: Vec<Combatant>,
    pub rotations: Vec<Rotation>,
}

impl Roster {
    /// A mage facing a knight with a cleric behind him.
    pub fn arena(abilities: &AbilityRegistry) -> Result<Self> {
        let aim = |name: &str, target: EntityId| -> Result<Move> {
            Ok(Move {
                ability: abilities.require(name)?,
                target,
            })
        };

        let combatants = vec![
            Combatant::new(MAGE, 300).with_resource(200),
            Combatant::new(KNIGHT, 420)
                .with_resource(100)
                .with_mitigation(0.8)
                .with_position(Position::new(4.0, 0.0, 0.0)),
            Combatant::new(CLERIC, 250)
                .with_resource(300)
                .with_position(Position::new(10.0, 0.0, 0.0)),
        ];

        let rotations = vec![
            Rotation {
                caster: MAGE,
                moves: vec![
                    aim("Ward", MAGE)?,
                    aim("Empower", MAGE)?,
                    aim("Poison", KNIGHT)?,
                    aim("Frostbolt", KNIGHT)?,
                    aim("Fireball", KNIGHT)?,
                ],
            },
            Rotation {
                caster: KNIGHT,
                moves: vec![aim("Kick", MAGE)?, aim("Taunt", MAGE)?, aim("Poison", MAGE)?],
            },
            Rotation {
                caster: CLERIC,
                moves: vec![aim("Heal", KNIGHT)?, aim("Renew", KNIGHT)?],
            },
        ];

        Ok(Self {
            combatants,
            rotations,
        })
    }
}
