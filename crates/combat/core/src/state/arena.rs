use std::collections::BTreeMap;

use crate::ability::AbilityInstance;
use crate::config::CombatConfig;

use super::combatant::Combatant;
use super::common::{AbilityInstanceId, BuffInstanceId, EntityId};

/// Canonical snapshot of one combat simulation.
///
/// Combatants are keyed by id so iteration order is deterministic. Ability
/// instances are kept in spawn order and are exclusively owned here until
/// they finish.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatState {
    pub config: CombatConfig,
    combatants: BTreeMap<EntityId, Combatant>,
    abilities: Vec<AbilityInstance>,
    next_ability_id: u64,
    next_buff_id: u64,
    /// Simulated seconds since the state was created.
    elapsed: f64,
}

impl CombatState {
    pub fn new(config: CombatConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Adds or replaces a combatant, returning the previous one with that id.
    pub fn insert_combatant(&mut self, combatant: Combatant) -> Option<Combatant> {
        self.combatants.insert(combatant.id(), combatant)
    }

    /// Removes a combatant. In-flight work referencing it is dropped on the
    /// next step.
    pub fn remove_combatant(&mut self, id: EntityId) -> Option<Combatant> {
        self.combatants.remove(&id)
    }

    pub fn combatant(&self, id: EntityId) -> Option<&Combatant> {
        self.combatants.get(&id)
    }

    pub fn combatants(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.values()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.combatants.contains_key(&id)
    }

    pub fn abilities(&self) -> &[AbilityInstance] {
        &self.abilities
    }

    pub fn ability(&self, id: AbilityInstanceId) -> Option<&AbilityInstance> {
        self.abilities.iter().find(|instance| instance.id() == id)
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub(crate) fn combatant_mut(&mut self, id: EntityId) -> Option<&mut Combatant> {
        self.combatants.get_mut(&id)
    }

    pub(crate) fn combatant_ids(&self) -> Vec<EntityId> {
        self.combatants.keys().copied().collect()
    }

    pub(crate) fn abilities_mut(&mut self) -> &mut Vec<AbilityInstance> {
        &mut self.abilities
    }

    pub(crate) fn advance_clock(&mut self, elapsed: f32) {
        self.elapsed += f64::from(elapsed.max(0.0));
    }

    pub(crate) fn allocate_ability_id(&mut self) -> AbilityInstanceId {
        self.next_ability_id += 1;
        AbilityInstanceId(self.next_ability_id)
    }

    pub(crate) fn allocate_buff_id(&mut self) -> BuffInstanceId {
        self.next_buff_id += 1;
        BuffInstanceId(self.next_buff_id)
    }
}
