//! Per-combatant state: health, resources, buffs and cast bookkeeping.

use arrayvec::{ArrayVec, CapacityError};

use crate::ability::{CastState, Cooldowns};
use crate::buff::{BaseStats, BuffInstance, EffectiveStats, PeriodicTick};
use crate::combat::{ShieldEntry, ShieldLedger, mitigate};
use crate::config::CombatConfig;

use super::common::{BuffInstanceId, EntityId, Position, ResourceMeter};

/// Active buffs of one combatant, oldest first.
pub type BuffList = ArrayVec<BuffInstance, { CombatConfig::MAX_BUFFS }>;

/// Result of applying one damage amount to a combatant.
#[derive(Clone, Debug, PartialEq)]
pub struct DamageApplied {
    /// Amount requested before mitigation.
    pub raw: u32,
    /// Amount that reached health.
    pub applied: u32,
    /// Amount soaked by shields.
    pub absorbed: u32,
    /// Shields depleted by this hit, already removed from the buff list.
    pub depleted: Vec<BuffInstance>,
    /// True only when health crossed from positive to zero.
    pub died: bool,
}

/// Periodic amount released by one buff during a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeriodicDue {
    pub buff: BuffInstanceId,
    pub owner: EntityId,
    pub threat_modifier: f32,
    pub tick: PeriodicTick,
}

/// Any entity with health, mitigation and a buff list.
///
/// Mutation is crate-private: outside callers go through
/// [`crate::engine::CombatEngine`], which enforces authority and emits events.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    id: EntityId,
    position: Position,
    moving: bool,
    health: ResourceMeter,
    resource: ResourceMeter,
    base: BaseStats,
    buffs: BuffList,
    /// Recomputed on every buff add/remove.
    stats: EffectiveStats,
    cast: Option<CastState>,
    cooldowns: Cooldowns,
}

impl Combatant {
    /// Creates a combatant at full health with no resource pool.
    pub fn new(id: EntityId, max_health: u32) -> Self {
        let base = BaseStats::default();
        Self {
            id,
            position: Position::ORIGIN,
            moving: false,
            health: ResourceMeter::full(max_health),
            resource: ResourceMeter::default(),
            base,
            buffs: ArrayVec::new(),
            stats: EffectiveStats::from(base),
            cast: None,
            cooldowns: Cooldowns::new(),
        }
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_health(mut self, current: u32) -> Self {
        self.health = ResourceMeter::new(current, self.health.maximum);
        self
    }

    /// Gives the combatant a full resource pool of `maximum`.
    pub fn with_resource(mut self, maximum: u32) -> Self {
        self.resource = ResourceMeter::full(maximum);
        self
    }

    pub fn with_base_stats(mut self, base: BaseStats) -> Self {
        self.base = base;
        self.refresh_stats();
        self
    }

    /// Shorthand for a base stat block that only sets the surviving multiplier.
    pub fn with_mitigation(self, mitigation: f32) -> Self {
        let base = self.base.with_mitigation(mitigation);
        self.with_base_stats(base)
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn health(&self) -> ResourceMeter {
        self.health
    }

    pub fn resource(&self) -> ResourceMeter {
        self.resource
    }

    pub fn base_stats(&self) -> &BaseStats {
        &self.base
    }

    pub fn stats(&self) -> &EffectiveStats {
        &self.stats
    }

    pub fn buffs(&self) -> &[BuffInstance] {
        &self.buffs
    }

    pub fn buff(&self, id: BuffInstanceId) -> Option<&BuffInstance> {
        self.buffs.iter().find(|buff| buff.id() == id)
    }

    pub fn cast(&self) -> Option<&CastState> {
        self.cast.as_ref()
    }

    pub fn is_casting(&self) -> bool {
        self.cast.is_some()
    }

    pub fn cooldowns(&self) -> &Cooldowns {
        &self.cooldowns
    }

    pub fn is_dead(&self) -> bool {
        self.health.current == 0
    }

    pub fn health_fraction(&self) -> f32 {
        self.health.fraction()
    }

    /// `"current/max"`, as shown on health bars.
    pub fn health_text(&self) -> String {
        self.health.to_string()
    }

    /// Shield buffs in insertion order.
    pub fn shield_ledger(&self) -> ShieldLedger {
        self.buffs
            .iter()
            .filter_map(|buff| {
                buff.remaining_shield().map(|remaining| ShieldEntry {
                    buff: buff.id(),
                    remaining,
                })
            })
            .collect()
    }

    pub fn total_shield(&self) -> u32 {
        self.buffs.iter().filter_map(BuffInstance::remaining_shield).sum()
    }

    // ===== crate-private mutation, driven by the engine =====

    /// Runs `raw` through mitigation and shields, then lowers health.
    pub(crate) fn apply_damage(&mut self, raw: u32) -> DamageApplied {
        let result = mitigate(raw, self.stats.mitigation, &self.shield_ledger());

        for entry in result.ledger.iter() {
            if let Some(buff) = self.buff_mut(entry.buff) {
                buff.set_remaining_shield(entry.remaining);
            }
        }
        let mut depleted = Vec::with_capacity(result.depleted.len());
        for id in &result.depleted {
            if let Some(buff) = self.buff_mut(*id) {
                buff.set_remaining_shield(0);
            }
            if let Some(buff) = self.take_buff(*id) {
                depleted.push(buff);
            }
        }

        let was_alive = self.health.current > 0;
        self.health.drain(result.applied);
        self.check_invariants();

        DamageApplied {
            raw,
            applied: result.applied,
            absorbed: result.absorbed,
            depleted,
            died: was_alive && self.health.current == 0,
        }
    }

    /// Raises health up to the maximum, returning the amount actually added.
    pub(crate) fn apply_heal(&mut self, amount: u32) -> u32 {
        let added = self.health.fill(amount);
        self.check_invariants();
        added
    }

    /// Returns true when the clamp took health from positive to zero.
    pub(crate) fn set_max_health(&mut self, maximum: u32) -> bool {
        let was_alive = self.health.current > 0;
        self.health.set_maximum(maximum);
        self.check_invariants();
        was_alive && self.health.current == 0
    }

    /// Appends a buff behind every existing one.
    pub(crate) fn push_buff(
        &mut self,
        buff: BuffInstance,
    ) -> Result<(), CapacityError<BuffInstance>> {
        self.buffs.try_push(buff)?;
        self.refresh_stats();
        Ok(())
    }

    pub(crate) fn take_buff(&mut self, id: BuffInstanceId) -> Option<BuffInstance> {
        let index = self.buffs.iter().position(|buff| buff.id() == id)?;
        let removed = self.buffs.remove(index);
        self.refresh_stats();
        Some(removed)
    }

    /// Advances every buff, collecting the periodic amounts they release.
    pub(crate) fn tick_buffs(&mut self, elapsed: f32) -> Vec<PeriodicDue> {
        self.buffs
            .iter_mut()
            .filter_map(|buff| {
                buff.tick(elapsed).map(|tick| PeriodicDue {
                    buff: buff.id(),
                    owner: buff.owner(),
                    threat_modifier: buff.threat_modifier(),
                    tick,
                })
            })
            .collect()
    }

    /// Removes expired and depleted buffs, preserving the order of the rest.
    pub(crate) fn sweep_buffs(&mut self) -> Vec<BuffInstance> {
        let mut removed = Vec::new();
        let mut index = 0;
        while index < self.buffs.len() {
            if self.buffs[index].should_remove() {
                removed.push(self.buffs.remove(index));
            } else {
                index += 1;
            }
        }
        if !removed.is_empty() {
            self.refresh_stats();
        }
        removed
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub(crate) fn set_moving(&mut self, moving: bool) {
        self.moving = moving;
    }

    /// Spends `cost` if the pool holds enough; returns false otherwise.
    pub(crate) fn spend_resource(&mut self, cost: u32) -> bool {
        if self.resource.current < cost {
            return false;
        }
        self.resource.drain(cost);
        true
    }

    pub(crate) fn cast_mut(&mut self) -> &mut Option<CastState> {
        &mut self.cast
    }

    pub(crate) fn cooldowns_mut(&mut self) -> &mut Cooldowns {
        &mut self.cooldowns
    }

    fn buff_mut(&mut self, id: BuffInstanceId) -> Option<&mut BuffInstance> {
        self.buffs.iter_mut().find(|buff| buff.id() == id)
    }

    fn refresh_stats(&mut self) {
        self.stats = EffectiveStats::aggregate(&self.base, self.buffs.iter());
    }

    fn check_invariants(&self) {
        debug_assert!(
            self.health.current <= self.health.maximum,
            "health {} outside [0, {}]",
            self.health.current,
            self.health.maximum
        );
    }
}
