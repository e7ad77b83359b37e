/// Combat configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Distance (world units) at which a travelling ability counts as arrived.
    pub arrival_threshold: f32,
    /// Seconds a taunt forces the target onto the caster.
    pub taunt_duration: f32,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of simultaneous buff instances on one combatant.
    pub const MAX_BUFFS: usize = 32;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ARRIVAL_THRESHOLD: f32 = 1.0;
    pub const DEFAULT_TAUNT_DURATION: f32 = 3.0;

    pub fn new() -> Self {
        Self {
            arrival_threshold: Self::DEFAULT_ARRIVAL_THRESHOLD,
            taunt_duration: Self::DEFAULT_TAUNT_DURATION,
        }
    }

    pub fn with_arrival_threshold(mut self, arrival_threshold: f32) -> Self {
        self.arrival_threshold = arrival_threshold;
        self
    }

    pub fn with_taunt_duration(mut self, taunt_duration: f32) -> Self {
        self.taunt_duration = taunt_duration;
        self
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
