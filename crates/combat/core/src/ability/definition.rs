//! Immutable ability templates.

use bitflags::bitflags;

use crate::buff::BuffDefinition;

/// Category tag of an ability.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AbilityCategory {
    #[default]
    Damage,
    Heal,
    Interrupt,
    Taunt,
    Buff,
    DamageOverTime,
    HealOverTime,
    Shield,
    Slow,
    Resurrect,
    Special,
}

/// Who an ability may be aimed at.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TargetingMode {
    /// The caster only.
    #[strum(serialize = "self")]
    OnSelf,
    Friend,
    #[default]
    Enemy,
}

bitflags! {
    /// Casting permissions of an ability.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct AbilityFlags: u8 {
        const CASTABLE_WHILE_MOVING = 1 << 0;
        const CAN_CAST_ON_SELF = 1 << 1;
        const ONLY_SELF_CAST = 1 << 2;
    }
}

/// Immutable ability template.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AbilityDefinition {
    pub name: String,
    pub category: AbilityCategory,
    pub targeting: TargetingMode,
    /// Base damage or heal amount.
    pub amount: u32,
    pub resource_cost: u32,
    pub threat_modifier: f32,
    /// Units per second; 0 resolves instantly.
    pub travel_speed: f32,
    /// Seconds; 0 or less is an instant cast.
    pub cast_time: f32,
    pub cooldown: f32,
    /// Maximum cast distance; 0 disables the range check.
    pub range: f32,
    pub flags: AbilityFlags,
    pub buff: Option<BuffDefinition>,
}

impl AbilityDefinition {
    pub fn new(
        name: impl Into<String>,
        category: AbilityCategory,
        targeting: TargetingMode,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            targeting,
            ..Self::default()
        }
    }

    pub fn with_amount(mut self, amount: u32) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_resource_cost(mut self, resource_cost: u32) -> Self {
        self.resource_cost = resource_cost;
        self
    }

    pub fn with_threat_modifier(mut self, threat_modifier: f32) -> Self {
        self.threat_modifier = threat_modifier;
        self
    }

    pub fn with_travel_speed(mut self, travel_speed: f32) -> Self {
        self.travel_speed = travel_speed;
        self
    }

    pub fn with_cast_time(mut self, cast_time: f32) -> Self {
        self.cast_time = cast_time;
        self
    }

    pub fn with_cooldown(mut self, cooldown: f32) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_range(mut self, range: f32) -> Self {
        self.range = range;
        self
    }

    pub fn with_flags(mut self, flags: AbilityFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_buff(mut self, buff: BuffDefinition) -> Self {
        self.buff = Some(buff);
        self
    }

    /// True when the ability resolves on the step it is spawned.
    pub fn is_instant_travel(&self) -> bool {
        self.travel_speed <= 0.0
    }

    pub fn is_instant_cast(&self) -> bool {
        self.cast_time <= 0.0
    }

    /// Instant casts can always be used on the move.
    pub fn is_castable_while_moving(&self) -> bool {
        self.flags.contains(AbilityFlags::CASTABLE_WHILE_MOVING) || self.is_instant_cast()
    }

    pub fn is_only_self_cast(&self) -> bool {
        self.flags.contains(AbilityFlags::ONLY_SELF_CAST)
    }

    /// Whether the caster may be its own target.
    pub fn allows_self_target(&self) -> bool {
        self.targeting == TargetingMode::OnSelf
            || self
                .flags
                .intersects(AbilityFlags::CAN_CAST_ON_SELF | AbilityFlags::ONLY_SELF_CAST)
    }

    /// Outgoing amount after the caster's damage increase (truncated).
    pub fn scaled_amount(&self, damage_increase: f32) -> u32 {
        let factor = (1.0 + damage_increase).max(0.0);
        (self.amount as f32 * factor) as u32
    }
}

impl Default for AbilityDefinition {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: AbilityCategory::default(),
            targeting: TargetingMode::default(),
            amount: 0,
            resource_cost: 0,
            threat_modifier: 1.0,
            travel_speed: 0.0,
            cast_time: 0.0,
            cooldown: 0.0,
            range: 0.0,
            flags: AbilityFlags::empty(),
            buff: None,
        }
    }
}
