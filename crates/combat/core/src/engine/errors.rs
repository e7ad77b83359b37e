//! Error types for engine operations.

use crate::error::{CoreError, ErrorSeverity};
use crate::state::EntityId;

/// Reasons a cast request is refused. Nothing is mutated when one is returned.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CastError {
    #[error("caster is dead")]
    CasterDead,

    #[error("already casting {ability}")]
    AlreadyCasting { ability: String },

    #[error("{ability} is on cooldown for {remaining:.1}s")]
    OnCooldown { ability: String, remaining: f32 },

    #[error("not enough resource: need {required}, have {available}")]
    NotEnoughResource { required: u32, available: u32 },

    #[error("{ability} cannot target {target}")]
    InvalidTarget { ability: String, target: EntityId },

    #[error("target out of range: {distance:.1} > {range:.1}")]
    OutOfRange { distance: f32, range: f32 },

    #[error("{ability} cannot be cast while moving")]
    Moving { ability: String },
}

impl CastError {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CasterDead => "caster_dead",
            Self::AlreadyCasting { .. } => "already_casting",
            Self::OnCooldown { .. } => "on_cooldown",
            Self::NotEnoughResource { .. } => "not_enough_resource",
            Self::InvalidTarget { .. } => "invalid_target",
            Self::OutOfRange { .. } => "out_of_range",
            Self::Moving { .. } => "moving",
        }
    }
}

impl CoreError for CastError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        self.as_str()
    }
}

/// Errors surfaced by [`super::CombatEngine`] operations.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineError {
    /// Mutation attempted from a non-authoritative participant; nothing changed.
    #[error("operation ignored: not authoritative")]
    NotAuthoritative,

    #[error("unknown combatant {0}")]
    UnknownCombatant(EntityId),

    #[error("buff list of {entity} is full ({capacity} entries)")]
    BuffCapacity { entity: EntityId, capacity: usize },

    #[error("cast rejected: {0}")]
    Cast(#[from] CastError),
}

impl CoreError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotAuthoritative => ErrorSeverity::Ignored,
            Self::UnknownCombatant(_) => ErrorSeverity::Discarded,
            Self::BuffCapacity { .. } => ErrorSeverity::Validation,
            Self::Cast(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotAuthoritative => "not_authoritative",
            Self::UnknownCombatant(_) => "unknown_combatant",
            Self::BuffCapacity { .. } => "buff_capacity",
            Self::Cast(error) => error.error_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_follows_taxonomy() {
        assert_eq!(
            EngineError::NotAuthoritative.severity(),
            ErrorSeverity::Ignored
        );
        assert_eq!(
            EngineError::UnknownCombatant(EntityId(4)).severity(),
            ErrorSeverity::Discarded
        );

        let cast = EngineError::from(CastError::CasterDead);
        assert_eq!(cast.severity(), ErrorSeverity::Validation);
        assert_eq!(cast.error_code(), "caster_dead");
    }
}
