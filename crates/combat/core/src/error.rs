//! Common error infrastructure for combat-core.
//!
//! Domain-specific errors (`EngineError`, `CastError`) are defined next to the
//! operations that produce them. This module only provides the shared
//! severity classification so callers can decide how loudly to report a
//! failure.
//!
//! # Severity Model
//!
//! The combat core has no recoverable exceptions in normal operation. Every
//! error falls into one of four buckets:
//! - **Ignored**: a mutating call arrived without authority; nothing changed
//! - **Discarded**: a caster or target vanished; the in-flight work was dropped
//! - **Validation**: a request (e.g. a cast) was rejected before any mutation
//! - **Fatal**: an invariant was violated; state can no longer be trusted

/// Severity level of an error, used for categorization and logging priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Call made without authority. No state change, no event.
    Ignored,

    /// Referenced combatant no longer exists. Work is dropped without retry.
    Discarded,

    /// Request rejected before mutation, should not retry without changes.
    ///
    /// Examples: ability on cooldown, target out of range
    Validation,

    /// Invariant violated. Should be unreachable.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ignored => "ignored",
            Self::Discarded => "discarded",
            Self::Validation => "validation",
            Self::Fatal => "fatal",
        }
    }
}

/// Common trait for all combat-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity by how the caller should react, not by impact
pub trait CoreError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for metrics, structured logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
