//! Data-driven combat content and loaders.
//!
//! This crate provides loaders for RON/TOML data files:
//! - Ability catalogs (data-driven via RON)
//! - Combat configuration (data-driven via TOML)
//!
//! It also embeds a small demo ability set. Content feeds the runtime and
//! never defines engine behavior; any template conforming to
//! [`combat_core::AbilityDefinition`] is accepted.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{AbilityCatalog, AbilityLoader, AbilityRegistry, ConfigLoader, LoadResult};
