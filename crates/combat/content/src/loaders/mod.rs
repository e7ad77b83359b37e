//! Content loaders for reading combat data from files.
//!
//! Ability catalogs are RON, combat configuration is TOML. Both map straight
//! onto `combat-core` types through their serde derives.

pub mod abilities;
pub mod config;

pub use abilities::{AbilityCatalog, AbilityLoader, AbilityRegistry};
pub use config::ConfigLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
