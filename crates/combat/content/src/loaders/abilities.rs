//! Ability catalog loader and registry.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use combat_core::AbilityDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Ability catalog structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AbilityCatalog {
    pub abilities: Vec<AbilityDefinition>,
}

/// Loader for ability catalogs from RON files.
pub struct AbilityLoader;

impl AbilityLoader {
    /// Load ability templates from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<AbilityDefinition>> {
        let content = read_file(path)?;
        let abilities = Self::parse(&content)?;
        tracing::debug!(
            target: "content::abilities",
            path = %path.display(),
            count = abilities.len(),
            "loaded ability catalog"
        );
        Ok(abilities)
    }

    /// Parse ability templates from RON text.
    pub fn parse(content: &str) -> LoadResult<Vec<AbilityDefinition>> {
        let catalog: AbilityCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse ability catalog RON: {}", e))?;

        Ok(catalog.abilities)
    }
}

/// Ability templates keyed by name, shared through `Arc`.
#[derive(Debug, Clone, Default)]
pub struct AbilityRegistry {
    abilities: BTreeMap<String, Arc<AbilityDefinition>>,
}

impl AbilityRegistry {
    /// Builds a registry, rejecting unnamed and duplicate templates.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = AbilityDefinition>,
    ) -> LoadResult<Self> {
        let mut abilities = BTreeMap::new();

        for definition in definitions {
            if definition.name.trim().is_empty() {
                anyhow::bail!("ability template without a name");
            }
            if let Some(buff) = definition.buff.filter(|buff| buff.duration <= 0.0) {
                tracing::warn!(
                    target: "content::abilities",
                    ability = %definition.name,
                    duration = buff.duration,
                    "buff expires on its first tick"
                );
            }
            let name = definition.name.clone();
            if abilities.insert(name.clone(), Arc::new(definition)).is_some() {
                anyhow::bail!("duplicate ability template: {}", name);
            }
        }

        Ok(Self { abilities })
    }

    /// Loads a registry from a RON catalog on disk.
    pub fn load(path: &Path) -> LoadResult<Self> {
        Self::from_definitions(AbilityLoader::load(path)?)
    }

    /// The demo ability set embedded in the crate.
    pub fn builtin() -> LoadResult<Self> {
        let content = include_str!("../../data/abilities.ron");
        Self::from_definitions(AbilityLoader::parse(content)?)
    }

    pub fn get(&self, name: &str) -> Option<Arc<AbilityDefinition>> {
        self.abilities.get(name).cloned()
    }

    /// Like [`Self::get`] but fails with the list of known names.
    pub fn require(&self, name: &str) -> LoadResult<Arc<AbilityDefinition>> {
        self.get(name).ok_or_else(|| {
            anyhow::anyhow!(
                "unknown ability '{}' (known: {})",
                name,
                self.names().collect::<Vec<_>>().join(", ")
            )
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.abilities.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<AbilityDefinition>> {
        self.abilities.values()
    }

    /// Returns the number of registered abilities.
    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    /// Returns true if no abilities are registered.
    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use combat_core::{AbilityCategory, AbilityFlags, BuffEffect, TargetingMode};

    use super::*;

    #[test]
    fn builtin_catalog_parses() {
        let registry = AbilityRegistry::builtin().unwrap();

        assert_eq!(registry.len(), 9);
        let fireball = registry.require("Fireball").unwrap();
        assert_eq!(fireball.category, AbilityCategory::Damage);
        assert_eq!(fireball.amount, 40);
        assert_eq!(fireball.threat_modifier, 1.0);
        assert!(!fireball.is_castable_while_moving());
    }

    #[test]
    fn builtin_flags_and_buffs_survive_parsing() {
        let registry = AbilityRegistry::builtin().unwrap();

        let ward = registry.require("Ward").unwrap();
        assert!(ward.flags.contains(AbilityFlags::ONLY_SELF_CAST));
        assert_eq!(
            ward.buff.map(|buff| buff.effect),
            Some(BuffEffect::Shield { capacity: 50 })
        );

        let poison = registry.require("Poison").unwrap();
        assert_eq!(
            poison.buff.map(|buff| (buff.duration, buff.effect)),
            Some((10.0, BuffEffect::DamageOverTime { total: 100 }))
        );

        let empower = registry.require("Empower").unwrap();
        assert_eq!(empower.targeting, TargetingMode::OnSelf);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let bolt = AbilityDefinition::new("Bolt", AbilityCategory::Damage, TargetingMode::Enemy);

        let error = AbilityRegistry::from_definitions([bolt.clone(), bolt]).unwrap_err();

        assert!(error.to_string().contains("duplicate"));
    }

    #[test]
    fn loads_catalog_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("abilities.ron");
        std::fs::write(
            &path,
            r#"(abilities: [(name: "Zap", amount: 7, flags: "CASTABLE_WHILE_MOVING")])"#,
        )
        .unwrap();

        let registry = AbilityRegistry::load(&path).unwrap();

        let zap = registry.get("Zap").unwrap();
        assert_eq!(zap.amount, 7);
        assert_eq!(zap.targeting, TargetingMode::Enemy);
        assert!(zap.flags.contains(AbilityFlags::CASTABLE_WHILE_MOVING));
    }

    #[test]
    fn unknown_ability_lists_known_names() {
        let registry = AbilityRegistry::builtin().unwrap();

        let error = registry.require("Meteor").unwrap_err().to_string();

        assert!(error.contains("Meteor"));
        assert!(error.contains("Fireball"));
    }

    #[test]
    fn malformed_catalog_is_an_error() {
        assert!(AbilityLoader::parse("(abilities: [(name: 3)])").is_err());
    }
}
