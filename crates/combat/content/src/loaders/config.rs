//! Combat configuration loader.

use std::path::Path;

use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Keys missing from the file keep their defaults.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        let config = Self::parse(&content)?;
        tracing::debug!(
            target: "content::config",
            path = %path.display(),
            arrival_threshold = config.arrival_threshold,
            taunt_duration = config.taunt_duration,
            "loaded combat config"
        );
        Ok(config)
    }

    /// Parse config data from TOML text.
    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.arrival_threshold < 0.0 {
            anyhow::bail!(
                "arrival_threshold must not be negative (got {})",
                config.arrival_threshold
            );
        }
        Ok(config)
    }

    /// The configuration shipped with the crate.
    pub fn builtin() -> LoadResult<CombatConfig> {
        Self::parse(include_str!("../../data/combat.toml"))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn builtin_config_matches_defaults() {
        assert_eq!(ConfigLoader::builtin().unwrap(), CombatConfig::default());
    }

    #[test]
    fn missing_keys_keep_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("combat.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "taunt_duration = 5.0").unwrap();

        let config = ConfigLoader::load(&path).unwrap();

        assert_eq!(config.taunt_duration, 5.0);
        assert_eq!(
            config.arrival_threshold,
            CombatConfig::DEFAULT_ARRIVAL_THRESHOLD
        );
    }

    #[test]
    fn rejects_negative_threshold() {
        let error = ConfigLoader::parse("arrival_threshold = -1.0").unwrap_err();
        assert!(error.to_string().contains("arrival_threshold"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");

        let error = ConfigLoader::load(&path).unwrap_err();

        assert!(error.to_string().contains("absent.toml"));
    }
}
