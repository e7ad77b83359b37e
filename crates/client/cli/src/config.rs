//! Duel configuration structures and loaders.
use std::env;
use std::path::PathBuf;

/// Configuration required to run a scripted duel.
#[derive(Clone, Debug)]
pub struct DuelConfig {
    /// RON ability catalog; the built-in set when unset.
    pub abilities: Option<PathBuf>,
    /// TOML combat configuration; the built-in file when unset.
    pub combat: Option<PathBuf>,
    /// Simulation steps per simulated second.
    pub tick_rate_hz: u32,
    /// Simulated seconds before the duel is called off.
    pub duel_seconds: f32,
    /// Print events as JSON lines instead of text.
    pub json_events: bool,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            abilities: None,
            combat: None,
            tick_rate_hz: 20,
            duel_seconds: 30.0,
            json_events: false,
        }
    }
}

impl DuelConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ARENA_ABILITIES` - Path to a RON ability catalog (default: built-in set)
    /// - `ARENA_CONFIG` - Path to a TOML combat config (default: built-in file)
    /// - `ARENA_TICK_RATE` - Steps per simulated second (default: 20)
    /// - `ARENA_DUEL_SECONDS` - Duel length in simulated seconds (default: 30)
    /// - `ARENA_JSON_EVENTS` - Emit JSON lines (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self {
            abilities: lookup("ARENA_ABILITIES").map(PathBuf::from),
            combat: lookup("ARENA_CONFIG").map(PathBuf::from),
            ..Self::default()
        };

        if let Some(rate) = parse::<u32>(&lookup, "ARENA_TICK_RATE") {
            config.tick_rate_hz = rate.max(1);
        }

        if let Some(seconds) = parse::<f32>(&lookup, "ARENA_DUEL_SECONDS") {
            config.duel_seconds = seconds.max(0.0);
        }

        if let Some(enable) = parse::<bool>(&lookup, "ARENA_JSON_EVENTS") {
            config.json_events = enable;
        } else if lookup("ARENA_JSON_EVENTS").is_some() {
            // Also accept just setting the variable without value as "true"
            config.json_events = true;
        }

        config
    }

    /// Fixed step length in simulated seconds.
    pub fn step_seconds(&self) -> f32 {
        1.0 / self.tick_rate_hz.max(1) as f32
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.parse().ok()
}
