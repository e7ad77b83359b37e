//! Scripted arena duel on top of the combat runtime.
//!
//! Steps the simulation at a fixed rate, lets every participant walk its
//! rotation, and prints the event stream until someone falls or time runs out.
mod config;
mod printer;
mod roster;

use anyhow::{Context, Result};
use combat_content::{AbilityRegistry, ConfigLoader};
use combat_core::CombatConfig;
use combat_runtime::{Runtime, RuntimeConfig, RuntimeError};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use config::DuelConfig;
use printer::{EventPrinter, PRINTED_TOPICS};
use roster::{Roster, name_of};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging();

    let config = DuelConfig::from_env();
    info!(?config, "starting arena duel");

    run_duel(config).await
}

/// Logs go to stderr so stdout stays a clean event stream.
fn setup_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_content(config: &DuelConfig) -> Result<(AbilityRegistry, CombatConfig)> {
    let abilities = match &config.abilities {
        Some(path) => AbilityRegistry::load(path)
            .with_context(|| format!("loading abilities from {}", path.display()))?,
        None => AbilityRegistry::builtin()?,
    };
    let combat = match &config.combat {
        Some(path) => ConfigLoader::load(path)
            .with_context(|| format!("loading combat config from {}", path.display()))?,
        None => ConfigLoader::builtin()?,
    };

    info!(abilities = abilities.len(), "content loaded");
    Ok((abilities, combat))
}

async fn run_duel(config: DuelConfig) -> Result<()> {
    let (abilities, combat) = load_content(&config)?;
    let roster = Roster::arena(&abilities)?;

    let mut builder = Runtime::builder().config(RuntimeConfig {
        combat,
        tick_rate_hz: config.tick_rate_hz,
        ..RuntimeConfig::default()
    });
    for combatant in roster.combatants.iter().cloned() {
        builder = builder.combatant(combatant);
    }
    let runtime = builder.build().await?;
    let handle = runtime.handle();
    let mut printer = EventPrinter::new(
        handle.subscribe_multiple(&PRINTED_TOPICS),
        config.json_events,
    );

    let dt = config.step_seconds();
    loop {
        let state = handle.query_state().await?;
        if state.elapsed() >= f64::from(config.duel_seconds) {
            info!(elapsed = state.elapsed(), "time is up");
            break;
        }
        if let Some(fallen) = state.combatants().find(|combatant| combatant.is_dead()) {
            info!(loser = name_of(fallen.id()), elapsed = state.elapsed(), "duel decided");
            break;
        }

        for rotation in &roster.rotations {
            let Some(chosen) = rotation.next_move(&state) else {
                continue;
            };
            match handle
                .begin_cast(rotation.caster, chosen.ability.clone(), chosen.target)
                .await
            {
                Ok(outcome) => debug!(
                    caster = name_of(rotation.caster),
                    ability = %chosen.ability.name,
                    ?outcome,
                    "cast accepted"
                ),
                // Already announced on the simulation topic.
                Err(RuntimeError::Engine(_)) => {}
                Err(error) => return Err(error.into()),
            }
        }

        handle.step(dt).await?;
        printer.flush(state.elapsed() + f64::from(dt))?;
    }

    let state = handle.query_state().await?;
    for combatant in state.combatants() {
        info!(
            combatant = name_of(combatant.id()),
            health = %combatant.health_text(),
            shield = combatant.total_shield(),
            "final standing"
        );
    }

    runtime.shutdown().await?;
    Ok(())
}
