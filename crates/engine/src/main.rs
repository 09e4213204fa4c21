//! Hideout engine - loads a world file, runs session start, writes a save.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use hideout_domain::HideoutSettings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hideout_engine::infrastructure::clock::{SeededRandom, SystemClock};
use hideout_engine::infrastructure::memory::InMemoryWorld;
use hideout_engine::infrastructure::save_file;
use hideout_engine::{HideoutSession, Ports};

fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hideout_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = HideoutSettings::from_env();
    let world_path = path_from_env("HIDEOUT_WORLD_PATH", "world.json");
    let save_path = path_from_env("HIDEOUT_SAVE_PATH", "world.save.json");

    tracing::info!(
        world = ?world_path,
        save = ?save_path,
        strict = settings.strict_mode,
        seed = settings.rng_seed,
        "Starting hideout engine"
    );

    let world_file = save_file::read_world(&world_path)
        .with_context(|| format!("loading world from {}", world_path.display()))?;
    let fresh = world_file.is_fresh();
    let snapshot = world_file.hideouts.clone();
    let world = Arc::new(InMemoryWorld::new(world_file));

    let ports = Ports {
        world: world.clone(),
        actions: world.clone(),
        menus: world.clone(),
        battles: world.clone(),
        clock: Arc::new(SystemClock::new()),
        random: Arc::new(SeededRandom::new(settings.rng_seed)),
    };
    let mut session = HideoutSession::start(ports, settings, snapshot)?;

    if fresh {
        session.activate_first_time()?;
    } else {
        let repairs = session.validate_loaded()?;
        if !repairs.is_empty() {
            tracing::warn!(
                repaired = repairs.len(),
                "Repaired factions with several active hideouts"
            );
        }
    }

    let snapshot = session.end();
    save_file::write_world(&save_path, &world.to_world_file(snapshot))
        .with_context(|| format!("writing save to {}", save_path.display()))?;

    Ok(())
}

fn path_from_env(key: &str, default: &str) -> PathBuf {
    PathBuf::from(std::env::var(key).unwrap_or_else(|_| default.to_string()))
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
