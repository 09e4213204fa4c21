//! Hideout tuning settings
//!
//! Settings are serde-serialisable so a host can store them next to a save;
//! every field has a default so older settings files keep loading.

use chrono::{Duration, TimeDelta};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HideoutSettings {
    /// Treat more than one active hideout per faction as a fatal error
    /// instead of repairing it.
    #[serde(default)]
    pub strict_mode: bool,

    /// Hours added to the current time when a hideout's attack cooldown is refreshed
    #[serde(default = "default_attack_cooldown_hours")]
    pub attack_cooldown_hours: i64,

    /// Hours an evicted party ignores the player after its hideout falls
    #[serde(default = "default_eviction_grace_hours")]
    pub eviction_grace_hours: u32,

    /// Notable count marking a hideout as fully developed (repair tie-break)
    #[serde(default = "default_developed_notable_count")]
    pub developed_notable_count: usize,

    /// Seed for the session's random source
    #[serde(default)]
    pub rng_seed: u64,
}

/// Longest cooldown accepted, one hundred years
const MAX_ATTACK_COOLDOWN_HOURS: i64 = 24 * 365 * 100;

fn default_attack_cooldown_hours() -> i64 { 12 }
fn default_eviction_grace_hours() -> u32 { 3 }
fn default_developed_notable_count() -> usize { 2 }

impl Default for HideoutSettings {
    fn default() -> Self {
        Self {
            strict_mode: false,
            attack_cooldown_hours: default_attack_cooldown_hours(),
            eviction_grace_hours: default_eviction_grace_hours(),
            developed_notable_count: default_developed_notable_count(),
            rng_seed: 0,
        }
    }
}

impl HideoutSettings {
    /// Load from environment variables, using defaults for missing values
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            strict_mode: env_or("HIDEOUT_STRICT_MODE", defaults.strict_mode),
            attack_cooldown_hours: env_or(
                "HIDEOUT_ATTACK_COOLDOWN_HOURS",
                defaults.attack_cooldown_hours,
            )
            .clamp(0, MAX_ATTACK_COOLDOWN_HOURS),
            eviction_grace_hours: env_or(
                "HIDEOUT_EVICTION_GRACE_HOURS",
                defaults.eviction_grace_hours,
            ),
            developed_notable_count: env_or(
                "HIDEOUT_DEVELOPED_NOTABLES",
                defaults.developed_notable_count,
            ),
            rng_seed: env_or("HIDEOUT_RNG_SEED", defaults.rng_seed),
        }
    }

    /// The cooldown as a duration, clamped to `0..=MAX_ATTACK_COOLDOWN_HOURS`.
    ///
    /// Settings read from a file skip the clamp in `from_env`, so it is
    /// applied again here.
    pub fn attack_cooldown(&self) -> Duration {
        let hours = self.attack_cooldown_hours.clamp(0, MAX_ATTACK_COOLDOWN_HOURS);
        TimeDelta::try_hours(hours)
            .unwrap_or_else(|| TimeDelta::hours(default_attack_cooldown_hours()))
    }

    pub fn strict(mut self) -> Self {
        self.strict_mode = true;
        self
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}
