//! Persisted hideout state
//!
//! Only durable facts cross the save boundary: the hideout records (owner,
//! location, active/spotted flags, cooldown) and the factions waiting for war.
//! Whether the pool is initialized is never saved; it depends on the freshly
//! loaded world.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::entities::Hideout;
use crate::ids::FactionId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HideoutSnapshot {
    pub hideouts: Vec<Hideout>,
    #[serde(default)]
    pub factions_waiting_for_war: BTreeSet<FactionId>,
}

impl HideoutSnapshot {
    pub fn new(hideouts: Vec<Hideout>) -> Self {
        Self {
            hideouts,
            factions_waiting_for_war: BTreeSet::new(),
        }
    }
}
