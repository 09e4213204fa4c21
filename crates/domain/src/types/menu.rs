use std::fmt;

use serde::{Deserialize, Serialize};

/// Host menu shown while the player is at or fighting for a hideout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuId {
    HideoutWait,
    HideoutPlace,
    HideoutEncounter,
}

impl MenuId {
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuId::HideoutWait => "hideout_wait",
            MenuId::HideoutPlace => "hideout_place",
            MenuId::HideoutEncounter => "hideout_encounter",
        }
    }
}

impl fmt::Display for MenuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The host's own menu for joining a battle already in progress.
pub const JOIN_ENCOUNTER_MENU: &str = "join_encounter";
