//! World-side records the hideout core reads from the host simulation.
//!
//! These are snapshots handed across the engine's ports; the host owns the
//! real objects.

use serde::{Deserialize, Serialize};

use crate::ids::{FactionId, HideoutId, LocationId, PartyId};

/// A faction as seen by the hideout core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionInfo {
    pub id: FactionId,
    pub name: String,
    /// Minor factions are the only ones that own hideout pools.
    pub is_minor_faction: bool,
}

impl FactionInfo {
    pub fn new(id: FactionId, name: impl Into<String>, is_minor_faction: bool) -> Self {
        Self {
            id,
            name: name.into(),
            is_minor_faction,
        }
    }

    pub fn minor(name: impl Into<String>) -> Self {
        Self::new(FactionId::new(), name, true)
    }
}

/// What sort of place a location is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "hideout_id", rename_all = "snake_case")]
pub enum LocationKind {
    /// Backed by the hideout record with this id
    Hideout(HideoutId),
    Settlement,
    Other,
}

/// A location in the host world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub id: LocationId,
    pub name: String,
    #[serde(default)]
    pub owner: Option<FactionInfo>,
    pub kind: LocationKind,
}

impl LocationInfo {
    pub fn new(
        id: LocationId,
        name: impl Into<String>,
        owner: Option<FactionInfo>,
        kind: LocationKind,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            owner,
            kind,
        }
    }

    /// The backing hideout id, if this location is a hideout.
    pub fn hideout_id(&self) -> Option<&HideoutId> {
        match &self.kind {
            LocationKind::Hideout(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_hideout(&self) -> bool {
        self.hideout_id().is_some()
    }

    /// Whether this location belongs in a hideout pool: owned by a minor
    /// faction, or unowned but classified as a hideout.
    pub fn belongs_in_pool(&self) -> bool {
        match &self.owner {
            Some(owner) => owner.is_minor_faction,
            None => self.is_hideout(),
        }
    }
}

/// A party present somewhere on the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyInfo {
    pub id: PartyId,
    #[serde(default)]
    pub faction_id: Option<FactionId>,
    #[serde(default)]
    pub is_main_party: bool,
}

impl PartyInfo {
    pub fn new(id: PartyId, faction_id: Option<FactionId>) -> Self {
        Self {
            id,
            faction_id,
            is_main_party: false,
        }
    }

    pub fn main_party(id: PartyId, faction_id: FactionId) -> Self {
        Self {
            id,
            faction_id: Some(faction_id),
            is_main_party: true,
        }
    }
}
