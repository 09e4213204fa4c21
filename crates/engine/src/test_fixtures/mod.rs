//! Test fixtures for building small hideout worlds.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_fixtures::WorldSeeder;
//!
//! #[test]
//! fn test_with_forest_camps() {
//!     let mut seeder = WorldSeeder::new();
//!     let forest = seeder.faction("Forest Brotherhood");
//!     seeder.hideout(&forest, "a");
//!     let seeded = seeder.build();
//!     // ... test logic
//! }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use hideout_domain::{
    CharacterId, FactionId, FactionInfo, Hideout, HideoutId, HideoutSettings, HideoutSnapshot,
    LocationId, LocationInfo, LocationKind, PartyId, PartyInfo,
};

use crate::infrastructure::clock::FixedRandom;
use crate::infrastructure::memory::{InMemoryWorld, LocationRecord, WorldFile};
use crate::infrastructure::ports::RandomPort;
use crate::use_cases::HideoutManager;

/// Builder for an in-memory world with hideouts.
#[derive(Default)]
pub struct WorldSeeder {
    file: WorldFile,
    locations_by_hideout: HashMap<HideoutId, LocationId>,
}

/// Result of `WorldSeeder::build`.
pub struct SeededWorld {
    pub world: Arc<InMemoryWorld>,
    pub snapshot: HideoutSnapshot,
    pub locations_by_hideout: HashMap<HideoutId, LocationId>,
}

impl SeededWorld {
    pub fn location_of(&self, hideout_id: &str) -> LocationId {
        self.locations_by_hideout[&HideoutId::new(hideout_id)]
    }
}

impl WorldSeeder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player_faction(&self) -> FactionId {
        self.file.player_faction
    }

    pub fn faction(&mut self, name: &str) -> FactionInfo {
        FactionInfo::minor(name)
    }

    /// Adds an inactive hideout owned by `owner`.
    pub fn hideout(&mut self, owner: &FactionInfo, id: &str) -> LocationId {
        self.hideout_with(owner, Hideout::new(id, owner.id, LocationId::new()))
    }

    /// Adds a hideout record as-is (active flag included).
    pub fn hideout_with(&mut self, owner: &FactionInfo, hideout: Hideout) -> LocationId {
        let location_id = hideout.location_id();
        self.file.locations.push(LocationRecord::new(LocationInfo::new(
            location_id,
            format!("{} camp", hideout.id()),
            Some(owner.clone()),
            LocationKind::Hideout(hideout.id().clone()),
        )));
        self.locations_by_hideout
            .insert(hideout.id().clone(), location_id);
        self.file.hideouts.hideouts.push(hideout);
        location_id
    }

    pub fn settlement(&mut self, name: &str) -> LocationId {
        let location_id = LocationId::new();
        self.file.locations.push(LocationRecord::new(LocationInfo::new(
            location_id,
            name,
            None,
            LocationKind::Settlement,
        )));
        location_id
    }

    pub fn notables(&mut self, location_id: LocationId, count: usize) -> Vec<CharacterId> {
        let notables: Vec<CharacterId> = (0..count).map(|_| CharacterId::new()).collect();
        if let Some(record) = self.record_mut(location_id) {
            record.notables.extend(notables.iter().copied());
        }
        notables
    }

    pub fn party(&mut self, location_id: LocationId, faction_id: Option<FactionId>) -> PartyId {
        let party_id = PartyId::new();
        if let Some(record) = self.record_mut(location_id) {
            record.parties.push(PartyInfo::new(party_id, faction_id));
        }
        party_id
    }

    pub fn build(self) -> SeededWorld {
        let snapshot = self.file.hideouts.clone();
        SeededWorld {
            world: Arc::new(InMemoryWorld::new(self.file)),
            snapshot,
            locations_by_hideout: self.locations_by_hideout,
        }
    }

    fn record_mut(&mut self, location_id: LocationId) -> Option<&mut LocationRecord> {
        self.file
            .locations
            .iter_mut()
            .find(|r| r.location.id == location_id)
    }
}

/// A manager over a seeded world with every hideout registered and the pool built.
pub fn manager_for(
    seeded: &SeededWorld,
    random: Arc<dyn RandomPort>,
    settings: HideoutSettings,
) -> HideoutManager {
    let mut manager =
        HideoutManager::new(seeded.world.clone(), seeded.world.clone(), random, settings);
    for hideout in &seeded.snapshot.hideouts {
        manager
            .register(hideout.clone())
            .expect("seeded hideouts have unique ids");
    }
    assert!(manager.ensure_initialized(), "seeded world is loaded");
    manager
}

/// Same as `manager_for` with default settings and a random source that
/// always picks the first candidate.
pub fn default_manager(seeded: &SeededWorld) -> HideoutManager {
    manager_for(seeded, Arc::new(FixedRandom(0)), HideoutSettings::default())
}

/// Ids of the active hideouts among `ids`.
pub fn active_ids(manager: &HideoutManager, ids: &[&str]) -> Vec<String> {
    ids.iter()
        .filter(|id| {
            manager
                .hideout(&HideoutId::new(**id))
                .map(Hideout::is_active)
                .unwrap_or(false)
        })
        .map(|id| id.to_string())
        .collect()
}
