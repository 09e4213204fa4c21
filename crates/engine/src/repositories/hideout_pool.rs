//! Per-faction hideout pools.
//!
//! Built once, from the world's full location list, the first time the world
//! is available. Rebuilding afterwards is a no-op.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use hideout_domain::{FactionId, HideoutError, HideoutId, LocationId};

use crate::infrastructure::ports::WorldPort;
use crate::repositories::HideoutRegistry;

pub struct HideoutPool {
    world: Arc<dyn WorldPort>,
    initialized: bool,
    by_faction: BTreeMap<FactionId, Vec<HideoutId>>,
    by_location: HashMap<LocationId, HideoutId>,
    all: Vec<HideoutId>,
}

impl HideoutPool {
    pub fn new(world: Arc<dyn WorldPort>) -> Self {
        Self {
            world,
            initialized: false,
            by_faction: BTreeMap::new(),
            by_location: HashMap::new(),
            all: Vec::new(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Build the pool if it is not built yet.
    ///
    /// Returns `false` without side effects while the world has no locations
    /// to offer; `true` once the pool exists.
    pub fn ensure_initialized(&mut self, registry: &HideoutRegistry) -> bool {
        if self.initialized {
            return true;
        }
        let Some(locations) = self.world.locations() else {
            tracing::debug!("World not loaded yet, hideout pool not built");
            return false;
        };

        for location in &locations {
            let Some(hideout_id) = location.hideout_id() else {
                if location.belongs_in_pool() {
                    tracing::warn!(
                        location_id = %location.id,
                        location = %location.name,
                        "Minor faction location has no hideout record, skipping"
                    );
                }
                continue;
            };
            let Ok(hideout) = registry.lookup(hideout_id) else {
                tracing::warn!(
                    hideout_id = %hideout_id,
                    location_id = %location.id,
                    "Location refers to an unregistered hideout, skipping"
                );
                continue;
            };

            self.all.push(hideout_id.clone());
            self.by_location.insert(location.id, hideout_id.clone());

            if !location.belongs_in_pool() {
                continue;
            }
            // The record's owner is fixed at registration and wins over the map.
            let owner = hideout.owner();
            if location.owner.as_ref().map(|o| o.id) != Some(owner) {
                tracing::warn!(
                    hideout_id = %hideout_id,
                    location_id = %location.id,
                    faction_id = %owner,
                    "Location owner differs from the hideout record, pooling under the record"
                );
            }
            self.by_faction
                .entry(owner)
                .or_default()
                .push(hideout_id.clone());
        }

        self.initialized = true;
        tracing::info!(
            factions = self.by_faction.len(),
            hideouts = self.all.len(),
            "Hideout pool initialized"
        );
        true
    }

    pub fn has_faction(&self, faction_id: FactionId) -> Result<bool, HideoutError> {
        self.check_initialized("has_faction")?;
        Ok(self.by_faction.contains_key(&faction_id))
    }

    /// The faction's pool in stable order, or `None` if it has none.
    pub fn hideouts_of(
        &self,
        faction_id: FactionId,
    ) -> Result<Option<&[HideoutId]>, HideoutError> {
        self.check_initialized("hideouts_of")?;
        Ok(self.by_faction.get(&faction_id).map(Vec::as_slice))
    }

    /// Every faction with a pool, in stable order.
    pub fn factions(&self) -> Result<Vec<FactionId>, HideoutError> {
        self.check_initialized("factions")?;
        Ok(self.by_faction.keys().copied().collect())
    }

    pub fn all_hideouts(&self) -> Result<&[HideoutId], HideoutError> {
        self.check_initialized("all_hideouts")?;
        Ok(&self.all)
    }

    /// Hideout backed by `location_id`. `None` before initialization.
    pub fn hideout_at(&self, location_id: LocationId) -> Option<&HideoutId> {
        self.by_location.get(&location_id)
    }

    /// Drop a faction's pool. Returns its former members.
    pub fn remove_faction(&mut self, faction_id: FactionId) -> Option<Vec<HideoutId>> {
        self.by_faction.remove(&faction_id)
    }

    fn check_initialized(&self, operation: &'static str) -> Result<(), HideoutError> {
        if self.initialized {
            Ok(())
        } else {
            Err(HideoutError::uninitialized(operation))
        }
    }
}
