//! Hideout use cases.
//!
//! `HideoutManager` owns the session's registry, pool, and deferred-war set
//! and is the only writer of hideout active flags. The operations are split
//! by concern:
//!
//! - `lifecycle` - activation, relocation, validation/repair, faction removal
//! - `war` - war declarations deferred until an external trigger fires

mod lifecycle;
mod war;

pub use lifecycle::RepairOutcome;

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use hideout_domain::{
    FactionId, Hideout, HideoutError, HideoutId, HideoutSettings, HideoutSnapshot, LocationId,
};

use crate::infrastructure::ports::{ActionPort, RandomPort, WorldPort};
use crate::repositories::{HideoutPool, HideoutRegistry, RandomService};

pub struct HideoutManager {
    registry: HideoutRegistry,
    pool: HideoutPool,
    waiting_for_war: BTreeSet<FactionId>,
    world: Arc<dyn WorldPort>,
    actions: Arc<dyn ActionPort>,
    random: RandomService,
    settings: HideoutSettings,
}

impl HideoutManager {
    pub fn new(
        world: Arc<dyn WorldPort>,
        actions: Arc<dyn ActionPort>,
        random: Arc<dyn RandomPort>,
        settings: HideoutSettings,
    ) -> Self {
        Self {
            registry: HideoutRegistry::new(),
            pool: HideoutPool::new(world.clone()),
            waiting_for_war: BTreeSet::new(),
            world,
            actions,
            random: RandomService::new(random),
            settings,
        }
    }

    /// Register a loaded hideout record. Fails on a duplicate id.
    pub fn register(&mut self, hideout: Hideout) -> Result<(), HideoutError> {
        self.registry.register(hideout)
    }

    /// Restore the deferred-war set from a save.
    pub fn restore_waiting_for_war(&mut self, factions: impl IntoIterator<Item = FactionId>) {
        self.waiting_for_war.extend(factions);
    }

    pub fn ensure_initialized(&mut self) -> bool {
        self.pool.ensure_initialized(&self.registry)
    }

    pub fn is_initialized(&self) -> bool {
        self.pool.is_initialized()
    }

    pub fn has_faction(&self, faction_id: FactionId) -> Result<bool, HideoutError> {
        self.pool.has_faction(faction_id)
    }

    pub fn settings(&self) -> &HideoutSettings {
        &self.settings
    }

    pub fn hideout(&self, id: &HideoutId) -> Result<&Hideout, HideoutError> {
        self.registry.lookup(id)
    }

    /// Hideout backed by a location, active or not.
    pub fn hideout_at(&self, location_id: LocationId) -> Option<&Hideout> {
        let id = self.pool.hideout_at(location_id)?;
        self.registry.lookup(id).ok()
    }

    /// Hideout backed by a location, only while it is the active one.
    pub fn active_hideout_at(&self, location_id: LocationId) -> Option<&Hideout> {
        self.hideout_at(location_id).filter(|h| h.is_active())
    }

    pub fn is_active_hideout_location(&self, location_id: LocationId) -> bool {
        self.active_hideout_at(location_id).is_some()
    }

    /// Every hideout in the world, in the order the pool first saw them.
    pub fn all_hideouts(&self) -> Result<Vec<&Hideout>, HideoutError> {
        self.pool
            .all_hideouts()?
            .iter()
            .map(|id| self.registry.lookup(id))
            .collect()
    }

    /// Mark a hideout as spotted by the player.
    pub fn spot(&mut self, id: &HideoutId) -> Result<(), HideoutError> {
        self.registry.lookup_mut(id)?.spot();
        Ok(())
    }

    /// Push the hideout's next possible attack time past the cooldown.
    pub fn refresh_attack_cooldown(
        &mut self,
        id: &HideoutId,
        now: DateTime<Utc>,
    ) -> Result<(), HideoutError> {
        let cooldown = self.settings.attack_cooldown();
        self.registry
            .lookup_mut(id)?
            .update_next_possible_attack_time(now, cooldown);
        Ok(())
    }

    /// Everything that has to survive a save/load.
    pub fn snapshot(&self) -> HideoutSnapshot {
        HideoutSnapshot {
            hideouts: self.registry.to_sorted_vec(),
            factions_waiting_for_war: self.waiting_for_war.clone(),
        }
    }

    fn active_members(&self, members: &[HideoutId]) -> Vec<HideoutId> {
        members
            .iter()
            .filter(|id| self.registry.lookup(id).is_ok_and(Hideout::is_active))
            .cloned()
            .collect()
    }

    fn require_initialized(&mut self, operation: &'static str) -> Result<(), HideoutError> {
        if self.ensure_initialized() {
            Ok(())
        } else {
            Err(HideoutError::uninitialized(operation))
        }
    }
}
