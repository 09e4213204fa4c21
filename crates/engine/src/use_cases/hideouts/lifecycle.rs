//! Hideout activation, relocation, and the one-active-per-faction invariant.

use hideout_domain::{FactionId, FactionInfo, Hideout, HideoutError, HideoutId, LocationId};

use super::HideoutManager;

/// What `repair_inconsistency` did to a faction's pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairOutcome {
    /// This hideout stayed active; every sibling was deactivated
    Kept(HideoutId),
    /// No hideout qualified; the faction was removed
    FactionRemoved,
}

impl HideoutManager {
    /// Activate one random hideout in every faction's pool.
    ///
    /// Call once per session, after the world has loaded, for a world that has
    /// never had hideouts activated.
    pub fn activate_all_pools(&mut self) -> Result<(), HideoutError> {
        if !self.pool.is_initialized() {
            return Err(HideoutError::PrematureActivation);
        }

        for faction_id in self.pool.factions()? {
            let members = self.members_of(faction_id)?;
            let Some(chosen) = self.random.pick(&members).cloned() else {
                continue;
            };
            for id in &members {
                let hideout = self.registry.lookup_mut(id)?;
                if *id == chosen {
                    hideout.activate();
                } else {
                    hideout.deactivate();
                }
            }
            tracing::info!(
                faction_id = %faction_id,
                hideout_id = %chosen,
                "Activated faction hideout"
            );
        }
        Ok(())
    }

    /// The faction's active hideout, if it is a minor faction with a pool.
    pub fn active_hideout_of(
        &self,
        faction: &FactionInfo,
    ) -> Result<Option<&Hideout>, HideoutError> {
        if !faction.is_minor_faction {
            return Ok(None);
        }
        let Some(members) = self.pool.hideouts_of(faction.id)? else {
            return Ok(None);
        };
        for id in members {
            let hideout = self.registry.lookup(id)?;
            if hideout.is_active() {
                return Ok(Some(hideout));
            }
        }
        Ok(None)
    }

    /// Move a faction's active status away from an overrun hideout.
    ///
    /// Evicts every party at the destroyed location, hides it, and activates a
    /// different hideout of the same faction picked at random. Returns the id
    /// of the newly active hideout. Fails with `NoAlternateLocation`, without
    /// touching anything, if the faction owns no other hideout.
    pub fn relocate(&mut self, destroyed_id: &HideoutId) -> Result<HideoutId, HideoutError> {
        self.require_initialized("relocate")?;

        let destroyed = self.registry.lookup(destroyed_id)?;
        let faction_id = destroyed.owner();
        let location_id = destroyed.location_id();

        let candidates: Vec<HideoutId> = self
            .members_of(faction_id)?
            .into_iter()
            .filter(|id| id != destroyed_id)
            .collect();
        let Some(new_id) = self.random.pick(&candidates).cloned() else {
            return Err(HideoutError::no_alternate_location(
                faction_id,
                destroyed_id.clone(),
            ));
        };

        self.evict_parties(location_id);
        self.world.set_location_visible(location_id, false);
        self.registry.lookup_mut(destroyed_id)?.deactivate();

        for id in &candidates {
            let hideout = self.registry.lookup_mut(id)?;
            if *id == new_id {
                hideout.clear_spotted();
                hideout.activate();
            } else {
                hideout.deactivate();
            }
        }

        tracing::info!(
            faction_id = %faction_id,
            from = %destroyed_id,
            to = %new_id,
            "Relocated faction hideout"
        );
        Ok(new_id)
    }

    /// Check every pool for more than one active hideout.
    ///
    /// In strict mode the first violation is returned as an error. Otherwise
    /// each violating faction is repaired and the outcomes are returned.
    pub fn validate_single_active_per_faction(
        &mut self,
    ) -> Result<Vec<(FactionId, RepairOutcome)>, HideoutError> {
        self.require_initialized("validate_single_active_per_faction")?;

        let mut repairs = Vec::new();
        for faction_id in self.pool.factions()? {
            let members = self.members_of(faction_id)?;
            let active_count = self.active_members(&members).len();
            if active_count <= 1 {
                continue;
            }
            if self.settings.strict_mode {
                return Err(HideoutError::ConsistencyViolation {
                    faction_id,
                    active_count,
                });
            }
            tracing::warn!(
                faction_id = %faction_id,
                active_count,
                "Faction has multiple active hideouts, repairing"
            );
            let outcome = self.repair_inconsistency(faction_id)?;
            repairs.push((faction_id, outcome));
        }
        Ok(repairs)
    }

    /// Leave at most one active hideout in the faction's pool.
    ///
    /// The first active hideout with exactly the developed number of notables
    /// survives. With no such hideout the whole faction is removed.
    pub fn repair_inconsistency(
        &mut self,
        faction_id: FactionId,
    ) -> Result<RepairOutcome, HideoutError> {
        self.require_initialized("repair_inconsistency")?;
        if !self.pool.has_faction(faction_id)? {
            return Err(HideoutError::invalid_argument(format!(
                "faction {faction_id} has no hideout pool to repair"
            )));
        }

        let members = self.members_of(faction_id)?;
        let survivor = self
            .active_members(&members)
            .into_iter()
            .find(|id| self.is_developed(id));

        let Some(keep) = survivor else {
            tracing::warn!(
                faction_id = %faction_id,
                "No developed active hideout, removing faction"
            );
            self.remove_faction(faction_id)?;
            for id in &members {
                self.registry.lookup_mut(id)?.deactivate();
            }
            return Ok(RepairOutcome::FactionRemoved);
        };

        for id in members.iter().filter(|id| **id != keep) {
            self.registry.lookup_mut(id)?.deactivate();
        }
        tracing::warn!(
            faction_id = %faction_id,
            hideout_id = %keep,
            "Kept single active hideout"
        );
        Ok(RepairOutcome::Kept(keep))
    }

    /// Remove a faction's hideouts from play.
    ///
    /// Notables at its active hideouts are removed from the world and those
    /// hideouts deactivated; the faction then leaves the pool and the
    /// deferred-war set. No-op for a faction without a pool.
    pub fn remove_faction(&mut self, faction_id: FactionId) -> Result<(), HideoutError> {
        self.require_initialized("remove_faction")?;
        if !self.pool.has_faction(faction_id)? {
            return Ok(());
        }

        let members = self.members_of(faction_id)?;
        for id in self.active_members(&members) {
            let location_id = self.registry.lookup(&id)?.location_id();
            // Collected up front; removal mutates the host's notable list.
            let notables = self.world.notables_at(location_id);
            for notable in notables {
                self.actions.remove_character(notable);
            }
            self.registry.lookup_mut(&id)?.deactivate();
        }

        self.pool.remove_faction(faction_id);
        self.waiting_for_war.remove(&faction_id);
        tracing::info!(faction_id = %faction_id, "Removed faction from hideout pool");
        Ok(())
    }

    fn evict_parties(&self, location_id: LocationId) {
        let grace_hours = self.settings.eviction_grace_hours;
        for party in self.world.parties_at(location_id) {
            self.world.leave_location(party.id);
            self.world.ignore_player_for(party.id, grace_hours);
            tracing::debug!(
                party_id = %party.id,
                location_id = %location_id,
                "Evicted party from destroyed hideout"
            );
        }
    }

    fn is_developed(&self, id: &HideoutId) -> bool {
        self.registry.lookup(id).is_ok_and(|h| {
            self.world.notables_at(h.location_id()).len() == self.settings.developed_notable_count
        })
    }

    fn members_of(&self, faction_id: FactionId) -> Result<Vec<HideoutId>, HideoutError> {
        Ok(self
            .pool
            .hideouts_of(faction_id)?
            .map(<[HideoutId]>::to_vec)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use hideout_domain::{FactionInfo, Hideout, HideoutSettings, LocationId};

    use crate::infrastructure::clock::{FixedRandom, SeededRandom};
    use crate::infrastructure::ports::{MockActionPort, MockWorldPort, WorldPort};
    use crate::test_fixtures::{active_ids, default_manager, manager_for, WorldSeeder};
    use crate::use_cases::HideoutManager;

    use super::*;

    fn active(id: &str, owner: &FactionInfo) -> Hideout {
        Hideout::new(id, owner.id, LocationId::new()).with_active(true)
    }

    fn three_camps() -> (crate::test_fixtures::SeededWorld, FactionInfo) {
        let mut seeder = WorldSeeder::new();
        let forest = seeder.faction("Forest Brotherhood");
        for id in ["a", "b", "c"] {
            seeder.hideout(&forest, id);
        }
        (seeder.build(), forest)
    }

    #[test]
    fn when_pool_not_initialized_then_activation_is_premature() {
        let mut world = MockWorldPort::new();
        world.expect_locations().returning(|| None);
        let mut manager = HideoutManager::new(
            Arc::new(world),
            Arc::new(MockActionPort::new()),
            Arc::new(FixedRandom(0)),
            HideoutSettings::default(),
        );

        assert!(!manager.ensure_initialized());
        let err = manager.activate_all_pools().unwrap_err();
        assert_eq!(err, HideoutError::PrematureActivation);
    }

    #[test]
    fn when_queried_before_initialization_then_uninitialized() {
        let mut world = MockWorldPort::new();
        world.expect_locations().returning(|| None);
        let mut manager = HideoutManager::new(
            Arc::new(world),
            Arc::new(MockActionPort::new()),
            Arc::new(FixedRandom(0)),
            HideoutSettings::default(),
        );

        let faction = FactionInfo::minor("Forest Brotherhood");
        assert!(manager.has_faction(faction.id).unwrap_err().is_ordering_violation());
        assert!(manager.active_hideout_of(&faction).unwrap_err().is_ordering_violation());
        assert!(manager
            .relocate(&HideoutId::new("a"))
            .unwrap_err()
            .is_ordering_violation());
    }

    #[test]
    fn when_activated_then_exactly_one_per_faction() {
        let mut seeder = WorldSeeder::new();
        let forest = seeder.faction("Forest Brotherhood");
        let sea = seeder.faction("Sea Raiders");
        for id in ["a", "b", "c"] {
            seeder.hideout(&forest, id);
        }
        for id in ["x", "y"] {
            seeder.hideout(&sea, id);
        }
        let seeded = seeder.build();
        let mut manager = manager_for(
            &seeded,
            Arc::new(SeededRandom::new(42)),
            HideoutSettings::default(),
        );

        manager.activate_all_pools().unwrap();

        assert_eq!(active_ids(&manager, &["a", "b", "c"]).len(), 1);
        assert_eq!(active_ids(&manager, &["x", "y"]).len(), 1);
        assert!(manager.active_hideout_of(&forest).unwrap().is_some());
        assert!(manager.active_hideout_of(&sea).unwrap().is_some());
    }

    #[test]
    fn when_same_seed_then_same_activation() {
        let (seeded, _) = three_camps();
        let settings = HideoutSettings::default();
        let mut first = manager_for(&seeded, Arc::new(SeededRandom::new(5)), settings.clone());
        let mut second = manager_for(&seeded, Arc::new(SeededRandom::new(5)), settings);

        first.activate_all_pools().unwrap();
        second.activate_all_pools().unwrap();

        assert_eq!(
            active_ids(&first, &["a", "b", "c"]),
            active_ids(&second, &["a", "b", "c"])
        );
    }

    #[test]
    fn when_faction_is_not_minor_then_no_active_hideout() {
        let (seeded, forest) = three_camps();
        let mut manager = default_manager(&seeded);
        manager.activate_all_pools().unwrap();

        let major = FactionInfo::new(forest.id, "Forest Brotherhood", false);
        assert_eq!(manager.active_hideout_of(&major).unwrap(), None);
    }

    #[test]
    fn when_relocated_then_new_hideout_differs_and_old_is_hidden() {
        let mut seeder = WorldSeeder::new();
        let forest = seeder.faction("Forest Brotherhood");
        let a = seeder.hideout_with(&forest, active("a", &forest).with_spotted(true));
        seeder.hideout(&forest, "b");
        seeder.hideout(&forest, "c");
        let bandit = seeder.party(a, Some(forest.id));
        let seeded = seeder.build();
        let mut manager = default_manager(&seeded);

        let new_id = manager.relocate(&HideoutId::new("a")).unwrap();

        assert_ne!(new_id.as_str(), "a");
        assert_eq!(active_ids(&manager, &["a", "b", "c"]), vec![new_id.to_string()]);
        let old = manager.hideout(&HideoutId::new("a")).unwrap();
        assert!(!old.is_active());
        assert!(!old.is_spotted());
        assert_eq!(seeded.world.is_visible(a), Some(false));
        assert!(seeded.world.parties_at(a).is_empty());
        assert_eq!(seeded.world.ignoring_player(bandit), Some(3));
    }

    #[test]
    fn when_relocating_repeatedly_then_invariant_holds() {
        let (seeded, forest) = three_camps();
        let mut manager =
            manager_for(&seeded, Arc::new(SeededRandom::new(11)), HideoutSettings::default());
        manager.activate_all_pools().unwrap();

        for _ in 0..20 {
            let active = manager.active_hideout_of(&forest).unwrap().unwrap().id().clone();
            let next = manager.relocate(&active).unwrap();
            assert_ne!(next, active);
            assert_eq!(active_ids(&manager, &["a", "b", "c"]).len(), 1);
        }
    }

    #[test]
    fn when_faction_has_single_hideout_then_no_alternate_location() {
        let mut seeder = WorldSeeder::new();
        let lonely = seeder.faction("Lonely Band");
        let camp = seeder.hideout_with(&lonely, active("only", &lonely));
        seeder.party(camp, Some(lonely.id));
        let seeded = seeder.build();
        let mut manager = default_manager(&seeded);

        let err = manager.relocate(&HideoutId::new("only")).unwrap_err();

        assert!(matches!(err, HideoutError::NoAlternateLocation { .. }));
        assert!(manager.hideout(&HideoutId::new("only")).unwrap().is_active());
        assert_eq!(seeded.world.is_visible(camp), Some(true));
        assert_eq!(seeded.world.parties_at(camp).len(), 1);
    }

    #[test]
    fn when_two_active_and_one_developed_then_repair_keeps_developed() {
        let mut seeder = WorldSeeder::new();
        let forest = seeder.faction("Forest Brotherhood");
        seeder.hideout_with(&forest, active("a", &forest));
        let b = seeder.hideout_with(&forest, active("b", &forest));
        seeder.hideout(&forest, "c");
        seeder.notables(b, 2);
        let seeded = seeder.build();
        let mut manager = default_manager(&seeded);

        let outcome = manager.repair_inconsistency(forest.id).unwrap();

        assert_eq!(outcome, RepairOutcome::Kept(HideoutId::new("b")));
        assert_eq!(active_ids(&manager, &["a", "b", "c"]), vec!["b"]);
        assert!(manager.has_faction(forest.id).unwrap());
        assert!(seeded.world.removed_characters().is_empty());
    }

    #[test]
    fn when_no_active_hideout_is_developed_then_repair_removes_faction() {
        let mut seeder = WorldSeeder::new();
        let forest = seeder.faction("Forest Brotherhood");
        let a = seeder.hideout_with(&forest, active("a", &forest));
        seeder.hideout_with(&forest, active("b", &forest));
        let occupants = seeder.notables(a, 1);
        let seeded = seeder.build();
        let mut manager = default_manager(&seeded);

        let outcome = manager.repair_inconsistency(forest.id).unwrap();

        assert_eq!(outcome, RepairOutcome::FactionRemoved);
        assert!(active_ids(&manager, &["a", "b"]).is_empty());
        assert!(!manager.has_faction(forest.id).unwrap());
        assert_eq!(seeded.world.removed_characters(), occupants);
    }

    #[test]
    fn when_validating_in_normal_mode_then_violations_are_repaired() {
        let mut seeder = WorldSeeder::new();
        let forest = seeder.faction("Forest Brotherhood");
        let sea = seeder.faction("Sea Raiders");
        let a = seeder.hideout_with(&forest, active("a", &forest));
        seeder.hideout_with(&forest, active("b", &forest));
        seeder.hideout_with(&sea, active("x", &sea));
        seeder.hideout(&sea, "y");
        seeder.notables(a, 2);
        let seeded = seeder.build();
        let mut manager = default_manager(&seeded);

        let repairs = manager.validate_single_active_per_faction().unwrap();

        assert_eq!(repairs, vec![(forest.id, RepairOutcome::Kept(HideoutId::new("a")))]);
        assert_eq!(active_ids(&manager, &["a", "b"]), vec!["a"]);
        assert_eq!(active_ids(&manager, &["x", "y"]), vec!["x"]);
    }

    #[test]
    fn when_validating_in_strict_mode_then_violation_is_fatal() {
        let mut seeder = WorldSeeder::new();
        let forest = seeder.faction("Forest Brotherhood");
        seeder.hideout_with(&forest, active("a", &forest));
        seeder.hideout_with(&forest, active("b", &forest));
        let seeded = seeder.build();
        let mut manager = manager_for(
            &seeded,
            Arc::new(FixedRandom(0)),
            HideoutSettings::default().strict(),
        );

        let err = manager.validate_single_active_per_faction().unwrap_err();

        assert_eq!(
            err,
            HideoutError::ConsistencyViolation {
                faction_id: forest.id,
                active_count: 2
            }
        );
        assert_eq!(active_ids(&manager, &["a", "b"]).len(), 2);
    }

    #[test]
    fn when_faction_removed_then_occupants_eliminated_and_pool_dropped() {
        let mut seeder = WorldSeeder::new();
        let forest = seeder.faction("Forest Brotherhood");
        let a = seeder.hideout_with(&forest, active("a", &forest));
        let b = seeder.hideout(&forest, "b");
        let occupants = seeder.notables(a, 2);
        seeder.notables(b, 2);
        let seeded = seeder.build();
        let mut manager = default_manager(&seeded);
        manager.schedule_war_on_contract_end(&forest).unwrap();

        manager.remove_faction(forest.id).unwrap();

        assert_eq!(seeded.world.removed_characters(), occupants);
        assert!(!manager.hideout(&HideoutId::new("a")).unwrap().is_active());
        assert!(!manager.has_faction(forest.id).unwrap());
        assert!(!manager.is_waiting_for_war(forest.id));
    }

    #[test]
    fn when_removing_unknown_faction_then_noop() {
        let (seeded, _) = three_camps();
        let mut manager = default_manager(&seeded);
        manager.remove_faction(FactionId::new()).unwrap();
        assert!(seeded.world.removed_characters().is_empty());
    }
}
