//! Hideout battle construction and defender enumeration.

use hideout_domain::{BattleId, Encounter, LocationId, PartyId};

use super::HideoutEncounters;
use crate::use_cases::HideoutManager;

impl HideoutEncounters {
    /// Build the hideout battle for an encounter that has none yet.
    ///
    /// Returns `None`, leaving construction to the host, when a battle already
    /// exists or the location is not an active hideout.
    pub fn start_battle(
        &self,
        manager: &HideoutManager,
        encounter: &mut Encounter,
    ) -> Option<BattleId> {
        if encounter.battle().is_some() {
            return None;
        }
        let location_id = encounter.location_id();
        if !manager.is_active_hideout_location(location_id) {
            return None;
        }

        let battle = self
            .battles
            .create_hideout_battle(encounter.attacker(), location_id);
        let battle_id = battle.id;
        encounter.attach_battle(battle);
        self.battles.invite_nearby_parties(battle_id);

        tracing::debug!(
            battle_id = %battle_id,
            hideout_id = %encounter.hideout_id(),
            "Hideout battle started"
        );
        Some(battle_id)
    }

    /// Parties defending the hideout at `location_id`.
    pub fn defender_parties(
        &self,
        manager: &HideoutManager,
        location_id: LocationId,
    ) -> Option<Vec<PartyId>> {
        let hideout = manager.hideout_at(location_id)?;
        Some(hideout.defender_parties(&self.world.parties_at(location_id)))
    }
}
