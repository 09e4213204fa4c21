//! War declarations deferred until an external trigger fires.

use hideout_domain::{FactionId, FactionInfo, HideoutError};

use super::HideoutManager;

impl HideoutManager {
    /// Queue a war declaration against the player for when the faction's
    /// contract with the player ends.
    pub fn schedule_war_on_contract_end(
        &mut self,
        faction: &FactionInfo,
    ) -> Result<(), HideoutError> {
        if !faction.is_minor_faction {
            return Err(HideoutError::invalid_argument(format!(
                "{} is not a minor faction",
                faction.name
            )));
        }
        if self.waiting_for_war.insert(faction.id) {
            tracing::debug!(faction_id = %faction.id, "Scheduled war on contract end");
        }
        Ok(())
    }

    /// Declare the pending war for `faction_id`, if there is one.
    ///
    /// Returns whether a war was declared.
    pub fn resolve_deferred_war(&mut self, faction_id: FactionId) -> bool {
        if !self.waiting_for_war.remove(&faction_id) {
            return false;
        }
        let player_faction = self.actions.player_faction();
        self.actions.declare_war(faction_id, player_faction);
        tracing::info!(
            faction_id = %faction_id,
            player_faction = %player_faction,
            "Declared deferred war"
        );
        true
    }

    pub fn is_waiting_for_war(&self, faction_id: FactionId) -> bool {
        self.waiting_for_war.contains(&faction_id)
    }

    pub fn factions_waiting_for_war(&self) -> impl Iterator<Item = FactionId> + '_ {
        self.waiting_for_war.iter().copied()
    }
}
