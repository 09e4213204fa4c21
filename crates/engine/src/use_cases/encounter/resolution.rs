//! End-of-encounter resolution.

use hideout_domain::{BattleState, Encounter, HideoutError, HideoutId, MenuId};

use super::HideoutEncounters;
use crate::use_cases::HideoutManager;

/// Which branch `end_encounter` took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncounterResolution {
    /// The attackers won; the faction moved to `new_hideout`
    HideoutCleared { new_hideout: HideoutId },
    /// Nobody won; the player stays at the hideout
    Stalemate,
    /// The player lost; the encounter is back at its start
    PlayerDefeated,
    /// The defenders won a battle the player did not lose
    Concluded,
}

impl HideoutEncounters {
    /// Resolve a hideout encounter once its battle state is known.
    ///
    /// Returns `Ok(None)` for encounters that are not hideout battles. Fails
    /// only when clearing the hideout finds nowhere to relocate the faction.
    pub fn end_encounter(
        &self,
        manager: &mut HideoutManager,
        encounter: &mut Encounter,
    ) -> Result<Option<EncounterResolution>, HideoutError> {
        let Some(target) = Self::hideout_battle(manager, encounter) else {
            return Ok(None);
        };
        let battle_state = encounter.battle_state();
        let player_lost = encounter.player_lost();

        // Relocation can fail, so it runs before the encounter is touched.
        let relocated = if matches!(battle_state, BattleState::AttackerVictory) {
            Some(manager.relocate(&target.hideout_id)?)
        } else {
            None
        };

        encounter.mark_state_handled();
        if player_lost {
            self.battles.reset_battle_results(target.battle_id);
            if let Some(battle) = encounter.battle_mut() {
                battle.reset_results();
            }
        } else {
            encounter.finish();
        }

        let resolution = match (battle_state, relocated) {
            (_, Some(new_hideout)) => EncounterResolution::HideoutCleared { new_hideout },
            (BattleState::None, _) => {
                self.battles
                    .start_settlement_encounter(encounter.attacker(), target.location_id);
                encounter.reset_to_begin();
                self.menus.switch_to(MenuId::HideoutPlace);
                EncounterResolution::Stalemate
            }
            (BattleState::DefenderVictory, _) if player_lost => {
                encounter.reset_to_begin();
                self.menus.switch_to(MenuId::HideoutPlace);
                EncounterResolution::PlayerDefeated
            }
            _ => EncounterResolution::Concluded,
        };

        tracing::debug!(
            hideout_id = %target.hideout_id,
            battle_id = %target.battle_id,
            resolution = ?resolution,
            "Hideout encounter resolved"
        );
        Ok(Some(resolution))
    }
}
