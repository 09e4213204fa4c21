//! Hideout encounter state machine.
//!
//! Takes over the host's generic encounter flow at four decision points when
//! the location involved is a hideout:
//!
//! - `menu` - which menu to show, and whether a location encounter becomes a
//!   hideout encounter at all
//! - `battle` - battle construction and defender enumeration
//! - `resolution` - what happens once the battle state is known
//! - `wait` - the per-tick handler while the player waits on a battle
//!
//! Every entry point returns `None` when the location is not a hideout, in
//! which case the host runs its default behavior.

mod battle;
mod menu;
mod resolution;
mod wait;

pub use menu::{create_location_encounter, select_menu, EncounterSide, FormingEncounter, MenuQuery};
pub use resolution::EncounterResolution;
pub use wait::WaitOutcome;

use std::sync::Arc;

use hideout_domain::{BattleId, BattleSide, Encounter, HideoutId, LocationId};

use crate::infrastructure::ports::{BattlePort, ClockPort, MenuPort, WorldPort};
use crate::use_cases::HideoutManager;

pub struct HideoutEncounters {
    world: Arc<dyn WorldPort>,
    battles: Arc<dyn BattlePort>,
    menus: Arc<dyn MenuPort>,
    clock: Arc<dyn ClockPort>,
}

/// The parts of an encounter's battle the handlers act on.
struct HideoutBattle {
    battle_id: BattleId,
    location_id: LocationId,
    hideout_id: HideoutId,
}

impl HideoutEncounters {
    pub fn new(
        world: Arc<dyn WorldPort>,
        battles: Arc<dyn BattlePort>,
        menus: Arc<dyn MenuPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            world,
            battles,
            menus,
            clock,
        }
    }

    /// The encounter's battle, if it is a hideout battle fought at a hideout.
    fn hideout_battle(manager: &HideoutManager, encounter: &Encounter) -> Option<HideoutBattle> {
        let battle = encounter.battle()?;
        if !battle.is_hideout_battle {
            return None;
        }
        let location_id = battle.location_id?;
        let hideout = manager.hideout_at(location_id)?;
        Some(HideoutBattle {
            battle_id: battle.id,
            location_id,
            hideout_id: hideout.id().clone(),
        })
    }

    /// Force the battle's winner on both the host and our copy.
    fn override_winner(&self, encounter: &mut Encounter, battle_id: BattleId, side: BattleSide) {
        self.battles.set_override_winner(battle_id, side);
        if let Some(battle) = encounter.battle_mut() {
            battle.set_override_winner(side);
        }
    }
}
