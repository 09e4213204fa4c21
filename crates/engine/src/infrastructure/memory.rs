//! In-memory host world.
//!
//! Implements every host port over a plain data model that can be loaded from
//! and written back to a JSON world file. Battles are bookkeeping only: they
//! never progress on their own. Used by the binary and by the session tests;
//! a real host implements the ports over its own simulation instead.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use hideout_domain::{
    Battle, BattleId, BattleSide, BattleState, CharacterId, FactionId, HideoutSnapshot, LocationId,
    LocationInfo, MenuId, PartyId, PartyInfo, RosterCount,
};
use serde::{Deserialize, Serialize};

use crate::infrastructure::ports::{ActionPort, BattlePort, MenuPort, WorldPort};

/// A location plus the host state the hideout core reads from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub location: LocationInfo,
    #[serde(default)]
    pub notables: Vec<CharacterId>,
    #[serde(default)]
    pub parties: Vec<PartyInfo>,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl LocationRecord {
    pub fn new(location: LocationInfo) -> Self {
        Self {
            location,
            notables: Vec::new(),
            parties: Vec::new(),
            visible: true,
        }
    }
}

/// On-disk world description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldFile {
    pub player_faction: FactionId,
    pub locations: Vec<LocationRecord>,
    /// Saved hideout state; a world with no active hideout is treated as fresh
    #[serde(default)]
    pub hideouts: HideoutSnapshot,
    #[serde(default)]
    pub player_roster: RosterCount,
}

impl WorldFile {
    pub fn is_fresh(&self) -> bool {
        !self.hideouts.hideouts.iter().any(|h| h.is_active())
    }
}

#[derive(Debug, Default)]
struct WorldState {
    loaded: bool,
    player_faction: FactionId,
    locations: Vec<LocationRecord>,
    wars: Vec<(FactionId, FactionId)>,
    removed_characters: Vec<CharacterId>,
    ignoring_player: HashMap<PartyId, u32>,
    menus: Vec<MenuId>,
    current_menu: Option<String>,
    text_variables: HashMap<String, String>,
    player_roster: RosterCount,
    battles: HashMap<BattleId, Battle>,
    settlement_encounters: Vec<(PartyId, LocationId)>,
}

pub struct InMemoryWorld {
    state: Mutex<WorldState>,
}

impl InMemoryWorld {
    /// A world whose locations are available immediately.
    pub fn new(file: WorldFile) -> Self {
        let world = Self::unloaded(file);
        world.mark_loaded();
        world
    }

    /// A world that reports no locations until `mark_loaded` is called.
    pub fn unloaded(file: WorldFile) -> Self {
        Self {
            state: Mutex::new(WorldState {
                player_faction: file.player_faction,
                locations: file.locations,
                player_roster: file.player_roster,
                ..WorldState::default()
            }),
        }
    }

    pub fn mark_loaded(&self) {
        self.lock().loaded = true;
    }

    /// Current world state with the given hideout snapshot attached.
    pub fn to_world_file(&self, hideouts: HideoutSnapshot) -> WorldFile {
        let state = self.lock();
        WorldFile {
            player_faction: state.player_faction,
            locations: state.locations.clone(),
            hideouts,
            player_roster: state.player_roster,
        }
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    pub fn wars(&self) -> Vec<(FactionId, FactionId)> {
        self.lock().wars.clone()
    }

    pub fn removed_characters(&self) -> Vec<CharacterId> {
        self.lock().removed_characters.clone()
    }

    pub fn is_visible(&self, location_id: LocationId) -> Option<bool> {
        self.lock()
            .locations
            .iter()
            .find(|r| r.location.id == location_id)
            .map(|r| r.visible)
    }

    pub fn ignoring_player(&self, party_id: PartyId) -> Option<u32> {
        self.lock().ignoring_player.get(&party_id).copied()
    }

    pub fn menus(&self) -> Vec<MenuId> {
        self.lock().menus.clone()
    }

    pub fn text_variable(&self, name: &str) -> Option<String> {
        self.lock().text_variables.get(name).cloned()
    }

    pub fn set_current_menu(&self, menu: Option<String>) {
        self.lock().current_menu = menu;
    }

    pub fn battle(&self, battle_id: BattleId) -> Option<Battle> {
        self.lock().battles.get(&battle_id).cloned()
    }

    /// Host-side decision of a battle, as a finished fight would report it.
    pub fn decide_battle(&self, battle_id: BattleId, state: BattleState) {
        if let Some(battle) = self.lock().battles.get_mut(&battle_id) {
            battle.state = state;
        }
    }

    pub fn settlement_encounters(&self) -> Vec<(PartyId, LocationId)> {
        self.lock().settlement_encounters.clone()
    }

    fn lock(&self) -> MutexGuard<'_, WorldState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_record<R>(
        &self,
        location_id: LocationId,
        f: impl FnOnce(&mut LocationRecord) -> R,
    ) -> Option<R> {
        let mut state = self.lock();
        state
            .locations
            .iter_mut()
            .find(|r| r.location.id == location_id)
            .map(f)
    }
}

impl WorldPort for InMemoryWorld {
    fn locations(&self) -> Option<Vec<LocationInfo>> {
        let state = self.lock();
        state
            .loaded
            .then(|| state.locations.iter().map(|r| r.location.clone()).collect())
    }

    fn set_location_visible(&self, location_id: LocationId, visible: bool) {
        self.with_record(location_id, |r| r.visible = visible);
    }

    fn notables_at(&self, location_id: LocationId) -> Vec<CharacterId> {
        self.with_record(location_id, |r| r.notables.clone())
            .unwrap_or_default()
    }

    fn parties_at(&self, location_id: LocationId) -> Vec<PartyInfo> {
        self.with_record(location_id, |r| r.parties.clone())
            .unwrap_or_default()
    }

    fn leave_location(&self, party_id: PartyId) {
        let mut state = self.lock();
        for record in &mut state.locations {
            record.parties.retain(|p| p.id != party_id);
        }
    }

    fn ignore_player_for(&self, party_id: PartyId, hours: u32) {
        self.lock().ignoring_player.insert(party_id, hours);
    }
}

impl ActionPort for InMemoryWorld {
    fn player_faction(&self) -> FactionId {
        self.lock().player_faction
    }

    fn declare_war(&self, faction_id: FactionId, other_faction_id: FactionId) {
        self.lock().wars.push((faction_id, other_faction_id));
    }

    fn remove_character(&self, character_id: CharacterId) {
        let mut state = self.lock();
        for record in &mut state.locations {
            record.notables.retain(|c| *c != character_id);
        }
        state.removed_characters.push(character_id);
    }
}

impl MenuPort for InMemoryWorld {
    fn switch_to(&self, menu: MenuId) {
        let mut state = self.lock();
        state.current_menu = Some(menu.as_str().to_string());
        state.menus.push(menu);
    }

    fn current_menu(&self) -> Option<String> {
        self.lock().current_menu.clone()
    }

    fn set_text_variable(&self, name: &str, value: &str) {
        self.lock()
            .text_variables
            .insert(name.to_string(), value.to_string());
    }
}

impl BattlePort for InMemoryWorld {
    fn create_hideout_battle(&self, attacker: PartyId, location_id: LocationId) -> Battle {
        let battle = Battle::hideout(BattleId::new(), location_id);
        self.lock().battles.insert(battle.id, battle.clone());
        tracing::debug!(
            battle_id = %battle.id,
            attacker = %attacker,
            location_id = %location_id,
            "Battle created"
        );
        battle
    }

    fn invite_nearby_parties(&self, _battle_id: BattleId) {}

    fn should_continue_battle(&self, _battle_id: BattleId) -> bool {
        false
    }

    fn continue_battle(&self, _battle_id: BattleId) {}

    fn leave_battle(&self, battle_id: BattleId) {
        self.lock().battles.remove(&battle_id);
    }

    fn set_override_winner(&self, battle_id: BattleId, side: BattleSide) {
        if let Some(battle) = self.lock().battles.get_mut(&battle_id) {
            battle.set_override_winner(side);
        }
    }

    fn reset_battle_results(&self, battle_id: BattleId) {
        if let Some(battle) = self.lock().battles.get_mut(&battle_id) {
            battle.reset_results();
        }
    }

    fn start_settlement_encounter(&self, party: PartyId, location_id: LocationId) {
        self.lock().settlement_encounters.push((party, location_id));
    }

    fn leader_party_name(&self, battle_id: BattleId, side: BattleSide) -> Option<String> {
        let state = self.lock();
        let location_id = state.battles.get(&battle_id)?.location_id?;
        match side {
            BattleSide::Defender => state
                .locations
                .iter()
                .find(|r| r.location.id == location_id)
                .and_then(|r| r.location.owner.as_ref())
                .map(|owner| owner.name.clone()),
            BattleSide::Attacker => None,
        }
    }

    fn side_member_count(&self, battle_id: BattleId, side: BattleSide) -> u32 {
        let state = self.lock();
        match side {
            BattleSide::Attacker => state.player_roster.healthy(),
            BattleSide::Defender => state
                .battles
                .get(&battle_id)
                .and_then(|b| b.location_id)
                .and_then(|location_id| {
                    state.locations.iter().find(|r| r.location.id == location_id)
                })
                .map_or(0, |r| u32::try_from(r.parties.len()).unwrap_or(u32::MAX)),
        }
    }

    fn player_roster(&self) -> RosterCount {
        self.lock().player_roster
    }
}
