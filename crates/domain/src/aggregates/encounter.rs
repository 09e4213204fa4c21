//! Encounter aggregate - a transient confrontation at a hideout
//!
//! Created when a location encounter begins at an active hideout and dropped
//! once it finishes. The engine's encounter state machine drives every
//! transition; the fields are the state it needs to carry between ticks.

use serde::{Deserialize, Serialize};

use crate::ids::{HideoutId, LocationId, PartyId};
use crate::types::{Battle, BattleSide, BattleState, CampaignBattleResult};

/// Phase of an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterState {
    /// Initial state; the player may attack or leave
    #[default]
    Begin,
    /// The player is waiting on an unresolved battle
    Wait,
    /// A battle is being fought
    Battle,
    /// The battle is decided and results are being prepared
    PrepareResults,
    /// Terminal
    End,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    attacker: PartyId,
    location_id: LocationId,
    hideout_id: HideoutId,
    player_side: BattleSide,
    state: EncounterState,
    state_handled: bool,
    is_player_waiting: bool,
    is_joined_battle: bool,
    enemy_surrendered: bool,
    player_surrendered: bool,
    battle: Option<Battle>,
    /// Set while the battle is auto-resolved instead of fought
    battle_simulation: bool,
    battle_result: Option<CampaignBattleResult>,
}

impl Encounter {
    pub fn new(attacker: PartyId, location_id: LocationId, hideout_id: HideoutId) -> Self {
        Self {
            attacker,
            location_id,
            hideout_id,
            player_side: BattleSide::Attacker,
            state: EncounterState::Begin,
            state_handled: false,
            is_player_waiting: false,
            is_joined_battle: false,
            enemy_surrendered: false,
            player_surrendered: false,
            battle: None,
            battle_simulation: false,
            battle_result: None,
        }
    }

    /// Marks the player as having joined someone else's battle on `side`.
    pub fn joined_on(mut self, side: BattleSide) -> Self {
        self.player_side = side;
        self.is_joined_battle = true;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn attacker(&self) -> PartyId {
        self.attacker
    }

    pub fn location_id(&self) -> LocationId {
        self.location_id
    }

    pub fn hideout_id(&self) -> &HideoutId {
        &self.hideout_id
    }

    pub fn player_side(&self) -> BattleSide {
        self.player_side
    }

    pub fn state(&self) -> EncounterState {
        self.state
    }

    pub fn is_state_handled(&self) -> bool {
        self.state_handled
    }

    pub fn is_player_waiting(&self) -> bool {
        self.is_player_waiting
    }

    pub fn is_joined_battle(&self) -> bool {
        self.is_joined_battle
    }

    pub fn enemy_surrendered(&self) -> bool {
        self.enemy_surrendered
    }

    pub fn player_surrendered(&self) -> bool {
        self.player_surrendered
    }

    pub fn battle(&self) -> Option<&Battle> {
        self.battle.as_ref()
    }

    pub fn battle_mut(&mut self) -> Option<&mut Battle> {
        self.battle.as_mut()
    }

    pub fn is_battle_simulation(&self) -> bool {
        self.battle_simulation
    }

    pub fn battle_result(&self) -> Option<CampaignBattleResult> {
        self.battle_result
    }

    /// The battle's state, or `None` when there is no battle yet.
    pub fn battle_state(&self) -> BattleState {
        self.battle.as_ref().map_or(BattleState::None, |b| b.state)
    }

    /// A simulated battle that the player's side did not win.
    pub fn player_lost(&self) -> bool {
        self.battle_simulation
            && self
                .battle
                .as_ref()
                .is_some_and(|b| b.winning_side() != Some(self.player_side))
    }

    pub fn is_finished(&self) -> bool {
        self.state == EncounterState::End
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    pub fn attach_battle(&mut self, battle: Battle) {
        self.battle = Some(battle);
        self.state = EncounterState::Battle;
    }

    pub fn start_waiting(&mut self) {
        self.is_player_waiting = true;
        self.state = EncounterState::Wait;
    }

    pub fn set_battle_simulation(&mut self, simulated: bool) {
        self.battle_simulation = simulated;
    }

    pub fn record_battle_result(&mut self, result: CampaignBattleResult) {
        self.battle_result = Some(result);
    }

    pub fn set_state(&mut self, state: EncounterState) {
        self.state = state;
    }

    pub fn begin_new_tick(&mut self) {
        self.state_handled = false;
    }

    pub fn mark_state_handled(&mut self) {
        self.state_handled = true;
    }

    pub fn set_enemy_surrendered(&mut self) {
        self.enemy_surrendered = true;
    }

    pub fn set_player_surrendered(&mut self) {
        self.player_surrendered = true;
    }

    /// Back to the opening state so the player can retry or leave.
    pub fn reset_to_begin(&mut self) {
        self.state = EncounterState::Begin;
        self.is_player_waiting = false;
        self.battle_result = None;
    }

    pub fn finish(&mut self) {
        self.state = EncounterState::End;
        self.is_player_waiting = false;
    }
}
