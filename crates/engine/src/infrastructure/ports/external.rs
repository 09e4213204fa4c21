//! Host simulation ports.
//!
//! The hideout core never owns the world, the map parties, or the combat
//! engine. It reads snapshots and issues commands through these traits.

use hideout_domain::{
    Battle, BattleId, BattleSide, CharacterId, FactionId, LocationId, LocationInfo, MenuId,
    PartyId, PartyInfo, RosterCount,
};

// =============================================================================
// World / Locations
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait WorldPort: Send + Sync {
    /// Every location in the world, or `None` while the world is still loading.
    fn locations(&self) -> Option<Vec<LocationInfo>>;

    fn set_location_visible(&self, location_id: LocationId, visible: bool);

    /// Notable inhabitants of a location.
    fn notables_at(&self, location_id: LocationId) -> Vec<CharacterId>;

    /// Map parties currently inside a location.
    fn parties_at(&self, location_id: LocationId) -> Vec<PartyInfo>;

    /// Make a party leave the location it is in.
    fn leave_location(&self, party_id: PartyId);

    /// Stop a party's AI from targeting the player's party for `hours`.
    fn ignore_player_for(&self, party_id: PartyId, hours: u32);
}

// =============================================================================
// World Actions (diplomacy, character removal)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait ActionPort: Send + Sync {
    /// The player's top-level faction.
    fn player_faction(&self) -> FactionId;

    fn declare_war(&self, faction_id: FactionId, other_faction_id: FactionId);

    /// Remove a character from the world entirely.
    fn remove_character(&self, character_id: CharacterId);
}

// =============================================================================
// Menus / Display Text
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait MenuPort: Send + Sync {
    fn switch_to(&self, menu: MenuId);

    /// String id of the menu currently shown, if any.
    fn current_menu(&self) -> Option<String>;

    fn set_text_variable(&self, name: &str, value: &str);
}

// =============================================================================
// Combat
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait BattlePort: Send + Sync {
    /// Build a hideout battle between `attacker` and the hideout at `location_id`.
    fn create_hideout_battle(&self, attacker: PartyId, location_id: LocationId) -> Battle;

    /// Give parties near the battle a chance to join it.
    fn invite_nearby_parties(&self, battle_id: BattleId);

    /// Whether the fight should go on after the last battle mission ended.
    fn should_continue_battle(&self, battle_id: BattleId) -> bool;

    fn continue_battle(&self, battle_id: BattleId);

    fn leave_battle(&self, battle_id: BattleId);

    fn set_override_winner(&self, battle_id: BattleId, side: BattleSide);

    fn reset_battle_results(&self, battle_id: BattleId);

    /// Start the host's generic settlement encounter for `party` at `location_id`.
    fn start_settlement_encounter(&self, party: PartyId, location_id: LocationId);

    /// Display name of the leading party on `side`.
    fn leader_party_name(&self, battle_id: BattleId, side: BattleSide) -> Option<String>;

    /// Members still able to fight on `side`.
    fn side_member_count(&self, battle_id: BattleId, side: BattleSide) -> u32;

    /// Head count of the player's own party.
    fn player_roster(&self) -> RosterCount;
}
