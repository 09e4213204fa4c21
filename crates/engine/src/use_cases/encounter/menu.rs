//! Menu selection and location encounter creation.

use hideout_domain::{Encounter, LocationId, MenuId, PartyId};

use crate::use_cases::HideoutManager;

/// One side of an encounter that is being formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncounterSide {
    pub party_id: PartyId,
    pub is_main_party: bool,
    /// Set when this side is a location rather than a map party
    pub location_id: Option<LocationId>,
    /// Whether this side already belongs to a battle
    pub in_battle: bool,
}

impl EncounterSide {
    pub fn party(party_id: PartyId) -> Self {
        Self {
            party_id,
            is_main_party: false,
            location_id: None,
            in_battle: false,
        }
    }

    pub fn main_party(party_id: PartyId) -> Self {
        Self {
            is_main_party: true,
            ..Self::party(party_id)
        }
    }

    pub fn location(party_id: PartyId, location_id: LocationId) -> Self {
        Self {
            location_id: Some(location_id),
            ..Self::party(party_id)
        }
    }

    pub fn in_battle(mut self) -> Self {
        self.in_battle = true;
        self
    }
}

/// An attacker/defender pair about to meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormingEncounter {
    pub attacker: EncounterSide,
    pub defender: EncounterSide,
}

impl FormingEncounter {
    /// The side the player is encountering.
    ///
    /// When the player takes part, it is the other side. Otherwise the
    /// defender if it is already fighting, else the attacker.
    pub fn encountered(&self) -> &EncounterSide {
        if self.attacker.is_main_party || self.defender.is_main_party {
            if self.attacker.is_main_party {
                &self.defender
            } else {
                &self.attacker
            }
        } else if self.defender.in_battle {
            &self.defender
        } else {
            &self.attacker
        }
    }
}

/// What the host knows about the player when it asks for a menu.
#[derive(Debug, Clone, Default)]
pub struct MenuQuery<'a> {
    pub encounter: Option<&'a Encounter>,
    /// Location the player's party is inside, if any
    pub player_location: Option<LocationId>,
    /// Whether the player's party is attached to another party
    pub player_attached: bool,
    pub forming: Option<FormingEncounter>,
}

/// Pick the hideout menu for the player's situation.
///
/// Rules are checked in order and the first match wins. `None` leaves the
/// choice to the host.
pub fn select_menu(manager: &HideoutManager, query: &MenuQuery<'_>) -> Option<MenuId> {
    if query.encounter.is_some_and(Encounter::is_player_waiting) {
        return Some(MenuId::HideoutWait);
    }

    if !query.player_attached
        && query
            .player_location
            .is_some_and(|location_id| manager.is_active_hideout_location(location_id))
    {
        return Some(MenuId::HideoutPlace);
    }

    let encountered = query.forming.as_ref()?.encountered();
    encountered
        .location_id
        .filter(|location_id| manager.is_active_hideout_location(*location_id))
        .map(|_| MenuId::HideoutEncounter)
}

/// Start a hideout encounter when `attacker` enters an active hideout.
pub fn create_location_encounter(
    manager: &HideoutManager,
    location_id: LocationId,
    attacker: PartyId,
) -> Option<Encounter> {
    let hideout = manager.active_hideout_at(location_id)?;
    tracing::debug!(
        hideout_id = %hideout.id(),
        location_id = %location_id,
        "Hideout encounter created"
    );
    Some(Encounter::new(attacker, location_id, hideout.id().clone()))
}
