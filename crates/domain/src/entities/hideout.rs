//! Hideout entity - one candidate location in a faction's pool
//!
//! A hideout is registered once per session and then toggled between active
//! and inactive many times. It is never destroyed; a lost battle only moves
//! the active flag to a sibling in the same pool.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::PartyInfo;
use crate::ids::{FactionId, HideoutId, LocationId, PartyId};

/// A faction-owned hideout location.
///
/// # Invariants
///
/// - `owner` never changes after construction (no setter exists)
/// - at most one hideout per owner is active; upheld by the engine's
///   lifecycle manager, not by the entity itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hideout {
    id: HideoutId,
    owner: FactionId,
    location_id: LocationId,
    is_active: bool,
    is_spotted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    next_possible_attack_time: Option<DateTime<Utc>>,
}

impl Hideout {
    pub fn new(id: impl Into<HideoutId>, owner: FactionId, location_id: LocationId) -> Self {
        Self {
            id: id.into(),
            owner,
            location_id,
            is_active: false,
            is_spotted: false,
            next_possible_attack_time: None,
        }
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.is_active = active;
        self
    }

    pub fn with_spotted(mut self, spotted: bool) -> Self {
        self.is_spotted = spotted;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> &HideoutId {
        &self.id
    }

    #[inline]
    pub fn owner(&self) -> FactionId {
        self.owner
    }

    #[inline]
    pub fn location_id(&self) -> LocationId {
        self.location_id
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    #[inline]
    pub fn is_spotted(&self) -> bool {
        self.is_spotted
    }

    #[inline]
    pub fn next_possible_attack_time(&self) -> Option<DateTime<Utc>> {
        self.next_possible_attack_time
    }

    /// Whether the cooldown has elapsed at `now`. A hideout that was never
    /// attacked can always be attacked.
    pub fn can_be_attacked_at(&self, now: DateTime<Utc>) -> bool {
        self.next_possible_attack_time.map_or(true, |t| now >= t)
    }

    // =========================================================================
    // State transitions
    // =========================================================================

    /// Marks the hideout active. Returns false if it already was.
    pub fn activate(&mut self) -> bool {
        let changed = !self.is_active;
        self.is_active = true;
        changed
    }

    /// Marks the hideout inactive and unspotted. Returns false if it was
    /// already inactive.
    pub fn deactivate(&mut self) -> bool {
        let changed = self.is_active;
        self.is_active = false;
        self.is_spotted = false;
        changed
    }

    pub fn spot(&mut self) {
        self.is_spotted = true;
    }

    pub fn clear_spotted(&mut self) {
        self.is_spotted = false;
    }

    /// Pushes the next possible attack time to `now + cooldown`, saturating
    /// at the latest representable time.
    pub fn update_next_possible_attack_time(&mut self, now: DateTime<Utc>, cooldown: Duration) {
        let next = now
            .checked_add_signed(cooldown)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.next_possible_attack_time = Some(next);
    }

    /// Parties at the hideout that fight for its owner.
    pub fn defender_parties(&self, parties_present: &[PartyInfo]) -> Vec<PartyId> {
        parties_present
            .iter()
            .filter(|p| p.faction_id == Some(self.owner) && !p.is_main_party)
            .map(|p| p.id)
            .collect()
    }
}
