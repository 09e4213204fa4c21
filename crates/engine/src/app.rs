//! Session state and composition.

use std::sync::Arc;

use hideout_domain::{
    BattleId, Encounter, FactionId, HideoutError, HideoutSettings, HideoutSnapshot, LocationId,
    MenuId, PartyId,
};

use crate::infrastructure::ports::{
    ActionPort, BattlePort, ClockPort, MenuPort, RandomPort, WorldPort,
};
use crate::use_cases::{
    self, EncounterResolution, FormingEncounter, HideoutEncounters, HideoutManager, MenuQuery,
    RepairOutcome, WaitOutcome,
};

/// Host ports a session runs against.
#[derive(Clone)]
pub struct Ports {
    pub world: Arc<dyn WorldPort>,
    pub actions: Arc<dyn ActionPort>,
    pub menus: Arc<dyn MenuPort>,
    pub battles: Arc<dyn BattlePort>,
    pub clock: Arc<dyn ClockPort>,
    pub random: Arc<dyn RandomPort>,
}

/// One campaign session's hideout state.
///
/// Built on session start from the saved snapshot and consumed on session
/// end, handing the snapshot back. Holds at most one encounter at a time.
pub struct HideoutSession {
    pub hideouts: HideoutManager,
    pub encounters: HideoutEncounters,
    encounter: Option<Encounter>,
}

impl HideoutSession {
    /// Register every saved hideout and try to build the pools.
    ///
    /// The pools stay unbuilt if the world has not loaded yet; they are built
    /// by the first operation that needs them.
    pub fn start(
        ports: Ports,
        settings: HideoutSettings,
        snapshot: HideoutSnapshot,
    ) -> Result<Self, HideoutError> {
        let mut hideouts = HideoutManager::new(
            ports.world.clone(),
            ports.actions,
            ports.random,
            settings,
        );
        for hideout in snapshot.hideouts {
            hideouts.register(hideout)?;
        }
        hideouts.restore_waiting_for_war(snapshot.factions_waiting_for_war);

        let initialized = hideouts.ensure_initialized();
        tracing::info!(initialized, "Hideout session started");

        Ok(Self {
            hideouts,
            encounters: HideoutEncounters::new(
                ports.world,
                ports.battles,
                ports.menus,
                ports.clock,
            ),
            encounter: None,
        })
    }

    /// First load of a fresh world: one hideout per faction goes active.
    pub fn activate_first_time(&mut self) -> Result<(), HideoutError> {
        self.hideouts.ensure_initialized();
        self.hideouts.activate_all_pools()
    }

    /// Load of a saved world: check and repair the one-active rule.
    pub fn validate_loaded(&mut self) -> Result<Vec<(FactionId, RepairOutcome)>, HideoutError> {
        self.hideouts.validate_single_active_per_faction()
    }

    /// Tear the session down and return what has to be saved.
    pub fn end(self) -> HideoutSnapshot {
        let snapshot = self.hideouts.snapshot();
        tracing::info!(hideouts = snapshot.hideouts.len(), "Hideout session ended");
        snapshot
    }

    // =========================================================================
    // Encounters
    // =========================================================================

    /// Start an encounter at `location_id` if it is an active hideout.
    ///
    /// Returns `false` when the host should run its own encounter instead.
    pub fn begin_location_encounter(&mut self, location_id: LocationId, attacker: PartyId) -> bool {
        self.encounter =
            use_cases::create_location_encounter(&self.hideouts, location_id, attacker);
        self.encounter.is_some()
    }

    pub fn current_encounter(&self) -> Option<&Encounter> {
        self.encounter.as_ref()
    }

    pub fn current_encounter_mut(&mut self) -> Option<&mut Encounter> {
        self.encounter.as_mut()
    }

    pub fn start_battle(&mut self) -> Option<BattleId> {
        let encounter = self.encounter.as_mut()?;
        self.encounters.start_battle(&self.hideouts, encounter)
    }

    pub fn wait_tick(&mut self) -> Result<Option<WaitOutcome>, HideoutError> {
        let Some(encounter) = self.encounter.as_mut() else {
            return Ok(None);
        };
        encounter.begin_new_tick();
        self.encounters.wait_tick(&mut self.hideouts, encounter)
    }

    /// Resolve the current encounter. A finished encounter is dropped; on
    /// error the encounter is kept as it was.
    pub fn end_encounter(&mut self) -> Result<Option<EncounterResolution>, HideoutError> {
        let Some(encounter) = self.encounter.as_mut() else {
            return Ok(None);
        };
        let resolution = self.encounters.end_encounter(&mut self.hideouts, encounter);
        if self.encounter.as_ref().is_some_and(Encounter::is_finished) {
            self.encounter = None;
        }
        resolution
    }

    pub fn select_menu(
        &self,
        player_location: Option<LocationId>,
        player_attached: bool,
        forming: Option<FormingEncounter>,
    ) -> Option<MenuId> {
        let query = MenuQuery {
            encounter: self.encounter.as_ref(),
            player_location,
            player_attached,
            forming,
        };
        use_cases::select_menu(&self.hideouts, &query)
    }
}
