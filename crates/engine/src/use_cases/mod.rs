//! Use cases - hideout lifecycle and encounter orchestration.
//!
//! `hideouts` owns the hideout pool state for a session; `encounter` drives
//! the combat flow at a hideout and calls back into the manager when the
//! outcome moves or penalizes a hideout.

pub mod encounter;
pub mod hideouts;

pub use encounter::{
    create_location_encounter, select_menu, EncounterResolution, EncounterSide, FormingEncounter,
    HideoutEncounters, MenuQuery, WaitOutcome,
};
pub use hideouts::{HideoutManager, RepairOutcome};
