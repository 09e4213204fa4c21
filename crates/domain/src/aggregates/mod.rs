//! Aggregate roots - domain objects that own their related data
//!
//! An aggregate owns all its constituent parts and exposes behavior through
//! methods, not public fields.

pub mod encounter;

pub use encounter::{Encounter, EncounterState};
