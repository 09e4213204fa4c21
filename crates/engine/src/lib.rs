//! Hideout engine library.
//!
//! Keeps one active hideout per minor faction and drives the hideout
//! encounter flow on top of a host simulation reached through ports.
//!
//! ## Structure
//!
//! - `repositories/` - hideout registry, faction pools, random selection
//! - `use_cases/` - lifecycle manager and encounter state machine
//! - `infrastructure/` - port traits plus clock, in-memory world, save files
//! - `app` - session composition

pub mod app;
pub mod infrastructure;
pub mod repositories;
pub mod use_cases;

/// Test fixtures module for building seeded worlds.
#[cfg(test)]
pub mod test_fixtures;

pub use app::{HideoutSession, Ports};
