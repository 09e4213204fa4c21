//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - The host world (locations, parties, notables)
//! - World actions (war declarations, character removal)
//! - Menus and display text
//! - The host combat system
//! - Clock/Random (for testing and deterministic replays)

mod external;
mod testing;

// =============================================================================
// Host Ports
// =============================================================================
pub use external::{ActionPort, BattlePort, MenuPort, WorldPort};

#[cfg(test)]
pub use external::{MockActionPort, MockBattlePort, MockMenuPort, MockWorldPort};

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};

#[cfg(test)]
pub use testing::MockClockPort;
