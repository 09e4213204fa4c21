//! Infrastructure implementations.
//!
//! Contains port traits and their implementations: clock and random sources,
//! the in-memory host world, and JSON save files.

pub mod clock;
pub mod memory;
pub mod ports;
pub mod save_file;
