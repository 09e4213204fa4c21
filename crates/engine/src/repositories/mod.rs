//! Repository modules - session-scoped hideout bookkeeping.
//!
//! The registry owns the hideout records; the pool groups their ids by
//! owning faction. Neither enforces the one-active-per-faction rule; that is
//! the lifecycle manager's job.

pub mod hideout_pool;
pub mod hideout_registry;
pub mod random;

pub use hideout_pool::HideoutPool;
pub use hideout_registry::HideoutRegistry;
pub use random::RandomService;
