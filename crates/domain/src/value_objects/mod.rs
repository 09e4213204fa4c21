//! Value objects - immutable configuration and persisted state

mod settings;
mod snapshot;

pub use settings::HideoutSettings;
pub use snapshot::HideoutSnapshot;
