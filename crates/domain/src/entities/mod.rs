//! Domain entities - Core business objects with identity

mod hideout;
mod location;

pub use hideout::Hideout;
pub use location::{FactionInfo, LocationInfo, LocationKind, PartyInfo};
