pub mod aggregates;
pub mod entities;
pub mod error;
pub mod ids;
pub mod types;
pub mod value_objects;

pub use aggregates::{Encounter, EncounterState};
pub use entities::{FactionInfo, Hideout, LocationInfo, LocationKind, PartyInfo};
pub use error::HideoutError;
pub use ids::{BattleId, CharacterId, FactionId, HideoutId, LocationId, PartyId};
pub use types::{
    Battle, BattleSide, BattleState, CampaignBattleResult, MenuId, RosterCount,
    JOIN_ENCOUNTER_MENU,
};
pub use value_objects::{HideoutSettings, HideoutSnapshot};
