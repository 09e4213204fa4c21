//! Shared vocabulary types for encounters and battles

mod battle;
mod menu;

pub use battle::{Battle, BattleSide, BattleState, CampaignBattleResult, RosterCount};
pub use menu::{MenuId, JOIN_ENCOUNTER_MENU};
