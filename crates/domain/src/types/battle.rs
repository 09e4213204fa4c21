//! Battle vocabulary shared between the encounter state machine and the
//! host's combat system.

use serde::{Deserialize, Serialize};

use crate::ids::{BattleId, LocationId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleSide {
    Attacker,
    Defender,
}

impl BattleSide {
    pub fn opposite(self) -> Self {
        match self {
            BattleSide::Attacker => BattleSide::Defender,
            BattleSide::Defender => BattleSide::Attacker,
        }
    }
}

/// How far a battle has been decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleState {
    #[default]
    None,
    AttackerVictory,
    DefenderVictory,
}

impl BattleState {
    pub fn winner(self) -> Option<BattleSide> {
        match self {
            BattleState::None => None,
            BattleState::AttackerVictory => Some(BattleSide::Attacker),
            BattleState::DefenderVictory => Some(BattleSide::Defender),
        }
    }

    pub fn is_decisive(self) -> bool {
        self.winner().is_some()
    }
}

/// A battle (map event) as the host reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Battle {
    pub id: BattleId,
    /// Location the battle is fought at, if any
    pub location_id: Option<LocationId>,
    pub is_hideout_battle: bool,
    pub state: BattleState,
    /// Winner forced by the encounter, overriding `state`
    pub override_winner: Option<BattleSide>,
}

impl Battle {
    pub fn hideout(id: BattleId, location_id: LocationId) -> Self {
        Self {
            id,
            location_id: Some(location_id),
            is_hideout_battle: true,
            state: BattleState::None,
            override_winner: None,
        }
    }

    pub fn winning_side(&self) -> Option<BattleSide> {
        self.override_winner.or(self.state.winner())
    }

    pub fn set_override_winner(&mut self, side: BattleSide) {
        self.override_winner = Some(side);
    }

    pub fn reset_results(&mut self) {
        self.state = BattleState::None;
        self.override_winner = None;
    }
}

/// Result of a fought (not simulated) battle mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CampaignBattleResult {
    pub battle_resolved: bool,
    pub player_victory: bool,
}

/// Head count of a party roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RosterCount {
    pub total: u32,
    pub wounded: u32,
}

impl RosterCount {
    pub fn healthy(&self) -> u32 {
        self.total.saturating_sub(self.wounded)
    }

    pub fn is_incapacitated(&self) -> bool {
        self.healthy() == 0
    }
}
