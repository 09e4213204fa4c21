//! Per-tick handling while the player waits on a hideout battle.

use hideout_domain::{Encounter, EncounterState, HideoutError, JOIN_ENCOUNTER_MENU};

use super::HideoutEncounters;
use crate::use_cases::HideoutManager;

const PARTY_VARIABLE: &str = "PARTY";
const ENCOUNTER_TEXT_VARIABLE: &str = "ENCOUNTER_TEXT";
const ENCOUNTERED_TEXT: &str = "str_you_have_encountered_PARTY";
const ENCOUNTERED_SURRENDERED_TEXT: &str = "str_you_have_encountered_PARTY_they_surrendered";

/// Which branch `wait_tick` took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The host continued the battle
    BattleContinued,
    /// The battle is decided; the encounter moved to `PrepareResults`
    ResultsPrepared,
    /// Nothing was decided this tick
    NoProgress,
}

impl HideoutEncounters {
    /// Run one simulation tick of a hideout battle the player is waiting on.
    ///
    /// Returns `Ok(None)` for encounters that are not hideout battles.
    pub fn wait_tick(
        &self,
        manager: &mut HideoutManager,
        encounter: &mut Encounter,
    ) -> Result<Option<WaitOutcome>, HideoutError> {
        let Some(target) = Self::hideout_battle(manager, encounter) else {
            return Ok(None);
        };
        let player_side = encounter.player_side();
        let opponent_side = player_side.opposite();

        if let Some(name) = self.battles.leader_party_name(target.battle_id, opponent_side) {
            self.menus.set_text_variable(PARTY_VARIABLE, &name);
        }
        let text = if encounter.enemy_surrendered() {
            ENCOUNTERED_SURRENDERED_TEXT
        } else {
            ENCOUNTERED_TEXT
        };
        self.menus.set_text_variable(ENCOUNTER_TEXT_VARIABLE, text);

        if self.battles.should_continue_battle(target.battle_id) {
            self.battles.continue_battle(target.battle_id);
            return Ok(Some(WaitOutcome::BattleContinued));
        }

        if let Some(result) = encounter.battle_result().filter(|r| r.battle_resolved) {
            if result.player_victory {
                self.override_winner(encounter, target.battle_id, player_side);
            } else {
                manager.refresh_attack_cooldown(&target.hideout_id, self.clock.now())?;
                if self.battles.side_member_count(target.battle_id, player_side) == 0 {
                    self.override_winner(encounter, target.battle_id, opponent_side);
                }
            }
            encounter.set_state(EncounterState::PrepareResults);
            return Ok(Some(WaitOutcome::ResultsPrepared));
        }

        if encounter.is_battle_simulation() && encounter.battle_state().is_decisive() {
            let winner = encounter.battle().and_then(|b| b.winning_side());
            if winner == Some(player_side) {
                encounter.set_enemy_surrendered();
            } else if self.battles.player_roster().is_incapacitated() {
                encounter.set_player_surrendered();
            }
            encounter.set_state(EncounterState::PrepareResults);
            return Ok(Some(WaitOutcome::ResultsPrepared));
        }

        encounter.mark_state_handled();
        if encounter.is_joined_battle()
            && self.menus.current_menu().as_deref() == Some(JOIN_ENCOUNTER_MENU)
        {
            self.battles.leave_battle(target.battle_id);
            tracing::debug!(battle_id = %target.battle_id, "Left joined hideout battle");
        }
        manager.refresh_attack_cooldown(&target.hideout_id, self.clock.now())?;
        Ok(Some(WaitOutcome::NoProgress))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, TimeZone, Utc};
    use hideout_domain::{
        Battle, BattleId, BattleSide, BattleState, CampaignBattleResult, Hideout, HideoutId,
        HideoutSettings, LocationId, PartyId, RosterCount,
    };

    use crate::infrastructure::clock::{FixedClock, FixedRandom};
    use crate::infrastructure::ports::{MockBattlePort, MockMenuPort};
    use crate::test_fixtures::{default_manager, manager_for, SeededWorld, WorldSeeder};

    use super::*;

    fn camp() -> (SeededWorld, LocationId) {
        let mut seeder = WorldSeeder::new();
        let forest = seeder.faction("Forest Brotherhood");
        let camp = seeder.hideout_with(
            &forest,
            Hideout::new("a", forest.id, LocationId::new()).with_active(true),
        );
        (seeder.build(), camp)
    }

    fn encounter_at(camp: LocationId) -> (Encounter, BattleId) {
        let battle_id = BattleId::new();
        let mut encounter = Encounter::new(PartyId::new(), camp, HideoutId::new("a"));
        encounter.attach_battle(Battle::hideout(battle_id, camp));
        encounter.start_waiting();
        (encounter, battle_id)
    }

    /// Battle port answering the text lookups and saying the fight is over.
    fn quiet_battles() -> MockBattlePort {
        let mut battles = MockBattlePort::new();
        battles
            .expect_leader_party_name()
            .returning(|_, _| Some("Forest Brotherhood".to_string()));
        battles.expect_should_continue_battle().returning(|_| false);
        battles
    }

    fn text_menus() -> MockMenuPort {
        let mut menus = MockMenuPort::new();
        menus.expect_set_text_variable().return_const(());
        menus
    }

    fn encounters(
        battles: MockBattlePort,
        menus: MockMenuPort,
        seeded: &SeededWorld,
    ) -> HideoutEncounters {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        HideoutEncounters::new(
            seeded.world.clone(),
            Arc::new(battles),
            Arc::new(menus),
            Arc::new(FixedClock(now)),
        )
    }

    fn cooldown_of(manager: &HideoutManager) -> Option<chrono::DateTime<Utc>> {
        manager
            .hideout(&HideoutId::new("a"))
            .ok()
            .and_then(Hideout::next_possible_attack_time)
    }

    #[test]
    fn when_battle_should_continue_then_continued_and_texts_set() {
        let (seeded, camp) = camp();
        let mut manager = default_manager(&seeded);
        let (mut encounter, battle_id) = encounter_at(camp);

        let mut battles = MockBattlePort::new();
        battles
            .expect_leader_party_name()
            .withf(move |id, side| *id == battle_id && *side == BattleSide::Defender)
            .returning(|_, _| Some("Forest Brotherhood".to_string()));
        battles.expect_should_continue_battle().returning(|_| true);
        battles
            .expect_continue_battle()
            .withf(move |id| *id == battle_id)
            .times(1)
            .return_const(());
        let mut menus = MockMenuPort::new();
        menus
            .expect_set_text_variable()
            .withf(|name, value| {
                name.to_string() == "PARTY" && value.to_string() == "Forest Brotherhood"
            })
            .times(1)
            .return_const(());
        menus
            .expect_set_text_variable()
            .withf(|name, value| {
                name.to_string() == "ENCOUNTER_TEXT"
                    && value.to_string() == "str_you_have_encountered_PARTY"
            })
            .times(1)
            .return_const(());
        let encounters = encounters(battles, menus, &seeded);

        let outcome = encounters.wait_tick(&mut manager, &mut encounter).unwrap();

        assert_eq!(outcome, Some(WaitOutcome::BattleContinued));
        assert_eq!(encounter.state(), EncounterState::Wait);
    }

    #[test]
    fn when_player_won_fought_battle_then_player_side_forced_winner() {
        let (seeded, camp) = camp();
        let mut manager = default_manager(&seeded);
        let (mut encounter, battle_id) = encounter_at(camp);
        encounter.record_battle_result(CampaignBattleResult {
            battle_resolved: true,
            player_victory: true,
        });

        let mut battles = quiet_battles();
        battles
            .expect_set_override_winner()
            .withf(move |id, side| *id == battle_id && *side == BattleSide::Attacker)
            .times(1)
            .return_const(());
        let encounters = encounters(battles, text_menus(), &seeded);

        let outcome = encounters.wait_tick(&mut manager, &mut encounter).unwrap();

        assert_eq!(outcome, Some(WaitOutcome::ResultsPrepared));
        assert_eq!(encounter.state(), EncounterState::PrepareResults);
        assert_eq!(
            encounter.battle().and_then(|b| b.winning_side()),
            Some(BattleSide::Attacker)
        );
        assert_eq!(cooldown_of(&manager), None);
    }

    #[test]
    fn when_player_lost_with_no_one_standing_then_opponent_forced_winner() {
        let (seeded, camp) = camp();
        let mut manager = default_manager(&seeded);
        let (mut encounter, battle_id) = encounter_at(camp);
        encounter.record_battle_result(CampaignBattleResult {
            battle_resolved: true,
            player_victory: false,
        });

        let mut battles = quiet_battles();
        battles
            .expect_side_member_count()
            .withf(move |id, side| *id == battle_id && *side == BattleSide::Attacker)
            .returning(|_, _| 0);
        battles
            .expect_set_override_winner()
            .withf(|_, side| *side == BattleSide::Defender)
            .times(1)
            .return_const(());
        let encounters = encounters(battles, text_menus(), &seeded);

        let outcome = encounters.wait_tick(&mut manager, &mut encounter).unwrap();

        assert_eq!(outcome, Some(WaitOutcome::ResultsPrepared));
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap() + Duration::hours(12);
        assert_eq!(cooldown_of(&manager), Some(expected));
    }

    #[test]
    fn when_player_lost_but_still_standing_then_no_override() {
        let (seeded, camp) = camp();
        let mut manager = default_manager(&seeded);
        let (mut encounter, _) = encounter_at(camp);
        encounter.record_battle_result(CampaignBattleResult {
            battle_resolved: true,
            player_victory: false,
        });

        let mut battles = quiet_battles();
        battles.expect_side_member_count().returning(|_, _| 4);
        battles.expect_set_override_winner().never();
        let encounters = encounters(battles, text_menus(), &seeded);

        let outcome = encounters.wait_tick(&mut manager, &mut encounter).unwrap();

        assert_eq!(outcome, Some(WaitOutcome::ResultsPrepared));
        assert!(cooldown_of(&manager).is_some());
    }

    #[test]
    fn when_simulation_won_then_enemy_surrenders() {
        let (seeded, camp) = camp();
        let mut manager = default_manager(&seeded);
        let (mut encounter, _) = encounter_at(camp);
        encounter.set_battle_simulation(true);
        if let Some(battle) = encounter.battle_mut() {
            battle.state = BattleState::AttackerVictory;
        }
        let encounters = encounters(quiet_battles(), text_menus(), &seeded);

        let outcome = encounters.wait_tick(&mut manager, &mut encounter).unwrap();

        assert_eq!(outcome, Some(WaitOutcome::ResultsPrepared));
        assert!(encounter.enemy_surrendered());
        assert!(!encounter.player_surrendered());
    }

    #[test]
    fn when_simulation_lost_and_party_incapacitated_then_player_surrenders() {
        let (seeded, camp) = camp();
        let mut manager = default_manager(&seeded);
        let (mut encounter, _) = encounter_at(camp);
        encounter.set_battle_simulation(true);
        if let Some(battle) = encounter.battle_mut() {
            battle.state = BattleState::DefenderVictory;
        }
        let mut battles = quiet_battles();
        battles.expect_player_roster().returning(|| RosterCount {
            total: 20,
            wounded: 20,
        });
        let encounters = encounters(battles, text_menus(), &seeded);

        let outcome = encounters.wait_tick(&mut manager, &mut encounter).unwrap();

        assert_eq!(outcome, Some(WaitOutcome::ResultsPrepared));
        assert!(encounter.player_surrendered());
        assert!(!encounter.enemy_surrendered());
    }

    #[test]
    fn when_no_progress_in_joined_battle_then_player_leaves() {
        let (seeded, camp) = camp();
        let mut manager = default_manager(&seeded);
        let battle_id = BattleId::new();
        let mut encounter = Encounter::new(PartyId::new(), camp, HideoutId::new("a"))
            .joined_on(BattleSide::Attacker);
        encounter.attach_battle(Battle::hideout(battle_id, camp));

        let mut battles = quiet_battles();
        battles
            .expect_leave_battle()
            .withf(move |id| *id == battle_id)
            .times(1)
            .return_const(());
        let mut menus = text_menus();
        menus
            .expect_current_menu()
            .returning(|| Some(JOIN_ENCOUNTER_MENU.to_string()));
        let encounters = encounters(battles, menus, &seeded);

        let outcome = encounters.wait_tick(&mut manager, &mut encounter).unwrap();

        assert_eq!(outcome, Some(WaitOutcome::NoProgress));
        assert!(encounter.is_state_handled());
        assert!(cooldown_of(&manager).is_some());
    }

    #[test]
    fn when_no_progress_in_own_battle_then_player_stays() {
        let (seeded, camp) = camp();
        let mut manager = default_manager(&seeded);
        let (mut encounter, _) = encounter_at(camp);

        let mut battles = quiet_battles();
        battles.expect_leave_battle().never();
        let encounters = encounters(battles, text_menus(), &seeded);

        let outcome = encounters.wait_tick(&mut manager, &mut encounter).unwrap();

        assert_eq!(outcome, Some(WaitOutcome::NoProgress));
        assert!(encounter.is_state_handled());
        assert!(cooldown_of(&manager).is_some());
    }

    #[test]
    fn when_cooldown_setting_is_out_of_range_then_tick_still_refreshes() {
        let (seeded, camp) = camp();
        let settings = HideoutSettings {
            attack_cooldown_hours: 9_000_000_000_000_000,
            ..HideoutSettings::default()
        };
        let mut manager = manager_for(&seeded, Arc::new(FixedRandom(0)), settings);
        let (mut encounter, _) = encounter_at(camp);
        let encounters = encounters(quiet_battles(), text_menus(), &seeded);

        let outcome = encounters.wait_tick(&mut manager, &mut encounter).unwrap();

        assert_eq!(outcome, Some(WaitOutcome::NoProgress));
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        assert!(cooldown_of(&manager).is_some_and(|next| next > now + Duration::days(365)));
    }

    #[test]
    fn when_enemy_surrendered_then_surrender_text_shown() {
        let (seeded, camp) = camp();
        let mut manager = default_manager(&seeded);
        let (mut encounter, _) = encounter_at(camp);
        encounter.set_enemy_surrendered();

        let mut battles = MockBattlePort::new();
        battles.expect_leader_party_name().returning(|_, _| None);
        battles.expect_should_continue_battle().returning(|_| true);
        battles.expect_continue_battle().return_const(());
        let mut menus = MockMenuPort::new();
        menus
            .expect_set_text_variable()
            .withf(|name, value| {
                name.to_string() == "ENCOUNTER_TEXT"
                    && value.to_string() == "str_you_have_encountered_PARTY_they_surrendered"
            })
            .times(1)
            .return_const(());
        let encounters = encounters(battles, menus, &seeded);

        encounters.wait_tick(&mut manager, &mut encounter).unwrap();
    }
}
