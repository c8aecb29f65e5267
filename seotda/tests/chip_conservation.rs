//! Property tests for chip accounting.
//!
//! For any sequence of legal actions, the pot always equals the sum of
//! the players' bets, and once a round settles the total chip supply
//! is exactly what it was before the deal.

use proptest::prelude::*;
use seotda::game::entities::{BetAction, Chips, SeatedPlayer};
use seotda::game::round::{RoundEngine, TurnOutcome};
use seotda::game::settlement;
use uuid::Uuid;

fn seats(stacks: &[Chips]) -> Vec<SeatedPlayer> {
    stacks
        .iter()
        .enumerate()
        .map(|(i, &chips)| SeatedPlayer::new(Uuid::new_v4(), format!("p{i}"), chips, false))
        .collect()
}

fn action_from(code: u8) -> BetAction {
    match code % 5 {
        0 => BetAction::Die,
        1 => BetAction::Call,
        2 => BetAction::Half,
        3 => BetAction::Ddadang,
        _ => BetAction::AllIn,
    }
}

fn pot_matches_bets(engine: &RoundEngine) -> bool {
    engine.pot == engine.players.iter().map(|p| p.bet_amount).sum::<Chips>()
}

fn total_chips(engine: &RoundEngine) -> Chips {
    engine.players.iter().map(|p| p.chips).sum::<Chips>() + engine.pot
}

proptest! {
    #[test]
    fn pot_always_equals_sum_of_bets(
        stacks in prop::collection::vec(1_000u32..50_000, 2..=5),
        ante in 100u32..1_000,
        actions in prop::collection::vec(0u8..5, 1..40),
    ) {
        let entrants = seats(&stacks);
        let mut engine = RoundEngine::new(&entrants, ante, 1);
        prop_assert!(pot_matches_bets(&engine));

        for code in actions {
            let Some(current) = engine.current_player() else {
                break;
            };
            let player_id = current.id;
            let outcome = engine
                .apply_action(player_id, action_from(code))
                .expect("action from the player on turn must be accepted");
            prop_assert!(pot_matches_bets(&engine));
            if matches!(outcome, TurnOutcome::Ended(_)) {
                break;
            }
        }
    }

    #[test]
    fn settlement_conserves_the_chip_supply(
        stacks in prop::collection::vec(1_000u32..50_000, 2..=5),
        ante in 100u32..1_000,
        actions in prop::collection::vec(0u8..5, 1..60),
    ) {
        let entrants = seats(&stacks);
        let supply: Chips = stacks.iter().sum();
        let mut engine = RoundEngine::new(&entrants, ante, 1);
        prop_assert_eq!(total_chips(&engine), supply);

        let mut ended = None;
        for code in actions {
            let Some(current) = engine.current_player() else {
                break;
            };
            let player_id = current.id;
            match engine.apply_action(player_id, action_from(code)).unwrap() {
                TurnOutcome::Continue => {}
                TurnOutcome::Ended(end) => {
                    ended = Some(end);
                    break;
                }
            }
        }
        // exhaust betting if the action tape ran out early
        let end = match ended {
            Some(end) => end,
            None => loop {
                match engine.current_player().map(|p| p.id) {
                    Some(id) => match engine.apply_action(id, BetAction::Call).unwrap() {
                        TurnOutcome::Continue => {}
                        TurnOutcome::Ended(end) => break end,
                    },
                    None => break match engine.advance_turn() {
                        TurnOutcome::Ended(end) => end,
                        TurnOutcome::Continue => unreachable!("no player on turn"),
                    },
                }
            },
        };

        let report = settlement::settle(&mut engine, &end);
        prop_assert_eq!(engine.pot, 0);
        prop_assert_eq!(total_chips(&engine), supply);
        // the distributed pot equals everyone's winnings
        let paid: Chips = report.results.iter().map(|r| r.winnings).sum();
        prop_assert_eq!(paid, report.pot);
    }

    #[test]
    fn raises_reopen_betting_and_calls_do_not(
        stacks in prop::collection::vec(20_000u32..50_000, 3..=5),
        ante in 100u32..500,
    ) {
        let entrants = seats(&stacks);
        let mut engine = RoundEngine::new(&entrants, ante, 1);

        // a call never clears another player's acted flag
        let first = engine.current_player().unwrap().id;
        engine.apply_action(first, BetAction::Call).unwrap();
        let acted_after_call: Vec<bool> =
            engine.players.iter().map(|p| p.acted_this_round).collect();
        prop_assert_eq!(acted_after_call.iter().filter(|&&a| a).count(), 1);

        // a raise clears everyone else's
        let second = engine.current_player().unwrap().id;
        engine.apply_action(second, BetAction::Half).unwrap();
        let acted: Vec<(bool, bool)> = engine
            .players
            .iter()
            .map(|p| (p.id == second, p.acted_this_round))
            .collect();
        for (is_raiser, acted_flag) in acted {
            prop_assert_eq!(acted_flag, is_raiser);
        }
    }
}
