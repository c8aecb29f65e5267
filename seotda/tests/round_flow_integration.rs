//! Integration tests for full round flows through a room session.
//!
//! These drive a `GameRoom` the way the actor does: start rounds,
//! apply actions, settle, and check the session state that results.

use seotda::game::entities::{BetAction, Chips, PlayerId};
use seotda::game::round::{RoundEnd, TurnOutcome};
use seotda::room::{GameRoom, RoomConfig, RoomError};
use uuid::Uuid;

fn open_room(stacks: Chips, ante: Chips, players: usize) -> (GameRoom, Vec<PlayerId>) {
    let config = RoomConfig {
        start_chips: stacks,
        ante,
        ..RoomConfig::default()
    };
    let host = Uuid::new_v4();
    let mut room = GameRoom::new("7777".to_string(), host, "p0".to_string(), config);
    let mut ids = vec![host];
    for i in 1..players {
        let id = Uuid::new_v4();
        room.add_player(id, format!("p{i}")).unwrap();
        ids.push(id);
    }
    (room, ids)
}

fn finish(room: &mut GameRoom, end: &RoundEnd) {
    room.finish_round(end).expect("round should settle");
}

fn total_seat_chips(room: &GameRoom) -> Chips {
    room.seats.iter().map(|s| s.chips).sum()
}

#[test]
fn test_immediate_fold_moves_only_the_ante() {
    let (mut room, ids) = open_room(10_000, 1_000, 2);
    room.start_round(Some(ids[0])).unwrap();

    let TurnOutcome::Ended(end) = room.apply_action(ids[0], BetAction::Die).unwrap() else {
        panic!("round should end");
    };
    assert_eq!(end, RoundEnd::LastManStanding { winner: Some(ids[1]) });
    finish(&mut room, &end);

    assert_eq!(room.seats[0].chips, 9_000);
    assert_eq!(room.seats[1].chips, 11_000);
}

#[test]
fn test_chips_conserved_across_a_contested_round() {
    let (mut room, ids) = open_room(20_000, 1_000, 3);
    let before = total_seat_chips(&room);
    room.start_round(Some(ids[0])).unwrap();

    room.apply_action(ids[0], BetAction::Half).unwrap();
    room.apply_action(ids[1], BetAction::Call).unwrap();
    room.apply_action(ids[2], BetAction::Ddadang).unwrap();
    room.apply_action(ids[0], BetAction::Die).unwrap();
    let outcome = room.apply_action(ids[1], BetAction::Call).unwrap();
    let TurnOutcome::Ended(end) = outcome else {
        panic!("betting should be exhausted, got {outcome:?}");
    };
    finish(&mut room, &end);

    assert_eq!(total_seat_chips(&room), before);
}

#[test]
fn test_multi_round_session_rotates_dealer() {
    let (mut room, ids) = open_room(10_000, 500, 3);

    // round 1: everyone folds to the last seat
    room.start_round(Some(ids[0])).unwrap();
    room.apply_action(ids[0], BetAction::Die).unwrap();
    let TurnOutcome::Ended(end) = room.apply_action(ids[1], BetAction::Die).unwrap() else {
        panic!("round should end");
    };
    finish(&mut room, &end);
    assert_eq!(room.last_winner_id, Some(ids[2]));

    // round 2: the winner deals and acts first
    room.start_round(Some(room.host_id)).unwrap();
    let engine = room.round.as_ref().unwrap();
    assert_eq!(engine.players[0].id, ids[2]);
    assert_eq!(engine.round_number, 2);
}

#[test]
fn test_spectator_plays_from_the_next_round() {
    let (mut room, ids) = open_room(10_000, 1_000, 2);
    room.start_round(Some(ids[0])).unwrap();

    let late = Uuid::new_v4();
    assert!(room.add_player(late, "late".to_string()).unwrap());

    // the spectator sees no hands mid-round
    let view = room.view_for(Some(late));
    let round_view = view.round.unwrap();
    assert!(round_view.players.iter().all(|p| p.hand.is_none()));

    let TurnOutcome::Ended(end) = room.apply_action(ids[0], BetAction::Die).unwrap() else {
        panic!("round should end");
    };
    finish(&mut room, &end);

    room.start_round(Some(room.host_id)).unwrap();
    let engine = room.round.as_ref().unwrap();
    assert!(engine.players.iter().any(|p| p.id == late));
    assert_eq!(engine.players.len(), 3);
}

#[test]
fn test_busted_seat_gone_before_next_eligibility_check() {
    let (mut room, ids) = open_room(1_000, 100, 2);
    room.start_round(Some(ids[0])).unwrap();

    // p0 shoves, p1 calls short or even; play it as a double all-in
    room.apply_action(ids[0], BetAction::AllIn).unwrap();
    let TurnOutcome::Ended(end) = room.apply_action(ids[1], BetAction::AllIn).unwrap() else {
        panic!("round should end");
    };
    assert_eq!(end, RoundEnd::Showdown);
    finish(&mut room, &end);

    // exactly one side busted unless the pot split evenly
    let report = room.last_result.as_ref().unwrap();
    if report.winners.len() == 1 {
        assert_eq!(room.seats.len(), 1);
        assert_eq!(room.seats[0].chips, 2_000);
        // a single funded seat cannot start another round
        assert_eq!(
            room.start_round(Some(room.host_id)).unwrap_err(),
            RoomError::NotEnoughPlayers
        );
    } else {
        // split pot: both keep their stacks
        assert_eq!(room.seats.len(), 2);
        assert_eq!(total_seat_chips(&room), 2_000);
    }
}

#[test]
fn test_disconnect_mid_round_folds_and_round_resolves() {
    let (mut room, ids) = open_room(10_000, 1_000, 2);
    room.start_round(Some(ids[0])).unwrap();

    let outcome = room.remove_player(ids[0]);
    let Some(TurnOutcome::Ended(end)) = outcome else {
        panic!("two-player disconnect on turn should end the round, got {outcome:?}");
    };
    assert_eq!(end, RoundEnd::LastManStanding { winner: Some(ids[1]) });
    finish(&mut room, &end);

    // the departed seat is gone, the survivor pocketed both antes
    assert_eq!(room.seats.len(), 1);
    assert_eq!(room.seats[0].chips, 11_000);
    assert_eq!(room.host_id, ids[1]);
}

#[test]
fn test_all_in_cascade_reaches_showdown() {
    let (mut room, ids) = open_room(5_000, 500, 4);
    room.start_round(Some(ids[0])).unwrap();

    room.apply_action(ids[0], BetAction::AllIn).unwrap();
    room.apply_action(ids[1], BetAction::AllIn).unwrap();
    room.apply_action(ids[2], BetAction::Die).unwrap();
    let TurnOutcome::Ended(end) = room.apply_action(ids[3], BetAction::AllIn).unwrap() else {
        panic!("round should end");
    };
    assert_eq!(end, RoundEnd::Showdown);

    let before: Chips = room
        .round
        .as_ref()
        .unwrap()
        .players
        .iter()
        .map(|p| p.chips)
        .sum::<Chips>()
        + room.round.as_ref().unwrap().pot;
    finish(&mut room, &end);
    assert_eq!(total_seat_chips(&room), before);
}
