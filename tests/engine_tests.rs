//! Engine tests against scripted seats.
//!
//! Rounds are driven from explicit card orders so every payout can be
//! checked exactly.

mod common;

use std::time::Duration;

use common::{Reply, ScriptedSeat};
use temple_run::cards::{Card, TrapType, ROUNDS, TRAP_COPIES};
use temple_run::core::{MatchConfig, PlayerId};
use temple_run::error::GameError;
use temple_run::rules::{Game, MatchPhase, Move, RoundEnd};

use Move::{Leave, Stay};

fn p(i: u8) -> PlayerId {
    PlayerId::new(i)
}

fn config() -> MatchConfig {
    MatchConfig::new()
        .with_seed(7)
        .with_turn_time(Duration::from_millis(20))
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Two players, deck [T5, T5, Artifact]. A leaves after the first card,
/// B after the second.
#[tokio::test]
async fn test_two_player_round_exact_payouts() {
    let a = ScriptedSeat::new(0).moves(&[Leave]);
    let b = ScriptedSeat::new(1).moves(&[Stay, Leave]);
    let mut game = Game::new(vec![a, b], config());

    let summary = game
        .play_round_with(vec![Card::Treasure(5), Card::Treasure(5), Card::Artifact])
        .await
        .unwrap();

    // A: 5/2 = 2 plus the lone leftover 1. B: 2 plus the whole second 5.
    assert_eq!(game.wealth(p(0)), 3);
    assert_eq!(game.wealth(p(1)), 7);
    assert_eq!(summary.round, 1);
    assert_eq!(summary.turns, 2);
    assert_eq!(summary.end, RoundEnd::AllLeft);
    assert_eq!(summary.payouts[p(0)], 3);
    assert_eq!(summary.payouts[p(1)], 7);

    // The artifact was never drawn, and a sole leaver cleared the counter.
    assert_eq!(game.deck().remaining(), 1);
    assert_eq!(game.deck().artifact_accumulator(), 0);
    assert_eq!(game.ledger().taken(), 0);
}

#[tokio::test]
async fn test_turn_broadcast_reaches_out_players() {
    let a = ScriptedSeat::new(0).moves(&[Leave]);
    let b = ScriptedSeat::new(1).moves(&[Stay, Leave]);
    let mut game = Game::new(vec![a, b], config());

    game.play_round_with(vec![Card::Treasure(5), Card::Trap(TrapType::Mummy)])
        .await
        .unwrap();

    let heard = &game.seats()[p(0)].heard;
    assert_eq!(
        heard,
        &vec![
            lines(&["turn 1 1", "players stay stay", "treasure 5", "end"]),
            lines(&["turn 1 2", "players out stay", "trap mummy", "end"]),
        ]
    );
    assert_eq!(game.seats()[p(1)].heard, *heard);

    // Only players inside are asked.
    assert_eq!(game.seats()[p(0)].polls, 1);
    assert_eq!(game.seats()[p(1)].polls, 2);
}

#[tokio::test]
async fn test_second_trap_ends_round_without_payout() {
    let a = ScriptedSeat::new(0).otherwise(Reply::Move(Stay));
    let b = ScriptedSeat::new(1).otherwise(Reply::Move(Stay));
    let mut game = Game::new(vec![a, b], config());

    let summary = game
        .play_round_with(vec![
            Card::Treasure(7),
            Card::Trap(TrapType::Fire),
            Card::Trap(TrapType::Fire),
            Card::Treasure(17),
        ])
        .await
        .unwrap();

    assert_eq!(summary.end, RoundEnd::Trap(TrapType::Fire));
    assert_eq!(summary.turns, 3);
    assert_eq!(game.wealth(p(0)), 0);
    assert_eq!(game.wealth(p(1)), 0);
    assert_eq!(game.deck().trap_copies(TrapType::Fire), TRAP_COPIES - 1);
    assert_eq!(game.deck().trap_copies(TrapType::Mummy), TRAP_COPIES);

    // No moves are collected on the turn the trap springs.
    assert_eq!(game.seats()[p(0)].polls, 2);
}

#[tokio::test]
async fn test_silent_player_defaults_to_leave() {
    let a = ScriptedSeat::new(0).then(Reply::Silent);
    let b = ScriptedSeat::new(1).moves(&[Leave]);
    let mut game = Game::new(vec![a, b], config());

    let summary = game
        .play_round_with(vec![Card::Treasure(5), Card::Treasure(9)])
        .await
        .unwrap();

    // Both left together: 2 each, the leftover 1 cannot be split two ways.
    assert_eq!(summary.turns, 1);
    assert_eq!(game.wealth(p(0)), 2);
    assert_eq!(game.wealth(p(1)), 2);
}

#[tokio::test]
async fn test_invalid_move_aborts_match() {
    let a = ScriptedSeat::new(0).moves(&[Stay]);
    let b = ScriptedSeat::new(1).then(Reply::Token("jump".to_string()));
    let mut game = Game::new(vec![a, b], config());

    let err = game
        .play_round_with(vec![Card::Treasure(5), Card::Treasure(5)])
        .await
        .unwrap_err();

    match err {
        GameError::InvalidMove { player, token } => {
            assert_eq!(player, p(1));
            assert_eq!(token, "jump");
        }
        other => panic!("expected InvalidMove, got {other:?}"),
    }
}

#[tokio::test]
async fn test_sole_leaver_takes_artifacts() {
    let a = ScriptedSeat::new(0).moves(&[Leave]);
    let b = ScriptedSeat::new(1).moves(&[Stay, Leave]);
    let c = ScriptedSeat::new(2).moves(&[Stay, Leave]);
    let mut game = Game::new(vec![a, b, c], config());

    game.play_round_with(vec![Card::Artifact, Card::Artifact, Card::Treasure(4)])
        .await
        .unwrap();

    // A alone claims the first artifact (5). B and C leave together after
    // the second artifact, so nobody claims it.
    assert_eq!(game.wealth(p(0)), 5);
    assert_eq!(game.wealth(p(1)), 0);
    assert_eq!(game.wealth(p(2)), 0);
    assert_eq!(game.ledger().taken(), 1);
}

#[tokio::test]
async fn test_three_way_leftovers_carry_to_later_leavers() {
    let a = ScriptedSeat::new(0).moves(&[Leave]);
    let b = ScriptedSeat::new(1).moves(&[Leave]);
    let c = ScriptedSeat::new(2).moves(&[Stay, Leave]);
    let mut game = Game::new(vec![a, b, c], config());

    game.play_round_with(vec![Card::Treasure(11), Card::Treasure(1)])
        .await
        .unwrap();

    // 11 / 3 = 3 each, leftover 2. A and B take 1 more each.
    assert_eq!(game.wealth(p(0)), 4);
    assert_eq!(game.wealth(p(1)), 4);
    // C takes 3 plus the whole 1.
    assert_eq!(game.wealth(p(2)), 4);
}

#[tokio::test]
async fn test_deck_exhaustion_is_reported() {
    let a = ScriptedSeat::new(0).otherwise(Reply::Move(Stay));
    let mut game = Game::new(vec![a], config());

    let err = game
        .play_round_with(vec![Card::Treasure(1)])
        .await
        .unwrap_err();

    assert!(matches!(err, GameError::DeckExhausted { round: 1, turn: 2 }));
    assert_eq!(err.player(), None);
}

#[tokio::test]
async fn test_handshake_sends_setup() {
    let mut game = Game::new(
        vec![ScriptedSeat::new(0), ScriptedSeat::new(1)],
        config()
            .with_option("difficulty", "hard")
            .unwrap(),
    );

    game.handshake().await.unwrap();

    assert_eq!(
        game.seats()[p(1)].heard,
        vec![lines(&[
            "loadtime 100",
            "turntime 20",
            "nplayers 2",
            "difficulty hard",
            "you 1",
            "end",
        ])]
    );
}

#[tokio::test]
async fn test_handshake_rejects_wrong_greeting() {
    let a = ScriptedSeat::new(0);
    let b = ScriptedSeat::new(1).answering_ready_with(Some("hello"));
    let mut game = Game::new(vec![a, b], config());

    let err = game.handshake().await.unwrap_err();
    assert!(matches!(err, GameError::BadBot { .. }));
    assert_eq!(err.player(), Some(p(1)));
}

#[tokio::test]
async fn test_handshake_rejects_silence() {
    let a = ScriptedSeat::new(0).answering_ready_with(None);
    let b = ScriptedSeat::new(1);
    let mut game = Game::new(vec![a, b], config());

    let err = game.play().await.unwrap_err();
    assert_eq!(err.player(), Some(p(0)));
    assert_eq!(game.phase(), MatchPhase::NotStarted);
}

#[tokio::test]
async fn test_dead_seat_is_bad_bot() {
    let a = ScriptedSeat::new(0).otherwise(Reply::Move(Stay));
    let mut b = ScriptedSeat::new(1).moves(&[Leave]);
    b.alive = false;
    let mut game = Game::new(vec![a, b], config());

    let err = game
        .play_round_with(vec![Card::Treasure(3)])
        .await
        .unwrap_err();

    assert!(matches!(err, GameError::BadBot { player, .. } if player == p(1)));
}

#[tokio::test]
async fn test_full_match_phases() {
    let mut game = Game::new(
        vec![ScriptedSeat::new(0), ScriptedSeat::new(1)],
        config(),
    );
    assert_eq!(game.phase(), MatchPhase::NotStarted);

    let standings = game.play().await.unwrap();
    assert_eq!(game.phase(), MatchPhase::MatchComplete);

    // Everybody leaves after the first card of each round.
    for seat in game.seats().values() {
        assert_eq!(seat.turns_heard().len(), ROUNDS as usize);
        assert_eq!(seat.polls, ROUNDS as usize);
    }
    assert_eq!(standings.wealth(p(0)), standings.wealth(p(1)));
    assert_eq!(standings.wealth(p(0)), game.wealth(p(0)));
}

#[tokio::test]
async fn test_round_phase_and_numbering() {
    let mut game = Game::new(vec![ScriptedSeat::new(0)], config());

    game.play_round_with(vec![Card::Treasure(2)]).await.unwrap();
    assert_eq!(game.phase(), MatchPhase::RoundInProgress { round: 1 });

    let summary = game.play_round_with(vec![Card::Treasure(3)]).await.unwrap();
    assert_eq!(summary.round, 2);
    assert_eq!(game.phase(), MatchPhase::RoundInProgress { round: 2 });
    assert_eq!(game.seats()[p(0)].heard[1][0], "turn 2 1");
    assert_eq!(game.wealth(p(0)), 5);
}

#[tokio::test]
async fn test_seeded_matches_repeat() {
    async fn run(seed: u64) -> Vec<Vec<String>> {
        let seats = vec![
            ScriptedSeat::new(0).otherwise(Reply::Move(Stay)),
            ScriptedSeat::new(1).moves(&[Stay, Stay, Leave]),
        ];
        let mut game = Game::new(seats, MatchConfig::new().with_seed(seed));
        game.play_round().await.ok();
        game.seats()[PlayerId::new(1)].heard.clone()
    }

    assert_eq!(run(99).await, run(99).await);
}

#[tokio::test]
async fn test_shutdown_is_idempotent() {
    let mut game = Game::new(
        vec![ScriptedSeat::new(0), ScriptedSeat::new(1)],
        config(),
    );

    game.shutdown().await;
    game.shutdown().await;

    for seat in game.seats().values() {
        assert!(!seat.alive);
        assert_eq!(seat.shutdowns, 2);
    }
}
