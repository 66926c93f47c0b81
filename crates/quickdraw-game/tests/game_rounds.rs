//! Engine-level round and turn scenarios, driven deterministically with a
//! seeded RNG and hand-rolled instants.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use quickdraw_game::{GameConfig, GameEngine, Lifecycle, Step, TimerRequest};
use quickdraw_protocol::{GameEvent, GameMode, Player, PlayerId};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

/// Engine with the given named players (ids assigned 1..) and a fixed seed.
fn engine_with(names: &[&str], seed: u64) -> (GameEngine, HashMap<String, PlayerId>) {
    let mut engine = GameEngine::with_rng(GameConfig::default(), StdRng::seed_from_u64(seed));
    let mut ids = HashMap::new();
    for (i, name) in names.iter().enumerate() {
        let id = PlayerId(i as u64 + 1);
        engine.add_player(Player::new(id, *name)).unwrap();
        ids.insert(name.to_string(), id);
    }
    (engine, ids)
}

/// Extracts the (username, token) of the `TurnPresented` event in a step.
fn presented(step: &Step) -> (String, String) {
    for event in &step.events {
        if let GameEvent::TurnPresented { username, token } = event {
            return (username.clone(), token.clone());
        }
    }
    panic!("expected a TurnPresented event, got {:?}", step.events);
}

fn new_round_announced(step: &Step) -> bool {
    step.events
        .iter()
        .any(|e| matches!(e, GameEvent::RoundStarted { .. }))
}

/// Plays turns with correct answers until a round boundary (or the end of
/// the game), returning the presented usernames and the final step.
fn play_round_correct(
    engine: &mut GameEngine,
    ids: &HashMap<String, PlayerId>,
) -> (Vec<String>, Step) {
    let mut seen = Vec::new();
    loop {
        let t = Instant::now();
        let step = engine.present_turn(t);
        let (name, token) = presented(&step);
        seen.push(name.clone());
        let step = engine.submit_turn(ids[&name], &token, t + ms(5));
        if step.ended || new_round_announced(&step) {
            return (seen, step);
        }
    }
}

#[test]
fn test_two_player_speed_game_runs_to_a_winner() {
    let (mut engine, ids) = engine_with(&["alice", "bob"], 11);

    let start = engine.start().unwrap();
    assert!(matches!(
        start.events[..],
        [GameEvent::RoundStarted { speed_budget_ms: 4000 }]
    ));
    assert!(
        matches!(start.timer, Some(TimerRequest::Present { after }) if after == ms(3000))
    );

    // First challenge: a 1-letter token for a random player.
    let t0 = Instant::now();
    let step = engine.present_turn(t0);
    let (first, token) = presented(&step);
    assert_eq!(token.chars().count(), 1);
    assert!(
        matches!(step.timer, Some(TimerRequest::Deadline { after }) if after == ms(4000))
    );
    assert!(engine.is_current_player(ids[&first]));

    // Correct answer well under budget, lowercased.
    let step = engine.submit_turn(ids[&first], &token.to_lowercase(), t0 + ms(10));
    assert!(matches!(
        step.events[0],
        GameEvent::TurnPassed { elapsed_ms: 10, .. }
    ));
    // Mid-round: the other player still owes a turn, no round announcement.
    assert!(!new_round_announced(&step));
    assert!(!engine.is_current_player(ids[&first]));

    // Second challenge goes to the other player, who never answers.
    let t1 = Instant::now();
    let step = engine.present_turn(t1);
    let (second, _) = presented(&step);
    assert_ne!(second, first);

    let step = engine.deadline_expired(t1 + ms(4000));
    assert!(matches!(
        step.events[0],
        GameEvent::TooSlow { elapsed_ms: 4000, .. }
    ));
    assert!(matches!(
        step.events[1],
        GameEvent::Won { ref username } if *username == first
    ));
    assert!(step.ended);
    assert!(step.timer.is_none());
    assert_eq!(engine.lifecycle(), Lifecycle::Ended);
}

#[test]
fn test_matching_ignores_case_and_whitespace() {
    let (mut engine, ids) = engine_with(&["alice", "bob"], 3);
    engine.start().unwrap();

    let t = Instant::now();
    let step = engine.present_turn(t);
    let (name, token) = presented(&step);

    let padded = format!("  {} \t", token.to_lowercase());
    let step = engine.submit_turn(ids[&name], &padded, t + ms(50));
    assert!(matches!(step.events[0], GameEvent::TurnPassed { .. }));
    assert_eq!(engine.player_count(), 2);
}

#[test]
fn test_late_submission_eliminates_even_with_correct_text() {
    let (mut engine, ids) = engine_with(&["alice", "bob"], 5);
    engine.start().unwrap();

    let t = Instant::now();
    let step = engine.present_turn(t);
    let (name, token) = presented(&step);

    // One millisecond over budget — the text being right doesn't matter.
    let step = engine.submit_turn(ids[&name], &token, t + ms(4001));
    assert!(matches!(
        step.events[0],
        GameEvent::TooSlow { elapsed_ms: 4001, .. }
    ));
    assert_eq!(engine.player_count(), 1);
    assert!(step.ended, "one survivor means the game is over");
}

#[test]
fn test_wrong_input_eliminates() {
    let (mut engine, ids) = engine_with(&["alice", "bob"], 8);
    engine.start().unwrap();

    let t = Instant::now();
    let step = engine.present_turn(t);
    let (name, _) = presented(&step);

    let step = engine.submit_turn(ids[&name], "@@", t + ms(20));
    assert!(matches!(
        step.events[0],
        GameEvent::WrongInput { ref username } if *username == name
    ));
    let survivor = ids.keys().find(|n| **n != name).unwrap();
    assert!(matches!(
        step.events[1],
        GameEvent::Won { ref username } if username == survivor
    ));
    assert!(step.ended);
}

#[test]
fn test_speed_mode_budget_drops_after_each_round() {
    let (mut engine, ids) = engine_with(&["alice", "bob"], 21);
    engine.start().unwrap();
    assert_eq!(engine.speed_budget(), ms(4000));

    // Round 1 → 2: 4000 > 1000, so the fast tier applies.
    let (_, step) = play_round_correct(&mut engine, &ids);
    assert!(step.events.iter().any(|e| matches!(
        e,
        GameEvent::RoundStarted { speed_budget_ms: 3800 }
    )));
    assert_eq!(engine.speed_budget(), ms(3800));
    // Token length never escalates in speed mode.
    assert_eq!(engine.token_length(), 1);

    let (_, _) = play_round_correct(&mut engine, &ids);
    assert_eq!(engine.speed_budget(), ms(3600));
}

#[test]
fn test_length_mode_grows_tokens_each_round() {
    let (mut engine, ids) = engine_with(&["alice", "bob"], 34);
    engine.set_mode(GameMode::Length).unwrap();
    engine.start().unwrap();
    assert_eq!(engine.token_length(), 1);

    for expected in 2..=4 {
        let (_, step) = play_round_correct(&mut engine, &ids);
        assert!(new_round_announced(&step));
        assert_eq!(engine.token_length(), expected);
        // The budget never escalates in length mode.
        assert_eq!(engine.speed_budget(), ms(4000));
    }

    // Tokens presented in round 4 really have 4 characters.
    let t = Instant::now();
    let step = engine.present_turn(t);
    let (_, token) = presented(&step);
    assert_eq!(token.chars().count(), 4);
}

#[test]
fn test_eliminated_players_never_return_in_later_rounds() {
    let (mut engine, ids) = engine_with(&["alice", "bob", "carol"], 55);
    engine.start().unwrap();

    // Round 1: the first presented player fumbles and is eliminated.
    let t = Instant::now();
    let step = engine.present_turn(t);
    let (loser, _) = presented(&step);
    let step = engine.submit_turn(ids[&loser], "@@", t + ms(10));
    assert!(matches!(step.events[0], GameEvent::WrongInput { .. }));
    assert_eq!(engine.player_count(), 2);
    assert!(!step.ended);
    // Still mid-round: two players owe their round-1 turns.
    assert!(!new_round_announced(&step));

    // Finish round 1 with the survivors.
    let (seen, step) = play_round_correct(&mut engine, &ids);
    assert_eq!(seen.len(), 2);
    assert!(!seen.contains(&loser));
    assert!(new_round_announced(&step));

    // Two more full rounds: only the survivors ever appear, each exactly
    // once per round.
    let survivors: Vec<&String> = ids.keys().filter(|n| **n != loser).collect();
    for _ in 0..2 {
        let (mut seen, _) = play_round_correct(&mut engine, &ids);
        seen.sort();
        let mut expected: Vec<String> =
            survivors.iter().map(|s| s.to_string()).collect();
        expected.sort();
        assert_eq!(seen, expected);
    }
}

#[test]
fn test_survivor_is_not_requeued_within_a_round() {
    let (mut engine, ids) = engine_with(&["alice", "bob", "carol"], 70);
    engine.start().unwrap();

    // All three take their round-1 turn; nobody is presented twice.
    let (mut seen, step) = play_round_correct(&mut engine, &ids);
    assert!(new_round_announced(&step));
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 3);
}
