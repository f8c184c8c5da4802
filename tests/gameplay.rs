//! End-to-end runs through the public session API

use std::collections::HashSet;

use obstacle_jumper::consts::FRAME_MS;
use obstacle_jumper::persistence::{MemoryStorage, Storage};
use obstacle_jumper::sim::{JumpState, PowerupKind};
use obstacle_jumper::{GameEvent, GamePhase, GameSession, Profile, TickInput, Tuning};
use proptest::prelude::*;

fn demo() -> TickInput {
    TickInput {
        idle_mode: true,
        ..Default::default()
    }
}

/// Play until the run ends (or `max_ticks` pass)
fn play_out(session: &mut GameSession, input: &TickInput, max_ticks: u32) {
    for _ in 0..max_ticks {
        if session.phase() != GamePhase::Playing {
            break;
        }
        session.tick(input, FRAME_MS);
    }
}

#[test]
fn idle_run_ends_with_a_collision() {
    let mut session = GameSession::with_seed(11);
    session.start_game();
    // Never jumping: the first obstacle reaches the player within a few seconds
    play_out(&mut session, &TickInput::default(), 60 * 10);
    assert_eq!(session.phase(), GamePhase::GameOver);
    assert_eq!(session.score(), 0);
    assert!(session.events().contains(&GameEvent::GameOver {
        score: 0,
        new_high_score: false
    }));
}

#[test]
fn autopilot_scores_points() {
    let mut session = GameSession::with_seed(5);
    session.start_game();
    play_out(&mut session, &demo(), 60 * 30);
    assert!(session.score() > 0, "autopilot never cleared an obstacle");
    assert_eq!(session.total_score(), session.score());
}

#[test]
fn high_score_is_max_over_runs() {
    let mut session = GameSession::with_seed(8);
    let mut best = 0;
    for _ in 0..4 {
        session.start_game();
        play_out(&mut session, &demo(), 60 * 20);
        session.end_game();
        best = best.max(session.score());
        assert_eq!(session.high_score(), best);
    }
}

#[test]
fn progress_survives_a_reload() {
    let mut storage = MemoryStorage::new();

    let mut session = GameSession::new(Profile::load(&storage), Tuning::default(), 3);
    session.start_game();
    play_out(&mut session, &demo(), 60 * 30);
    session.end_game();
    assert!(session.persist(&mut storage).unwrap());

    let reloaded = GameSession::new(Profile::load(&storage), Tuning::default(), 4);
    assert_eq!(reloaded.high_score(), session.high_score());
    assert_eq!(reloaded.total_score(), session.total_score());
    assert_eq!(
        reloaded.profile().unlocked_skins().collect::<Vec<_>>(),
        session.profile().unlocked_skins().collect::<Vec<_>>()
    );
    assert_eq!(
        storage.get_item("highScore").unwrap(),
        Some(session.high_score().to_string())
    );
}

#[test]
fn tuning_changes_the_difficulty_curve() {
    let tuning = Tuning {
        base_spawn_interval_ms: 800,
        ..Default::default()
    };
    let mut session = GameSession::new(Profile::new(), tuning, 1);
    session.start_game();
    for _ in 0..47 {
        session.tick(&TickInput::default(), FRAME_MS);
    }
    assert_eq!(session.obstacles().len(), 0);
    session.tick(&TickInput::default(), FRAME_MS);
    session.tick(&TickInput::default(), FRAME_MS);
    assert_eq!(session.obstacles().len(), 1);
}

#[test]
fn paused_session_ignores_commands() {
    let mut session = GameSession::with_seed(2);
    session.start_game();
    session.pause_game();
    assert!(!session.jump());
    assert!(!session.shoot());
    assert!(!session.use_ability());
    assert!(!session.activate_powerup(PowerupKind::Gun));
    assert_eq!(session.spawn_obstacle(), None);
    assert_eq!(session.player().jump_state, JumpState::Grounded);
}

#[test]
fn snapshot_is_json() {
    let mut session = GameSession::with_seed(2);
    session.start_game();
    session.jump();
    let json = session.snapshot_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["phase"], "Playing");
    assert_eq!(value["player"]["jump_state"], "Ascending");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn scores_never_decrease(
        seed in any::<u64>(),
        inputs in proptest::collection::vec((any::<bool>(), any::<bool>(), any::<bool>(), 0u8..50), 1..600),
    ) {
        let mut session = GameSession::with_seed(seed);
        session.start_game();
        let mut last_score = session.score();
        let mut last_total = session.total_score();
        let mut passed = HashSet::new();
        let mut awards = 0u64;

        for (jump, shoot, ability, roll) in inputs {
            if session.phase() == GamePhase::GameOver {
                session.start_game();
                last_score = session.score();
            }
            let input = TickInput {
                jump,
                shoot,
                ability,
                pause: roll == 0,
                idle_mode: roll < 25,
            };
            session.tick(&input, FRAME_MS);

            prop_assert!(session.score() >= last_score);
            prop_assert!(session.total_score() >= last_total);
            prop_assert!(session.projectile().is_none() || session.active_powerup() == Some(PowerupKind::Gun));
            prop_assert!(session.high_score() <= session.total_score());
            last_score = session.score();
            last_total = session.total_score();

            for event in session.drain_events() {
                match event {
                    GameEvent::ObstaclePassed { id } | GameEvent::ObstacleDestroyed { id } => {
                        prop_assert!(passed.insert(id), "obstacle {} scored twice", id);
                        awards += 1;
                    }
                    GameEvent::GameOver { score, .. } => {
                        prop_assert_eq!(score, session.score());
                    }
                    _ => {}
                }
            }
            for obstacle in session.obstacles().iter() {
                prop_assert_eq!(obstacle.passed, passed.contains(&obstacle.id));
            }
        }

        prop_assert!(session.total_score() >= awards * 10);
        prop_assert!(session.total_score() <= awards * 20);
    }
}
