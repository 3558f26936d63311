//! Environment contract: reset/step semantics shared by every `Env`

use tetris_gym::core::{EngineConfig, EngineError};
use tetris_gym::env::{Env, Observation, Step, TetrisEnv, TimeLimit, DEFAULT_MAX_EPISODE_STEPS};
use tetris_gym::types::{Action, ACTION_COUNT};

/// Roll `env` with a fixed action cycle until it terminates, truncates or
/// runs out of steps.
fn rollout<E: Env>(env: &mut E, seed: u64, limit: usize) -> Vec<Step> {
    env.reset(Some(seed)).unwrap();
    let cycle = [
        Action::MoveLeft,
        Action::Rotate,
        Action::SoftDrop,
        Action::MoveRight,
        Action::HardDrop,
    ];
    let mut steps = Vec::new();
    for i in 0..limit {
        let step = env.step(cycle[i % cycle.len()].index()).unwrap();
        let done = step.terminated || step.truncated;
        steps.push(step);
        if done {
            break;
        }
    }
    steps
}

#[test]
fn test_action_space_has_six_actions() {
    let env = TetrisEnv::with_seed(EngineConfig::default(), 0).unwrap();
    let space = Env::action_space(&env);
    assert_eq!(space.n, ACTION_COUNT);
    assert!((0..6).all(|a| space.contains(a)));
    assert!(!space.contains(6));

    let wrapped = TimeLimit::new(env, 10);
    assert_eq!(wrapped.action_space(), space);
}

#[test]
fn test_step_before_reset_is_an_error() {
    let mut env = TetrisEnv::with_seed(EngineConfig::default(), 0).unwrap();
    assert!(matches!(
        env.step(Action::HardDrop.index()),
        Err(EngineError::InvalidStateTransition { .. })
    ));
    assert!(env.gravity().is_err());

    let obs = env.observe();
    assert_eq!(obs, Observation::blank(10, 20));
}

#[test]
fn test_out_of_range_action_is_rejected() {
    let mut env = TetrisEnv::with_seed(EngineConfig::default(), 0).unwrap();
    env.reset(Some(9)).unwrap();
    let before = env.observe();

    for bad in [6u8, 7, 100, 255] {
        let err = env.step(bad).unwrap_err();
        assert_eq!(err, EngineError::InvalidAction { value: bad, max: 6 });
        assert!(err.to_string().contains(&bad.to_string()));
    }
    assert_eq!(env.observe(), before);
    assert_eq!(env.step(0).unwrap().info.step_count, 1);
}

#[test]
fn test_terminated_only_on_the_ending_step() {
    let mut env = TetrisEnv::with_seed(EngineConfig::default(), 4).unwrap();
    let steps = rollout(&mut env, 4, 5_000);

    let (last, rest) = steps.split_last().unwrap();
    assert!(last.terminated);
    assert!(last.observation.game_over);
    assert!(rest.iter().all(|s| !s.terminated && !s.observation.game_over));
    assert!(steps.iter().all(|s| !s.truncated));
}

#[test]
fn test_time_limit_truncates_without_terminating() {
    let env = TetrisEnv::with_seed(EngineConfig::default(), 4).unwrap();
    let mut env = TimeLimit::new(env, 7);
    let steps = rollout(&mut env, 4, 100);

    assert_eq!(steps.len(), 7);
    let last = steps.last().unwrap();
    assert!(last.truncated);
    assert!(!last.terminated);
    assert_eq!(env.elapsed(), 7);
    assert_eq!(env.inner().game().unwrap().phase(), tetris_gym::core::Phase::Falling);
}

#[test]
fn test_default_episode_budget() {
    let env = TetrisEnv::with_seed(EngineConfig::default(), 0).unwrap();
    let env = TimeLimit::new(env, DEFAULT_MAX_EPISODE_STEPS);
    assert_eq!(env.max_steps(), 10_000);
}

#[test]
fn test_step_count_and_episode_in_info() {
    let mut env = TetrisEnv::with_seed(EngineConfig::default(), 0).unwrap();
    let (_, info) = env.reset(Some(1)).unwrap();
    assert_eq!((info.step_count, info.episode, info.seed), (0, 1, 1));

    for expected in 1..=5u64 {
        let step = env.step(Action::NoOp.index()).unwrap();
        assert_eq!(step.info.step_count, expected);
        assert!(!step.info.moved);
        assert_eq!(step.reward, 0.0);
    }

    let (_, info) = env.reset(None).unwrap();
    assert_eq!(info.step_count, 0);
    assert_eq!(info.episode, 2);
}

#[test]
fn test_observation_json_shape() {
    let mut env = TetrisEnv::with_seed(EngineConfig::default(), 0).unwrap();
    let (obs, _) = env.reset(Some(77)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&obs.to_json().unwrap()).unwrap();

    let grid = value["grid"].as_array().unwrap();
    assert_eq!(grid.len(), 20);
    assert!(grid.iter().all(|row| row.as_array().unwrap().len() == 10));
    assert_eq!(value["next_piece"].as_array().unwrap().len(), 1);
    assert!(value["next_piece"][0].is_string());
    assert_eq!(value["active_piece"]["rotation"], 0);
    assert_eq!(value["active_piece"]["anchor"]["col"], 3);
    assert_eq!(value["active_piece"]["anchor"]["row"], 0);
    assert_eq!(value["game_over"], false);

    let back: Observation = serde_json::from_value(value).unwrap();
    assert_eq!(back, obs);
}

#[test]
fn test_observation_is_a_detached_copy() {
    let mut env = TetrisEnv::with_seed(EngineConfig::default(), 0).unwrap();
    let (first, _) = env.reset(Some(3)).unwrap();
    let copy = first.clone();

    env.step(Action::HardDrop.index()).unwrap();
    assert_eq!(first, copy);
    assert_ne!(env.observe(), first);
}

#[test]
fn test_preview_count_is_configurable() {
    let config = EngineConfig {
        preview_count: 5,
        ..EngineConfig::default()
    };
    let mut env = TetrisEnv::with_seed(config, 0).unwrap();
    let (obs, _) = env.reset(Some(1)).unwrap();
    assert_eq!(obs.next_pieces.len(), 5);

    let next = obs.next_pieces[0];
    let step = env.step(Action::HardDrop.index()).unwrap();
    assert_eq!(step.observation.active_piece.unwrap().shape, next);
    assert_eq!(step.observation.next_pieces[..4], obs.next_pieces[1..]);
}
