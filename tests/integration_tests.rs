//! Integration tests - full games driven through the environment and engine

use tetris_gym::core::{Board, EngineConfig, EngineError, GameState, PieceQueue};
use tetris_gym::env::TetrisEnv;
use tetris_gym::types::{Action, PieceKind, Rotation};

fn env(seed: u64) -> TetrisEnv {
    TetrisEnv::with_seed(EngineConfig::default(), seed).unwrap()
}

fn seed_with_first(kind: PieceKind) -> u64 {
    (0..).find(|&s| PieceQueue::new(s).peek() == kind).unwrap()
}

#[test]
fn test_move_left_until_wall() {
    let mut env = env(1);
    let (obs, _) = env.reset(Some(42)).unwrap();
    assert_eq!(obs.active_piece.unwrap().shape, PieceQueue::new(42).peek());

    let mut moves = 0;
    loop {
        let step = env.step(Action::MoveLeft.index()).unwrap();
        if !step.info.moved {
            assert_eq!(step.reward, 0.0);
            break;
        }
        moves += 1;
        assert!(moves <= 10, "piece never reached the wall");
    }

    // The leftmost mino reaches column 0. The anchor may end up at -1 for
    // shapes whose box has an empty first column (O, and T/S/Z/J/L in some
    // rotations).
    let piece = env.observe().active_piece.unwrap();
    let min_col = piece.cells().iter().map(|&(x, _)| x).min().unwrap();
    assert_eq!(min_col, 0);
    let box_offset = piece.tetromino().shape().iter().map(|&(dx, _)| dx).min().unwrap();
    assert_eq!(piece.anchor.col, -i16::from(box_offset));
    assert!(!env.game().unwrap().can_move(-1, 0));
    assert!(env.game().unwrap().can_move(0, 1));
}

#[test]
fn test_move_right_until_wall() {
    let mut env = env(1);
    env.reset(Some(43)).unwrap();

    while env.step(Action::MoveRight.index()).unwrap().info.moved {}

    let piece = env.observe().active_piece.unwrap();
    let max_col = piece.cells().iter().map(|&(x, _)| x).max().unwrap();
    assert_eq!(max_col, 9);
}

#[test]
fn test_vertical_i_fills_last_column_and_clears() {
    let mut rows = vec![".........."; 19];
    rows.push("IIIIIIIII.");
    let board = Board::from_rows(&rows).unwrap();
    let mut game =
        GameState::from_board(board, EngineConfig::default(), Some(seed_with_first(PieceKind::I)))
            .unwrap();

    assert!(game.rotate().unwrap().moved);
    assert_eq!(game.active().unwrap().rotation, Rotation::East);
    while game.move_right().unwrap().moved {}

    let result = game.hard_drop().unwrap();
    assert!(result.locked);
    assert_eq!(result.lines_cleared, 1);
    assert_eq!(game.lines_cleared(), 1);
    assert_eq!(game.score(), 40);
    // Three I cells stay above the cleared row.
    assert_eq!(game.board().occupied_count(), 3);
    assert!((17..20).all(|y| game.board().is_occupied(9, y)));
    assert!(!game.game_over());
}

#[test]
fn test_stacking_in_the_middle_ends_the_game() {
    let mut env = env(5);
    env.reset(Some(2024)).unwrap();

    let mut terminal = None;
    for _ in 0..200 {
        let step = env.step(Action::HardDrop.index()).unwrap();
        if step.terminated {
            terminal = Some(step);
            break;
        }
        assert_eq!(step.info.lines_cleared_step, 0);
    }

    let step = terminal.expect("game should end when the centre column fills");
    assert!(step.observation.game_over);
    assert!(step.observation.active_piece.is_none());
    assert!(step.reward < 0.0);
    assert!(!step.truncated);

    // The terminal observation keeps every key; the piece is just null.
    let value: serde_json::Value =
        serde_json::from_str(&step.observation.to_json().unwrap()).unwrap();
    let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        [
            "active_piece",
            "game_over",
            "grid",
            "level",
            "lines_cleared",
            "next_piece",
            "score"
        ]
    );
    assert!(value["active_piece"].is_null());

    // The episode is over: every further step is refused and changes nothing.
    let before = env.observe();
    for action in Action::ALL {
        assert!(matches!(
            env.step_action(action),
            Err(EngineError::InvalidStateTransition { .. })
        ));
    }
    assert!(env.gravity().is_err());
    assert_eq!(env.observe(), before);

    let (obs, info) = env.reset(None).unwrap();
    assert!(!obs.game_over);
    assert_eq!(obs.lines_cleared, 0);
    assert_eq!(obs.score, 0);
    assert!(obs.grid.iter().flatten().all(|&c| c == 0));
    assert_eq!(info.episode, 2);
    assert_eq!(info.step_count, 0);
}

#[test]
fn test_same_seed_same_trajectory() {
    let script = [
        Action::MoveLeft,
        Action::Rotate,
        Action::HardDrop,
        Action::MoveRight,
        Action::MoveRight,
        Action::SoftDrop,
        Action::HardDrop,
        Action::Rotate,
        Action::Rotate,
        Action::HardDrop,
    ];

    let run = || {
        let mut env = env(0);
        env.reset(Some(31337)).unwrap();
        script
            .iter()
            .map(|&a| env.step_action(a).unwrap())
            .collect::<Vec<_>>()
    };

    assert_eq!(run(), run());
}

#[test]
fn test_soft_drop_locks_on_floor() {
    let mut env = env(3);
    env.reset(Some(8)).unwrap();

    let mut locked_after = None;
    for i in 0..30 {
        let step = env.step(Action::SoftDrop.index()).unwrap();
        if step.info.locked {
            // The locking call gets no soft drop reward.
            assert_eq!(step.reward, 0.0);
            locked_after = Some(i);
            break;
        }
        assert_eq!(step.reward, 1.0);
    }

    assert!(locked_after.is_some());
    let obs = env.observe();
    assert_eq!(obs.grid.iter().flatten().filter(|&&c| c != 0).count(), 4);
    assert_eq!(env.game().unwrap().pieces_spawned(), 2);
}

#[test]
fn test_hard_drop_rewards_distance() {
    let mut game = GameState::new(EngineConfig::default(), Some(seed_with_first(PieceKind::O))).unwrap();
    // O occupies box rows 0..=1, so it falls 18 rows on a 20-row board.
    let result = game.hard_drop().unwrap();
    assert_eq!(result.reward, 36);
    assert_eq!(game.score(), 0);
}

#[test]
fn test_custom_board_size() {
    let mut env = TetrisEnv::with_seed(EngineConfig::with_size(6, 12), 1).unwrap();
    let (obs, _) = env.reset(Some(1)).unwrap();
    assert_eq!((obs.width(), obs.height()), (6, 12));
    assert_eq!(obs.active_piece.unwrap().anchor.col, 1);

    while env.step(Action::MoveRight.index()).unwrap().info.moved {}
    let piece = env.observe().active_piece.unwrap();
    assert_eq!(piece.cells().iter().map(|&(x, _)| x).max(), Some(5));
}
