//! reset / step environment over one [`GameState`].
//!
//! The environment owns the game and a seeder. Each `reset` replaces the game
//! wholesale; each `step` is one atomic engine call. Gravity is not applied
//! here: a real-time driver calls [`TetrisEnv::gravity`] on its own clock.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use tetris_gym_core::{EngineConfig, EngineError, GameState, MoveResult, Result};
use tetris_gym_types::{Action, ACTION_COUNT};

use crate::observation::Observation;
use crate::space::ActionSpace;

/// Auxiliary diagnostics for one transition. Never affects control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StepInfo {
    /// The call changed the active piece.
    pub moved: bool,
    /// The call locked a piece.
    pub locked: bool,
    /// Rows cleared by this call.
    pub lines_cleared_step: u32,
    pub level: u32,
    pub drop_interval_ms: u32,
    /// Agent steps taken this episode (gravity calls are not counted).
    pub step_count: u64,
    pub pieces_spawned: u32,
    /// Episodes started by this environment, 1 after the first reset.
    pub episode: u32,
    /// Seed of the current episode's piece sequence.
    pub seed: u64,
}

/// Result of one `step` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub observation: Observation,
    pub reward: f64,
    /// This call ended the game.
    pub terminated: bool,
    /// Set only by external episode limits such as [`crate::TimeLimit`].
    pub truncated: bool,
    pub info: StepInfo,
}

/// The reset/step contract shared by [`TetrisEnv`] and its wrappers.
pub trait Env {
    fn reset(&mut self, seed: Option<u64>) -> Result<(Observation, StepInfo)>;

    fn step(&mut self, action: u8) -> Result<Step>;

    fn action_space(&self) -> ActionSpace {
        ActionSpace::new(ACTION_COUNT)
    }
}

#[derive(Debug, Clone)]
pub struct TetrisEnv {
    config: EngineConfig,
    /// Source of episode seeds for `reset(None)`.
    seeder: ChaCha8Rng,
    game: Option<GameState>,
    seed: u64,
    episode: u32,
    step_count: u64,
}

impl TetrisEnv {
    /// Environment whose unseeded resets draw from OS entropy.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::build(config, ChaCha8Rng::from_entropy())
    }

    /// Environment whose whole chain of `reset(None)` calls is reproducible.
    pub fn with_seed(config: EngineConfig, seed: u64) -> Result<Self> {
        Self::build(config, ChaCha8Rng::seed_from_u64(seed))
    }

    fn build(config: EngineConfig, seeder: ChaCha8Rng) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            seeder,
            game: None,
            seed: 0,
            episode: 0,
            step_count: 0,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current game, `None` before the first reset.
    pub fn game(&self) -> Option<&GameState> {
        self.game.as_ref()
    }

    pub fn action_space(&self) -> ActionSpace {
        ActionSpace::new(ACTION_COUNT)
    }

    /// Start a new episode.
    ///
    /// `Some(seed)` fixes this episode's pieces and reseeds the chain of later
    /// `reset(None)` calls; `None` takes the next seed from that chain.
    pub fn reset(&mut self, seed: Option<u64>) -> Result<(Observation, StepInfo)> {
        let seed = match seed {
            Some(seed) => {
                self.seeder = ChaCha8Rng::seed_from_u64(seed);
                seed
            }
            None => self.seeder.next_u64(),
        };

        let game = GameState::new(self.config.clone(), Some(seed))?;
        self.game = Some(game);
        self.seed = seed;
        self.episode = self.episode.wrapping_add(1);
        self.step_count = 0;

        debug!(seed, episode = self.episode, "reset");
        Ok((self.observe(), self.info(MoveResult::default())))
    }

    /// Apply the action with ordinal `action`.
    pub fn step(&mut self, action: u8) -> Result<Step> {
        let action = Action::from_index(action).ok_or(EngineError::InvalidAction {
            value: action,
            max: ACTION_COUNT,
        })?;
        self.step_action(action)
    }

    pub fn step_action(&mut self, action: Action) -> Result<Step> {
        let result = self.game_mut()?.apply_action(action)?;
        self.step_count += 1;
        Ok(self.finish(result))
    }

    /// One gravity row: the externally clocked drop. No shaping reward.
    pub fn gravity(&mut self) -> Result<Step> {
        let result = self.game_mut()?.gravity_step()?;
        Ok(self.finish(result))
    }

    /// Snapshot of the current state. Total and side-effect free.
    pub fn observe(&self) -> Observation {
        match &self.game {
            Some(game) => Observation::from_game(game),
            None => Observation::blank(self.config.width, self.config.height),
        }
    }

    fn game_mut(&mut self) -> Result<&mut GameState> {
        self.game.as_mut().ok_or(EngineError::InvalidStateTransition {
            reason: "reset must be called before step",
        })
    }

    fn finish(&self, result: MoveResult) -> Step {
        if result.game_over {
            if let Some(game) = &self.game {
                info!(
                    episode = self.episode,
                    score = game.score(),
                    lines = game.lines_cleared(),
                    steps = self.step_count,
                    "episode terminated"
                );
            }
        }

        Step {
            observation: self.observe(),
            reward: result.reward as f64,
            terminated: result.game_over,
            truncated: false,
            info: self.info(result),
        }
    }

    fn info(&self, result: MoveResult) -> StepInfo {
        let (level, drop_interval_ms, pieces_spawned) = match &self.game {
            Some(game) => (game.level(), game.drop_interval_ms(), game.pieces_spawned()),
            None => (0, self.config.scoring.drop_interval_ms(0), 0),
        };
        StepInfo {
            moved: result.moved,
            locked: result.locked,
            lines_cleared_step: result.lines_cleared,
            level,
            drop_interval_ms,
            step_count: self.step_count,
            pieces_spawned,
            episode: self.episode,
            seed: self.seed,
        }
    }
}

impl Env for TetrisEnv {
    fn reset(&mut self, seed: Option<u64>) -> Result<(Observation, StepInfo)> {
        TetrisEnv::reset(self, seed)
    }

    fn step(&mut self, action: u8) -> Result<Step> {
        TetrisEnv::step(self, action)
    }
}
