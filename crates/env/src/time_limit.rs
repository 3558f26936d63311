//! Episode length limit applied from outside the engine.

use tetris_gym_core::Result;

use crate::env::{Env, Step, StepInfo};
use crate::observation::Observation;
use crate::space::ActionSpace;

/// Step budget of a registered Tetris episode.
pub const DEFAULT_MAX_EPISODE_STEPS: u64 = 10_000;

/// Sets `truncated` once an episode has taken `max_steps` steps.
///
/// The inner environment keeps accepting steps after truncation; stopping is
/// the caller's decision.
#[derive(Debug, Clone)]
pub struct TimeLimit<E> {
    env: E,
    max_steps: u64,
    elapsed: u64,
}

impl<E: Env> TimeLimit<E> {
    pub fn new(env: E, max_steps: u64) -> Self {
        Self {
            env,
            max_steps,
            elapsed: 0,
        }
    }

    pub fn max_steps(&self) -> u64 {
        self.max_steps
    }

    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    pub fn inner(&self) -> &E {
        &self.env
    }

    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.env
    }

    pub fn into_inner(self) -> E {
        self.env
    }
}

impl<E: Env> Env for TimeLimit<E> {
    fn reset(&mut self, seed: Option<u64>) -> Result<(Observation, StepInfo)> {
        let out = self.env.reset(seed)?;
        self.elapsed = 0;
        Ok(out)
    }

    fn step(&mut self, action: u8) -> Result<Step> {
        let mut step = self.env.step(action)?;
        self.elapsed += 1;
        if self.elapsed >= self.max_steps {
            step.truncated = true;
        }
        Ok(step)
    }

    fn action_space(&self) -> ActionSpace {
        self.env.action_space()
    }
}
