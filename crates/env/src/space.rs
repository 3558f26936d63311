use rand::Rng;
use serde::{Deserialize, Serialize};

use tetris_gym_types::Action;

/// Discrete action space `{0, .., n - 1}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionSpace {
    pub n: u8,
}

impl ActionSpace {
    pub fn new(n: u8) -> Self {
        Self { n }
    }

    pub fn contains(&self, value: u8) -> bool {
        value < self.n
    }

    /// Uniform random member. Panics on an empty space.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u8 {
        rng.gen_range(0..self.n)
    }

    /// Uniform random engine action.
    pub fn sample_action<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Action> {
        Action::from_index(self.sample(rng))
    }
}
