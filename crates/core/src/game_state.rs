//! Game state module - the spawn / fall / lock / clear state machine
//!
//! This module ties together the board, the piece queue and the scoring
//! tables. It has no notion of time: gravity is a call ([`GameState::gravity_step`])
//! that the driver makes once per [`GameState::drop_interval_ms`].
//!
//! Every mutating call either commits a whole transition or returns an error
//! and leaves the state untouched.

use arrayvec::ArrayVec;
use tracing::{debug, info, trace};

use crate::board::Board;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::pieces::Tetromino;
use crate::rng::PieceQueue;
use crate::types::*;

/// Where the state machine stands between calls.
///
/// Locking and line clearing happen inside the call that triggers them, so
/// they never show up here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No active piece yet; the next spawn is pending.
    Spawning,
    /// An active piece accepts actions.
    Falling,
    /// Terminal. Only a fresh state leaves it.
    GameOver,
}

/// Outcome of one mutating call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveResult {
    /// The call changed the active piece (always true when it locked).
    pub moved: bool,
    /// Score gained plus drop shaping, minus the penalty if the call ended the game.
    pub reward: i64,
    /// The active piece was locked into the board.
    pub locked: bool,
    /// Rows removed by this call.
    pub lines_cleared: u32,
    /// The call ended the game.
    pub game_over: bool,
}

impl MoveResult {
    fn moved(reward: i64) -> Self {
        Self {
            moved: true,
            reward,
            ..Self::default()
        }
    }

    fn rejected() -> Self {
        Self::default()
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    config: EngineConfig,
    board: Board,
    active: Option<Tetromino>,
    piece_queue: PieceQueue,
    phase: Phase,
    /// Successful spawns this episode.
    pieces_spawned: u32,
    score: u32,
    level: u32,
    lines: u32,
}

impl GameState {
    /// Create a game on an empty board and spawn the first piece.
    ///
    /// `seed: None` draws pieces from OS entropy.
    pub fn new(config: EngineConfig, seed: Option<u64>) -> Result<Self> {
        config.validate()?;
        let board = Board::new(config.width, config.height)?;
        Ok(Self::start(config, board, seed))
    }

    /// Create a game on a prepared board (puzzles, tests, curricula).
    ///
    /// The board's dimensions override the configured ones.
    pub fn from_board(board: Board, config: EngineConfig, seed: Option<u64>) -> Result<Self> {
        let config = EngineConfig {
            width: board.width(),
            height: board.height(),
            ..config
        };
        config.validate()?;
        if (0..board.height() as usize).any(|y| board.is_row_full(y)) {
            return Err(EngineError::Configuration(
                "starting board must not contain full rows".to_string(),
            ));
        }
        Ok(Self::start(config, board, seed))
    }

    fn start(config: EngineConfig, board: Board, seed: Option<u64>) -> Self {
        let piece_queue = match seed {
            Some(seed) => PieceQueue::new(seed),
            None => PieceQueue::from_entropy(),
        };
        let mut state = Self {
            config,
            board,
            active: None,
            piece_queue,
            phase: Phase::Spawning,
            pieces_spawned: 0,
            score: 0,
            level: 0,
            lines: 0,
        };
        state.spawn_piece();
        state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<Tetromino> {
        self.active
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines
    }

    pub fn pieces_spawned(&self) -> u32 {
        self.pieces_spawned
    }

    /// Upcoming pieces, `config.preview_count` long.
    pub fn next_pieces(&self) -> ArrayVec<PieceKind, MAX_PREVIEW> {
        self.piece_queue.peek_n(self.config.preview_count)
    }

    /// Gravity interval for the current level.
    pub fn drop_interval_ms(&self) -> u32 {
        self.config.scoring.drop_interval_ms(self.level)
    }

    /// Spawn a new piece from the queue.
    ///
    /// Returns false (and ends the game) if the spawn position is blocked.
    fn spawn_piece(&mut self) -> bool {
        self.phase = Phase::Spawning;
        let kind = self.piece_queue.draw();
        let piece = self.board.spawn_piece(kind);

        if !self.board.can_place(&piece) {
            self.active = None;
            self.phase = Phase::GameOver;
            info!(
                kind = kind.as_str(),
                score = self.score,
                lines = self.lines,
                "spawn blocked, game over"
            );
            return false;
        }

        self.active = Some(piece);
        self.phase = Phase::Falling;
        self.pieces_spawned = self.pieces_spawned.wrapping_add(1);
        debug!(kind = kind.as_str(), piece = self.pieces_spawned, "spawned piece");
        true
    }

    /// Active piece, or the reason no action is accepted.
    fn require_active(&self) -> Result<Tetromino> {
        if self.phase == Phase::GameOver {
            return Err(EngineError::game_over());
        }
        self.active.ok_or(EngineError::InvalidStateTransition {
            reason: "no active piece",
        })
    }

    /// Commit `candidate` if the board accepts it.
    fn try_commit(&mut self, candidate: Tetromino) -> MoveResult {
        if self.board.can_place(&candidate) {
            self.active = Some(candidate);
            MoveResult::moved(0)
        } else {
            trace!(?candidate, "rejected transform");
            MoveResult::rejected()
        }
    }

    pub fn move_left(&mut self) -> Result<MoveResult> {
        let active = self.require_active()?;
        Ok(self.try_commit(active.shifted(-1, 0)))
    }

    pub fn move_right(&mut self) -> Result<MoveResult> {
        let active = self.require_active()?;
        Ok(self.try_commit(active.shifted(1, 0)))
    }

    /// Rotate clockwise in place; rejected on collision (no wall kicks).
    pub fn rotate(&mut self) -> Result<MoveResult> {
        let active = self.require_active()?;
        Ok(self.try_commit(active.rotated()))
    }

    /// One row down with the soft drop reward; locks if the row below is blocked.
    pub fn soft_drop(&mut self) -> Result<MoveResult> {
        self.step_down(self.config.scoring.soft_drop_reward)
    }

    /// One row down without reward; locks if the row below is blocked.
    pub fn gravity_step(&mut self) -> Result<MoveResult> {
        self.step_down(0)
    }

    fn step_down(&mut self, reward: i64) -> Result<MoveResult> {
        let active = self.require_active()?;
        let candidate = active.shifted(0, 1);
        if self.board.can_place(&candidate) {
            self.active = Some(candidate);
            return Ok(MoveResult::moved(reward));
        }
        self.lock_active(active, 0)
    }

    /// Drop to the lowest reachable row and lock.
    pub fn hard_drop(&mut self) -> Result<MoveResult> {
        let mut landed = self.require_active()?;
        let mut distance: i64 = 0;
        while self.board.can_place(&landed.shifted(0, 1)) {
            landed = landed.shifted(0, 1);
            distance += 1;
        }

        let shaping = distance.saturating_mul(self.config.scoring.hard_drop_reward_per_cell);
        self.lock_active(landed, shaping)
    }

    /// Lock `piece` (the active piece at its final position), clear rows,
    /// update score/lines/level and spawn the next piece.
    ///
    /// `shaping` is added to the line points; the game-over penalty comes off last.
    fn lock_active(&mut self, piece: Tetromino, shaping: i64) -> Result<MoveResult> {
        self.board.lock(&piece)?;
        self.active = None;

        let cleared = self.board.clear_full_rows();
        let points = self.config.scoring.line_clear_points(cleared, self.level);
        self.score = self.score.saturating_add(points);
        self.lines = self.lines.saturating_add(cleared as u32);
        self.level = self.config.scoring.level_for_lines(self.lines);

        debug!(
            kind = piece.kind.as_str(),
            x = piece.x,
            y = piece.y,
            cleared,
            points,
            level = self.level,
            "locked piece"
        );

        let mut result = MoveResult {
            moved: true,
            reward: i64::from(points).saturating_add(shaping),
            locked: true,
            lines_cleared: cleared as u32,
            game_over: false,
        };

        if !self.spawn_piece() {
            result.game_over = true;
            result.reward = result
                .reward
                .saturating_sub(self.config.scoring.game_over_penalty);
        }
        Ok(result)
    }

    /// Deliberate no-op; still refused after game over.
    pub fn no_op(&mut self) -> Result<MoveResult> {
        self.require_active()?;
        Ok(MoveResult::rejected())
    }

    /// Apply a game action
    pub fn apply_action(&mut self, action: Action) -> Result<MoveResult> {
        match action {
            Action::NoOp => self.no_op(),
            Action::MoveLeft => self.move_left(),
            Action::MoveRight => self.move_right(),
            Action::Rotate => self.rotate(),
            Action::SoftDrop => self.soft_drop(),
            Action::HardDrop => self.hard_drop(),
        }
    }

    /// Check if piece can move in given direction
    pub fn can_move(&self, dx: i16, dy: i16) -> bool {
        self.active
            .map(|p| self.board.can_place(&p.shifted(dx, dy)))
            .unwrap_or(false)
    }

    /// Row the active piece would land on (where a hard drop puts its anchor).
    pub fn landing_y(&self) -> Option<i16> {
        let mut landed = self.active?;
        while self.board.can_place(&landed.shifted(0, 1)) {
            landed = landed.shifted(0, 1);
        }
        Some(landed.y)
    }
}
