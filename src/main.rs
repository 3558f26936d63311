//! Terminal Tetris runner (default binary).
//!
//! Human play on top of the same environment agents use. A key-pump thread
//! feeds a latest-value slot; this loop takes at most one input per frame,
//! applies gravity on the level's drop interval, and redraws.

use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::info;

use tetris_gym::env::{Observation, Step, TetrisEnv};
use tetris_gym::input::{action_slot, spawn_key_pump, ActionSlot, InputEvent};
use tetris_gym::term::{FrameBuffer, GameView, RenderMode, TerminalRenderer, Viewport};
use tetris_gym::{init_tracing, LogTarget, Settings};

const FRAME: Duration = Duration::from_millis(16);

fn main() -> Result<()> {
    let settings = Settings::from_env()?;
    init_tracing(&settings, LogTarget::FileOnly)?;

    let mut env = match settings.seed {
        Some(seed) => TetrisEnv::with_seed(settings.engine.clone(), seed)?,
        None => TetrisEnv::new(settings.engine.clone())?,
    };

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let (writer, mut slot) = action_slot();
    let result = match spawn_key_pump(writer) {
        Ok(pump) => {
            let result = run(&mut term, &mut env, &mut slot);
            // Dropping the reader stops the pump.
            drop(slot);
            let _ = pump.join();
            result
        }
        Err(e) => Err(e.into()),
    };

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// Front-end state carried between frames.
struct Session {
    mode: RenderMode,
    obs: Observation,
    drop_interval: Duration,
    last_drop: Instant,
}

impl Session {
    fn apply(&mut self, step: Step) {
        self.drop_interval = Duration::from_millis(step.info.drop_interval_ms as u64);
        if step.info.locked {
            self.last_drop = Instant::now();
        }
        if step.terminated {
            self.mode = RenderMode::GameOver;
        }
        self.obs = step.observation;
    }

    fn start(&mut self, env: &mut TetrisEnv) -> Result<()> {
        let (obs, step_info) = env.reset(None)?;
        info!(episode = step_info.episode, seed = step_info.seed, "new game");
        self.obs = obs;
        self.mode = RenderMode::Playing;
        self.drop_interval = Duration::from_millis(step_info.drop_interval_ms as u64);
        self.last_drop = Instant::now();
        Ok(())
    }
}

fn run(term: &mut TerminalRenderer, env: &mut TetrisEnv, slot: &mut ActionSlot) -> Result<()> {
    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut session = Session {
        mode: RenderMode::Start,
        obs: env.observe(),
        drop_interval: Duration::from_millis(env.config().scoring.drop_interval_ms(0) as u64),
        last_drop: Instant::now(),
    };

    loop {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&session.obs, session.mode, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        if let Some(event) = slot.take() {
            match (session.mode, event) {
                (_, InputEvent::Quit) => return Ok(()),
                (RenderMode::Start, _) | (_, InputEvent::Restart) => {
                    session.start(env)?;
                    slot.clear();
                }
                (RenderMode::Playing, InputEvent::Action(action)) => {
                    let step = env.step_action(action)?;
                    session.apply(step);
                }
                _ => {}
            }
        }

        if session.mode == RenderMode::Playing && session.last_drop.elapsed() >= session.drop_interval {
            let step = env.gravity()?;
            session.last_drop = Instant::now();
            session.apply(step);
        }

        if slot.is_disconnected() {
            return Ok(());
        }
        thread::sleep(FRAME);
    }
}
