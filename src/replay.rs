//! Headless replay: run an action script against a seeded environment and
//! write one JSON record per transition.
//!
//! Script format: whitespace-separated tokens, each an action name
//! (`left`, `right`, `rotate`, `soft`, `hard`, `noop`, or the snake_case
//! names) or an ordinal `0..6`. `#` starts a comment that runs to the end of
//! the line. The token `gravity` applies one gravity row instead of an action.

use std::io::Write;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::env::{Observation, StepInfo, TetrisEnv};
use crate::types::Action;

/// One scripted instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptStep {
    Action(Action),
    Gravity,
}

/// Parse a replay script.
pub fn parse_script(text: &str) -> Result<Vec<ScriptStep>> {
    let mut steps = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let code = line.split('#').next().unwrap_or("");
        for token in code.split_whitespace() {
            let step = if token.eq_ignore_ascii_case("gravity") {
                ScriptStep::Gravity
            } else if let Some(action) = Action::from_str(token) {
                ScriptStep::Action(action)
            } else if let Some(action) = token.parse::<u8>().ok().and_then(Action::from_index) {
                ScriptStep::Action(action)
            } else {
                bail!("line {}: unknown action {token:?}", line_no + 1);
            };
            steps.push(step);
        }
    }
    Ok(steps)
}

#[derive(Debug, Serialize)]
struct Record<'a> {
    index: usize,
    /// `None` for the initial observation after reset.
    action: Option<&'a str>,
    reward: f64,
    terminated: bool,
    info: &'a StepInfo,
    observation: &'a Observation,
}

/// Totals of a finished replay.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReplaySummary {
    /// Script steps applied (stops at termination).
    pub steps: usize,
    pub total_reward: f64,
    pub terminated: bool,
    pub score: u32,
    pub lines_cleared: u32,
}

/// Reset `env` with `seed`, apply `script`, and write JSON lines to `out`.
///
/// Steps after the game ends are not applied.
pub fn run_script(
    env: &mut TetrisEnv,
    seed: Option<u64>,
    script: &[ScriptStep],
    mut out: impl Write,
) -> Result<ReplaySummary> {
    let (observation, info) = env.reset(seed)?;
    write_record(
        &mut out,
        &Record {
            index: 0,
            action: None,
            reward: 0.0,
            terminated: false,
            info: &info,
            observation: &observation,
        },
    )?;

    let mut summary = ReplaySummary::default();
    for (i, &instruction) in script.iter().enumerate() {
        let (name, step) = match instruction {
            ScriptStep::Action(action) => (action.as_str(), env.step_action(action)),
            ScriptStep::Gravity => ("gravity", env.gravity()),
        };
        let step = step.with_context(|| format!("script step {} ({name})", i + 1))?;

        summary.steps += 1;
        summary.total_reward += step.reward;
        write_record(
            &mut out,
            &Record {
                index: i + 1,
                action: Some(name),
                reward: step.reward,
                terminated: step.terminated,
                info: &step.info,
                observation: &step.observation,
            },
        )?;

        if step.terminated {
            summary.terminated = true;
            let skipped = script.len() - (i + 1);
            if skipped > 0 {
                debug!(skipped, "game over, ignoring rest of script");
            }
            break;
        }
    }

    let last = env.observe();
    summary.score = last.score;
    summary.lines_cleared = last.lines_cleared;
    info!(
        steps = summary.steps,
        score = summary.score,
        lines = summary.lines_cleared,
        terminated = summary.terminated,
        "replay finished"
    );
    Ok(summary)
}

fn write_record(out: &mut impl Write, record: &Record<'_>) -> Result<()> {
    serde_json::to_writer(&mut *out, record)?;
    out.write_all(b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EngineConfig;

    #[test]
    fn test_parse_names_ordinals_and_comments() {
        let script = parse_script("left LEFT 2 # ignored right\nhard_drop gravity\n\n  noop").unwrap();
        assert_eq!(
            script,
            vec![
                ScriptStep::Action(Action::MoveLeft),
                ScriptStep::Action(Action::MoveLeft),
                ScriptStep::Action(Action::MoveRight),
                ScriptStep::Action(Action::HardDrop),
                ScriptStep::Gravity,
                ScriptStep::Action(Action::NoOp),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_unknown_tokens() {
        let err = parse_script("left\nhold").unwrap_err();
        assert!(err.to_string().contains("line 2"));
        assert!(parse_script("6").is_err());
    }

    #[test]
    fn test_run_writes_one_line_per_transition() {
        let mut env = TetrisEnv::with_seed(EngineConfig::default(), 1).unwrap();
        let script = parse_script("left rotate soft hard").unwrap();
        let mut out = Vec::new();

        let summary = run_script(&mut env, Some(11), &script, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(summary.steps, 4);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert!(first["action"].is_null());
        let last: serde_json::Value = serde_json::from_str(lines[4]).unwrap();
        assert_eq!(last["action"], "hard_drop");
        assert_eq!(last["info"]["locked"], true);
    }

    #[test]
    fn test_same_seed_same_output() {
        let script = parse_script("left left rotate hard right hard soft soft hard").unwrap();
        let run = || {
            let mut env = TetrisEnv::with_seed(EngineConfig::default(), 3).unwrap();
            let mut out = Vec::new();
            run_script(&mut env, Some(77), &script, &mut out).unwrap();
            out
        };
        assert_eq!(run(), run());
    }
}
