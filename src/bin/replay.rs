//! Headless replay runner.
//!
//! Reads an action script from stdin (or `--script <file>`) and prints one
//! JSON observation record per transition on stdout.
//!
//! ```text
//! echo "left left rotate hard" | tetris-replay --seed 42
//! ```

use std::fs;
use std::io::{self, BufWriter, Read, Write};

use anyhow::{anyhow, Result};

use tetris_gym::env::TetrisEnv;
use tetris_gym::replay::{parse_script, run_script};
use tetris_gym::{init_tracing, LogTarget, Settings};

#[derive(Debug, Default)]
struct Args {
    seed: Option<u64>,
    script: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut parsed = Args::default();
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("replay: missing value for --seed"))?;
                parsed.seed = Some(
                    v.parse::<u64>()
                        .map_err(|_| anyhow!("replay: invalid --seed value: {}", v))?,
                );
            }
            "--script" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("replay: missing value for --script"))?;
                parsed.script = Some(v.clone());
            }
            other => return Err(anyhow!("replay: unknown argument: {}", other)),
        }
        i += 1;
    }
    Ok(parsed)
}

fn main() -> Result<()> {
    let settings = Settings::from_env()?;
    init_tracing(&settings, LogTarget::FileOrStderr)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&args)?;

    let text = match &args.script {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            text
        }
    };
    let script = parse_script(&text)?;

    // Same seed resolution as the interactive binary: --seed, then TETRIS_SEED.
    let seed = args.seed.or(settings.seed).unwrap_or(0);
    let mut env = TetrisEnv::with_seed(settings.engine, seed)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let summary = run_script(&mut env, Some(seed), &script, &mut out)?;
    out.flush()?;

    eprintln!(
        "steps={} score={} lines={} reward={} terminated={}",
        summary.steps, summary.score, summary.lines_cleared, summary.total_reward, summary.terminated
    );
    Ok(())
}
