use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use cchess_core::{Board, Lawyer, RandomEval, RandomGame, RandomRules};
use cchess_engine::{Engine, MoveTimer, SearchConfig};
use clap::Parser;
use tracing::info;

/// Self-play on a random game tree.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Seed of the generated game.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Maximum search depth in plies.
    #[arg(long)]
    depth: Option<i32>,

    /// Time budget per move in milliseconds.
    #[arg(long)]
    movetime: Option<u64>,

    /// Number of moves to play.
    #[arg(long, default_value_t = 10)]
    plies: usize,

    /// Engine option as name=value; may be repeated.
    #[arg(short = 'o', long = "option", value_name = "NAME=VALUE")]
    options: Vec<String>,
}

fn split_option(pair: &str) -> Result<(&str, &str)> {
    let Some((name, value)) = pair.split_once('=') else {
        bail!("option {pair:?} is not of the form name=value");
    };
    if name.trim().is_empty() {
        bail!("option {pair:?} has no name");
    }
    Ok((name.trim(), value.trim()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut engine = Engine::with_config(
        RandomGame::with_seed(args.seed),
        RandomRules,
        RandomEval,
        SearchConfig::default(),
    );
    if let Some(depth) = args.depth {
        engine.option_changed("searchPly", &depth.to_string());
    }
    for pair in &args.options {
        let (name, value) = split_option(pair)?;
        engine.option_changed(name, value);
    }
    let timer = args.movetime.map(|ms| Arc::new(MoveTimer::new(Duration::from_millis(ms))));
    if let Some(timer) = &timer {
        info!(budget_ms = timer.budget().as_millis() as u64, "move timer armed");
        engine.set_timer(timer.clone());
    }

    let params = engine.board().params();
    info!(
        seed = params.seed,
        min_moves = params.min_moves,
        max_moves = params.max_moves,
        plies = args.plies,
        "cchess self-play starting"
    );
    for ply in 1..=args.plies {
        if let Some(timer) = &timer {
            timer.restart();
        }
        let score = engine.think().context("engine refused to think")?;
        let nodes = engine.stats().nodes;
        let line = engine.variation_text();
        let mv = engine.get_move();
        if mv.is_null() {
            println!("{ply:>3}. no move (score {score})");
            break;
        }
        if !engine.lawyer().legal_move(engine.board(), mv) {
            bail!("engine chose illegal move {mv} at ply {ply}");
        }
        println!("{ply:>3}. {mv}  score {score}  nodes {nodes}  pv {line}");
        engine.board_mut().make_move(mv);
    }
    Ok(())
}
