//! Headless runner: plays one seeded run with a simple autopilot and prints
//! the run summary as JSON.
//!
//! Usage:
//!   street-runner --seed 42 --tuning tuning.json --history runs.json
//!   RUST_LOG=debug street-runner --seed 7

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use street_runner::audio::LogAudio;
use street_runner::progression::{ProgressionStore, RunHistory, SavedHistory};
use street_runner::sim::SolidMasks;
use street_runner::sim::observe::{Surroundings, scan_surroundings};
use street_runner::sim::state::GameState;
use street_runner::sim::tick::{Action, TickInput};
use street_runner::{Game, Tuning};

#[derive(Parser)]
#[command(name = "street-runner")]
#[command(about = "Play a headless endless-runner run and print its summary")]
struct Args {
    /// Run seed
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Tuning JSON file; defaults are used when omitted
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Run history JSON file to update
    #[arg(long)]
    history: Option<PathBuf>,
    /// Stop after this many frames even if the run is still going
    #[arg(long, default_value_t = 60 * 60 * 10)]
    max_frames: u64,
}

/// Jump over whatever is coming, dive back down once past it
fn autopilot(state: &GameState, scan: &Surroundings) -> Action {
    let body = &state.player.body;
    if body.grounded {
        let gap_close = scan.gap_size > 0.0 && scan.next_gap_dist < 60.0;
        let ground_foe_close = scan.next_enemy_type == 0.5 && scan.next_enemy_dist < 120.0;
        let hazard_close = scan.next_hazard_dist < 90.0;
        let ledge_close = scan.next_platform_y_delta < -0.05 && scan.next_platform_x_dist < 150.0;
        if gap_close || ground_foe_close || hazard_close || ledge_close {
            return Action::Jump;
        }
    } else if body.velocity_y > 0.0 && scan.gap_size == 0.0 && scan.next_enemy_dist > 300.0 {
        return Action::FastFall;
    }
    Action::Noop
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path).with_context(|| format!("loading tuning from {}", path.display()))?,
        None => Tuning::default(),
    };
    let progression: Box<dyn ProgressionStore> = match &args.history {
        Some(path) => Box::new(SavedHistory::open(path)),
        None => Box::new(RunHistory::new()),
    };

    log::info!("Street Runner (headless) starting, seed {}", args.seed);
    let mut game = Game::new(
        args.seed,
        tuning,
        Box::new(SolidMasks::new()),
        Box::new(LogAudio),
        progression,
    );

    while !game.state().is_over() && game.state().frame < args.max_frames {
        let scan = scan_surroundings(game.state());
        let action = autopilot(game.state(), &scan);
        game.step(&TickInput::action(action));
    }
    if !game.state().is_over() {
        log::info!("Frame limit reached at {} units", game.state().distance);
    }

    let summary = game.state().run_summary();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
