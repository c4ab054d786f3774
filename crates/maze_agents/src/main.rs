//! Maze Agents CLI
//!
//! Trains a Q-learning agent on a maze and prints the greedy path it learned.
//!
//! ## Usage
//!
//! ```bash
//! # Demo maze with the default parameters
//! maze-agents
//!
//! # Reproducible run on a custom maze, JSON output
//! maze-agents --maze mazes/corridor.json --seed 7 --json
//! ```

use clap::Parser;
use maze_agents::{run, ConfigOverrides, LearningConfig, Maze, Result};
use std::path::PathBuf;

/// Tabular Q-learning on a grid maze
#[derive(Parser, Debug)]
#[command(name = "maze-agents")]
#[command(version)]
#[command(about = "Train a Q-learning agent on a grid maze", long_about = None)]
struct Args {
    /// JSON file holding a learning configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON maze definition (defaults to the built-in 5x5 maze)
    #[arg(short, long)]
    maze: Option<PathBuf>,

    /// Number of training episodes
    #[arg(short, long)]
    episodes: Option<usize>,

    /// Learning rate (alpha)
    #[arg(long)]
    alpha: Option<f64>,

    /// Discount factor (gamma)
    #[arg(long)]
    gamma: Option<f64>,

    /// Exploration rate (epsilon)
    #[arg(long)]
    epsilon: Option<f64>,

    /// Seed for the exploration RNG
    #[arg(short, long)]
    seed: Option<u64>,

    /// Per-episode step cap (0 disables the cap)
    #[arg(long)]
    max_episode_steps: Option<usize>,

    /// Maximum number of moves in the greedy path
    #[arg(long)]
    path_step_cap: Option<usize>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            episodes: self.episodes,
            learning_rate: self.alpha,
            discount_factor: self.gamma,
            epsilon: self.epsilon,
            seed: self.seed,
            max_episode_steps: self.max_episode_steps,
            path_step_cap: self.path_step_cap,
        }
    }

    fn learning_config(&self) -> Result<LearningConfig> {
        self.overrides().resolve(self.config.as_deref())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = args.learning_config()?;
    let maze = match &args.maze {
        Some(path) => Maze::load_from_file(path)?,
        None => Maze::demo(),
    };

    if args.json {
        let report = run(&maze, &config)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Starting Q-learning training...");
    let report = run(&maze, &config)?;
    println!("Training completed.");

    println!("\nFinding the best path from the start to the goal...");
    println!("\nBest path ({} moves, step by step):", report.path.moves());
    for pos in &report.path.positions {
        println!("{}", pos);
    }

    println!();
    print!("{}", maze.grid().render_path(&report.path.positions));
    if !report.path.reached_goal() {
        println!(
            "\nThe greedy path did not reach the goal ({:?}); try more episodes.",
            report.path.end
        );
    }

    Ok(())
}
