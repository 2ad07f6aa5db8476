//! gridworld CLI - tabular RL solvers on a grid-world dungeon
//!
//! This CLI provides a unified interface for:
//! - Printing a dungeon scenario
//! - Evaluating fixed policies (DP, Monte-Carlo, TD(0))
//! - Solving for optimal values (DP value iteration)
//! - Training TD controllers (SARSA, Q-learning)

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gridworld")]
#[command(version, about = "Tabular RL solvers for a grid-world MDP", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the configured dungeon
    Show(gridworld_rl::cli::commands::show::ShowArgs),

    /// Evaluate a fixed policy (DP, Monte-Carlo, or TD(0))
    Evaluate(gridworld_rl::cli::commands::evaluate::EvaluateArgs),

    /// Solve for optimal state values with DP value iteration
    Solve(gridworld_rl::cli::commands::solve::SolveArgs),

    /// Train a TD controller (SARSA or Q-learning)
    Train(gridworld_rl::cli::commands::train::TrainArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Show(args) => gridworld_rl::cli::commands::show::execute(args),
        Commands::Evaluate(args) => gridworld_rl::cli::commands::evaluate::execute(args),
        Commands::Solve(args) => gridworld_rl::cli::commands::solve::execute(args),
        Commands::Train(args) => gridworld_rl::cli::commands::train::execute(args),
    }
}
