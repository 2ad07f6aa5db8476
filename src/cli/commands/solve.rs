//! Solve command - optimal state values via DP value iteration

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;

use super::{CellValue, PolicyKind, ScenarioArgs, cell_values, print_scenario, print_values, write_json};
use crate::{dp::ValueIteration, value::ValueTable};

#[derive(Parser, Debug)]
#[command(about = "Solve for optimal state values", allow_negative_numbers = true)]
pub struct SolveArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// Policy whose support enumerates the candidate actions
    #[arg(long, value_enum, default_value_t = PolicyKind::Uniform)]
    pub policy: PolicyKind,

    /// Discount factor
    #[arg(long, default_value_t = 0.9)]
    pub gamma: f64,

    /// Convergence threshold on the per-sweep maximum value change
    #[arg(long, default_value_t = 0.0)]
    pub theta: f64,

    /// Write the resulting values to a JSON file
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SolveSummary {
    gamma: f64,
    sweeps: usize,
    values: Vec<CellValue>,
}

pub fn execute(args: SolveArgs) -> Result<()> {
    let (grid, rewards) = args.scenario.build()?;
    print_scenario(&grid, &rewards);
    let policy = args.policy.build(&grid);

    let vi = ValueIteration::new(args.gamma).with_theta(args.theta);
    let mut values = ValueTable::new();
    let sweeps = vi.solve(&policy, &mut values, &grid, &rewards)?;
    println!("\nConverged after {sweeps} sweeps");

    print_values(&values);

    if let Some(path) = &args.output {
        let summary = SolveSummary {
            gamma: args.gamma,
            sweeps,
            values: cell_values(&values),
        };
        write_json(path, &summary)?;
        println!("\nWrote summary to {}", path.display());
    }
    Ok(())
}
