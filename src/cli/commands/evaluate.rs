//! Evaluate command - state values of a fixed policy

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use serde::Serialize;

use super::{CellValue, PolicyKind, ScenarioArgs, cell_values, print_scenario, print_values, write_json};
use crate::{
    cli::output::create_episode_progress,
    dp::PolicyEvaluation,
    monte_carlo::MonteCarloEvaluator,
    td::TdEvaluator,
    value::ValueTable,
};

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum EvalMethod {
    /// Iterative Bellman expectation sweeps
    Dp,
    /// Episodic Monte-Carlo returns
    MonteCarlo,
    /// Online one-step TD(0) updates
    Td,
}

impl EvalMethod {
    fn name(self) -> &'static str {
        match self {
            EvalMethod::Dp => "dp",
            EvalMethod::MonteCarlo => "monte-carlo",
            EvalMethod::Td => "td",
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Evaluate a fixed policy's state values", allow_negative_numbers = true)]
pub struct EvaluateArgs {
    /// Evaluation method
    #[arg(value_enum)]
    pub method: EvalMethod,

    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// Fixed policy to evaluate
    #[arg(long, value_enum, default_value_t = PolicyKind::Uniform)]
    pub policy: PolicyKind,

    /// Discount factor
    #[arg(long, default_value_t = 0.9)]
    pub gamma: f64,

    /// Step size (TD only)
    #[arg(long, default_value_t = 0.9)]
    pub alpha: f64,

    /// Number of episodes (Monte-Carlo and TD)
    #[arg(long, short = 'e', default_value_t = 1000)]
    pub episodes: usize,

    /// Run exactly this many DP sweeps instead of iterating to convergence
    #[arg(long)]
    pub sweeps: Option<usize>,

    /// DP convergence threshold on the per-sweep maximum value change
    #[arg(long, default_value_t = 0.0)]
    pub theta: f64,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the resulting values to a JSON file
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct EvaluationSummary {
    method: &'static str,
    gamma: f64,
    sweeps: Option<usize>,
    episodes: Option<usize>,
    values: Vec<CellValue>,
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    let (grid, rewards) = args.scenario.build()?;
    print_scenario(&grid, &rewards);
    let policy = args.policy.build(&grid);

    let mut summary = EvaluationSummary {
        method: args.method.name(),
        gamma: args.gamma,
        sweeps: None,
        episodes: None,
        values: Vec::new(),
    };

    let values: ValueTable = match args.method {
        EvalMethod::Dp => {
            let eval = PolicyEvaluation::new(args.gamma).with_theta(args.theta);
            let mut values = ValueTable::new();
            let sweeps = match args.sweeps {
                Some(count) => {
                    for _ in 0..count {
                        eval.sweep(&policy, &mut values, &grid, &rewards)?;
                    }
                    count
                }
                None => {
                    let sweeps = eval.evaluate(&policy, &mut values, &grid, &rewards)?;
                    println!("\nConverged after {sweeps} sweeps");
                    sweeps
                }
            };
            summary.sweeps = Some(sweeps);
            values
        }
        EvalMethod::MonteCarlo => {
            let mut mc = MonteCarloEvaluator::new(args.gamma, policy);
            if let Some(seed) = args.seed {
                mc = mc.with_seed(seed);
            }
            let pb = create_episode_progress(args.episodes as u64);
            for _ in 0..args.episodes {
                mc.run_episode(&grid, &rewards)?;
                pb.inc(1);
            }
            pb.finish();
            summary.episodes = Some(args.episodes);
            mc.values().clone()
        }
        EvalMethod::Td => {
            let mut td = TdEvaluator::new(args.gamma, args.alpha, policy);
            if let Some(seed) = args.seed {
                td = td.with_seed(seed);
            }
            let pb = create_episode_progress(args.episodes as u64);
            for _ in 0..args.episodes {
                td.run_episode(&grid, &rewards)?;
                pb.inc(1);
            }
            pb.finish();
            summary.episodes = Some(args.episodes);
            td.values().clone()
        }
    };

    print_values(&values);

    if let Some(path) = &args.output {
        summary.values = cell_values(&values);
        write_json(path, &summary)?;
        println!("\nWrote summary to {}", path.display());
    }
    Ok(())
}
