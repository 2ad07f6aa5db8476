//! Train command - SARSA and Q-learning controllers

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use serde::Serialize;

use super::{ScenarioArgs, print_scenario, write_json};
use crate::{
    cli::output::{create_episode_progress, print_section},
    control::{QLearningAgent, SarsaAgent},
    grid::GridWorld,
    policy::Policy,
    types::{Action, State},
    value::QTable,
};

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ControlMethod {
    /// On-policy TD control
    Sarsa,
    /// Off-policy TD control
    QLearning,
}

impl ControlMethod {
    fn name(self) -> &'static str {
        match self {
            ControlMethod::Sarsa => "sarsa",
            ControlMethod::QLearning => "q-learning",
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train a TD controller", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Controller to train
    #[arg(value_enum)]
    pub method: ControlMethod,

    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// Discount factor
    #[arg(long, default_value_t = 0.9)]
    pub gamma: f64,

    /// Step size
    #[arg(long, default_value_t = 0.5)]
    pub alpha: f64,

    /// Exploration rate of the acting policy
    #[arg(long, default_value_t = 0.1)]
    pub epsilon: f64,

    /// Number of training episodes
    #[arg(long, short = 'e', default_value_t = 10_000)]
    pub episodes: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the learned Q-values to a JSON file
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,
}

/// Q-values of one state in a JSON summary file.
#[derive(Debug, Serialize)]
struct QEntry {
    x: i32,
    y: i32,
    left: f64,
    right: f64,
    up: f64,
    down: f64,
}

#[derive(Debug, Serialize)]
struct TrainingSummary {
    method: &'static str,
    gamma: f64,
    alpha: f64,
    epsilon: f64,
    episodes: usize,
    q: Vec<QEntry>,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let (grid, rewards) = args.scenario.build()?;
    print_scenario(&grid, &rewards);

    let initial = Policy::uniform(&grid.states());
    let q = match args.method {
        ControlMethod::Sarsa => {
            let mut agent = SarsaAgent::new(args.gamma, args.alpha, args.epsilon, initial);
            if let Some(seed) = args.seed {
                agent = agent.with_seed(seed);
            }
            run_training(|| agent.run_episode(&grid, &rewards), args.episodes)?;
            agent.q().clone()
        }
        ControlMethod::QLearning => {
            let mut agent = QLearningAgent::new(args.gamma, args.alpha, args.epsilon, initial);
            if let Some(seed) = args.seed {
                agent = agent.with_seed(seed);
            }
            run_training(|| agent.run_episode(&grid, &rewards), args.episodes)?;
            agent.q().clone()
        }
    };

    print_greedy_map(&grid, &q);
    print_q_table(&q);

    if let Some(path) = &args.output {
        let summary = TrainingSummary {
            method: args.method.name(),
            gamma: args.gamma,
            alpha: args.alpha,
            epsilon: args.epsilon,
            episodes: args.episodes,
            q: q_entries(&q),
        };
        write_json(path, &summary)?;
        println!("\nWrote summary to {}", path.display());
    }
    Ok(())
}

fn run_training<F>(mut episode: F, episodes: usize) -> Result<()>
where
    F: FnMut() -> crate::error::Result<()>,
{
    let pb = create_episode_progress(episodes as u64);
    for _ in 0..episodes {
        episode()?;
        pb.inc(1);
    }
    pb.finish();
    Ok(())
}

/// Print the greedy action for every open cell as a glyph map.
fn print_greedy_map(grid: &GridWorld, q: &QTable) {
    print_section("Greedy policy");
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let cell = State::new(x, y);
            let glyph = if grid.is_goal(cell) {
                'G'
            } else if !grid.is_available(x, y) {
                'X'
            } else {
                q.greedy_action(cell).glyph()
            };
            print!("{glyph}");
        }
        println!();
    }
}

fn print_q_table(q: &QTable) {
    print_section("Q-values");
    for state in q.states() {
        let row: Vec<String> = Action::ALL
            .iter()
            .map(|&action| format!("{action}: {:7.4}", q.get(state, action)))
            .collect();
        println!("  {state}  {}", row.join("  "));
    }
}

fn q_entries(q: &QTable) -> Vec<QEntry> {
    q.states()
        .into_iter()
        .map(|state| QEntry {
            x: state.x,
            y: state.y,
            left: q.get(state, Action::Left),
            right: q.get(state, Action::Right),
            up: q.get(state, Action::Up),
            down: q.get(state, Action::Down),
        })
        .collect()
}
