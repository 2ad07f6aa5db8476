//! Subcommand implementations and the scenario flags they share

pub mod evaluate;
pub mod show;
pub mod solve;
pub mod train;

use std::{fs::File, path::Path};

use anyhow::{Result, anyhow};
use clap::{Args, ValueEnum};
use serde::Serialize;

use crate::{
    cli::output::{print_kv, print_section},
    grid::GridWorld,
    policy::Policy,
    reward::RewardModel,
    types::State,
    value::ValueTable,
};

/// Scenario flags shared by every subcommand. The defaults reproduce the
/// example dungeon: a 4x3 grid, start bottom-left, goal top-right, one
/// obstacle in the middle and a hazard below the goal.
#[derive(Args, Debug, Clone)]
pub struct ScenarioArgs {
    /// Grid width in cells
    #[arg(long, default_value_t = 4)]
    pub width: i32,

    /// Grid height in cells
    #[arg(long, default_value_t = 3)]
    pub height: i32,

    /// Start cell as `x,y`
    #[arg(long, default_value = "0,2")]
    pub start: String,

    /// Goal cell as `x,y` (landing there pays +1)
    #[arg(long, default_value = "3,0")]
    pub goal: String,

    /// Obstacle cell as `x,y` (repeatable)
    #[arg(long = "obstacle", default_values_t = vec![String::from("1,1")])]
    pub obstacles: Vec<String>,

    /// Hazard cell as `x,y` (landing there pays -1)
    #[arg(long, default_value = "3,1")]
    pub hazard: String,

    /// Drop the hazard cell from the reward model
    #[arg(long, default_value_t = false)]
    pub no_hazard: bool,
}

impl ScenarioArgs {
    /// Build the grid and reward model these flags describe.
    pub fn build(&self) -> Result<(GridWorld, RewardModel)> {
        let mut grid = GridWorld::new(self.width, self.height);
        for raw in &self.obstacles {
            let cell = parse_cell(raw, "--obstacle")?;
            grid.set_obstacle(cell.x, cell.y)?;
        }
        let start = parse_cell(&self.start, "--start")?;
        grid.set_start(start.x, start.y)?;
        let goal = parse_cell(&self.goal, "--goal")?;
        grid.set_goal(goal.x, goal.y)?;

        let mut rewards = RewardModel::new(grid.goal()?);
        if !self.no_hazard {
            rewards = rewards.with_hazard(parse_cell(&self.hazard, "--hazard")?);
        }
        Ok((grid, rewards))
    }
}

/// How to build the fixed policy the evaluators run under.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum PolicyKind {
    /// Uniform 1/4 over all four actions, for every cell
    Uniform,
    /// Uniform over the available actions, for open cells only
    Available,
}

impl PolicyKind {
    pub fn build(self, grid: &GridWorld) -> Policy {
        match self {
            PolicyKind::Uniform => Policy::uniform(&grid.states()),
            PolicyKind::Available => Policy::uniform_over_available(&grid.open_states(), grid),
        }
    }
}

pub(crate) fn parse_cell(value: &str, flag: &str) -> Result<State> {
    let parse = || -> Option<State> {
        let (x, y) = value.split_once(',')?;
        let x = x.trim().parse::<i32>().ok()?;
        let y = y.trim().parse::<i32>().ok()?;
        Some(State::new(x, y))
    };
    parse().ok_or_else(|| anyhow!("Invalid cell '{value}' for {flag} (expected 'x,y')"))
}

/// Print the dungeon and its legend.
pub(crate) fn print_scenario(grid: &GridWorld, rewards: &RewardModel) {
    print_section("Dungeon");
    print!("{grid}");
    println!();
    println!("S: start position");
    println!("G: goal with reward +1");
    println!("X: obstacle");
    if let Some(hazard) = rewards.hazard() {
        println!("hazard with reward -1 at {hazard}");
    }
}

/// Print a value table in row-major order.
pub(crate) fn print_values(values: &ValueTable) {
    print_section("State values");
    for (state, value) in values.sorted() {
        print_kv(&state.to_string(), &format!("{value:.4}"));
    }
}

/// One state value in a JSON summary file.
#[derive(Debug, Serialize)]
pub(crate) struct CellValue {
    pub x: i32,
    pub y: i32,
    pub value: f64,
}

pub(crate) fn cell_values(values: &ValueTable) -> Vec<CellValue> {
    values
        .sorted()
        .into_iter()
        .map(|(state, value)| CellValue {
            x: state.x,
            y: state.y,
            value,
        })
        .collect()
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> crate::error::Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, value)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cells_with_whitespace() {
        assert_eq!(parse_cell("3, 1", "--hazard").unwrap(), State::new(3, 1));
        assert!(parse_cell("3;1", "--hazard").is_err());
        assert!(parse_cell("3", "--hazard").is_err());
    }

    #[test]
    fn default_scenario_builds_the_example_dungeon() {
        let args = ScenarioArgs {
            width: 4,
            height: 3,
            start: "0,2".to_string(),
            goal: "3,0".to_string(),
            obstacles: vec!["1,1".to_string()],
            hazard: "3,1".to_string(),
            no_hazard: false,
        };
        let (grid, rewards) = args.build().unwrap();
        assert_eq!(grid.start().unwrap(), State::new(0, 2));
        assert_eq!(grid.goal().unwrap(), State::new(3, 0));
        assert!(!grid.is_available(1, 1));
        assert_eq!(rewards.hazard(), Some(State::new(3, 1)));
    }
}
