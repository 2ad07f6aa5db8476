//! Show command - print the configured dungeon

use anyhow::Result;
use clap::Parser;

use super::{ScenarioArgs, print_scenario};

#[derive(Parser, Debug)]
#[command(about = "Print the configured dungeon")]
pub struct ShowArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

pub fn execute(args: ShowArgs) -> Result<()> {
    let (grid, rewards) = args.scenario.build()?;
    print_scenario(&grid, &rewards);
    Ok(())
}
