//! Monte-Carlo evaluation of a fixed policy

use std::collections::HashMap;

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    error::Result,
    grid::GridWorld,
    policy::Policy,
    reward::RewardModel,
    types::{Action, State},
    value::ValueTable,
};

/// One recorded step of a rollout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeStep {
    pub state: State,
    pub action: Action,
    pub reward: f64,
}

/// Episodic Monte-Carlo value estimator under a fixed stochastic policy.
///
/// Each episode rolls out from the grid's start cell until the goal is
/// reached, then replays the trajectory backward, maintaining the running
/// discounted return and folding it into a per-state incremental mean.
/// Every backward occurrence of a state updates its estimate, not only the
/// first; the visit counters and value estimates persist across episodes.
#[derive(Debug)]
pub struct MonteCarloEvaluator {
    gamma: f64,
    policy: Policy,
    values: ValueTable,
    visits: HashMap<State, u64>,
    memory: Vec<EpisodeStep>,
    rng: StdRng,
}

impl MonteCarloEvaluator {
    pub fn new(gamma: f64, policy: Policy) -> Self {
        Self {
            gamma,
            policy,
            values: ValueTable::new(),
            visits: HashMap::new(),
            memory: Vec::new(),
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Seed the action-sampling generator for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn values(&self) -> &ValueTable {
        &self.values
    }

    /// Times a state has been credited with a return so far.
    pub fn visit_count(&self, state: State) -> u64 {
        self.visits.get(&state).copied().unwrap_or(0)
    }

    /// The trajectory of the most recently completed episode.
    pub fn last_episode(&self) -> &[EpisodeStep] {
        &self.memory
    }

    /// Roll out one episode from the start cell and fold its returns into
    /// the value estimates.
    ///
    /// # Errors
    ///
    /// `Error::StartNotSet` / `Error::GoalNotSet` on a misconfigured grid,
    /// `Error::ActionNotFound` on a malformed policy. The episode loop is
    /// unbounded: a policy/grid pair that never reaches the goal does not
    /// terminate.
    pub fn run_episode(&mut self, grid: &GridWorld, rewards: &RewardModel) -> Result<()> {
        let goal = grid.goal()?;
        let mut state = grid.start()?;
        self.memory.clear();
        loop {
            let action = self.policy.sample(state, &mut self.rng)?;
            let next = grid.step(state, action);
            let reward = rewards.reward(next);
            self.memory.push(EpisodeStep {
                state,
                action,
                reward,
            });
            if next == goal {
                break;
            }
            state = next;
        }
        self.backup(goal);
        Ok(())
    }

    /// Run a batch of episodes.
    pub fn run(&mut self, grid: &GridWorld, rewards: &RewardModel, episodes: usize) -> Result<()> {
        for _ in 0..episodes {
            self.run_episode(grid, rewards)?;
        }
        Ok(())
    }

    /// Backward pass over the episode memory: accumulate the discounted
    /// return and apply the incremental running-mean update at each step.
    fn backup(&mut self, goal: State) {
        let mut g = 0.0;
        for step in self.memory.iter().rev() {
            if step.state == goal {
                self.values.set(step.state, 0.0);
                continue;
            }
            g = self.gamma * g + step.reward;
            let count = self.visits.entry(step.state).or_insert(0);
            *count += 1;
            let old = self.values.get(step.state);
            self.values
                .set(step.state, old + (g - old) / *count as f64);
        }
    }
}
