//! One-step temporal-difference (TD(0)) evaluation of a fixed policy

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    error::Result,
    grid::GridWorld,
    policy::Policy,
    reward::RewardModel,
    value::ValueTable,
};

/// Online TD(0) value estimator under a fixed stochastic policy.
///
/// Unlike the Monte-Carlo evaluator no episode memory is kept: each
/// transition immediately applies the bootstrapped update
/// `V(s) += alpha * (r + gamma * V(s') - V(s))`, with the bootstrap zeroed
/// when the landed state is the goal. Value estimates persist across
/// episodes.
#[derive(Debug)]
pub struct TdEvaluator {
    gamma: f64,
    alpha: f64,
    policy: Policy,
    values: ValueTable,
    rng: StdRng,
}

impl TdEvaluator {
    pub fn new(gamma: f64, alpha: f64, policy: Policy) -> Self {
        Self {
            gamma,
            alpha,
            policy,
            values: ValueTable::new(),
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

    /// Roll out one episode from the start cell, updating the value of
    /// each visited state as soon as its transition is observed.
    ///
    /// # Errors
    ///
    /// `Error::StartNotSet` / `Error::GoalNotSet` on a misconfigured grid,
    /// `Error::ActionNotFound` on a malformed policy.
    pub fn run_episode(&mut self, grid: &GridWorld, rewards: &RewardModel) -> Result<()> {
        let goal = grid.goal()?;
        let mut state = grid.start()?;
        loop {
            let action = self.policy.sample(state, &mut self.rng)?;
            let next = grid.step(state, action);
            let reward = rewards.reward(next);
            let done = next == goal;

            let bootstrap = if done { 0.0 } else { self.values.get(next) };
            let target = reward + self.gamma * bootstrap;
            let old = self.values.get(state);
            self.values.set(state, old + self.alpha * (target - old));

            if done {
                return Ok(());
            }
            state = next;
        }
    }

    /// Run a batch of episodes.
    pub fn run(&mut self, grid: &GridWorld, rewards: &RewardModel, episodes: usize) -> Result<()> {
        for _ in 0..episodes {
            self.run_episode(grid, rewards)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::types::{Action, State};

    use super::*;

    #[test]
    fn single_step_update_hits_the_bootstrapped_target() {
        let mut grid = GridWorld::new(3, 1);
        grid.set_start(0, 0).unwrap();
        grid.set_goal(2, 0).unwrap();
        let rewards = RewardModel::new(grid.goal().unwrap());

        let mut policy = Policy::default();
        for state in grid.states() {
            policy.set(state, HashMap::from([(Action::Right, 1.0)]));
        }

        let mut td = TdEvaluator::new(0.9, 0.5, policy).with_seed(4);
        td.run_episode(&grid, &rewards).unwrap();

        // First transition: target 0 + 0.9 * 0, value unchanged at 0.
        // Second transition reaches the goal: V(1,0) = 0 + 0.5 * (1 - 0).
        assert_eq!(td.values().get(State::new(0, 0)), 0.0);
        assert!((td.values().get(State::new(1, 0)) - 0.5).abs() < 1e-12);
        assert_eq!(td.values().get(State::new(2, 0)), 0.0);

        // The next episode bootstraps off the updated neighbor.
        td.run_episode(&grid, &rewards).unwrap();
        let expected = 0.5 * (0.9 * 0.5);
        assert!((td.values().get(State::new(0, 0)) - expected).abs() < 1e-12);
    }
}
