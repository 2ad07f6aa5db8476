//! Dynamic-programming solvers: policy evaluation and value iteration

use crate::{
    error::Result,
    grid::GridWorld,
    policy::Policy,
    reward::RewardModel,
    types::Action,
    value::ValueTable,
};

/// Iterative policy evaluation via in-place Bellman expectation backups.
///
/// A sweep visits the policy's states in the grid's row-major order and
/// updates the value table while reading it, so later states in the same
/// sweep observe values already refreshed this sweep (Gauss-Seidel style
/// rather than a double-buffered synchronous backup). The goal state is
/// pinned to exactly 0.0 and skipped; its reward is paid on the transition
/// into it.
#[derive(Debug, Clone, Copy)]
pub struct PolicyEvaluation {
    gamma: f64,
    theta: f64,
    max_sweeps: Option<usize>,
}

impl PolicyEvaluation {
    pub fn new(gamma: f64) -> Self {
        Self {
            gamma,
            theta: 0.0,
            max_sweeps: None,
        }
    }

    /// Convergence threshold on the per-sweep maximum value change. The
    /// default of 0.0 demands an exact (bit-for-bit) fixed point, which
    /// this grid's reward structure does reach.
    pub fn with_theta(mut self, theta: f64) -> Self {
        self.theta = theta;
        self
    }

    /// Hard cap on the number of sweeps [`PolicyEvaluation::evaluate`]
    /// will run.
    pub fn with_max_sweeps(mut self, max_sweeps: usize) -> Self {
        self.max_sweeps = Some(max_sweeps);
        self
    }

    /// One full expectation sweep. Returns the largest absolute value
    /// change of the sweep.
    pub fn sweep(
        &self,
        policy: &Policy,
        values: &mut ValueTable,
        grid: &GridWorld,
        rewards: &RewardModel,
    ) -> Result<f64> {
        let goal = grid.goal()?;
        let mut delta: f64 = 0.0;
        for state in grid.states() {
            if state == goal {
                values.set(state, 0.0);
                continue;
            }
            let Some(entry) = policy.action_probs(state) else {
                continue;
            };
            let mut new_value = 0.0;
            for action in Action::ALL {
                let Some(&prob) = entry.get(&action) else {
                    continue;
                };
                let next = grid.step(state, action);
                let reward = rewards.reward(next);
                new_value += prob * (reward + self.gamma * values.get(next));
            }
            delta = delta.max((new_value - values.get(state)).abs());
            values.set(state, new_value);
        }
        Ok(delta)
    }

    /// Sweep until the maximum change drops to `theta` or the sweep cap is
    /// hit. Returns the number of sweeps executed.
    pub fn evaluate(
        &self,
        policy: &Policy,
        values: &mut ValueTable,
        grid: &GridWorld,
        rewards: &RewardModel,
    ) -> Result<usize> {
        let mut sweeps = 0;
        loop {
            let delta = self.sweep(policy, values, grid, rewards)?;
            sweeps += 1;
            if delta <= self.theta || self.max_sweeps.is_some_and(|cap| sweeps >= cap) {
                return Ok(sweeps);
            }
        }
    }
}

/// Value iteration via in-place Bellman optimality backups.
///
/// Structurally identical to [`PolicyEvaluation`] except each state takes
/// the maximum over its candidate action returns instead of the
/// probability-weighted sum. The policy only enumerates the candidate
/// actions; its probabilities never weight the backup.
#[derive(Debug, Clone, Copy)]
pub struct ValueIteration {
    gamma: f64,
    theta: f64,
    max_sweeps: Option<usize>,
}

impl ValueIteration {
    pub fn new(gamma: f64) -> Self {
        Self {
            gamma,
            theta: 0.0,
            max_sweeps: None,
        }
    }

    /// Convergence threshold on the per-sweep maximum value change.
    pub fn with_theta(mut self, theta: f64) -> Self {
        self.theta = theta;
        self
    }

    /// Hard cap on the number of sweeps [`ValueIteration::solve`] will run.
    pub fn with_max_sweeps(mut self, max_sweeps: usize) -> Self {
        self.max_sweeps = Some(max_sweeps);
        self
    }

    /// One full optimality sweep. Returns the largest absolute value
    /// change of the sweep.
    pub fn sweep(
        &self,
        policy: &Policy,
        values: &mut ValueTable,
        grid: &GridWorld,
        rewards: &RewardModel,
    ) -> Result<f64> {
        let goal = grid.goal()?;
        let mut delta: f64 = 0.0;
        for state in grid.states() {
            if state == goal {
                values.set(state, 0.0);
                continue;
            }
            if !policy.contains(state) {
                continue;
            }
            let mut best = f64::NEG_INFINITY;
            for action in policy.support(state) {
                let next = grid.step(state, action);
                let reward = rewards.reward(next);
                best = best.max(reward + self.gamma * values.get(next));
            }
            // A state with an empty candidate set keeps the zero value.
            let new_value = if best.is_finite() { best } else { 0.0 };
            delta = delta.max((new_value - values.get(state)).abs());
            values.set(state, new_value);
        }
        Ok(delta)
    }

    /// Sweep until the maximum change drops to `theta` or the sweep cap is
    /// hit. Returns the number of sweeps executed.
    pub fn solve(
        &self,
        policy: &Policy,
        values: &mut ValueTable,
        grid: &GridWorld,
        rewards: &RewardModel,
    ) -> Result<usize> {
        let mut sweeps = 0;
        loop {
            let delta = self.sweep(policy, values, grid, rewards)?;
            sweeps += 1;
            if delta <= self.theta || self.max_sweeps.is_some_and(|cap| sweeps >= cap) {
                return Ok(sweeps);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::types::State;

    use super::*;

    fn dungeon() -> (GridWorld, RewardModel) {
        let mut grid = GridWorld::new(4, 3);
        grid.set_start(0, 2).unwrap();
        grid.set_goal(3, 0).unwrap();
        grid.set_obstacle(1, 1).unwrap();
        let rewards = RewardModel::new(grid.goal().unwrap()).with_hazard(State::new(3, 1));
        (grid, rewards)
    }

    #[test]
    fn goal_stays_pinned_for_every_sweep_count() {
        let (grid, rewards) = dungeon();
        let policy = Policy::uniform(&grid.states());
        let eval = PolicyEvaluation::new(0.9);
        let mut values = ValueTable::new();
        assert_eq!(values.get(State::new(3, 0)), 0.0);
        for _ in 0..5 {
            eval.sweep(&policy, &mut values, &grid, &rewards).unwrap();
            assert_eq!(values.get(State::new(3, 0)), 0.0);
        }
    }

    #[test]
    fn evaluation_reaches_a_fixed_point() {
        let (grid, rewards) = dungeon();
        let policy = Policy::uniform(&grid.states());
        let eval = PolicyEvaluation::new(0.9);
        let mut values = ValueTable::new();
        let sweeps = eval.evaluate(&policy, &mut values, &grid, &rewards).unwrap();
        assert!(sweeps > 1);
        // One more sweep changes nothing.
        let delta = eval.sweep(&policy, &mut values, &grid, &rewards).unwrap();
        assert_eq!(delta, 0.0);
    }

    #[test]
    fn sweep_cap_bounds_the_loop() {
        let (grid, rewards) = dungeon();
        let policy = Policy::uniform(&grid.states());
        let eval = PolicyEvaluation::new(0.9).with_max_sweeps(3);
        let mut values = ValueTable::new();
        let sweeps = eval.evaluate(&policy, &mut values, &grid, &rewards).unwrap();
        assert_eq!(sweeps, 3);
    }

    #[test]
    fn value_iteration_finds_the_hazard_free_path_value() {
        let (grid, rewards) = dungeon();
        let policy = Policy::uniform(&grid.states());
        let vi = ValueIteration::new(0.9);
        let mut values = ValueTable::new();
        vi.solve(&policy, &mut values, &grid, &rewards).unwrap();
        // Five moves from the start, goal reward discounted four times,
        // avoiding the -1 hazard column.
        let start = grid.start().unwrap();
        assert!((values.get(start) - 0.9f64.powi(4)).abs() < 1e-9);
    }

    #[test]
    fn optimal_values_dominate_uniform_policy_values() {
        let (grid, rewards) = dungeon();
        let policy = Policy::uniform(&grid.states());

        let mut evaluated = ValueTable::new();
        PolicyEvaluation::new(0.9)
            .evaluate(&policy, &mut evaluated, &grid, &rewards)
            .unwrap();

        let mut optimal = ValueTable::new();
        ValueIteration::new(0.9)
            .solve(&policy, &mut optimal, &grid, &rewards)
            .unwrap();

        for state in grid.open_states() {
            assert!(
                optimal.get(state) >= evaluated.get(state) - 1e-9,
                "optimal value at {state} should dominate"
            );
        }
    }

    #[test]
    fn empty_candidate_set_keeps_zero() {
        let mut grid = GridWorld::new(1, 2);
        grid.set_goal(0, 0).unwrap();
        grid.set_start(0, 1).unwrap();
        let rewards = RewardModel::new(grid.goal().unwrap());
        let mut policy = Policy::uniform(&grid.states());
        policy.set(State::new(0, 1), std::collections::HashMap::new());
        let vi = ValueIteration::new(0.9);
        let mut values = ValueTable::new();
        vi.sweep(&policy, &mut values, &grid, &rewards).unwrap();
        assert_eq!(values.get(State::new(0, 1)), 0.0);
    }
}
