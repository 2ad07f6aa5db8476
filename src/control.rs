//! TD control: on-policy SARSA and off-policy Q-learning agents

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    error::Result,
    grid::GridWorld,
    policy::{Policy, epsilon_greedy_probs},
    reward::RewardModel,
    types::{Action, State},
    value::QTable,
};

/// One observed transition: the action taken from a state, the reward for
/// the cell it landed on, and whether that cell is terminal.
#[derive(Debug, Clone, Copy)]
struct Transition {
    state: State,
    action: Action,
    reward: f64,
    done: bool,
}

/// SARSA agent (on-policy TD control).
///
/// Acts from a single policy that is pushed toward epsilon-greedy over Q
/// after every backup. The backup bootstraps off the action the policy
/// actually took next, reconstructed from a two-slot window of the most
/// recent transitions, which is what makes the update on-policy.
#[derive(Debug)]
pub struct SarsaAgent {
    gamma: f64,
    alpha: f64,
    epsilon: f64,
    q: QTable,
    policy: Policy,
    // memory[0] is the newest transition, memory[1] the one before it.
    memory: [Option<Transition>; 2],
    rng: StdRng,
}

impl SarsaAgent {
    /// Create an agent acting from `policy` (typically uniform) until the
    /// first backups start reshaping it.
    pub fn new(gamma: f64, alpha: f64, epsilon: f64, policy: Policy) -> Self {
        Self {
            gamma,
            alpha,
            epsilon,
            q: QTable::new(),
            policy,
            memory: [None, None],
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Seed the action-sampling generator for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn q(&self) -> &QTable {
        &self.q
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Greedy action under the learned action-values.
    pub fn greedy_action(&self, state: State) -> Action {
        self.q.greedy_action(state)
    }

    /// Forget the episode history. Called at the start of every episode so
    /// the first transition of an episode never backs up across the
    /// previous episode's terminal step.
    fn reset(&mut self) {
        self.memory = [None, None];
    }

    /// Record a transition and apply the on-policy backup.
    ///
    /// The first record of an episode is stored without an update - there
    /// is no earlier pair to credit yet. Afterwards each new record closes
    /// the previous pair's transition: the older (state, action) is backed
    /// up against its own reward plus the discounted Q-value of the newer
    /// pair, and the policy at the older state is refreshed to
    /// epsilon-greedy. A terminal record additionally receives its own
    /// backup with a zero bootstrap.
    fn observe(&mut self, transition: Transition) {
        self.memory[1] = self.memory[0];
        self.memory[0] = Some(transition);
        let Some(older) = self.memory[1] else {
            return;
        };

        let bootstrap = if older.done {
            0.0
        } else {
            self.q.get(transition.state, transition.action)
        };
        self.td_step(older.state, older.action, older.reward + self.gamma * bootstrap);

        if transition.done {
            self.td_step(transition.state, transition.action, transition.reward);
        }
    }

    fn td_step(&mut self, state: State, action: Action, target: f64) {
        let old = self.q.get(state, action);
        self.q.set(state, action, old + self.alpha * (target - old));
        self.policy
            .set(state, epsilon_greedy_probs(&self.q, state, self.epsilon));
    }

    /// Run one episode from the start cell to the goal.
    ///
    /// # Errors
    ///
    /// `Error::StartNotSet` / `Error::GoalNotSet` on a misconfigured grid,
    /// `Error::ActionNotFound` on a malformed policy. The loop is
    /// unbounded until the goal is reached.
    pub fn run_episode(&mut self, grid: &GridWorld, rewards: &RewardModel) -> Result<()> {
        let goal = grid.goal()?;
        let mut state = grid.start()?;
        self.reset();
        loop {
            let action = self.policy.sample(state, &mut self.rng)?;
            let next = grid.step(state, action);
            let reward = rewards.reward(next);
            let done = next == goal;
            self.observe(Transition {
                state,
                action,
                reward,
                done,
            });
            if done {
                return Ok(());
            }
            state = next;
        }
    }

    /// Run a batch of training episodes.
    pub fn run(&mut self, grid: &GridWorld, rewards: &RewardModel, episodes: usize) -> Result<()> {
        for _ in 0..episodes {
            self.run_episode(grid, rewards)?;
        }
        Ok(())
    }
}

/// Q-learning agent (off-policy TD control).
///
/// Behavior is sampled from an epsilon-soft policy while the backup always
/// uses the maximal next action-value, independent of the action the
/// behavior policy goes on to take. A separate target policy is kept pure
/// greedy; both are refreshed from Q after every update.
#[derive(Debug)]
pub struct QLearningAgent {
    gamma: f64,
    alpha: f64,
    epsilon: f64,
    q: QTable,
    target: Policy,
    behavior: Policy,
    rng: StdRng,
}

impl QLearningAgent {
    /// Create an agent whose target and behavior policies both start from
    /// `initial` (typically uniform).
    pub fn new(gamma: f64, alpha: f64, epsilon: f64, initial: Policy) -> Self {
        Self {
            gamma,
            alpha,
            epsilon,
            q: QTable::new(),
            target: initial.clone(),
            behavior: initial,
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Seed the action-sampling generator for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn q(&self) -> &QTable {
        &self.q
    }

    /// The greedy target policy.
    pub fn target_policy(&self) -> &Policy {
        &self.target
    }

    /// The epsilon-soft behavior policy.
    pub fn behavior_policy(&self) -> &Policy {
        &self.behavior
    }

    /// Greedy action under the learned action-values.
    pub fn greedy_action(&self, state: State) -> Action {
        self.q.greedy_action(state)
    }

    /// Apply the off-policy backup for one transition, then refresh both
    /// policies at the updated state.
    fn observe(&mut self, state: State, action: Action, reward: f64, next: State, done: bool) {
        let bootstrap = if done { 0.0 } else { self.q.max_q(next) };
        let target = reward + self.gamma * bootstrap;
        let old = self.q.get(state, action);
        self.q.set(state, action, old + self.alpha * (target - old));

        self.target.set(state, epsilon_greedy_probs(&self.q, state, 0.0));
        self.behavior
            .set(state, epsilon_greedy_probs(&self.q, state, self.epsilon));
    }

    /// Run one episode from the start cell to the goal, acting from the
    /// behavior policy.
    ///
    /// # Errors
    ///
    /// `Error::StartNotSet` / `Error::GoalNotSet` on a misconfigured grid,
    /// `Error::ActionNotFound` on a malformed policy. The loop is
    /// unbounded until the goal is reached.
    pub fn run_episode(&mut self, grid: &GridWorld, rewards: &RewardModel) -> Result<()> {
        let goal = grid.goal()?;
        let mut state = grid.start()?;
        loop {
            let action = self.behavior.sample(state, &mut self.rng)?;
            let next = grid.step(state, action);
            let reward = rewards.reward(next);
            let done = next == goal;
            self.observe(state, action, reward, next, done);
            if done {
                return Ok(());
            }
            state = next;
        }
    }

    /// Run a batch of training episodes.
    pub fn run(&mut self, grid: &GridWorld, rewards: &RewardModel, episodes: usize) -> Result<()> {
        for _ in 0..episodes {
            self.run_episode(grid, rewards)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> (GridWorld, RewardModel) {
        let mut grid = GridWorld::new(3, 1);
        grid.set_start(0, 0).unwrap();
        grid.set_goal(2, 0).unwrap();
        let rewards = RewardModel::new(grid.goal().unwrap());
        (grid, rewards)
    }

    #[test]
    fn sarsa_skips_the_first_transition_of_an_episode() {
        let (grid, _) = corridor();
        let policy = Policy::uniform(&grid.states());
        let mut agent = SarsaAgent::new(0.9, 0.5, 0.1, policy).with_seed(1);

        agent.observe(Transition {
            state: State::new(0, 0),
            action: Action::Right,
            reward: 0.0,
            done: false,
        });
        // No older record yet: nothing was updated.
        assert_eq!(agent.q().get(State::new(0, 0), Action::Right), 0.0);
    }

    #[test]
    fn sarsa_backs_up_the_previous_pair_from_the_next_action() {
        let (grid, _) = corridor();
        let policy = Policy::uniform(&grid.states());
        let mut agent = SarsaAgent::new(0.9, 0.5, 0.1, policy).with_seed(1);
        agent.q.set(State::new(1, 0), Action::Right, 1.5);

        agent.observe(Transition {
            state: State::new(0, 0),
            action: Action::Right,
            reward: 0.0,
            done: false,
        });
        agent.observe(Transition {
            state: State::new(1, 0),
            action: Action::Right,
            reward: 0.0,
            done: false,
        });

        // Q(0,0 / Right) = 0 + 0.5 * (0 + 0.9 * 1.5 - 0) = 0.675
        let updated = agent.q().get(State::new(0, 0), Action::Right);
        assert!((updated - 0.675).abs() < 1e-12);
        // The refreshed policy is epsilon-greedy at the updated state.
        let entry = agent.policy().action_probs(State::new(0, 0)).unwrap();
        assert!((entry[&Action::Right] - (1.0 - 0.1 + 0.025)).abs() < 1e-12);
    }

    #[test]
    fn sarsa_flushes_the_terminal_pair() {
        let (grid, rewards) = corridor();
        let policy = Policy::uniform(&grid.states());
        let mut agent = SarsaAgent::new(0.9, 0.5, 0.1, policy).with_seed(1);

        agent.observe(Transition {
            state: State::new(0, 0),
            action: Action::Right,
            reward: 0.0,
            done: false,
        });
        agent.observe(Transition {
            state: State::new(1, 0),
            action: Action::Right,
            reward: rewards.reward(State::new(2, 0)),
            done: true,
        });

        // The terminal pair was backed up with a zero bootstrap.
        let terminal_q = agent.q().get(State::new(1, 0), Action::Right);
        assert!((terminal_q - 0.5).abs() < 1e-12);
    }

    #[test]
    fn sarsa_clears_memory_between_episodes() {
        let (grid, rewards) = corridor();
        let policy = Policy::uniform(&grid.states());
        let mut agent = SarsaAgent::new(0.9, 0.5, 0.1, policy).with_seed(9);
        agent.run_episode(&grid, &rewards).unwrap();
        assert!(agent.memory[0].is_some());
        agent.reset();
        assert!(agent.memory[0].is_none() && agent.memory[1].is_none());
    }

    #[test]
    fn q_learning_bootstraps_off_the_maximal_next_value() {
        let (grid, _) = corridor();
        let policy = Policy::uniform(&grid.states());
        let mut agent = QLearningAgent::new(0.9, 0.5, 0.1, policy).with_seed(1);
        agent.q.set(State::new(1, 0), Action::Left, 1.0);
        agent.q.set(State::new(1, 0), Action::Right, 2.0);

        agent.observe(State::new(0, 0), Action::Right, 0.0, State::new(1, 0), false);

        // Q(0,0 / Right) = 0 + 0.5 * (0 + 0.9 * 2.0 - 0) = 0.9
        let updated = agent.q().get(State::new(0, 0), Action::Right);
        assert!((updated - 0.9).abs() < 1e-12);

        // Target is pure greedy, behavior epsilon-soft, at the updated state.
        let target = agent.target_policy().action_probs(State::new(0, 0)).unwrap();
        assert_eq!(target[&Action::Right], 1.0);
        assert_eq!(target[&Action::Left], 0.0);
        let behavior = agent
            .behavior_policy()
            .action_probs(State::new(0, 0))
            .unwrap();
        assert!((behavior[&Action::Right] - (1.0 - 0.1 + 0.025)).abs() < 1e-12);
    }

    #[test]
    fn q_learning_terminal_bootstrap_is_zero() {
        let (grid, _) = corridor();
        let policy = Policy::uniform(&grid.states());
        let mut agent = QLearningAgent::new(0.9, 0.5, 0.1, policy).with_seed(1);
        agent.q.set(State::new(2, 0), Action::Right, 5.0);

        agent.observe(State::new(1, 0), Action::Right, 1.0, State::new(2, 0), true);

        // The stale value at the terminal state is ignored.
        let updated = agent.q().get(State::new(1, 0), Action::Right);
        assert!((updated - 0.5).abs() < 1e-12);
    }
}
