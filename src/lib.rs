//! Tabular reinforcement-learning solvers for a grid-world MDP
//!
//! This crate provides:
//! - A grid-world environment with obstacles, a start cell, and a goal cell
//! - Dynamic-programming policy evaluation and value iteration
//! - Monte-Carlo and TD(0) evaluation of fixed stochastic policies
//! - SARSA and Q-learning controllers with epsilon-greedy improvement
//!
//! All solvers share one data model: structural [`State`] coordinates, the
//! closed [`Action`] set, per-state [`Policy`] distributions, and the
//! zero-default [`ValueTable`] / [`QTable`] mappings.

pub mod cli;
pub mod control;
pub mod dp;
pub mod error;
pub mod grid;
pub mod monte_carlo;
pub mod policy;
pub mod reward;
pub mod td;
pub mod types;
pub mod value;

pub use control::{QLearningAgent, SarsaAgent};
pub use dp::{PolicyEvaluation, ValueIteration};
pub use error::{Error, Result};
pub use grid::GridWorld;
pub use monte_carlo::MonteCarloEvaluator;
pub use policy::{Policy, epsilon_greedy_probs};
pub use reward::RewardModel;
pub use td::TdEvaluator;
pub use types::{Action, State};
pub use value::{QTable, ValueTable};
