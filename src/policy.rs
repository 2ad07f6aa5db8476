//! Stochastic policies: per-state action distributions and sampling

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    grid::GridWorld,
    types::{Action, State},
    value::QTable,
};

/// A policy: one probability distribution over actions per state.
///
/// Every entry's probabilities sum to 1.0 (each is an exact fraction in
/// the uniform constructions, or an epsilon-greedy split). States that are
/// unreachable or terminal may be absent, and a state with no available
/// action carries an empty entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Policy {
    probs: HashMap<State, HashMap<Action, f64>>,
}

impl Policy {
    /// Uniform 1/4 distribution over all four actions for every state.
    pub fn uniform(states: &[State]) -> Self {
        let prob = 1.0 / Action::ALL.len() as f64;
        let mut probs = HashMap::new();
        for &state in states {
            let entry = Action::ALL.iter().map(|&action| (action, prob)).collect();
            probs.insert(state, entry);
        }
        Self { probs }
    }

    /// Uniform distribution restricted to the actions whose target cell is
    /// available on `grid`. A fully blocked state gets an empty entry.
    pub fn uniform_over_available(states: &[State], grid: &GridWorld) -> Self {
        let mut probs = HashMap::new();
        for &state in states {
            let available: Vec<Action> = Action::ALL
                .iter()
                .copied()
                .filter(|&action| {
                    let candidate = action.apply(state);
                    grid.is_available(candidate.x, candidate.y)
                })
                .collect();
            let entry = if available.is_empty() {
                HashMap::new()
            } else {
                let prob = 1.0 / available.len() as f64;
                available.into_iter().map(|action| (action, prob)).collect()
            };
            probs.insert(state, entry);
        }
        Self { probs }
    }

    /// The action distribution at a state, if the policy covers it.
    pub fn action_probs(&self, state: State) -> Option<&HashMap<Action, f64>> {
        self.probs.get(&state)
    }

    /// Replace the distribution at a state.
    pub fn set(&mut self, state: State, entry: HashMap<Action, f64>) {
        self.probs.insert(state, entry);
    }

    pub fn contains(&self, state: State) -> bool {
        self.probs.contains_key(&state)
    }

    pub fn len(&self) -> usize {
        self.probs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }

    /// The actions present in a state's entry, in `Action::ALL` order.
    pub fn support(&self, state: State) -> Vec<Action> {
        match self.probs.get(&state) {
            Some(entry) => Action::ALL
                .iter()
                .copied()
                .filter(|action| entry.contains_key(action))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Sample an action by drawing `u` in `[0, 1)` and walking the
    /// distribution in `Action::ALL` order, accumulating probability mass
    /// until it exceeds the draw.
    ///
    /// # Errors
    ///
    /// `Error::ActionNotFound` when the state has no entry or the entry's
    /// mass never covers the draw. Either way the policy is malformed and
    /// the caller must treat the episode as broken rather than retry.
    pub fn sample<R: Rng>(&self, state: State, rng: &mut R) -> Result<Action> {
        let entry = self
            .probs
            .get(&state)
            .ok_or(Error::ActionNotFound { state })?;
        let draw = rng.random::<f64>();
        let mut cumulative = 0.0;
        for action in Action::ALL {
            if let Some(&prob) = entry.get(&action) {
                cumulative += prob;
                if draw < cumulative {
                    return Ok(action);
                }
            }
        }
        Err(Error::ActionNotFound { state })
    }
}

/// Epsilon-greedy distribution over the four actions for one state.
///
/// The greedy action receives `1 - epsilon + epsilon/4` and every other
/// action `epsilon/4`. With `epsilon = 0.0` this is the pure greedy
/// (deterministic) distribution. Argmax ties follow
/// [`QTable::greedy_action`].
pub fn epsilon_greedy_probs(q: &QTable, state: State, epsilon: f64) -> HashMap<Action, f64> {
    let greedy = q.greedy_action(state);
    let base = epsilon / Action::ALL.len() as f64;
    Action::ALL
        .iter()
        .map(|&action| {
            let prob = if action == greedy {
                1.0 - epsilon + base
            } else {
                base
            };
            (action, prob)
        })
        .collect()
}
