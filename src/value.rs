//! Zero-default value tables for V and Q

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{Action, State};

/// State-value table V with an implicit 0.0 for unseen states.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValueTable {
    values: HashMap<State, f64>,
}

impl ValueTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a state; 0.0 if it was never set.
    pub fn get(&self, state: State) -> f64 {
        self.values.get(&state).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, state: State, value: f64) {
        self.values.insert(state, value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Explicitly stored entries in row-major order, for stable output.
    pub fn sorted(&self) -> Vec<(State, f64)> {
        let mut entries: Vec<_> = self.values.iter().map(|(&s, &v)| (s, v)).collect();
        entries.sort_by_key(|(s, _)| (s.y, s.x));
        entries
    }
}

/// Action-value table Q with an implicit 0.0 for unseen pairs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QTable {
    values: HashMap<State, HashMap<Action, f64>>,
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Q-value of a state-action pair; 0.0 if it was never set.
    pub fn get(&self, state: State, action: Action) -> f64 {
        self.values
            .get(&state)
            .and_then(|entry| entry.get(&action))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn set(&mut self, state: State, action: Action, value: f64) {
        self.values.entry(state).or_default().insert(action, value);
    }

    /// Maximum Q-value over all four actions.
    pub fn max_q(&self, state: State) -> f64 {
        Action::ALL
            .iter()
            .map(|&action| self.get(state, action))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Greedy action for a state. Ties resolve to the first maximal action
    /// in `Action::ALL` order, keeping argmax deterministic for unvisited
    /// states where every Q-value is still 0.0.
    pub fn greedy_action(&self, state: State) -> Action {
        let mut best = Action::ALL[0];
        let mut best_q = self.get(state, best);
        for &action in &Action::ALL[1..] {
            let q = self.get(state, action);
            if q > best_q {
                best = action;
                best_q = q;
            }
        }
        best
    }

    /// States with explicitly stored entries, in row-major order.
    pub fn states(&self) -> Vec<State> {
        let mut states: Vec<_> = self.values.keys().copied().collect();
        states.sort_by_key(|s| (s.y, s.x));
        states
    }
}
