//! Reward model: goal and hazard cells

use serde::{Deserialize, Serialize};

use crate::types::State;

/// Reward attributed to the cell a move lands on.
///
/// Reaching the goal pays +1.0 and landing on the hazard cell, when one is
/// configured, pays -1.0; every other cell pays nothing. Reward belongs to
/// the transition into a cell, so the goal's own state value stays pinned
/// at zero in every solver.
///
/// The hazard is explicit configuration rather than a fixed literal, so
/// callers must keep it aligned with the grid layout they actually use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardModel {
    goal: State,
    hazard: Option<State>,
}

impl RewardModel {
    pub fn new(goal: State) -> Self {
        Self { goal, hazard: None }
    }

    pub fn with_hazard(mut self, hazard: State) -> Self {
        self.hazard = Some(hazard);
        self
    }

    pub fn goal(&self) -> State {
        self.goal
    }

    pub fn hazard(&self) -> Option<State> {
        self.hazard
    }

    pub fn reward(&self, landed: State) -> f64 {
        if landed == self.goal {
            return 1.0;
        }
        if self.hazard == Some(landed) {
            return -1.0;
        }
        0.0
    }
}
