//! CLI infrastructure for the gridworld solvers
//!
//! This module provides the command-line interface for printing scenarios,
//! evaluating fixed policies, and training TD controllers.

pub mod commands;
pub mod output;
