//! Error types for the gridworld-rl crate

use thiserror::Error;

use crate::types::State;

/// Main error type for the gridworld-rl crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("action not found: policy distribution at {state} does not cover the sampled draw")]
    ActionNotFound { state: State },

    #[error("start cell has not been set")]
    StartNotSet,

    #[error("goal cell has not been set")]
    GoalNotSet,

    #[error("cell ({x}, {y}) is out of bounds for a {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
