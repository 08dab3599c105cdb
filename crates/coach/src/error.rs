//! Coach error types

use thiserror::Error;

use coach_core::position::InvalidPositionError;

#[derive(Error, Debug)]
pub enum CoachError {
    #[error("invalid position: {0}")]
    InvalidPosition(#[from] InvalidPositionError),

    #[error("engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("engine protocol error: {0}")]
    EngineProtocol(String),

    #[error("analysis timed out: {0}")]
    EngineTimeout(String),
}
