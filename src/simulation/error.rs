//! Failures raised while computing a step.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StepError {
    #[error("entity {index} has non-positive mass {mass}")]
    NonPositiveMass { index: usize, mass: f64 },

    #[error("entity {index} produced a non-finite state")]
    NonFinite { index: usize },

    #[error("worker panicked: {0}")]
    WorkerPanicked(String),

    #[error("step job ended without reporting a result")]
    WorkerLost,

    #[error("step did not complete within {0:?}")]
    Timeout(Duration),

    #[error("step was cancelled")]
    Cancelled,

    #[error("next buffer holds {actual} entities, expected {expected}")]
    BufferLength { expected: usize, actual: usize },
}
