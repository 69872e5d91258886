//! Errors surfaced by a provisioning run.

use crate::arm::ArmError;
use crate::orchestrator::Step;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SampleError {
    /// Credentials are missing or were rejected. Nothing was created.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("{step} failed")]
    Provisioning {
        step: Step,
        #[source]
        source: ArmError,
    },

    /// A read-back did not show what the previous step should have produced.
    #[error("Unexpected state after {step}: {detail}")]
    UnexpectedState { step: Step, detail: String },

    #[error("Run cancelled")]
    Cancelled,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SampleError {
    /// Wraps a failed call made during `step`; rejected credentials stay authentication errors.
    pub fn at(step: Step, source: ArmError) -> Self {
        match source {
            ArmError::Authentication(msg) => SampleError::Authentication(msg),
            source => SampleError::Provisioning { step, source },
        }
    }
}
