//! Error types.
//!
//! Only malformed input is an error. Non-convergence of the allocation cap
//! loop and budget left over at the end of the range are soft conditions
//! reported as data on `AllocationPlan` and `Schedule`.

use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum PlannerError {
    /// Empty topic list, non-positive weight or capacity, inverted date range.
    #[error("invalid input: {}", join_messages(.0))]
    InvalidInput(Vec<ValidationError>),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl PlannerError {
    /// Single-problem input error.
    pub(crate) fn invalid(error: ValidationError) -> Self {
        PlannerError::InvalidInput(vec![error])
    }

    /// Validation problems carried by an `InvalidInput` error.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            PlannerError::InvalidInput(errors) => errors,
            _ => &[],
        }
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type PlannerResult<T> = Result<T, PlannerError>;
