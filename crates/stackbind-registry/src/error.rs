//! Registration errors.

use thiserror::Error;

/// One reason a registration batch cannot be installed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationProblem {
    /// The (prefixed) name is not an identifier scripts can refer to.
    #[error("'{name}' is not a valid identifier")]
    InvalidName { name: String },

    /// The name is reserved by the engine.
    #[error("'{name}' is a reserved identifier")]
    Reserved { name: String },

    /// The name appears more than once in the batch.
    #[error("'{name}' is registered {count} times")]
    Duplicate { name: String, count: usize },

    /// The name is already bound in the target namespace.
    #[error("'{name}' is already defined")]
    AlreadyDefined { name: String },
}

impl RegistrationProblem {
    pub fn name(&self) -> &str {
        match self {
            RegistrationProblem::InvalidName { name }
            | RegistrationProblem::Reserved { name }
            | RegistrationProblem::Duplicate { name, .. }
            | RegistrationProblem::AlreadyDefined { name } => name,
        }
    }
}

/// Registration failed as a whole; nothing was installed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("registration rejected: {}", join_problems(.problems))]
    Rejected { problems: Vec<RegistrationProblem> },
}

impl RegistrationError {
    pub fn problems(&self) -> &[RegistrationProblem] {
        match self {
            RegistrationError::Rejected { problems } => problems,
        }
    }
}

fn join_problems(problems: &[RegistrationProblem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
