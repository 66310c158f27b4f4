use thiserror::Error;

use crate::wizard::ValidationError;

/// Failures reported by a `PetDataSource` implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataSourceError {
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Server returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Unexpected response: {0}")]
    Decode(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("User not loaded")]
    UserNotLoaded,
    #[error("No pet selected")]
    NoPetSelected,
    #[error("Pet not found: {0}")]
    PetNotFound(String),
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    DataSource(#[from] DataSourceError),
}

impl From<ValidationError> for CoreError {
    fn from(err: ValidationError) -> Self {
        CoreError::Wizard(WizardError::Validation(err))
    }
}
