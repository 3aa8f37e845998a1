//! The control-plane error taxonomy.
//!
//! Every public operation returns these; the HTTP layer maps them to
//! status codes through [`Error::http_status`].

use thiserror::Error;

use steward_catalog::InvalidRequest;
use steward_platform::PlatformError;
use steward_state::StateError;

/// Result type alias for control-plane operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or mis-addressed request, unknown catalog, or a service
    /// in an impossible state for the operation.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A referenced service does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The service already exists with divergent parameters.
    #[error("service exists: {0}")]
    ServiceExists(String),

    /// An idempotent config write discovered divergent content under the
    /// same id; a bug or operator misuse, the task aborts.
    #[error("config mismatch: {0}")]
    ConfigMismatch(String),

    /// Store, DNS, or container-platform failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// The HTTP status code this error maps to at the boundary.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::BadRequest(_) => 400,
            Error::NotFound(_) => 404,
            Error::ServiceExists(_) => 409,
            Error::ConfigMismatch(_) | Error::Internal(_) => 500,
        }
    }
}

impl From<StateError> for Error {
    fn from(err: StateError) -> Self {
        match err {
            StateError::NotFound(msg) => Error::NotFound(msg),
            StateError::ConfigMismatch(msg) => Error::ConfigMismatch(msg),
            other => Error::Internal(other.to_string()),
        }
    }
}

impl From<PlatformError> for Error {
    fn from(err: PlatformError) -> Self {
        match err {
            PlatformError::ServiceNotFound(msg) => Error::NotFound(msg),
            PlatformError::TaskNotFound(msg) => Error::NotFound(msg),
            PlatformError::Internal(msg) => Error::Internal(msg),
        }
    }
}

impl From<InvalidRequest> for Error {
    fn from(err: InvalidRequest) -> Self {
        Error::BadRequest(err.to_string())
    }
}
