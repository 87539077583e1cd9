use thiserror::Error;
use validator::ValidationErrors;

/// Generic error type used by service layer functions, mirroring the API
/// error taxonomy: every variant maps to exactly one 4xx/5xx response.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Field-level validation failures, reported per field.
    #[error("validation failed")]
    Validation(ValidationErrors),
    /// A foreign reference in the request body does not resolve.
    #[error("{field} not found")]
    Reference { field: &'static str },
    /// A uniqueness constraint rejected the write.
    #[error("{field}: {message}")]
    Conflict {
        field: &'static str,
        message: &'static str,
    },
    /// The caller presented no valid credential.
    #[error("unauthorized")]
    Unauthorized,
    /// The credential is valid but lacks the required rights.
    #[error("forbidden")]
    Forbidden,
    /// Requested resource was not found (the soft-delete filter applies).
    #[error("not found")]
    NotFound,
    /// An unexpected internal error occurred; details are only logged.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
