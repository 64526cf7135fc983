//! Service-level error contract.

use crate::model::entity::EntityRef;
use crate::model::validation::ValidationError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, BlogServiceError>;

/// Coarse classification callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Conflict,
    /// Infrastructure failure: I/O, corrupt rows, unmigrated schema.
    Storage,
}

impl ErrorKind {
    /// Stable snake_case code used in log lines.
    pub fn code(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Validation => "validation",
            Self::Conflict => "conflict",
            Self::Storage => "storage",
        }
    }
}

/// Error returned by every `BlogService` operation.
#[derive(Debug)]
pub enum BlogServiceError {
    /// Referenced entity does not exist.
    NotFound(EntityRef),
    /// Input failed a field-level constraint.
    Validation(ValidationError),
    /// Uniqueness or concurrent-modification constraint was violated.
    Conflict(String),
    Storage(RepoError),
}

impl BlogServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }
}

impl Display for BlogServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(target) => write!(f, "{target} not found"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Conflict(details) => write!(f, "conflict: {details}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BlogServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for BlogServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for BlogServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(target) => Self::NotFound(target),
            RepoError::Conflict(details) => Self::Conflict(details),
            other => Self::Storage(other),
        }
    }
}
