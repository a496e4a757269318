use thiserror::Error;

use crate::repository::RepoError;

/// Message carried by every guard rejection.
pub const UNABLE_TO_DELETE: &str = "unable to delete this data";

/// Uniform error returned by every service operation.
///
/// Raw storage, hashing or cache errors never cross the service boundary;
/// they are folded into one of these variants first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("internal error: {0}")]
    Internal(String),
    #[error("invalid credentials")]
    Unauthenticated,
}

impl ServiceError {
    pub fn internal(e: impl std::fmt::Display) -> Self {
        Self::Internal(e.to_string())
    }

    pub fn unable_to_delete() -> Self {
        Self::Forbidden(UNABLE_TO_DELETE.into())
    }

    /// Numeric class in HTTP status terms, the shape the web layer maps on.
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::NotFound(_) => 404,
            ServiceError::Forbidden(_) => 403,
            ServiceError::Internal(_) => 500,
            ServiceError::Unauthenticated => 401,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ServiceError::NotFound(m) | ServiceError::Forbidden(m) | ServiceError::Internal(m) => {
                m.clone()
            }
            ServiceError::Unauthenticated => self.to_string(),
        }
    }
}

/// Only the "no rows" sentinel maps to NotFound; anything else is internal.
impl From<RepoError> for ServiceError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NoRows => ServiceError::NotFound(e.to_string()),
            RepoError::Storage(msg) => ServiceError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_errors_map_to_classes() {
        let nf: ServiceError = RepoError::NoRows.into();
        assert_eq!(nf.code(), 404);
        let ie: ServiceError = RepoError::Storage("connection reset".into()).into();
        assert_eq!(ie.code(), 500);
        assert_eq!(ie.message(), "connection reset");
    }

    #[test]
    fn guard_error_is_forbidden() {
        let e = ServiceError::unable_to_delete();
        assert_eq!(e.code(), 403);
        assert_eq!(e.message(), UNABLE_TO_DELETE);
    }

    #[test]
    fn unauthenticated_has_stable_message() {
        assert_eq!(ServiceError::Unauthenticated.code(), 401);
        assert_eq!(ServiceError::Unauthenticated.message(), "invalid credentials");
    }
}
