/// Domain error type shared across resolvers and stores
///
/// Every fallible domain operation returns [`DomainResult`]. The error
/// taxonomy deliberately stays small: callers only ever need to distinguish
/// the classes below, and each class maps to one GraphQL extension code via
/// [`ErrorExtensions`].
///
/// Infrastructure failures (MongoDB connectivity, session store writes) are
/// logged server-side and surfaced to clients as a generic internal error so
/// that no backend detail leaks through the API.

use std::sync::Arc;

use async_graphql::ErrorExtensions;

use crate::auth::password::PasswordError;

/// Domain result type alias
pub type DomainResult<T> = Result<T, DomainError>;

/// Unified domain error type
///
/// The type is `Clone` so it can flow through the relation loader, which
/// shares one result among every resolver that requested the same key.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DomainError {
    /// No valid identity on the request (or failed credential check)
    #[error("{0}")]
    Unauthenticated(String),

    /// Valid identity, insufficient privilege
    #[error("{0}")]
    Forbidden(String),

    /// Record absent, or owned by another principal (indistinguishable by design)
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness violation, e.g. username taken
    #[error("{0}")]
    Conflict(String),

    /// Input fails domain validation, e.g. weak password
    #[error("{0}")]
    InvalidInput(String),

    /// Internal failure outside the storage layer (session store, hashing)
    #[error("{0}")]
    Internal(String),

    /// MongoDB driver failure
    #[error("storage error: {0}")]
    Storage(Arc<mongodb::error::Error>),
}

impl DomainError {
    /// Returns the stable error code exposed in GraphQL error extensions
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Unauthenticated(_) => "UNAUTHENTICATED",
            DomainError::Forbidden(_) => "FORBIDDEN",
            DomainError::NotFound(_) => "NOT_FOUND",
            DomainError::Conflict(_) => "CONFLICT",
            DomainError::InvalidInput(_) => "INVALID_INPUT",
            DomainError::Internal(_) | DomainError::Storage(_) => "INTERNAL",
        }
    }

    /// True for errors whose details must not reach the client
    fn is_internal(&self) -> bool {
        matches!(self, DomainError::Internal(_) | DomainError::Storage(_))
    }
}

impl From<mongodb::error::Error> for DomainError {
    fn from(err: mongodb::error::Error) -> Self {
        DomainError::Storage(Arc::new(err))
    }
}

impl From<PasswordError> for DomainError {
    fn from(err: PasswordError) -> Self {
        DomainError::Internal(format!("password operation failed: {}", err))
    }
}

impl ErrorExtensions for DomainError {
    fn extend(&self) -> async_graphql::Error {
        let message = if self.is_internal() {
            tracing::error!(error = %self, "internal error during resolution");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        async_graphql::Error::new(message).extend_with(|_, e| e.set("code", self.code()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            DomainError::Unauthenticated("x".to_string()).code(),
            "UNAUTHENTICATED"
        );
        assert_eq!(DomainError::Forbidden("x".to_string()).code(), "FORBIDDEN");
        assert_eq!(DomainError::NotFound("x".to_string()).code(), "NOT_FOUND");
        assert_eq!(DomainError::Conflict("x".to_string()).code(), "CONFLICT");
        assert_eq!(
            DomainError::InvalidInput("x".to_string()).code(),
            "INVALID_INPUT"
        );
        assert_eq!(DomainError::Internal("x".to_string()).code(), "INTERNAL");
    }

    #[test]
    fn test_domain_errors_keep_their_message() {
        let err = DomainError::NotFound("Task not found".to_string()).extend();
        assert_eq!(err.message, "Task not found");
    }

    #[test]
    fn test_internal_errors_mask_their_message() {
        let err = DomainError::Internal("session store exploded".to_string()).extend();
        assert_eq!(err.message, "Internal server error");
    }

    #[test]
    fn test_password_error_is_internal() {
        let err = DomainError::from(PasswordError::HashError("bad params".to_string()));
        assert_eq!(err.code(), "INTERNAL");
    }
}
