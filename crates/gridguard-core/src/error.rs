//! Unified application error types for GridGuard.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. The permission taxonomy
//! (`PermissionDenied`, `DuplicateGrant`, ...) lives in [`ErrorKind`] so
//! callers can match on the failure without parsing messages.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The caller lacks the owner/manager role required for the operation.
    PermissionDenied,
    /// The grant target type is not one of the supported kinds.
    InvalidTarget,
    /// The grant names a role outside owner/manager/member.
    InvalidRole,
    /// A user-targeted grant references a user that does not exist.
    UserNotFound,
    /// A grant for the same resource and target already exists.
    DuplicateGrant,
    /// Deletion was attempted on a system-default grant.
    CannotDeleteDefault,
    /// The table, column, record or cell could not be located.
    ResourceNotFound,
    /// The acting user has no membership in the resource's database.
    NotAMember,
    /// The requested record (for example a grant id) was not found.
    NotFound,
    /// Input validation failed.
    Validation,
    /// An internal error occurred.
    Internal,
    /// A database error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "PERMISSION_DENIED"),
            Self::InvalidTarget => write!(f, "INVALID_TARGET"),
            Self::InvalidRole => write!(f, "INVALID_ROLE"),
            Self::UserNotFound => write!(f, "USER_NOT_FOUND"),
            Self::DuplicateGrant => write!(f, "DUPLICATE_GRANT"),
            Self::CannotDeleteDefault => write!(f, "CANNOT_DELETE_DEFAULT"),
            Self::ResourceNotFound => write!(f, "RESOURCE_NOT_FOUND"),
            Self::NotAMember => write!(f, "NOT_A_MEMBER"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
        }
    }
}

/// The unified application error used throughout GridGuard.
///
/// Crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a permission-denied error.
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PermissionDenied, message)
    }

    /// Create an invalid-target error.
    pub fn invalid_target(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidTarget, message)
    }

    /// Create an invalid-role error.
    pub fn invalid_role(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRole, message)
    }

    /// Create a user-not-found error.
    pub fn user_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UserNotFound, message)
    }

    /// Create a duplicate-grant error.
    pub fn duplicate_grant(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateGrant, message)
    }

    /// Create a cannot-delete-default error.
    pub fn cannot_delete_default(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CannotDeleteDefault, message)
    }

    /// Create a resource-not-found error.
    pub fn resource_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ResourceNotFound, message)
    }

    /// Create a not-a-member error.
    pub fn not_a_member(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotAMember, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Whether this error has the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Internal, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_and_message() {
        let err = AppError::duplicate_grant("grant exists");
        assert_eq!(err.to_string(), "DUPLICATE_GRANT: grant exists");
    }

    #[test]
    fn test_clone_drops_source() {
        let io = std::io::Error::other("disk");
        let err = AppError::from(io);
        assert!(std::error::Error::source(&err).is_some());
        let cloned = err.clone();
        assert_eq!(cloned.kind, ErrorKind::Internal);
        assert!(cloned.source.is_none());
    }

    #[test]
    fn test_is_kind() {
        assert!(AppError::cannot_delete_default("x").is(ErrorKind::CannotDeleteDefault));
        assert!(!AppError::not_found("x").is(ErrorKind::ResourceNotFound));
    }
}
