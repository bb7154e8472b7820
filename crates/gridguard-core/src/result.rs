//! Convenience result type alias for GridGuard.

use crate::error::AppError;

/// A specialized `Result` type for GridGuard operations.
pub type AppResult<T> = Result<T, AppError>;
