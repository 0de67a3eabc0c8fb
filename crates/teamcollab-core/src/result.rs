//! Convenience result type alias for TeamCollab.

use crate::error::AppError;

/// A specialized `Result` type for TeamCollab operations.
pub type AppResult<T> = Result<T, AppError>;
