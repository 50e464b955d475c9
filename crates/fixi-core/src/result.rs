//! Convenience result type alias for Fixi.

use crate::error::AppError;

/// A specialized `Result` type for Fixi operations.
pub type AppResult<T> = Result<T, AppError>;
