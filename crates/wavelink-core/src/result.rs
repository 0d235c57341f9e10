//! Convenience result type alias for Wavelink.

use crate::error::AppError;

/// A specialized `Result` type for Wavelink operations.
pub type AppResult<T> = Result<T, AppError>;
