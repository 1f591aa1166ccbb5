use crate::error::PathError;

/// Result type for path resolver operations
pub type PathResult<T> = Result<T, PathError>;
