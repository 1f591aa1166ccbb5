use thiserror::Error;

/// Failure raised by the path resolver
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("Invalid path target at '{location}': {reason}")]
    InvalidPathTarget { location: String, reason: String },

    #[error("Malformed data location '{0}'")]
    MalformedLocation(String),
}

impl PathError {
    pub fn invalid_target(location: impl Into<String>, reason: impl Into<String>) -> Self {
        PathError::InvalidPathTarget {
            location: location.into(),
            reason: reason.into(),
        }
    }
}
