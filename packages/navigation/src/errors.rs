//! Error types for navigation derivation

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NavigationError {
    #[error("Schema not found: '{schema_id}' (used by dictionary entry '{dictionary_id}')")]
    SchemaNotFound {
        schema_id: String,
        dictionary_id: String,
    },

    #[error("Dictionary entry not found: {0}")]
    EntryNotFound(String),
}

pub type NavigationResult<T> = Result<T, NavigationError>;
