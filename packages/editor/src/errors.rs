//! Error types for the editor

use formsync_common::PathError;
use formsync_navigation::NavigationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Session is not initialized; send an initialize message first")]
    UninitializedState,

    #[error("Path error: {0}")]
    Path(#[from] PathError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),

    #[error("Invalid selection: '{navigation_config_id}' in dictionary '{dictionary_id}'")]
    InvalidSelection {
        dictionary_id: String,
        navigation_config_id: String,
    },

    #[error("Message codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

impl EditorError {
    pub(crate) fn invalid_selection(dictionary_id: &str, navigation_config_id: &str) -> Self {
        EditorError::InvalidSelection {
            dictionary_id: dictionary_id.to_string(),
            navigation_config_id: navigation_config_id.to_string(),
        }
    }
}

pub type EditorResult<T> = Result<T, EditorError>;
