//! # Message Contract
//!
//! Requests and responses exchanged with the rendering layer. Both serialize
//! to JSON with a `type` discriminant (the message kind) and, below it, an
//! `action` discriminant:
//!
//! ```json
//! { "type": "data", "action": "update", "dataLocation": "title", "data": "A" }
//! ```
//!
//! Responses are owned snapshots; nothing in them aliases session state.

use formsync_common::{ChildReference, DataDictionary, DataLocation, DataType};
use formsync_navigation::{NavigationDictionary, TreeNavigationConfig};
use formsync_schema::SchemaDictionary;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Request {
    #[serde(rename_all = "camelCase")]
    Initialize {
        #[serde(alias = "data")]
        data_dictionary: DataDictionary,
        #[serde(alias = "schemas")]
        schema_dictionary: SchemaDictionary,
    },
    Data(DataRequest),
    DataDictionary(DictionaryRequest),
    Navigation(NavigationRequest),
    NavigationDictionary(DictionaryRequest),
}

/// Mutations of the active dictionary entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DataRequest {
    /// Replace the value at `data_location` (the empty location replaces the entry)
    Update { data_location: DataLocation, data: Value },

    /// Insert `data`, appending when the target is already an array
    Add {
        data_location: DataLocation,
        #[serde(default)]
        data_type: DataType,
        data: Value,
    },

    Remove { data_location: DataLocation },

    /// Copy an array item in place
    Duplicate { source_data_location: DataLocation },

    /// Create linked entries and reference them from `data_location`
    AddChildren {
        data_location: DataLocation,
        children: Vec<ChildFragment>,
    },

    /// Delete linked entries and drop their references at `data_location`
    RemoveChildren {
        data_location: DataLocation,
        children: Vec<ChildReference>,
    },
}

impl DataRequest {
    pub fn action(&self) -> DataAction {
        match self {
            DataRequest::Update { .. } => DataAction::Update,
            DataRequest::Add { .. } => DataAction::Add,
            DataRequest::Remove { .. } => DataAction::Remove,
            DataRequest::Duplicate { .. } => DataAction::Duplicate,
            DataRequest::AddChildren { .. } => DataAction::AddChildren,
            DataRequest::RemoveChildren { .. } => DataAction::RemoveChildren,
        }
    }
}

/// Data for a new linked entry; the schema is inferred when omitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildFragment {
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_id: Option<String>,
}

impl ChildFragment {
    pub fn new(data: Value) -> Self {
        Self { data, schema_id: None }
    }

    pub fn with_schema(data: Value, schema_id: impl Into<String>) -> Self {
        Self {
            data,
            schema_id: Some(schema_id.into()),
        }
    }
}

/// Shared by the data dictionary and navigation dictionary kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DictionaryRequest {
    Get,
    UpdateActiveId { active_dictionary_id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum NavigationRequest {
    Get,
    Update {
        active_dictionary_id: String,
        active_navigation_config_id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataAction {
    Update,
    Add,
    Remove,
    Duplicate,
    AddChildren,
    RemoveChildren,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Response {
    Initialize(Snapshot),
    Data(DataResponse),
    DataDictionary(DataDictionaryResponse),
    Navigation(NavigationResponse),
    NavigationDictionary(NavigationDictionaryResponse),
}

/// Full session state, returned by `initialize`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Data of the active entry
    pub data: Value,
    pub data_dictionary: DataDictionary,
    /// Navigation of the active entry
    pub navigation: TreeNavigationConfig,
    pub navigation_dictionary: NavigationDictionary,
    pub active_dictionary_id: String,
    pub active_navigation_config_id: String,
    /// Raw schema of the active entry
    pub schema: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataResponse {
    pub action: DataAction,

    /// Echoed for `duplicate`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_data_location: Option<DataLocation>,

    pub data: Value,
    pub navigation: TreeNavigationConfig,
    pub active_dictionary_id: String,
    pub active_navigation_config_id: String,

    /// Ids created by `addChildren`, in fragment order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub added_dictionary_ids: Vec<String>,

    /// Entries deleted by the mutation, including cascaded ones
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed_dictionary_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DataDictionaryResponse {
    Get {
        data_dictionary: DataDictionary,
        active_dictionary_id: String,
    },
    UpdateActiveId {
        active_dictionary_id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum NavigationResponse {
    Get {
        active_dictionary_id: String,
        active_navigation_config_id: String,
        navigation: TreeNavigationConfig,
    },
    Update {
        active_dictionary_id: String,
        active_navigation_config_id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum NavigationDictionaryResponse {
    Get {
        navigation_dictionary: NavigationDictionary,
        active_dictionary_id: String,
    },
    UpdateActiveId {
        active_dictionary_id: String,
        active_navigation_config_id: String,
    },
}
