//! Navigation dictionary types

use formsync_common::DataLocation;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Kind of a navigation node, drives the icon and breadcrumb rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NavigationDataType {
    Object,
    Array,
    /// Link node whose items are the roots of other dictionary entries
    Children,
    Primitive,
}

/// One node of the derived navigation tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNavigationItem {
    pub text: String,

    #[serde(rename = "type")]
    pub kind: NavigationDataType,

    /// Raw schema governing this node
    pub schema: Value,

    pub schema_location: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Location relative to the dictionary entry's data root
    pub data_location: DataLocation,

    /// Location relative to the parent navigation node
    pub relative_data_location: DataLocation,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Set on an entry root that is linked from another dictionary entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_dictionary_id: Option<String>,

    /// Child navigation ids in display order
    pub items: Vec<String>,

    /// For link nodes: the dictionary id owning each id in `items`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub linked_dictionary_ids: Vec<String>,

    #[serde(rename = "self")]
    pub self_id: String,
}

impl TreeNavigationItem {
    pub fn has_content(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn is_link(&self) -> bool {
        self.kind == NavigationDataType::Children
    }
}

/// Navigation tree of a single dictionary entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNavigationConfig {
    pub items: BTreeMap<String, TreeNavigationItem>,
    pub root_navigation_config_id: String,
}

impl TreeNavigationConfig {
    pub fn get(&self, navigation_config_id: &str) -> Option<&TreeNavigationItem> {
        self.items.get(navigation_config_id)
    }

    pub fn root(&self) -> Option<&TreeNavigationItem> {
        self.items.get(&self.root_navigation_config_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Address of a navigation node across dictionaries
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationRef {
    pub dictionary_id: String,
    pub navigation_config_id: String,
}

impl NavigationRef {
    pub fn new(dictionary_id: impl Into<String>, navigation_config_id: impl Into<String>) -> Self {
        Self {
            dictionary_id: dictionary_id.into(),
            navigation_config_id: navigation_config_id.into(),
        }
    }
}

/// Derived navigation for every entry reachable from the root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationDictionary {
    pub dictionaries: BTreeMap<String, TreeNavigationConfig>,
    pub root_dictionary_id: String,
}

impl NavigationDictionary {
    pub fn get(&self, dictionary_id: &str) -> Option<&TreeNavigationConfig> {
        self.dictionaries.get(dictionary_id)
    }

    pub fn item(&self, dictionary_id: &str, navigation_config_id: &str) -> Option<&TreeNavigationItem> {
        self.dictionaries.get(dictionary_id)?.get(navigation_config_id)
    }

    pub fn contains(&self, dictionary_id: &str, navigation_config_id: &str) -> bool {
        self.item(dictionary_id, navigation_config_id).is_some()
    }

    pub fn root_navigation_id(&self, dictionary_id: &str) -> Option<&str> {
        self.dictionaries
            .get(dictionary_id)
            .map(|config| config.root_navigation_config_id.as_str())
    }

    /// Root of the whole tree
    pub fn root(&self) -> Option<NavigationRef> {
        let navigation_id = self.root_navigation_id(&self.root_dictionary_id)?;
        Some(NavigationRef::new(self.root_dictionary_id.clone(), navigation_id))
    }

    /// Children of a node, resolving link nodes into their linked dictionaries
    pub fn children_of(&self, dictionary_id: &str, navigation_config_id: &str) -> Vec<NavigationRef> {
        let item = match self.item(dictionary_id, navigation_config_id) {
            Some(item) => item,
            None => return Vec::new(),
        };

        item.items
            .iter()
            .enumerate()
            .map(|(index, child)| {
                let owner = if item.is_link() {
                    item.linked_dictionary_ids
                        .get(index)
                        .map(String::as_str)
                        .unwrap_or(dictionary_id)
                } else {
                    dictionary_id
                };
                NavigationRef::new(owner, child.clone())
            })
            .collect()
    }

    /// Parent of a node, crossing back into the linking dictionary at entry roots
    pub fn parent_of(&self, dictionary_id: &str, navigation_config_id: &str) -> Option<NavigationRef> {
        let item = self.item(dictionary_id, navigation_config_id)?;
        let parent = item.parent.as_ref()?;
        let owner = item.parent_dictionary_id.as_deref().unwrap_or(dictionary_id);
        Some(NavigationRef::new(owner, parent.clone()))
    }

    /// Total navigation items across dictionaries
    pub fn item_count(&self) -> usize {
        self.dictionaries.values().map(TreeNavigationConfig::len).sum()
    }
}

/// Stable navigation id for a structural position inside an entry
pub fn navigation_config_id(dictionary_id: &str, data_location: &DataLocation) -> String {
    format!("{}::{}", dictionary_id, data_location)
}
