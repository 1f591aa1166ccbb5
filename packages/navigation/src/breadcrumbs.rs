//! Breadcrumb trail for the active navigation node

use crate::types::{NavigationDataType, NavigationDictionary, NavigationRef};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breadcrumb {
    pub dictionary_id: String,
    pub navigation_config_id: String,
    pub text: String,
}

/// Ancestors of a node, root first, ending with the node itself
///
/// Array nodes are left out: their items are shown at the same level as the
/// sibling controls. The trail continues through link nodes into the entry that
/// links the current one.
pub fn get_breadcrumbs(
    navigation: &NavigationDictionary,
    dictionary_id: &str,
    navigation_config_id: &str,
) -> Vec<Breadcrumb> {
    let mut trail = Vec::new();
    let mut seen = HashSet::new();
    let mut current = Some(NavigationRef::new(dictionary_id, navigation_config_id));

    while let Some(position) = current {
        if !seen.insert(position.clone()) {
            break;
        }
        let item = match navigation.item(&position.dictionary_id, &position.navigation_config_id) {
            Some(item) => item,
            None => break,
        };

        if item.kind != NavigationDataType::Array {
            trail.push(Breadcrumb {
                dictionary_id: position.dictionary_id.clone(),
                navigation_config_id: position.navigation_config_id.clone(),
                text: item.text.clone(),
            });
        }

        current = navigation.parent_of(&position.dictionary_id, &position.navigation_config_id);
    }

    trail.reverse();
    trail
}
