//! # Tree View State
//!
//! Expand/collapse state and keyboard movement over a derived navigation
//! dictionary. The state only stores which nodes are expanded; the visible
//! order is recomputed from the navigation on demand so it stays correct
//! after every re-derivation.

use crate::types::{NavigationDictionary, NavigationRef};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Keys the tree responds to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TreeKey {
    Up,
    Down,
    /// Expand, or step into the first child when already expanded
    Right,
    /// Collapse, or step out to the parent when already collapsed
    Left,
    Home,
    End,
}

/// A node as displayed, with its nesting depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleItem {
    pub position: NavigationRef,
    pub depth: usize,
    pub expanded: bool,
    pub has_content: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeView {
    /// Expanded navigation ids, per dictionary
    expanded: BTreeMap<String, BTreeSet<String>>,
}

impl TreeView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, dictionary_id: &str, navigation_config_id: &str) -> bool {
        self.expanded
            .get(dictionary_id)
            .map_or(false, |ids| ids.contains(navigation_config_id))
    }

    pub fn expand(&mut self, dictionary_id: &str, navigation_config_id: &str) {
        self.expanded
            .entry(dictionary_id.to_string())
            .or_default()
            .insert(navigation_config_id.to_string());
    }

    pub fn collapse(&mut self, dictionary_id: &str, navigation_config_id: &str) {
        if let Some(ids) = self.expanded.get_mut(dictionary_id) {
            ids.remove(navigation_config_id);
            if ids.is_empty() {
                self.expanded.remove(dictionary_id);
            }
        }
    }

    /// Flip the expanded state; returns the new state
    pub fn toggle(&mut self, dictionary_id: &str, navigation_config_id: &str) -> bool {
        if self.is_expanded(dictionary_id, navigation_config_id) {
            self.collapse(dictionary_id, navigation_config_id);
            false
        } else {
            self.expand(dictionary_id, navigation_config_id);
            true
        }
    }

    /// Drop expanded ids that no longer exist in `navigation`
    pub fn retain_existing(&mut self, navigation: &NavigationDictionary) {
        for (dictionary_id, ids) in self.expanded.iter_mut() {
            ids.retain(|id| navigation.contains(dictionary_id, id));
        }
        self.expanded.retain(|_, ids| !ids.is_empty());
    }

    /// Nodes in display order; children show only under expanded parents
    pub fn visible_items(&self, navigation: &NavigationDictionary) -> Vec<VisibleItem> {
        let mut visible = Vec::new();
        if let Some(root) = navigation.root() {
            self.collect_visible(navigation, root, 0, &mut visible);
        }
        visible
    }

    fn collect_visible(
        &self,
        navigation: &NavigationDictionary,
        position: NavigationRef,
        depth: usize,
        visible: &mut Vec<VisibleItem>,
    ) {
        let has_content = navigation
            .item(&position.dictionary_id, &position.navigation_config_id)
            .map_or(false, |item| item.has_content());
        let expanded = self.is_expanded(&position.dictionary_id, &position.navigation_config_id);
        let children = if expanded && has_content {
            navigation.children_of(&position.dictionary_id, &position.navigation_config_id)
        } else {
            Vec::new()
        };

        visible.push(VisibleItem {
            position,
            depth,
            expanded,
            has_content,
        });

        for child in children {
            self.collect_visible(navigation, child, depth + 1, visible);
        }
    }

    /// Apply a key press at `focus`; returns the node that should hold focus
    ///
    /// `Right`/`Left` may change the expanded state instead of moving.
    pub fn handle_key(
        &mut self,
        navigation: &NavigationDictionary,
        focus: &NavigationRef,
        key: TreeKey,
    ) -> Option<NavigationRef> {
        let visible = self.visible_items(navigation);
        if visible.is_empty() {
            return None;
        }
        let current = visible.iter().position(|item| &item.position == focus);
        let last = visible.len() - 1;

        let target = match key {
            TreeKey::Down => match current {
                Some(index) if index < last => index + 1,
                _ => last,
            },
            TreeKey::Up => match current {
                Some(index) if index > 0 => index - 1,
                _ => 0,
            },
            TreeKey::Home => 0,
            TreeKey::End => last,
            TreeKey::Right => {
                let index = current?;
                let item = &visible[index];
                if !item.has_content {
                    index
                } else if item.expanded {
                    (index + 1).min(last)
                } else {
                    self.expand(&focus.dictionary_id, &focus.navigation_config_id);
                    return Some(focus.clone());
                }
            }
            TreeKey::Left => {
                let index = current?;
                let item = &visible[index];
                if item.expanded && item.has_content {
                    self.collapse(&focus.dictionary_id, &focus.navigation_config_id);
                    return Some(focus.clone());
                }
                return navigation
                    .parent_of(&focus.dictionary_id, &focus.navigation_config_id)
                    .or_else(|| Some(focus.clone()));
            }
        };

        Some(visible[target].position.clone())
    }
}
