//! # Data Dictionary
//!
//! The document is stored as a forest of independently addressable entries.
//! An entry may hold references (`[{ "id": ... }]`) to other entries at a
//! link location; the referenced entry records the reverse edge in `parent`.
//!
//! ```text
//! root ── data.items = [{id: "b"}] ──▶ b (parent: root @ items)
//! ```

use crate::location::{DataLocation, PathStep};
use crate::resolver::read;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Shape hint used when inserting data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataType {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Null,
    Children,
    Unknown,
}

impl Default for DataType {
    fn default() -> Self {
        DataType::Unknown
    }
}

/// Back-reference from an entry to the entry that links it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentReference {
    pub id: String,
    pub data_location: DataLocation,
}

/// Reference stored in a link field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildReference {
    pub id: String,
}

/// One addressable fragment of the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataDictionaryEntry {
    pub data: Value,
    pub schema_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentReference>,
}

impl DataDictionaryEntry {
    pub fn new(schema_id: impl Into<String>, data: Value) -> Self {
        Self {
            data,
            schema_id: schema_id.into(),
            parent: None,
        }
    }

    pub fn with_parent(mut self, id: impl Into<String>, data_location: DataLocation) -> Self {
        self.parent = Some(ParentReference {
            id: id.into(),
            data_location,
        });
        self
    }
}

/// Broken invariant found by [`DataDictionary::integrity_issues`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    /// A link field references an id with no entry
    MissingReference { from: String, id: String },
    /// An entry names a parent that does not exist
    MissingParent { id: String, parent: String },
    /// The parent exists but does not reference the entry back
    UnreferencedByParent { id: String, parent: String },
    /// The designated root entry is absent
    MissingRoot(String),
}

/// All entries of a document plus the designated root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataDictionary {
    pub entries: BTreeMap<String, DataDictionaryEntry>,
    pub root_dictionary_id: String,
}

impl DataDictionary {
    /// Dictionary with a single root entry
    pub fn new(root_id: impl Into<String>, root: DataDictionaryEntry) -> Self {
        let root_id = root_id.into();
        let mut entries = BTreeMap::new();
        entries.insert(root_id.clone(), root);
        Self {
            entries,
            root_dictionary_id: root_id,
        }
    }

    pub fn root_id(&self) -> &str {
        &self.root_dictionary_id
    }

    pub fn get(&self, id: &str) -> Option<&DataDictionaryEntry> {
        self.entries.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut DataDictionaryEntry> {
        self.entries.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn insert(&mut self, id: impl Into<String>, entry: DataDictionaryEntry) {
        self.entries.insert(id.into(), entry);
    }

    pub fn remove(&mut self, id: &str) -> Option<DataDictionaryEntry> {
        self.entries.remove(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids referenced from `id`'s data at `location`
    pub fn references_at(&self, id: &str, location: &DataLocation) -> Vec<String> {
        self.entries
            .get(id)
            .and_then(|entry| read(&entry.data, location))
            .map(reference_ids)
            .unwrap_or_default()
    }

    /// Whether `id` is still referenced by the parent it declares
    pub fn is_referenced_by_parent(&self, id: &str) -> bool {
        match self.entries.get(id).and_then(|entry| entry.parent.as_ref()) {
            Some(parent) => self
                .references_at(&parent.id, &parent.data_location)
                .iter()
                .any(|child| child == id),
            None => true,
        }
    }

    /// Point stale parent locations at the slot that now references the entry
    ///
    /// Splicing an array shifts the reference arrays inside later items, so a
    /// recorded `list[1].children` may now live at `list[0].children`. An entry
    /// whose recorded slot no longer links to it moves to the first slot in the
    /// same parent that does. Returns the ids whose location changed.
    pub fn reanchor_parents(&mut self) -> Vec<String> {
        let stale: Vec<(String, String)> = self
            .entries
            .iter()
            .filter(|(id, _)| !self.is_referenced_by_parent(id))
            .filter_map(|(id, entry)| entry.parent.as_ref().map(|parent| (id.clone(), parent.id.clone())))
            .collect();

        let mut moved = Vec::new();
        for (id, parent_id) in stale {
            let found = self.entries.get(&parent_id).and_then(|parent| {
                reference_locations(&parent.data)
                    .into_iter()
                    .find(|(_, referenced)| referenced.contains(&id))
                    .map(|(location, _)| location)
            });
            let slot = self.entries.get_mut(&id).and_then(|entry| entry.parent.as_mut());
            if let (Some(location), Some(parent)) = (found, slot) {
                parent.data_location = location;
                moved.push(id);
            }
        }
        moved
    }

    /// Drop every entry whose declared parent is gone or no longer links to it
    ///
    /// Repeats until stable so whole subtrees disappear with their root.
    /// Returns the removed ids in removal order.
    pub fn prune_orphans(&mut self) -> Vec<String> {
        let mut removed = Vec::new();
        loop {
            let orphans: Vec<String> = self
                .entries
                .iter()
                .filter(|(id, _)| id.as_str() != self.root_dictionary_id)
                .filter(|(id, entry)| match &entry.parent {
                    Some(parent) => {
                        !self.entries.contains_key(&parent.id) || !self.is_referenced_by_parent(id)
                    }
                    None => false,
                })
                .map(|(id, _)| id.clone())
                .collect();

            if orphans.is_empty() {
                return removed;
            }
            for id in orphans {
                self.entries.remove(&id);
                removed.push(id);
            }
        }
    }

    /// Every broken referential invariant, in deterministic order
    pub fn integrity_issues(&self) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();
        if !self.entries.contains_key(&self.root_dictionary_id) {
            issues.push(IntegrityIssue::MissingRoot(self.root_dictionary_id.clone()));
        }

        for (id, entry) in &self.entries {
            if let Some(parent) = &entry.parent {
                if !self.entries.contains_key(&parent.id) {
                    issues.push(IntegrityIssue::MissingParent {
                        id: id.clone(),
                        parent: parent.id.clone(),
                    });
                } else if !self.is_referenced_by_parent(id) {
                    issues.push(IntegrityIssue::UnreferencedByParent {
                        id: id.clone(),
                        parent: parent.id.clone(),
                    });
                }
            }
        }

        let mut seen = BTreeSet::new();
        for (id, entry) in &self.entries {
            for (_, referenced) in reference_locations(&entry.data) {
                for child in referenced {
                    if !self.entries.contains_key(&child) && seen.insert((id.clone(), child.clone())) {
                        issues.push(IntegrityIssue::MissingReference {
                            from: id.clone(),
                            id: child,
                        });
                    }
                }
            }
        }

        issues
    }
}

/// Every non-empty reference array inside `value`, depth-first
///
/// A reference array is an array whose items are all objects with a single
/// string `id` field.
pub fn reference_locations(value: &Value) -> Vec<(DataLocation, Vec<String>)> {
    let mut found = Vec::new();
    collect_reference_locations(value, DataLocation::root(), &mut found);
    found
}

fn collect_reference_locations(value: &Value, location: DataLocation, found: &mut Vec<(DataLocation, Vec<String>)>) {
    match value {
        Value::Array(items) => {
            let is_reference = !items.is_empty()
                && items.iter().all(|item| {
                    item.as_object()
                        .map(|map| map.len() == 1 && map.get("id").map_or(false, Value::is_string))
                        .unwrap_or(false)
                });
            if is_reference {
                found.push((location, reference_ids(value)));
                return;
            }
            for (index, item) in items.iter().enumerate() {
                collect_reference_locations(item, location.child(PathStep::Index(index)), found);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                collect_reference_locations(item, location.child(PathStep::key(key.as_str())), found);
            }
        }
        _ => {}
    }
}

/// Ids in a `[{ "id": ... }]` reference array; anything else yields nothing
pub fn reference_ids(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("id").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
