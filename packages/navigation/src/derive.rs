//! # Navigation Derivation
//!
//! `(SchemaDictionary, DataDictionary) -> NavigationDictionary`
//!
//! The walk starts at the root entry and pairs each schema node with the data
//! at the same location. Every object, array and primitive position gets one
//! navigation item. Link positions do not descend inline: their items are the
//! root navigation ids of the referenced entries, derived recursively.
//!
//! ## Determinism
//!
//! Navigation ids are a function of `(dictionary id, data location)` only,
//! storage is `BTreeMap`, and properties are visited in schema declaration
//! order. Two derivations over equal inputs are equal.
//!
//! ## Dangling references
//!
//! A link to a missing entry, or to an entry already derived during this call
//! (a cycle or a duplicated reference), is skipped with a warning so a
//! transiently inconsistent document still renders. Links nested deeper than
//! [`MAX_LINK_DEPTH`] are skipped the same way, which bounds the recursion.

use crate::errors::{NavigationError, NavigationResult};
use crate::types::{navigation_config_id, NavigationDataType, NavigationDictionary, TreeNavigationConfig, TreeNavigationItem};
use formsync_common::{reference_ids, DataDictionary, DataLocation, PathStep};
use formsync_schema::{SchemaDictionary, SchemaKind, SchemaNode};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument, warn};

/// Deepest chain of linked entries derived below the root
pub const MAX_LINK_DEPTH: usize = 128;

/// Placeholder text for nodes with neither a title nor a key
pub const UNTITLED: &str = "Untitled";

/// Knobs for derivation output
#[derive(Debug, Clone, PartialEq)]
pub struct DeriveOptions {
    pub untitled: String,
}

impl Default for DeriveOptions {
    fn default() -> Self {
        Self {
            untitled: UNTITLED.to_string(),
        }
    }
}

/// Derive navigation with default options
pub fn derive_navigation(
    schemas: &SchemaDictionary,
    data: &DataDictionary,
) -> NavigationResult<NavigationDictionary> {
    derive_navigation_with(schemas, data, &DeriveOptions::default())
}

/// Derive the navigation of every entry reachable from the root
#[instrument(skip_all, fields(root = %data.root_id(), entries = data.len()))]
pub fn derive_navigation_with(
    schemas: &SchemaDictionary,
    data: &DataDictionary,
    options: &DeriveOptions,
) -> NavigationResult<NavigationDictionary> {
    let root_id = data.root_id();
    if !data.contains(root_id) {
        return Err(NavigationError::EntryNotFound(root_id.to_string()));
    }

    let mut deriver = Deriver {
        schemas,
        data,
        options,
        visited: BTreeSet::new(),
        output: BTreeMap::new(),
        depth: 0,
    };
    deriver.derive_entry(root_id, None)?;

    debug!(dictionaries = deriver.output.len(), "Navigation derived");

    Ok(NavigationDictionary {
        dictionaries: deriver.output,
        root_dictionary_id: root_id.to_string(),
    })
}

struct Deriver<'a> {
    schemas: &'a SchemaDictionary,
    data: &'a DataDictionary,
    options: &'a DeriveOptions,
    visited: BTreeSet<String>,
    output: BTreeMap<String, TreeNavigationConfig>,
    /// Link levels between the root and the entry being derived
    depth: usize,
}

/// Link node that owns a linked entry's root
struct LinkParent<'p> {
    dictionary_id: &'p str,
    navigation_config_id: &'p str,
}

/// Position being walked inside one entry
struct Position {
    location: DataLocation,
    label: Option<String>,
    parent: Option<String>,
}

impl<'a> Deriver<'a> {
    /// Derive one entry; `None` when the reference dangles
    fn derive_entry(
        &mut self,
        dictionary_id: &str,
        link_parent: Option<LinkParent<'_>>,
    ) -> NavigationResult<Option<String>> {
        let data: &'a DataDictionary = self.data;

        let entry = match data.get(dictionary_id) {
            Some(entry) => entry,
            None => {
                warn!(dictionary_id, "Dangling reference to missing dictionary entry");
                return Ok(None);
            }
        };

        if self.depth > MAX_LINK_DEPTH {
            warn!(dictionary_id, depth = self.depth, "Linked entry nested too deep, skipping");
            return Ok(None);
        }

        if !self.visited.insert(dictionary_id.to_string()) {
            warn!(dictionary_id, "Dictionary entry already linked elsewhere, skipping");
            return Ok(None);
        }

        let schemas: &'a SchemaDictionary = self.schemas;
        let schema = schemas
            .get(&entry.schema_id)
            .ok_or_else(|| NavigationError::SchemaNotFound {
                schema_id: entry.schema_id.clone(),
                dictionary_id: dictionary_id.to_string(),
            })?;

        debug!(dictionary_id, schema_id = %entry.schema_id, "Deriving entry navigation");

        let mut items = BTreeMap::new();
        let root = Position {
            location: DataLocation::root(),
            label: None,
            parent: None,
        };
        let root_id = self.walk(dictionary_id, &schema.root, Some(&entry.data), root, &mut items)?;

        if let Some(link_parent) = link_parent {
            if let Some(root_item) = items.get_mut(&root_id) {
                root_item.parent = Some(link_parent.navigation_config_id.to_string());
                root_item.parent_dictionary_id = Some(link_parent.dictionary_id.to_string());
            }
        }

        self.output.insert(
            dictionary_id.to_string(),
            TreeNavigationConfig {
                items,
                root_navigation_config_id: root_id.clone(),
            },
        );
        Ok(Some(root_id))
    }

    fn walk(
        &mut self,
        dictionary_id: &str,
        schema: &'a SchemaNode,
        value: Option<&'a Value>,
        position: Position,
        items: &mut BTreeMap<String, TreeNavigationItem>,
    ) -> NavigationResult<String> {
        let id = navigation_config_id(dictionary_id, &position.location);

        let mut children = Vec::new();
        let mut linked_dictionary_ids = Vec::new();

        let kind = if schema.link {
            for reference in reference_ids(value.unwrap_or(&Value::Null)) {
                let link_parent = LinkParent {
                    dictionary_id,
                    navigation_config_id: &id,
                };
                self.depth += 1;
                let derived = self.derive_entry(&reference, Some(link_parent));
                self.depth -= 1;
                if let Some(child_root) = derived? {
                    children.push(child_root);
                    linked_dictionary_ids.push(reference);
                }
            }
            NavigationDataType::Children
        } else {
            match &schema.kind {
                SchemaKind::Object { properties } => {
                    for (key, property) in properties {
                        let child = Position {
                            location: position.location.child(PathStep::key(key.as_str())),
                            label: Some(key.clone()),
                            parent: Some(id.clone()),
                        };
                        let child_value = value.and_then(|value| value.get(key));
                        children.push(self.walk(dictionary_id, property, child_value, child, items)?);
                    }
                    NavigationDataType::Object
                }
                SchemaKind::Array { items: item_schema } => {
                    if let (Some(item_schema), Some(Value::Array(values))) = (item_schema, value) {
                        for (index, item_value) in values.iter().enumerate() {
                            let child = Position {
                                location: position.location.child(PathStep::Index(index)),
                                label: Some(index.to_string()),
                                parent: Some(id.clone()),
                            };
                            children.push(self.walk(dictionary_id, item_schema, Some(item_value), child, items)?);
                        }
                    }
                    NavigationDataType::Array
                }
                SchemaKind::Primitive => NavigationDataType::Primitive,
            }
        };

        let relative_data_location = position
            .location
            .last()
            .map(|step| DataLocation::new(vec![step.clone()]))
            .unwrap_or_default();

        let text = self.resolve_text(schema, value, &position);

        items.insert(
            id.clone(),
            TreeNavigationItem {
                text,
                kind,
                schema: schema.raw.clone(),
                schema_location: schema.location.clone(),
                data: value.cloned(),
                data_location: position.location,
                relative_data_location,
                parent: position.parent,
                parent_dictionary_id: None,
                items: children,
                linked_dictionary_ids,
                self_id: id.clone(),
            },
        );

        Ok(id)
    }

    /// Entry roots prefer their own `title` data so linked siblings are
    /// distinguishable; everything else uses schema title, key, placeholder.
    fn resolve_text(&self, schema: &SchemaNode, value: Option<&Value>, position: &Position) -> String {
        if position.location.is_root() && schema.is_object() {
            if let Some(title) = value.and_then(|value| value.get("title")).and_then(Value::as_str) {
                if !title.is_empty() {
                    return title.to_string();
                }
            }
        }

        schema
            .title
            .as_deref()
            .or(position.label.as_deref())
            .unwrap_or(&self.options.untitled)
            .to_string()
    }
}
