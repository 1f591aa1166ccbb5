//! # Data Mutations
//!
//! Semantic operations on the active dictionary entry.
//!
//! ## Semantics
//!
//! ### Update / Add / Remove / Duplicate
//! - Pure path operations on the active entry's data
//! - No no-op detection: an update always re-derives navigation
//!
//! ### AddChildren
//! - One new entry per fragment, ids from the session generator
//! - References are appended; existing references are kept
//!
//! ### RemoveChildren
//! - Only ids referenced at the location are touched; others are skipped
//! - Listed entries are deleted and their references filtered out
//! - A location holding anything but an array (or nothing) is an error
//! - Descendants disappear when the session prunes orphans afterwards
//!
//! After every mutation the session re-anchors child entries whose reference
//! arrays moved with an array splice, then prunes orphans.
//!
//! Mutations run against a working copy. The session commits the copy only
//! when the mutation and the following derivation both succeed.

use crate::errors::{EditorError, EditorResult};
use crate::messages::{ChildFragment, DataRequest};
use formsync_common::{
    duplicate_at, insert_source_into, read, reference_locations, remove_at, write, DataDictionary,
    DataDictionaryEntry, DataLocation, IdGenerator, PathError,
};
use formsync_schema::SchemaDictionary;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// What a mutation needs besides the dictionary it edits
pub struct MutationContext<'a> {
    pub schemas: &'a SchemaDictionary,
    pub active_dictionary_id: &'a str,
}

/// Side results of a mutation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationOutcome {
    /// Entries created by `addChildren`, in fragment order
    pub added: Vec<String>,
}

impl DataRequest {
    /// Apply to `data` in place
    pub fn apply(
        &self,
        context: &MutationContext<'_>,
        data: &mut DataDictionary,
        ids: &mut IdGenerator,
    ) -> EditorResult<MutationOutcome> {
        let active_id = context.active_dictionary_id;
        if !data.contains(active_id) {
            return Err(EditorError::invalid_selection(active_id, ""));
        }

        debug!(action = ?self.action(), dictionary_id = active_id, "Applying data mutation");

        match self {
            DataRequest::Update { data_location, data: value } => {
                Self::update_active(data, active_id, |current| write(current, data_location, value.clone()))?;
                Ok(MutationOutcome::default())
            }

            DataRequest::Add {
                data_location,
                data_type,
                data: value,
            } => {
                Self::update_active(data, active_id, |current| {
                    insert_source_into(current, data_location, *data_type, value.clone())
                })?;
                Ok(MutationOutcome::default())
            }

            DataRequest::Remove { data_location } => {
                Self::update_active(data, active_id, |current| remove_at(current, data_location))?;
                Ok(MutationOutcome::default())
            }

            DataRequest::Duplicate { source_data_location } => {
                Self::update_active(data, active_id, |current| duplicate_at(current, source_data_location))?;
                Ok(MutationOutcome::default())
            }

            DataRequest::AddChildren {
                data_location,
                children,
            } => Self::apply_add_children(context, data, ids, data_location, children),

            DataRequest::RemoveChildren {
                data_location,
                children,
            } => {
                let removing: BTreeSet<&str> = children.iter().map(|child| child.id.as_str()).collect();
                Self::apply_remove_children(data, active_id, data_location, &removing)?;
                Ok(MutationOutcome::default())
            }
        }
    }

    fn update_active(
        data: &mut DataDictionary,
        active_id: &str,
        update: impl FnOnce(&Value) -> Result<Value, PathError>,
    ) -> EditorResult<()> {
        let entry = data
            .get_mut(active_id)
            .ok_or_else(|| EditorError::invalid_selection(active_id, ""))?;
        entry.data = update(&entry.data)?;
        Ok(())
    }

    fn apply_add_children(
        context: &MutationContext<'_>,
        data: &mut DataDictionary,
        ids: &mut IdGenerator,
        location: &DataLocation,
        children: &[ChildFragment],
    ) -> EditorResult<MutationOutcome> {
        let active_id = context.active_dictionary_id;
        let active_schema_id = data
            .get(active_id)
            .map(|entry| entry.schema_id.clone())
            .ok_or_else(|| EditorError::invalid_selection(active_id, ""))?;

        let mut added = Vec::with_capacity(children.len());
        for fragment in children {
            let schema_id = infer_schema_id(context.schemas, &active_schema_id, location, fragment);
            let id = ids.new_id_avoiding(|candidate| data.contains(candidate));
            debug!(id = %id, schema_id = %schema_id, "Adding child entry");

            data.insert(
                id.clone(),
                DataDictionaryEntry::new(schema_id, fragment.data.clone()).with_parent(active_id, location.clone()),
            );
            added.push(id);
        }

        let references = added.iter().map(|id| json!({ "id": id }));
        Self::update_active(data, active_id, |current| {
            let list = match read(current, location) {
                Some(Value::Array(existing)) => existing.iter().cloned().chain(references).collect(),
                _ => references.collect(),
            };
            write(current, location, Value::Array(list))
        })?;

        Ok(MutationOutcome { added })
    }

    fn apply_remove_children(
        data: &mut DataDictionary,
        active_id: &str,
        location: &DataLocation,
        removing: &BTreeSet<&str>,
    ) -> EditorResult<()> {
        let existing = match data.get(active_id).and_then(|entry| read(&entry.data, location)) {
            Some(Value::Array(existing)) => existing.clone(),
            None | Some(Value::Null) => {
                debug!(data_location = %location, "No children to remove");
                return Ok(());
            }
            Some(_) => {
                return Err(PathError::invalid_target(location.to_string(), "expected an array of child references").into())
            }
        };

        let referenced: BTreeSet<&str> = existing
            .iter()
            .filter_map(|item| item.get("id").and_then(Value::as_str))
            .collect();
        let mut removed = BTreeSet::new();
        for id in removing {
            if *id == data.root_id() {
                warn!(dictionary_id = %id, "Refusing to remove the root dictionary entry");
            } else if !referenced.contains(id) {
                warn!(dictionary_id = %id, data_location = %location, "Child is not referenced here");
            } else {
                removed.insert(*id);
            }
        }

        let kept: Vec<Value> = existing
            .iter()
            .filter(|item| {
                !item
                    .get("id")
                    .and_then(Value::as_str)
                    .map_or(false, |id| removed.contains(id))
            })
            .cloned()
            .collect();
        Self::update_active(data, active_id, |current| write(current, location, Value::Array(kept)))?;

        // An entry also linked from another slot of the same parent survives
        let still_linked: BTreeSet<String> = data
            .get(active_id)
            .map(|entry| reference_locations(&entry.data))
            .unwrap_or_default()
            .into_iter()
            .flat_map(|(_, ids)| ids)
            .collect();
        for id in removed {
            if still_linked.contains(id) {
                debug!(dictionary_id = %id, "Child still linked elsewhere");
            } else if data.remove(id).is_none() {
                debug!(dictionary_id = %id, "Child entry already absent");
            }
        }
        Ok(())
    }
}

/// Schema for a new linked entry
///
/// Explicit fragment schema first, then the `items` id declared on the link
/// schema when that schema is loaded, then the active entry's own schema.
fn infer_schema_id(
    schemas: &SchemaDictionary,
    active_schema_id: &str,
    location: &DataLocation,
    fragment: &ChildFragment,
) -> String {
    if let Some(schema_id) = &fragment.schema_id {
        return schema_id.clone();
    }

    schemas
        .get(active_schema_id)
        .and_then(|schema| schema.root.find(location))
        .and_then(|node| node.linked_schema_id())
        .filter(|schema_id| schemas.contains(schema_id))
        .unwrap_or(active_schema_id)
        .to_string()
}
