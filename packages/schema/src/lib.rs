//! # Formsync Schema
//!
//! Compiled JSON-Schema documents for the form editor.
//!
//! Schemas are loaded once per session and compiled into a tree of
//! [`SchemaNode`]s. Compilation resolves everything the navigation walk needs
//! up front: the node kind (object, array or primitive), the declared property
//! order, the title and the link marker. A link marker
//! (`navigationDictionaryLink: true`, or the short `link: true`) means the
//! values at that location are `[{ "id": ... }]` references into other data
//! dictionary entries rather than inline content.
//!
//! Only the structural keywords are interpreted here. Validation keywords
//! are left in the raw value for an external validator.

use formsync_common::{DataLocation, PathStep};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Keyword marking a property as a link to other dictionary entries
pub const NAVIGATION_DICTIONARY_LINK: &str = "navigationDictionaryLink";

/// Short form of [`NAVIGATION_DICTIONARY_LINK`]
pub const LINK_KEYWORD: &str = "link";

/// Structural kind of a schema node
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    /// Properties in declaration order
    Object { properties: Vec<(String, SchemaNode)> },
    Array { items: Option<Box<SchemaNode>> },
    Primitive,
}

/// One compiled node of a schema document
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    /// The schema value at this node, as loaded
    pub raw: Value,
    pub title: Option<String>,
    pub kind: SchemaKind,
    /// Resolved link marker
    pub link: bool,
    /// Dotted location inside the schema document (`properties.items`)
    pub location: String,
}

impl SchemaNode {
    /// Compile a raw schema value
    pub fn compile(raw: &Value) -> Self {
        Self::compile_at(raw, String::new())
    }

    fn compile_at(raw: &Value, location: String) -> Self {
        let link = [NAVIGATION_DICTIONARY_LINK, LINK_KEYWORD]
            .iter()
            .any(|keyword| raw.get(*keyword).and_then(Value::as_bool).unwrap_or(false));

        let kind = match declared_type(raw) {
            Some("object") => SchemaKind::Object {
                properties: compile_properties(raw, &location),
            },
            Some("array") => SchemaKind::Array {
                items: raw
                    .get("items")
                    .filter(|items| items.is_object())
                    .map(|items| Box::new(Self::compile_at(items, join(&location, "items")))),
            },
            _ => SchemaKind::Primitive,
        };

        Self {
            raw: raw.clone(),
            title: raw.get("title").and_then(Value::as_str).map(str::to_string),
            kind,
            link,
            location,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self.kind, SchemaKind::Object { .. })
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, SchemaKind::Array { .. })
    }

    /// Schema of a declared property
    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        match &self.kind {
            SchemaKind::Object { properties } => properties
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, node)| node),
            _ => None,
        }
    }

    /// Schema of the array items
    pub fn items(&self) -> Option<&SchemaNode> {
        match &self.kind {
            SchemaKind::Array { items } => items.as_deref(),
            _ => None,
        }
    }

    /// Follow a data location through the schema
    ///
    /// Keys select properties and indices select array items.
    pub fn find(&self, location: &DataLocation) -> Option<&SchemaNode> {
        let mut current = self;
        for step in location.steps() {
            current = match step {
                PathStep::Key(key) => current.property(key)?,
                PathStep::Index(_) => current.items()?,
            };
        }
        Some(current)
    }

    /// Schema id declared for linked entries (`items.id` or `items.$id`)
    pub fn linked_schema_id(&self) -> Option<&str> {
        let items = self.raw.get("items")?;
        items
            .get("id")
            .or_else(|| items.get("$id"))
            .and_then(Value::as_str)
    }
}

fn declared_type(raw: &Value) -> Option<&str> {
    match raw.get("type") {
        Some(Value::String(kind)) => Some(kind.as_str()),
        Some(Value::Array(kinds)) => kinds
            .iter()
            .filter_map(Value::as_str)
            .find(|kind| *kind != "null"),
        _ if raw.get("properties").is_some() => Some("object"),
        _ if raw.get("items").is_some() => Some("array"),
        _ => None,
    }
}

fn compile_properties(raw: &Value, location: &str) -> Vec<(String, SchemaNode)> {
    raw.get("properties")
        .and_then(Value::as_object)
        .map(|properties| {
            properties
                .iter()
                .map(|(key, schema)| {
                    let location = join(location, &format!("properties.{}", key));
                    (key.clone(), SchemaNode::compile_at(schema, location))
                })
                .collect()
        })
        .unwrap_or_default()
}

fn join(base: &str, segment: &str) -> String {
    if base.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", base, segment)
    }
}

/// A loaded schema document
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub id: String,
    pub root: SchemaNode,
}

impl Schema {
    pub fn new(id: impl Into<String>, raw: &Value) -> Self {
        Self {
            id: id.into(),
            root: SchemaNode::compile(raw),
        }
    }

    pub fn raw(&self) -> &Value {
        &self.root.raw
    }
}

/// All schemas of a session, keyed by schema id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Value>", into = "BTreeMap<String, Value>")]
pub struct SchemaDictionary {
    schemas: BTreeMap<String, Schema>,
}

impl SchemaDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, raw: &Value) {
        let id = id.into();
        self.schemas.insert(id.clone(), Schema::new(id, raw));
    }

    pub fn with_schema(mut self, id: impl Into<String>, raw: Value) -> Self {
        self.insert(id, &raw);
        self
    }

    pub fn get(&self, id: &str) -> Option<&Schema> {
        self.schemas.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.schemas.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }
}

impl From<BTreeMap<String, Value>> for SchemaDictionary {
    fn from(raw: BTreeMap<String, Value>) -> Self {
        let mut dictionary = SchemaDictionary::new();
        for (id, schema) in &raw {
            dictionary.insert(id.clone(), schema);
        }
        dictionary
    }
}

impl From<SchemaDictionary> for BTreeMap<String, Value> {
    fn from(dictionary: SchemaDictionary) -> Self {
        dictionary
            .schemas
            .into_iter()
            .map(|(id, schema)| (id, schema.root.raw))
            .collect()
    }
}
