//! Schema validation for form consumers
//!
//! The session never validates on its own; views call a [`Validator`] on the
//! snapshot they render to show inline errors.

use crate::errors::EditorResult;
use crate::session::Session;
use formsync_common::{DataLocation, PathStep};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    pub data_location: DataLocation,
    pub invalid_message: String,
}

pub trait Validator {
    fn validate(&self, schema: &Value, data: &Value) -> Vec<ValidationError>;
}

/// [`Validator`] backed by the `jsonschema` crate
///
/// A schema that fails to compile is reported as a single error at the root.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaValidator;

impl Validator for JsonSchemaValidator {
    fn validate(&self, schema: &Value, data: &Value) -> Vec<ValidationError> {
        match jsonschema::validator_for(schema) {
            Ok(validator) => validator
                .iter_errors(data)
                .map(|error| ValidationError {
                    data_location: location_from_pointer(&error.instance_path.to_string()),
                    invalid_message: error.to_string(),
                })
                .collect(),
            Err(error) => vec![ValidationError {
                data_location: DataLocation::root(),
                invalid_message: format!("Invalid schema: {}", error),
            }],
        }
    }
}

/// Validate the active entry against its schema
pub fn validate_active(session: &Session, validator: &dyn Validator) -> EditorResult<Vec<ValidationError>> {
    let snapshot = session.snapshot()?;
    Ok(validator.validate(&snapshot.schema, &snapshot.data))
}

/// `/items/0/title` -> `items[0].title`
fn location_from_pointer(pointer: &str) -> DataLocation {
    let steps = pointer
        .split('/')
        .skip(1)
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .map(|segment| match segment.parse::<usize>() {
            Ok(index) => PathStep::Index(index),
            Err(_) => PathStep::Key(segment),
        })
        .collect();
    DataLocation::new(steps)
}
