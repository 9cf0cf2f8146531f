//! Dynamic records for untyped callers.
//!
//! A [`Record`] is a JSON object carrying a `className`, an optional
//! `objectId` and arbitrary attributes. It lets callers that only hold
//! `serde_json::Value`s feed the scheduler while still being checked at the
//! enqueue boundary.

use crate::domain::item::{Item, ItemRejection};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A persistable JSON object.
///
/// # Example
/// ```
/// use save_throttle::Record;
/// use serde_json::json;
///
/// let record = Record::from_value(json!({"className": "Score", "points": 12})).unwrap();
/// assert_eq!(record.class_name, "Score");
/// assert_eq!(record.attributes["points"], 12);
///
/// assert!(Record::from_value(json!("not-an-item")).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Class the record is stored under
    #[serde(rename = "className")]
    pub class_name: String,
    /// Identity assigned by the backend, if any
    #[serde(rename = "objectId", default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    /// Remaining fields
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Record {
    /// Create an unsaved record of the given class.
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            object_id: None,
            attributes: Map::new(),
        }
    }

    /// Set the backend identity.
    pub fn with_object_id(mut self, object_id: impl Into<String>) -> Self {
        self.object_id = Some(object_id.into());
        self
    }

    /// Set one attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Parse a record out of an arbitrary JSON value.
    ///
    /// # Errors
    /// Returns an `ItemRejection` if the value is not an object, lacks a
    /// non-empty `className` string, or carries a non-string `objectId`.
    pub fn from_value(value: Value) -> Result<Self, ItemRejection> {
        let object = match &value {
            Value::Object(object) => object,
            other => {
                return Err(ItemRejection::new(format!(
                    "expected a JSON object, found {}",
                    json_type_name(other)
                )))
            }
        };

        match object.get("className") {
            Some(Value::String(name)) if !name.is_empty() => {}
            Some(Value::String(_)) => return Err(ItemRejection::new("className is empty")),
            Some(_) => return Err(ItemRejection::new("className must be a string")),
            None => return Err(ItemRejection::new("missing className")),
        }

        if let Some(id) = object.get("objectId") {
            if !id.is_string() && !id.is_null() {
                return Err(ItemRejection::new("objectId must be a string"));
            }
        }

        serde_json::from_value(value).map_err(|e| ItemRejection::new(e.to_string()))
    }

    /// Serialize back into a JSON value.
    pub fn to_value(&self) -> Value {
        let mut object = self.attributes.clone();
        object.insert("className".to_string(), Value::String(self.class_name.clone()));
        if let Some(id) = &self.object_id {
            object.insert("objectId".to_string(), Value::String(id.clone()));
        }
        Value::Object(object)
    }
}

impl Item for Record {
    fn kind(&self) -> &str {
        &self.class_name
    }

    fn id(&self) -> Option<&str> {
        self.object_id.as_deref()
    }
}

impl TryFrom<Value> for Record {
    type Error = ItemRejection;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Record::from_value(value)
    }
}

/// Short description of a raw JSON value for error messages.
pub(crate) fn describe_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("{:?}", s),
        Value::Object(object) => match object.get("className").and_then(Value::as_str) {
            Some(name) => format!("object of class {}", name),
            None => "object".to_string(),
        },
        other => json_type_name(other).to_string(),
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
