use super::Value;

use serde::{Deserialize, Serialize};

/// Semantic type of an entity field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Int,
    Float,
    Bool,
    Time,
    Uuid,
    Bytes,
    Json,
    Enum,

    /// A user-defined type, stored opaquely.
    Other(String),
}

impl FieldType {
    /// Numeric fields support `add` deltas.
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Int | FieldType::Float)
    }

    /// JSON fields support `append` deltas.
    pub fn is_json(&self) -> bool {
        matches!(self, FieldType::Json)
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, FieldType::Enum)
    }

    /// Returns `true` if `delta` can be added to a field of this type. Int
    /// fields take int deltas only.
    pub fn accepts_delta(&self, delta: &Value) -> bool {
        matches!(
            (self, delta),
            (FieldType::Int, Value::Int(_)) | (FieldType::Float, Value::Int(_) | Value::Float(_))
        )
    }

    /// Returns `true` if `elements` can be appended to a field of this type.
    pub fn accepts_elements(&self, elements: &Value) -> bool {
        matches!(
            (self, elements),
            (FieldType::Json, Value::Json(serde_json::Value::Array(_)))
        )
    }

    /// Returns `true` if `value` can be stored in a field of this type.
    ///
    /// Null is accepted by every type; nillability is checked separately.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (FieldType::String, Value::String(_)) => true,
            (FieldType::Int, Value::Int(_)) => true,
            (FieldType::Float, Value::Float(_) | Value::Int(_)) => true,
            (FieldType::Bool, Value::Bool(_)) => true,
            (FieldType::Time, Value::Time(_)) => true,
            (FieldType::Uuid, Value::Uuid(_)) => true,
            (FieldType::Bytes, Value::Bytes(_)) => true,
            (FieldType::Json, Value::Json(_)) => true,
            (FieldType::Enum, Value::Enum(_) | Value::String(_)) => true,
            (FieldType::Other(_), _) => true,
            _ => false,
        }
    }
}

impl core::fmt::Display for FieldType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FieldType::String => f.write_str("string"),
            FieldType::Int => f.write_str("int"),
            FieldType::Float => f.write_str("float"),
            FieldType::Bool => f.write_str("bool"),
            FieldType::Time => f.write_str("time"),
            FieldType::Uuid => f.write_str("uuid"),
            FieldType::Bytes => f.write_str("bytes"),
            FieldType::Json => f.write_str("json"),
            FieldType::Enum => f.write_str("enum"),
            FieldType::Other(name) => f.write_str(name),
        }
    }
}
