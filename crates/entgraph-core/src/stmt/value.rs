use crate::Result;

use chrono::{DateTime, Utc};
use std::{cmp::Ordering, hash::Hash};
use uuid::Uuid;

/// A field or identity value.
#[derive(Debug, Default, Clone)]
pub enum Value {
    /// Null value
    #[default]
    Null,

    Bool(bool),

    /// Signed 64-bit integer
    Int(i64),

    Float(f64),

    String(String),

    Bytes(Vec<u8>),

    Uuid(Uuid),

    Time(DateTime<Utc>),

    Json(serde_json::Value),

    /// Value of an enum field
    Enum(String),

    /// A list of values, used for `IN` predicates and composite identities.
    List(Vec<Value>),
}

impl Value {
    pub const fn null() -> Value {
        Value::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match *self {
            Value::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) | Value::Enum(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Value::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(v) => Some(v),
            _ => None,
        }
    }

    /// Adds two numeric values. Mixing ints and floats yields a float; int
    /// overflow is an error.
    pub fn add(&self, rhs: &Value) -> Result<Value> {
        Ok(match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => match a.checked_add(*b) {
                Some(sum) => Value::Int(sum),
                None => crate::bail!("integer overflow adding {b} to {a}"),
            },
            (Value::Float(a), Value::Float(b)) => Value::Float(a + b),
            (Value::Int(a), Value::Float(b)) => Value::Float(*a as f64 + b),
            (Value::Float(a), Value::Int(b)) => Value::Float(a + *b as f64),
            _ => crate::bail!("cannot add {:?} to {:?}", rhs, self),
        })
    }

    /// Concatenates two JSON arrays.
    pub fn append(&self, rhs: &Value) -> Result<Value> {
        match (self, rhs) {
            (Value::Json(serde_json::Value::Array(a)), Value::Json(serde_json::Value::Array(b))) => {
                let mut items = a.clone();
                items.extend(b.iter().cloned());
                Ok(Value::Json(serde_json::Value::Array(items)))
            }
            _ => crate::bail!("cannot append {:?} to {:?}", rhs, self),
        }
    }

    /// Compares two values of the same variant. Values of different variants
    /// are unordered, except ints and floats.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Null, Value::Null) => Some(Ordering::Equal),
            (Value::Bool(a), Value::Bool(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Value::String(a), Value::String(b)) => a.partial_cmp(b),
            (Value::Enum(a), Value::Enum(b)) => a.partial_cmp(b),
            (Value::Bytes(a), Value::Bytes(b)) => a.partial_cmp(b),
            (Value::Uuid(a), Value::Uuid(b)) => a.partial_cmp(b),
            (Value::Time(a), Value::Time(b)) => a.partial_cmp(b),
            (Value::List(a), Value::List(b)) => {
                for (a, b) in a.iter().zip(b) {
                    match a.compare(b)? {
                        Ordering::Equal => {}
                        ord => return Some(ord),
                    }
                }
                a.len().partial_cmp(&b.len())
            }
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            // Bitwise, so that values can be used as set members.
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Uuid(a), Value::Uuid(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::Json(a), Value::Json(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);

        match self {
            Value::Null => {}
            Value::Bool(v) => v.hash(state),
            Value::Int(v) => v.hash(state),
            Value::Float(v) => v.to_bits().hash(state),
            Value::String(v) | Value::Enum(v) => v.hash(state),
            Value::Bytes(v) => v.hash(state),
            Value::Uuid(v) => v.hash(state),
            Value::Time(v) => v.hash(state),
            // serde_json::Value is not Hash; its canonical text is.
            Value::Json(v) => v.to_string().hash(state),
            Value::List(v) => v.hash(state),
        }
    }
}

impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(v) | Value::Enum(v) => write!(f, "{v:?}"),
            Value::Bytes(v) => write!(f, "{v:?}"),
            Value::Uuid(v) => write!(f, "{v}"),
            Value::Time(v) => write!(f, "{}", v.to_rfc3339()),
            Value::Json(v) => write!(f, "{v}"),
            Value::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Value {
        Value::Bool(src)
    }
}

impl From<i32> for Value {
    fn from(src: i32) -> Value {
        Value::Int(src as i64)
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Value {
        Value::Int(src)
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Value {
        Value::Float(src)
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Value {
        Value::String(src.to_string())
    }
}

impl From<String> for Value {
    fn from(src: String) -> Value {
        Value::String(src)
    }
}

impl From<&String> for Value {
    fn from(src: &String) -> Value {
        Value::String(src.clone())
    }
}

impl From<Vec<u8>> for Value {
    fn from(src: Vec<u8>) -> Value {
        Value::Bytes(src)
    }
}

impl From<Uuid> for Value {
    fn from(src: Uuid) -> Value {
        Value::Uuid(src)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(src: DateTime<Utc>) -> Value {
        Value::Time(src)
    }
}

impl From<serde_json::Value> for Value {
    fn from(src: serde_json::Value) -> Value {
        Value::Json(src)
    }
}

impl From<Vec<Value>> for Value {
    fn from(src: Vec<Value>) -> Value {
        Value::List(src)
    }
}

impl<T> From<Option<T>> for Value
where
    Value: From<T>,
{
    fn from(src: Option<T>) -> Value {
        match src {
            Some(value) => Value::from(value),
            None => Value::Null,
        }
    }
}
