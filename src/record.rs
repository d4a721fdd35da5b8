//! Record identity — the [`Id`] key type and the [`Record`] trait.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unique key of a record within a [`Store`](crate::store::Store).
///
/// Ids are either integers or strings, the two key shapes JSON applications
/// actually use. They are compared, hashed, and ordered as plain values; an
/// integer id never equals a string id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Int(i64),
    Str(String),
}

impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Id::Int(value)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id::Str(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Id::Str(value)
    }
}

impl From<&Id> for Id {
    fn from(value: &Id) -> Self {
        value.clone()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Int(n) => write!(f, "{n}"),
            Id::Str(s) => f.write_str(s),
        }
    }
}

/// A storable application record.
///
/// The store understands exactly two things about a record: its unique
/// [`Id`], and the JSON value of any named field (used only for equality
/// during query matching). Everything else is opaque.
///
/// `field` should return `None` for fields the record does not have; `id`
/// does not need to be exposed through it, queries never constrain it.
pub trait Record: Send + Sync + 'static {
    /// The unique id of this record.
    fn id(&self) -> Id;

    /// The value of field `name`, or `None` if the record has no such field.
    fn field(&self, name: &str) -> Option<Value>;
}
