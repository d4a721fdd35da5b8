//! Attribute-equality queries and the [`Selector`] observe argument.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::record::{Id, Record};

/// A partial field → value equality predicate over a record type.
///
/// A record matches iff, for every field the query constrains, the record
/// has that field and its value is strictly equal to the query's value.
/// Unconstrained fields are ignored; the empty query matches every record.
/// A record that lacks a constrained field never matches, not even against
/// JSON `null`. `id` is not a queryable field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    fields: BTreeMap<String, Value>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `name` to equal `value`. Consumes and returns the query so
    /// constraints chain: `Query::new().field("name", "jack").field("age", 15)`.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether `record` satisfies every constraint of this query.
    pub fn matches<T: Record>(&self, record: &T) -> bool {
        self.fields
            .iter()
            .all(|(name, expected)| record.field(name).as_ref() == Some(expected))
    }
}

/// What a point observer tracks: one id, or the first record matching a
/// query. Argument of [`Store::observe`](crate::store::Store::observe).
#[derive(Debug, Clone)]
pub enum Selector {
    Id(Id),
    Query(Query),
}

impl From<Id> for Selector {
    fn from(id: Id) -> Self {
        Selector::Id(id)
    }
}

impl From<&str> for Selector {
    fn from(id: &str) -> Self {
        Selector::Id(id.into())
    }
}

impl From<String> for Selector {
    fn from(id: String) -> Self {
        Selector::Id(id.into())
    }
}

impl From<i64> for Selector {
    fn from(id: i64) -> Self {
        Selector::Id(id.into())
    }
}

impl From<Query> for Selector {
    fn from(query: Query) -> Self {
        Selector::Query(query)
    }
}
