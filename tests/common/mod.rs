//! Shared fixtures for the integration tests.

#![allow(dead_code)] // each test target compiles its own copy

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use observable_store::{Id, Record};

/// The record type the integration tests revolve around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub age: i64,
}

impl Record for Person {
    fn id(&self) -> Id {
        self.id.as_str().into()
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "name" => Some(json!(self.name)),
            "age" => Some(json!(self.age)),
            _ => None,
        }
    }
}

pub fn person(id: &str, name: &str, age: i64) -> Arc<Person> {
    Arc::new(Person {
        id: id.to_string(),
        name: name.to_string(),
        age,
    })
}

/// A shared call-log for collecting callback invocations.
pub fn make_log<T: Send + 'static>() -> Arc<Mutex<Vec<T>>> {
    Arc::new(Mutex::new(Vec::new()))
}

/// Identity check: `value` holds exactly `expected` (same `Arc`).
pub fn is_same(value: &Option<Arc<Person>>, expected: &Arc<Person>) -> bool {
    matches!(value, Some(held) if Arc::ptr_eq(held, expected))
}

/// Equal-set assertion on record sequences: same length, and for every id
/// the same record on both sides, ignoring order.
pub fn assert_same_records(actual: &[Arc<Person>], expected: &[&Arc<Person>]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "expected {} records, got {:?}",
        expected.len(),
        actual.iter().map(|r| r.id.as_str()).collect::<Vec<_>>()
    );
    for wanted in expected {
        let found = actual.iter().find(|record| record.id == wanted.id);
        match found {
            Some(record) => assert_eq!(record.as_ref(), wanted.as_ref()),
            None => panic!("record {} missing from actual set", wanted.id),
        }
    }
}
