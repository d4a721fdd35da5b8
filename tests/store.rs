//! Tests for `Store<T>` reads and mutations.

mod common;

use std::sync::Arc;

use observable_store::{Query, Store};

use common::{assert_same_records, person, Person};

#[test]
fn new_store_is_empty() {
    let store: Store<Person> = Store::new();
    assert_eq!(store.len(), 0);
    assert!(store.is_empty());
}

#[test]
fn update_stores_records_by_id_and_get_returns_the_same_handle() {
    let mut store = Store::new();
    let jack = person("p1", "jack", 10);
    let marc = person("p2", "marc", 15);
    let emma = person("p3", "emma", 20);

    store.update([jack.clone(), marc.clone(), emma.clone()]).unwrap();

    assert_eq!(store.len(), 3);
    assert!(Arc::ptr_eq(&store.get("p1").unwrap(), &jack));
    assert!(Arc::ptr_eq(&store.get("p2").unwrap(), &marc));
    assert!(Arc::ptr_eq(&store.get("p3").unwrap(), &emma));
}

#[test]
fn update_is_idempotent_on_id() {
    let mut store = Store::new();
    store.update([person("p1", "jack", 10)]).unwrap();
    let older = person("p1", "jack", 11);
    store.update([older.clone()]).unwrap();

    assert_eq!(store.len(), 1, "same id must not grow the table");
    assert!(Arc::ptr_eq(&store.get("p1").unwrap(), &older));
}

#[test]
fn find_applies_attribute_equality() {
    let mut store = Store::new();
    let jack = person("p1", "jack", 10);
    let marc = person("p2", "marc", 15);
    let emma = person("p3", "emma", 20);
    store.update([jack.clone(), marc.clone(), emma.clone()]).unwrap();

    let found = store.find(&Query::new().field("name", "jack")).unwrap();
    assert!(Arc::ptr_eq(&found, &jack));

    let found = store
        .find(&Query::new().field("name", "marc").field("age", 15))
        .unwrap();
    assert!(Arc::ptr_eq(&found, &marc));

    assert!(store
        .find(&Query::new().field("name", "marc").field("age", 20))
        .is_none());

    let found = store.find(&Query::new().field("age", 20)).unwrap();
    assert!(Arc::ptr_eq(&found, &emma));

    assert!(store.find(&Query::new()).is_some(), "empty query matches anything");
}

#[test]
fn get_all_returns_every_record() {
    let mut store = Store::new();
    let jack = person("p1", "jack", 10);
    let marc = person("p2", "marc", 15);
    let emma = person("p3", "emma", 20);
    store.update([jack.clone(), marc.clone(), emma.clone()]).unwrap();

    assert_same_records(&store.get_all(), &[&jack, &marc, &emma]);
}

#[test]
fn find_all_filters_by_query() {
    let mut store = Store::new();
    let jack = person("p1", "jack", 10);
    let marc = person("p2", "marc", 15);
    let emma = person("p3", "emma", 15);
    store.update([jack.clone(), marc.clone(), emma.clone()]).unwrap();

    assert_same_records(&store.find_all(&Query::new().field("name", "jack")), &[&jack]);
    assert_same_records(&store.find_all(&Query::new().field("age", 15)), &[&marc, &emma]);
    assert_same_records(&store.find_all(&Query::new()), &[&jack, &marc, &emma]);
    assert_same_records(&store.find_all(&Query::new().field("name", "john")), &[]);
}

#[test]
fn deleted_records_are_gone_from_every_read() {
    let mut store: Store<Person> = Store::new();
    store
        .update([person("p1", "jack", 10), person("p2", "marc", 15)])
        .unwrap();

    store.delete(["p1"]).unwrap();

    assert_eq!(store.len(), 1);
    assert!(store.get("p1").is_none());
    assert!(store.find(&Query::new().field("name", "jack")).is_none());
}

#[test]
fn deleting_an_absent_id_changes_nothing() {
    let mut store = Store::new();
    let jack = person("p1", "jack", 10);
    store.update([jack.clone()]).unwrap();

    store.delete(["nope"]).unwrap();

    assert_eq!(store.len(), 1);
    assert!(Arc::ptr_eq(&store.get("p1").unwrap(), &jack));
}
