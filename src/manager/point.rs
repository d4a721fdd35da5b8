//! ObserverManager<T> — routes store mutations to point observers.
//!
//! A point observer tracks either one id, or "the first record matching a
//! query". Query-registered observers are maintained against the mutation
//! batch alone: when the incumbent record stops matching (or is deleted),
//! the value settles to `None` without rescanning the table for an
//! alternative match — a later mutation that produces a match picks it up
//! again.

use std::collections::HashMap;
use std::sync::Arc;

use crate::observer::Observer;
use crate::query::{Query, Selector};
use crate::record::{Id, Record};

use super::retain_live;

/// Value type held by point observers: the tracked record, or `None`.
pub type PointValue<T> = Option<Arc<T>>;

struct QueryObserver<T> {
    observer: Observer<PointValue<T>>,
    query: Query,
}

/// Routes store mutations to point observers.
pub struct ObserverManager<T: Record> {
    id_observers: HashMap<Id, Vec<Observer<PointValue<T>>>>,
    query_observers: Vec<QueryObserver<T>>,
}

impl<T: Record> ObserverManager<T> {
    pub fn new() -> Self {
        Self {
            id_observers: HashMap::new(),
            query_observers: Vec::new(),
        }
    }

    /// Register `observer` under an id or a query, per `selector`.
    pub fn add(&mut self, observer: Observer<PointValue<T>>, selector: Selector) {
        match selector {
            Selector::Id(id) => self.id_observers.entry(id).or_default().push(observer),
            Selector::Query(query) => {
                self.query_observers.push(QueryObserver { observer, query })
            }
        }
    }

    /// Route an update batch.
    ///
    /// Id-registered observers for a batched record adopt it directly.
    /// Each query-registered observer re-derives its value by folding the
    /// batch over the current value, and emits only if the result differs
    /// by identity.
    pub fn notify_update(&mut self, updated: &[Arc<T>]) {
        for record in updated {
            if let Some(observers) = self.id_observers.get_mut(&record.id()) {
                retain_live(
                    observers,
                    |observer| observer.destroyed(),
                    |observer| observer.set(Some(Arc::clone(record))),
                );
            }
        }

        retain_live(
            &mut self.query_observers,
            |entry| entry.observer.destroyed(),
            |entry| {
                let mut value = entry.observer.value();
                for record in updated {
                    if let Some(current) = &value {
                        if current.id() == record.id() {
                            // The incumbent was updated: keep it while it
                            // still matches, otherwise settle to None.
                            value = entry
                                .query
                                .matches(record.as_ref())
                                .then(|| Arc::clone(record));
                            continue;
                        }
                    }
                    if entry.query.matches(record.as_ref()) {
                        value = Some(Arc::clone(record));
                    }
                }

                if !same_record(&value, &entry.observer.value()) {
                    entry.observer.set(value);
                }
            },
        );
    }

    /// Route a delete batch of confirmed-removed ids.
    pub fn notify_delete(&mut self, deleted: &[Id]) {
        for id in deleted {
            if let Some(observers) = self.id_observers.get_mut(id) {
                retain_live(
                    observers,
                    |observer| observer.destroyed(),
                    |observer| observer.set(None),
                );
            }

            retain_live(
                &mut self.query_observers,
                |entry| entry.observer.destroyed(),
                |entry| {
                    let holds_deleted = entry
                        .observer
                        .value()
                        .is_some_and(|current| current.id() == *id);
                    // No fallback search over the rest of the table for
                    // another matching record.
                    if holds_deleted {
                        entry.observer.set(None);
                    }
                },
            );
        }
    }
}

impl<T: Record> Default for ObserverManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity comparison of point values: same `Arc`, or both absent.
fn same_record<T>(a: &PointValue<T>, b: &PointValue<T>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}
