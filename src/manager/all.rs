//! ObserverAllManager<T> — routes store mutations to all-matches observers.
//!
//! An all-observer tracks either the full table or the complete result set
//! of a query. Queried observers own an incrementally maintained match set
//! keyed by id, so an update batch never forces a full table rescan.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::observer::Observer;
use crate::query::Query;
use crate::record::{Id, Record};

use super::retain_live;

/// Value type held by all-observers: the matching records.
pub type AllValue<T> = Vec<Arc<T>>;

struct QueryAllObserver<T> {
    observer: Observer<AllValue<T>>,
    query: Query,
    /// Exactly the records currently in the table that satisfy `query`.
    matches: BTreeMap<Id, Arc<T>>,
}

/// Routes store mutations to all-matches observers.
pub struct ObserverAllManager<T: Record> {
    all_observers: Vec<Observer<AllValue<T>>>,
    query_observers: Vec<QueryAllObserver<T>>,
}

impl<T: Record> ObserverAllManager<T> {
    pub fn new() -> Self {
        Self {
            all_observers: Vec::new(),
            query_observers: Vec::new(),
        }
    }

    /// Register `observer`, optionally scoped to `query`.
    ///
    /// For a queried registration the match set is seeded from the
    /// observer's own initial value, which the store has already filtered.
    pub fn add(&mut self, observer: Observer<AllValue<T>>, query: Option<Query>) {
        match query {
            None => self.all_observers.push(observer),
            Some(query) => {
                let matches = observer
                    .value()
                    .into_iter()
                    .map(|record| (record.id(), record))
                    .collect();
                self.query_observers.push(QueryAllObserver {
                    observer,
                    query,
                    matches,
                });
            }
        }
    }

    /// Route an update batch alongside a fresh snapshot of the whole table.
    ///
    /// Unqueried observers re-emit the snapshot unconditionally. Queried
    /// observers fold the batch into their match set and also re-emit
    /// unconditionally, even when the batch changed nothing for them.
    pub fn notify_update(&mut self, updated: &[Arc<T>], snapshot: &[Arc<T>]) {
        retain_live(
            &mut self.all_observers,
            |observer| observer.destroyed(),
            |observer| observer.set(snapshot.to_vec()),
        );

        retain_live(
            &mut self.query_observers,
            |entry| entry.observer.destroyed(),
            |entry| {
                for record in updated {
                    if entry.query.matches(record.as_ref()) {
                        entry.matches.insert(record.id(), Arc::clone(record));
                    } else {
                        entry.matches.remove(&record.id());
                    }
                }
                entry.observer.set(entry.matches.values().cloned().collect());
            },
        );
    }

    /// Route a delete batch.
    ///
    /// `ids` is the caller's original argument and may name ids that were
    /// never in the table; removing those from a match set is a harmless
    /// no-op. Queried observers re-emit only if at least one removal
    /// actually happened.
    pub fn notify_delete(&mut self, ids: &[Id], snapshot: &[Arc<T>]) {
        retain_live(
            &mut self.all_observers,
            |observer| observer.destroyed(),
            |observer| observer.set(snapshot.to_vec()),
        );

        retain_live(
            &mut self.query_observers,
            |entry| entry.observer.destroyed(),
            |entry| {
                let mut changed = false;
                for id in ids {
                    changed |= entry.matches.remove(id).is_some();
                }
                if changed {
                    entry.observer.set(entry.matches.values().cloned().collect());
                }
            },
        );
    }
}

impl<T: Record> Default for ObserverAllManager<T> {
    fn default() -> Self {
        Self::new()
    }
}
