//! Store<T> — the keyed record table, observer routing, and persistence
//! fan-out.
//!
//! All mutation, query, and notification logic is single-threaded and
//! synchronous; mutating methods take `&mut self` and run to completion.
//! The only async operation is [`Store::load`], which fans out to every
//! registered persistence adapter and fails as a whole on the first error.
//!
//! Records live in the table as `Arc<T>` and are handed out by handle:
//! `get` returns the very record `update` stored, never a copy.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future;

use crate::error::Result;
use crate::manager::{ObserverAllManager, ObserverManager};
use crate::observer::Observer;
use crate::persistency::Persistency;
use crate::query::{Query, Selector};
use crate::record::{Id, Record};

/// In-memory keyed store with live observers.
pub struct Store<T: Record> {
    records: BTreeMap<Id, Arc<T>>,
    point_observers: ObserverManager<T>,
    all_observers: ObserverAllManager<T>,
    adapters: Vec<Box<dyn Persistency<T>>>,
}

impl<T: Record> Store<T> {
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            point_observers: ObserverManager::new(),
            all_observers: ObserverAllManager::new(),
            adapters: Vec::new(),
        }
    }

    /// Number of records in the table.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Upsert every record in `records` by id, then notify observers and
    /// persistence adapters with the whole batch.
    ///
    /// Observers are not told whether a record was created or replaced;
    /// adapters receive the created and replaced sub-batches separately.
    pub fn update(&mut self, records: impl IntoIterator<Item = impl Into<Arc<T>>>) -> Result<()> {
        let mut batch: Vec<Arc<T>> = Vec::new();
        let mut created: Vec<Arc<T>> = Vec::new();
        let mut replaced: Vec<Arc<T>> = Vec::new();

        for record in records {
            let record: Arc<T> = record.into();
            match self.records.insert(record.id(), Arc::clone(&record)) {
                None => created.push(Arc::clone(&record)),
                Some(_) => replaced.push(Arc::clone(&record)),
            }
            batch.push(record);
        }

        self.point_observers.notify_update(&batch);
        let snapshot = self.get_all();
        self.all_observers.notify_update(&batch, &snapshot);

        for adapter in &self.adapters {
            if !created.is_empty() {
                adapter.on_create(&created)?;
            }
            if !replaced.is_empty() {
                adapter.on_update(&replaced)?;
            }
        }
        Ok(())
    }

    /// Remove every id in `ids` that is present in the table.
    ///
    /// Point observers and adapters are notified with the subset of ids
    /// actually removed; all-observers receive the caller's original id
    /// list, where removals of absent ids are no-ops.
    pub fn delete(&mut self, ids: impl IntoIterator<Item = impl Into<Id>>) -> Result<()> {
        let requested: Vec<Id> = ids.into_iter().map(Into::into).collect();
        let mut removed: Vec<Id> = Vec::new();

        for id in &requested {
            if self.records.remove(id).is_some() {
                removed.push(id.clone());
            }
        }

        self.point_observers.notify_delete(&removed);
        let snapshot = self.get_all();
        self.all_observers.notify_delete(&requested, &snapshot);

        for adapter in &self.adapters {
            if !removed.is_empty() {
                adapter.on_delete(&removed)?;
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// The record stored under `id`, or `None`.
    pub fn get(&self, id: impl Into<Id>) -> Option<Arc<T>> {
        self.records.get(&id.into()).cloned()
    }

    /// The first record (in table iteration order) matching `query`, or
    /// `None`.
    pub fn find(&self, query: &Query) -> Option<Arc<T>> {
        self.records
            .values()
            .find(|record| query.matches(record.as_ref()))
            .cloned()
    }

    /// Snapshot of every record, in table iteration order.
    pub fn get_all(&self) -> Vec<Arc<T>> {
        self.records.values().cloned().collect()
    }

    /// Snapshot of every record matching `query`, in table iteration order.
    pub fn find_all(&self, query: &Query) -> Vec<Arc<T>> {
        self.records
            .values()
            .filter(|record| query.matches(record.as_ref()))
            .cloned()
            .collect()
    }

    // -----------------------------------------------------------------------
    // Observers
    // -----------------------------------------------------------------------

    /// Observe one record, by id or by first query match.
    ///
    /// The observer is seeded with the current `get`/`find` result and then
    /// kept up to date by every subsequent mutation, until destroyed.
    pub fn observe(&mut self, selector: impl Into<Selector>) -> Observer<Option<Arc<T>>> {
        let selector = selector.into();
        let value = match &selector {
            Selector::Id(id) => self.get(id),
            Selector::Query(query) => self.find(query),
        };
        let observer = Observer::new(value);
        self.point_observers.add(observer.clone(), selector);
        observer
    }

    /// Observe the full result set of `query`, or the whole table when
    /// `query` is `None`.
    pub fn observe_all(&mut self, query: impl Into<Option<Query>>) -> Observer<Vec<Arc<T>>> {
        let query = query.into();
        let value = match &query {
            Some(query) => self.find_all(query),
            None => self.get_all(),
        };
        let observer = Observer::new(value);
        self.all_observers.add(observer.clone(), query);
        observer
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Register a persistence adapter. It will receive every subsequent
    /// create/update/delete batch and participate in [`Store::load`].
    pub fn persistency(&mut self, adapter: impl Persistency<T> + 'static) {
        self.adapters.push(Box::new(adapter));
    }

    /// Hydrate the store from every registered adapter.
    ///
    /// All `load` futures run concurrently; the first failure aborts the
    /// whole call with nothing applied. The concatenated records are applied
    /// through a single [`Store::update`], so observers and adapters see one
    /// batch.
    pub async fn load(&mut self) -> Result<()> {
        let loaded = future::try_join_all(self.adapters.iter().map(|adapter| adapter.load())).await?;
        self.update(loaded.into_iter().flatten().map(Arc::new))
    }
}

impl<T: Record> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}
